//! Watch predicates.
//!
//! A predicate filters, per lifecycle event kind, whether an event for a
//! given object would be delivered. Predicates are supplied by the control
//! loop author at watch registration and owned by the registry record they
//! were registered with. Every check defaults to accepting; implementors
//! override only the event kinds they filter.

use std::collections::BTreeMap;

use regex::Regex;

use crate::event::{CreateEvent, DeleteEvent, GenericEvent, UpdateEvent};
use crate::object::Object;

/// Per-event-kind delivery filter.
pub trait Predicate: Send + Sync {
    /// Would a creation event for this object be delivered?
    fn create(&self, _event: &CreateEvent<'_>) -> bool {
        true
    }

    /// Would an update event between these states be delivered?
    fn update(&self, _event: &UpdateEvent<'_>) -> bool {
        true
    }

    /// Would a deletion event for this object be delivered?
    fn delete(&self, _event: &DeleteEvent<'_>) -> bool {
        true
    }

    /// Would a generic event for this object be delivered?
    fn generic(&self, _event: &GenericEvent<'_>) -> bool {
        true
    }
}

/// Accepts objects carrying one exact label value.
#[derive(Debug, Clone)]
pub struct LabelEquals {
    key: String,
    value: String,
}

impl LabelEquals {
    /// Predicate accepting objects whose label `key` equals `value`.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn accepts(&self, object: &dyn Object) -> bool {
        object.label(&self.key) == Some(self.value.as_str())
    }
}

impl Predicate for LabelEquals {
    fn create(&self, event: &CreateEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn update(&self, event: &UpdateEvent<'_>) -> bool {
        self.accepts(event.object_new)
    }

    fn delete(&self, event: &DeleteEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn generic(&self, event: &GenericEvent<'_>) -> bool {
        self.accepts(event.object)
    }
}

/// Accepts objects carrying every label in a required set.
#[derive(Debug, Clone, Default)]
pub struct LabelSelector {
    required: BTreeMap<String, String>,
}

impl LabelSelector {
    /// Empty selector; accepts everything until labels are required.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires label `key` to equal `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.required.insert(key.into(), value.into());
        self
    }

    fn accepts(&self, object: &dyn Object) -> bool {
        self.required
            .iter()
            .all(|(key, value)| object.label(key) == Some(value.as_str()))
    }
}

impl Predicate for LabelSelector {
    fn create(&self, event: &CreateEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn update(&self, event: &UpdateEvent<'_>) -> bool {
        self.accepts(event.object_new)
    }

    fn delete(&self, event: &DeleteEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn generic(&self, event: &GenericEvent<'_>) -> bool {
        self.accepts(event.object)
    }
}

/// Accepts objects whose label value matches a regular expression.
///
/// Invalid patterns are rejected at construction, not at audit time.
#[derive(Debug, Clone)]
pub struct LabelValueMatches {
    key: String,
    pattern: Regex,
}

impl LabelValueMatches {
    /// Predicate accepting objects whose label `key` matches `pattern`.
    ///
    /// # Errors
    /// Returns the regex parse error for an invalid pattern.
    pub fn new(key: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            key: key.into(),
            pattern: Regex::new(pattern)?,
        })
    }

    fn accepts(&self, object: &dyn Object) -> bool {
        object
            .label(&self.key)
            .is_some_and(|value| self.pattern.is_match(value))
    }
}

impl Predicate for LabelValueMatches {
    fn create(&self, event: &CreateEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn update(&self, event: &UpdateEvent<'_>) -> bool {
        self.accepts(event.object_new)
    }

    fn delete(&self, event: &DeleteEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn generic(&self, event: &GenericEvent<'_>) -> bool {
        self.accepts(event.object)
    }
}

/// Restricts delivery to objects in one namespace.
#[derive(Debug, Clone)]
pub struct InNamespace {
    namespace: String,
}

impl InNamespace {
    /// Predicate accepting only objects in `namespace`.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    fn accepts(&self, object: &dyn Object) -> bool {
        object.namespace() == Some(self.namespace.as_str())
    }
}

impl Predicate for InNamespace {
    fn create(&self, event: &CreateEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn update(&self, event: &UpdateEvent<'_>) -> bool {
        self.accepts(event.object_new)
    }

    fn delete(&self, event: &DeleteEvent<'_>) -> bool {
        self.accepts(event.object)
    }

    fn generic(&self, event: &GenericEvent<'_>) -> bool {
        self.accepts(event.object)
    }
}
