//! Object identity model.
//!
//! Coverage decisions compare objects by an explicit kind tag, not by
//! runtime type introspection: two objects match a watch only when their
//! [`ObjectKind`] tags are equal. There is no notion of subtyping or
//! interface satisfaction anywhere in the comparison.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable type tag identifying a resource kind.
///
/// The tag is the whole identity: watch matching is an equality check on
/// it. Kinds may carry an API group for hosts that namespace their kinds;
/// ungrouped kinds compare equal only to other ungrouped kinds of the same
/// name.
///
/// # Examples
///
/// ```
/// use loopaudit::ObjectKind;
///
/// let plain = ObjectKind::new("Deployment");
/// let grouped = ObjectKind::grouped("apps", "Deployment");
/// assert_ne!(plain, grouped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKind {
    group: String,
    kind: String,
}

impl ObjectKind {
    /// Creates an ungrouped kind tag.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            group: String::new(),
            kind: kind.into(),
        }
    }

    /// Creates a kind tag under an API group.
    #[must_use]
    pub fn grouped(group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
        }
    }

    /// The API group, empty for ungrouped kinds.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}/{}", self.group, self.kind)
        }
    }
}

/// Lookup key for keyed reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    /// Namespace the object lives in, if namespaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Object name, unique within its namespace.
    pub name: String,
}

impl ObjectKey {
    /// Key for a cluster-scoped object.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Key for a namespaced object.
    #[must_use]
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Capability an auditable object must expose.
///
/// Host object types implement this to participate in coverage checks; the
/// audit layer never mutates an object through it.
pub trait Object: Send + Sync {
    /// The object's kind tag.
    fn object_kind(&self) -> &ObjectKind;

    /// Namespace the object lives in, if namespaced.
    fn namespace(&self) -> Option<&str>;

    /// Object name.
    fn name(&self) -> &str;

    /// Label map.
    fn labels(&self) -> &BTreeMap<String, String>;

    /// Value of a single label.
    fn label(&self, key: &str) -> Option<&str> {
        self.labels().get(key).map(String::as_str)
    }

    /// The key this object is addressed by.
    fn key(&self) -> ObjectKey {
        ObjectKey {
            namespace: self.namespace().map(str::to_owned),
            name: self.name().to_owned(),
        }
    }
}

/// Minimal owned [`Object`] implementation.
///
/// Intended for embedded usage, tests, and as a reference implementation;
/// hosts with richer object models implement [`Object`] on their own types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    kind: ObjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
}

impl ObjectRecord {
    /// Creates a cluster-scoped record with no labels.
    #[must_use]
    pub fn new(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: None,
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Places the record in a namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Attaches a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

impl Object for ObjectRecord {
    fn object_kind(&self) -> &ObjectKind {
        &self.kind
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }
}
