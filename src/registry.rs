//! Watch registration records.
//!
//! During controller setup the registry is append-only; freezing it ends
//! the write phase and produces the immutable [`Coverage`] view used at run
//! time. Records are never mutated or removed, and registration order is
//! preserved: membership evaluation consults only the first record of a
//! matching kind.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coverage::Coverage;
use crate::object::ObjectKind;
use crate::predicate::Predicate;

/// Unique identifier for one watch registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchId(Uuid);

impl WatchId {
    /// Create a new random watch id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for WatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered watch: a kind tag plus its acceptance predicates.
pub struct WatchRecord {
    id: WatchId,
    kind: ObjectKind,
    predicates: Vec<Arc<dyn Predicate>>,
}

impl WatchRecord {
    pub(crate) fn new(kind: ObjectKind, predicates: Vec<Arc<dyn Predicate>>) -> Self {
        Self {
            id: WatchId::new(),
            kind,
            predicates,
        }
    }

    /// Id minted at registration.
    #[must_use]
    pub const fn id(&self) -> WatchId {
        self.id
    }

    /// The kind this watch covers.
    #[must_use]
    pub const fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Acceptance predicates, in registration order.
    #[must_use]
    pub fn predicates(&self) -> &[Arc<dyn Predicate>] {
        &self.predicates
    }
}

impl fmt::Debug for WatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRecord")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Ordered watch declarations accumulated while a control loop is wired up.
///
/// Append-only during the setup phase; [`freeze`](Self::freeze) consumes
/// the registry and ends the write phase. The registry lives and dies with
/// the control loop instance that owns it.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    records: Vec<WatchRecord>,
}

impl WatchRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, returning the id minted for it.
    pub fn record(&mut self, kind: ObjectKind, predicates: Vec<Arc<dyn Predicate>>) -> WatchId {
        let record = WatchRecord::new(kind, predicates);
        let id = record.id();
        self.records.push(record);
        id
    }

    /// Number of registered watches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ends the write phase, producing the immutable run-time view.
    #[must_use]
    pub fn freeze(self) -> Coverage {
        Coverage::new(self.records)
    }
}
