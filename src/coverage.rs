//! Watch membership evaluation.
//!
//! [`Coverage`] is the frozen, run-phase view of a watch registry: a pure
//! query surface over immutable records, shareable across reader threads
//! without synchronization.

use crate::event::{CreateEvent, DeleteEvent, GenericEvent, UpdateEvent};
use crate::object::Object;
use crate::registry::WatchRecord;

/// Frozen watch registry plus the membership query.
///
/// Produced by [`WatchRegistry::freeze`](crate::registry::WatchRegistry::freeze);
/// immutable from then on.
#[derive(Debug)]
pub struct Coverage {
    records: Vec<WatchRecord>,
}

impl Coverage {
    pub(crate) fn new(records: Vec<WatchRecord>) -> Self {
        Self { records }
    }

    /// Records in registration order.
    #[must_use]
    pub fn records(&self) -> &[WatchRecord] {
        &self.records
    }

    /// Whether `object` is covered by the registered watches.
    ///
    /// Only the first record whose kind tag equals the object's kind is
    /// consulted. Every predicate on that record must accept the object on
    /// at least one event kind; a single rejecting predicate makes the
    /// object uncovered.
    ///
    /// # Known limitations
    ///
    /// Only one snapshot of the object exists at audit time, so the update
    /// check runs with the same object as both prior and new state. A
    /// predicate that only accepts genuine transitions can therefore report
    /// an object as uncovered here.
    ///
    /// When several records share a kind, later records never rescue an
    /// object the first record's predicates rejected.
    #[must_use]
    pub fn is_watched(&self, object: &dyn Object) -> bool {
        let Some(record) = self
            .records
            .iter()
            .find(|record| record.kind() == object.object_kind())
        else {
            return false;
        };

        record.predicates().iter().all(|predicate| {
            predicate.create(&CreateEvent { object })
                || predicate.delete(&DeleteEvent { object })
                || predicate.generic(&GenericEvent { object })
                || predicate.update(&UpdateEvent {
                    object_old: object,
                    object_new: object,
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::object::{ObjectKind, ObjectRecord};
    use crate::predicate::Predicate;
    use crate::registry::WatchRegistry;

    // Compile-time test: coverage must be shareable across reader threads
    fn _assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn _coverage_is_send_sync() {
        _assert_send_sync::<Coverage>();
    }

    struct RejectAll;

    impl Predicate for RejectAll {
        fn create(&self, _event: &CreateEvent<'_>) -> bool {
            false
        }

        fn update(&self, _event: &UpdateEvent<'_>) -> bool {
            false
        }

        fn delete(&self, _event: &DeleteEvent<'_>) -> bool {
            false
        }

        fn generic(&self, _event: &GenericEvent<'_>) -> bool {
            false
        }
    }

    /// Accepts only through the snapshot update check.
    struct UpdateOnly;

    impl Predicate for UpdateOnly {
        fn create(&self, _event: &CreateEvent<'_>) -> bool {
            false
        }

        fn delete(&self, _event: &DeleteEvent<'_>) -> bool {
            false
        }

        fn generic(&self, _event: &GenericEvent<'_>) -> bool {
            false
        }
    }

    fn kind_a() -> ObjectKind {
        ObjectKind::new("A")
    }

    fn object_of(kind: ObjectKind) -> ObjectRecord {
        ObjectRecord::new(kind, "obj-0")
    }

    #[test]
    fn empty_registry_covers_nothing() {
        let coverage = WatchRegistry::new().freeze();
        assert!(!coverage.is_watched(&object_of(kind_a())));
        assert!(!coverage.is_watched(&object_of(ObjectKind::grouped("apps", "B"))));
    }

    #[test]
    fn kind_match_without_predicates_is_covered() {
        let mut registry = WatchRegistry::new();
        registry.record(kind_a(), vec![]);
        let coverage = registry.freeze();

        assert!(coverage.is_watched(&object_of(kind_a())));
        assert!(!coverage.is_watched(&object_of(ObjectKind::new("B"))));
    }

    #[test]
    fn rejecting_predicate_uncovers_a_matching_kind() {
        let mut registry = WatchRegistry::new();
        registry.record(kind_a(), vec![Arc::new(RejectAll)]);
        let coverage = registry.freeze();

        assert!(!coverage.is_watched(&object_of(kind_a())));
    }

    #[test]
    fn any_accepting_event_kind_is_enough() {
        let mut registry = WatchRegistry::new();
        registry.record(kind_a(), vec![Arc::new(UpdateOnly)]);
        let coverage = registry.freeze();

        // Accepted solely through the snapshot update check.
        assert!(coverage.is_watched(&object_of(kind_a())));
    }

    #[test]
    fn every_predicate_must_accept() {
        let mut registry = WatchRegistry::new();
        registry.record(kind_a(), vec![Arc::new(UpdateOnly), Arc::new(RejectAll)]);
        let coverage = registry.freeze();

        assert!(!coverage.is_watched(&object_of(kind_a())));
    }

    #[test]
    fn first_match_wins_for_duplicate_kinds() {
        let mut registry = WatchRegistry::new();
        registry.record(kind_a(), vec![Arc::new(RejectAll)]);
        registry.record(kind_a(), vec![]);
        let coverage = registry.freeze();

        // The second record would accept, but it is never consulted.
        assert!(!coverage.is_watched(&object_of(kind_a())));
    }
}
