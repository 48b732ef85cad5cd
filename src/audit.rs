//! Auditing decoration of the data-access read path.

use std::sync::Arc;

use crate::coverage::Coverage;
use crate::diag::{AuditEvent, AuditOutcome, DiagnosticSink};
use crate::error::StoreError;
use crate::object::{Object, ObjectKey};
use crate::store::ObjectStore;

/// Read-path decorator flagging reads of uncovered objects.
///
/// Purely observational: every read delegates to the wrapped store and its
/// result, object or error, is returned unchanged. Coverage is consulted
/// only after a successful read, and diagnostic emission can never affect
/// the outcome. Without coverage (passthrough mode) the wrapper behaves
/// identically to the wrapped store and emits nothing.
pub struct AuditedStore<S> {
    inner: S,
    controller: String,
    coverage: Option<Arc<Coverage>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<S> AuditedStore<S> {
    pub(crate) fn new(
        inner: S,
        controller: String,
        coverage: Option<Arc<Coverage>>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            inner,
            controller,
            coverage,
            sink,
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ObjectStore> ObjectStore for AuditedStore<S> {
    fn get(&self, key: &ObjectKey) -> Result<Arc<dyn Object>, StoreError> {
        let object = self.inner.get(key)?;

        if let Some(coverage) = &self.coverage {
            if !coverage.is_watched(object.as_ref()) {
                self.sink.emit(&AuditEvent::new(
                    self.controller.clone(),
                    AuditOutcome::UncoveredRead {
                        kind: object.object_kind().clone(),
                        namespace: object.namespace().map(str::to_owned),
                        name: object.name().to_owned(),
                    },
                ));
            }
        }

        Ok(object)
    }
}
