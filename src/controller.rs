//! Control-loop engine seams and the watch-recording wrapper.
//!
//! The engine itself is an external collaborator; this module defines the
//! narrow traits the audit layer needs from it and the composition wrapper
//! that records watch declarations while forwarding every registration
//! unchanged. Wrapping never changes which notifications get delivered.

use std::sync::Arc;

use crate::diag::{AuditEvent, AuditOutcome, DiagnosticSink};
use crate::error::ControllerError;
use crate::object::{Object, ObjectKind};
use crate::predicate::Predicate;
use crate::registry::WatchRegistry;

/// Source of change notifications for one resource kind.
///
/// `object_kind` is a capability probe: sources that cannot name their kind
/// return `None`. Coverage for such a source is unknowable, so objects it
/// delivers stay conservatively uncovered.
pub trait WatchSource: Send {
    /// The kind this source emits notifications for, when known.
    fn object_kind(&self) -> Option<ObjectKind>;
}

/// Receives the notifications a watch delivers.
pub trait EventHandler: Send + Sync {
    /// Deliver one object notification.
    fn handle(&self, object: &dyn Object);
}

/// The watch-registration surface of a control-loop engine.
pub trait Controller: Send {
    /// Register a watch with the engine.
    ///
    /// # Errors
    /// Whatever the engine reports for a rejected registration.
    fn watch(
        &mut self,
        source: Box<dyn WatchSource>,
        handler: Arc<dyn EventHandler>,
        predicates: Vec<Arc<dyn Predicate>>,
    ) -> Result<(), ControllerError>;
}

/// A [`WatchSource`] declaring a fixed kind.
#[derive(Debug, Clone)]
pub struct KindSource {
    kind: ObjectKind,
}

impl KindSource {
    /// Source for notifications of `kind`.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self { kind }
    }
}

impl WatchSource for KindSource {
    fn object_kind(&self) -> Option<ObjectKind> {
        Some(self.kind.clone())
    }
}

/// Controller wrapper that records watch declarations.
///
/// Holds the wrapped engine controller by composition and delegates every
/// registration as-is: same source, same handler, same predicate sequence.
/// When recording is active and the source names its kind, a registry
/// record is appended first. Recording is inactive in passthrough mode.
pub struct RecordingController<C: Controller> {
    name: String,
    inner: C,
    registry: Option<WatchRegistry>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<C: Controller> RecordingController<C> {
    pub(crate) fn new(
        name: String,
        inner: C,
        registry: Option<WatchRegistry>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            name,
            inner,
            registry,
            sink,
        }
    }

    /// Name the controller was built under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Watches recorded so far; zero while in passthrough mode.
    #[must_use]
    pub fn recorded_watches(&self) -> usize {
        self.registry.as_ref().map_or(0, WatchRegistry::len)
    }

    pub(crate) fn into_parts(self) -> (String, C, Option<WatchRegistry>) {
        (self.name, self.inner, self.registry)
    }
}

impl<C: Controller> Controller for RecordingController<C> {
    fn watch(
        &mut self,
        source: Box<dyn WatchSource>,
        handler: Arc<dyn EventHandler>,
        predicates: Vec<Arc<dyn Predicate>>,
    ) -> Result<(), ControllerError> {
        if let Some(registry) = self.registry.as_mut() {
            match source.object_kind() {
                Some(kind) => {
                    registry.record(kind, predicates.clone());
                }
                None => {
                    self.sink.emit(&AuditEvent::new(
                        self.name.clone(),
                        AuditOutcome::UnrecordedWatch {
                            detail: "watch source does not expose an object kind".to_string(),
                        },
                    ));
                }
            }
        }

        self.inner.watch(source, handler, predicates)
    }
}
