//! Diagnostic records and sinks.
//!
//! Uncovered reads are reported through sinks as a side channel so that
//! detection never changes program behavior. `emit` is infallible by
//! contract; sinks swallow their own delivery failures.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::object::ObjectKind;

/// What an audit diagnostic reports.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// A successful read of an object no registered watch covers.
    UncoveredRead {
        kind: ObjectKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        name: String,
    },

    /// A watch was registered whose source exposes no object kind.
    UnrecordedWatch {
        detail: String,
    },
}

/// One emitted audit diagnostic.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Name of the control loop the diagnostic belongs to.
    pub controller: String,
    pub outcome: AuditOutcome,
}

impl AuditEvent {
    /// Stamps a new diagnostic for `controller`.
    #[must_use]
    pub fn new(controller: impl Into<String>, outcome: AuditOutcome) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            controller: controller.into(),
            outcome,
        }
    }
}

/// Destination for audit diagnostics.
///
/// Emission must never fail, block, or otherwise leak back into the read
/// path that produced the diagnostic.
pub trait DiagnosticSink: Send + Sync {
    /// Deliver one diagnostic.
    fn emit(&self, event: &AuditEvent);
}

/// Structured sink logging through `tracing`.
///
/// Uncovered reads log at warn level with field-tagged kind, namespace, and
/// name; unrecorded watches log at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: &AuditEvent) {
        match &event.outcome {
            AuditOutcome::UncoveredRead {
                kind,
                namespace,
                name,
            } => {
                tracing::warn!(
                    controller = %event.controller,
                    kind = %kind,
                    namespace = namespace.as_deref().unwrap_or(""),
                    name = %name,
                    "read without watch"
                );
            }
            AuditOutcome::UnrecordedWatch { detail } => {
                tracing::debug!(
                    controller = %event.controller,
                    detail = %detail,
                    "watch not recorded"
                );
            }
        }
    }
}

/// Plain-text fallback sink writing one line per diagnostic.
pub struct TextSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> TextSink<W> {
    /// Sink writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl TextSink<io::Stderr> {
    /// Sink writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> DiagnosticSink for TextSink<W> {
    fn emit(&self, event: &AuditEvent) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        let outcome = serde_json::to_string(&event.outcome)
            .unwrap_or_else(|_| format!("{:?}", event.outcome));

        // A broken writer must never affect the read path.
        let _ = writeln!(
            writer,
            "{} {} {}",
            event.timestamp.to_rfc3339(),
            event.controller,
            outcome
        );
    }
}

/// Broadcasts every diagnostic to several sinks.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl FanoutSink {
    /// Empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink to the fan-out.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl DiagnosticSink for FanoutSink {
    fn emit(&self, event: &AuditEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

/// Bounded non-blocking channel sink for programmatic consumption.
///
/// Diagnostics past capacity are dropped and counted; emission never blocks
/// the reader that produced them.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<AuditEvent>,
    dropped: AtomicU64,
}

impl ChannelSink {
    /// Creates a sink and its paired stream.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, AuditStream) {
        let (tx, rx) = bounded(capacity.max(1));
        (
            Self {
                tx,
                dropped: AtomicU64::new(0),
            },
            AuditStream { rx },
        )
    }

    /// Diagnostics dropped because the stream was full or disconnected.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for ChannelSink {
    fn emit(&self, event: &AuditEvent) {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Receiving side of a [`ChannelSink`].
#[derive(Debug)]
pub struct AuditStream {
    rx: Receiver<AuditEvent>,
}

impl AuditStream {
    /// Receives the next diagnostic, blocking until one arrives.
    ///
    /// Returns `None` once every paired sink has been dropped.
    #[must_use]
    pub fn recv(&self) -> Option<AuditEvent> {
        self.rx.recv().ok()
    }

    /// Receives the next diagnostic with a timeout.
    ///
    /// Returns `None` on timeout or once every paired sink has been dropped.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AuditEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Drains everything currently queued.
    #[must_use]
    pub fn drain(&self) -> Vec<AuditEvent> {
        self.rx.try_iter().collect()
    }
}
