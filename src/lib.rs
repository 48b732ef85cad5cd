//! # loopaudit - watch-coverage auditing for control loops
//!
//! A reconciliation-style control loop only hears about resource kinds it
//! registered watches for. A read of any other kind silently observes stale
//! data once that resource changes. loopaudit records what a control loop
//! declared it watches, freezes those declarations into an immutable
//! coverage view, and decorates the read path so reads of uncovered objects
//! are reported through diagnostic sinks - without ever changing what the
//! read returns.
//!
//! ## Core Concepts
//!
//! - **ObjectKind**: explicit type tag; watch matching is equality on it
//! - **Predicate**: per-event-kind delivery filter attached to a watch
//! - **Coverage**: frozen registry answering "is this object watched?"
//! - **AuditedStore**: read decorator emitting uncovered-read diagnostics
//! - **AuditLayer**: strategy shim wiring passthrough or instrumented mode
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use loopaudit::{AuditConfig, AuditLayer, AuditMode, KindSource, ObjectKind};
//!
//! let layer = AuditLayer::new(AuditConfig { mode: AuditMode::from_env() });
//!
//! // Setup phase: registrations are recorded and forwarded to the engine.
//! let mut controller = layer.build_controller("deployer", |name| engine.controller(name))?;
//! controller.watch(
//!     Box::new(KindSource::new(ObjectKind::grouped("apps", "Deployment"))),
//!     handler,
//!     vec![],
//! )?;
//!
//! // Run phase: reads of kinds no watch covers are flagged.
//! let completed = layer.complete(controller);
//! let client = completed.client(raw_store);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod controller;
pub mod coverage;
pub mod diag;
pub mod error;
pub mod event;
pub mod layer;
pub mod object;
pub mod predicate;
pub mod registry;
pub mod store;

// Re-export primary types at crate root for convenience
pub use audit::AuditedStore;
pub use controller::{Controller, EventHandler, KindSource, RecordingController, WatchSource};
pub use coverage::Coverage;
pub use diag::{
    AuditEvent, AuditOutcome, AuditStream, ChannelSink, DiagnosticSink, FanoutSink, TextSink,
    TracingSink,
};
pub use error::{AuditResult, ControllerError, LoopAuditError, StoreError};
pub use event::{CreateEvent, DeleteEvent, GenericEvent, UpdateEvent};
pub use layer::{AuditConfig, AuditLayer, AuditMode, CompletedController, MODE_ENV_VAR};
pub use object::{Object, ObjectKey, ObjectKind, ObjectRecord};
pub use predicate::{InNamespace, LabelEquals, LabelSelector, LabelValueMatches, Predicate};
pub use registry::{WatchId, WatchRecord, WatchRegistry};
pub use store::{MemoryStore, ObjectStore};
