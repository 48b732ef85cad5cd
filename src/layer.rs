//! Strategy selection and controller/client wiring.
//!
//! One implementation serves both deployment strategies: the mode is a
//! runtime value fixed when the layer is constructed, and the host injects
//! the engine's controller factory instead of the layer reaching into a
//! process-wide constructor. Passthrough and instrumented wiring present
//! the same external shape, so the surrounding control-loop code never
//! branches on which strategy is active.

use std::env;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::audit::AuditedStore;
use crate::controller::{Controller, RecordingController};
use crate::coverage::Coverage;
use crate::diag::{DiagnosticSink, FanoutSink, TextSink, TracingSink};
use crate::error::ControllerError;
use crate::registry::WatchRegistry;
use crate::store::ObjectStore;

/// Environment variable consulted by [`AuditMode::from_env`].
pub const MODE_ENV_VAR: &str = "LOOPAUDIT_MODE";

/// Deployment strategy, fixed for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    /// Raw collaborator behavior; no registry, no diagnostics.
    #[default]
    Passthrough,

    /// Record watch declarations and audit reads against them.
    Instrumented,
}

impl AuditMode {
    /// Reads the mode from the `LOOPAUDIT_MODE` environment variable.
    ///
    /// `instrumented` (case-insensitive) selects instrumentation; anything
    /// else, including an unset variable, selects passthrough.
    #[must_use]
    pub fn from_env() -> Self {
        match env::var(MODE_ENV_VAR) {
            Ok(value) if value.eq_ignore_ascii_case("instrumented") => Self::Instrumented,
            _ => Self::Passthrough,
        }
    }

    /// Whether this mode records and audits.
    #[must_use]
    pub const fn is_instrumented(self) -> bool {
        matches!(self, Self::Instrumented)
    }
}

/// Audit layer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Strategy to wire.
    pub mode: AuditMode,
}

/// The integration shim: wires controllers and data-access clients per the
/// configured strategy.
pub struct AuditLayer {
    mode: AuditMode,
    sink: Arc<dyn DiagnosticSink>,
}

impl AuditLayer {
    /// Layer with the default sinks: structured tracing plus a plain-text
    /// stderr fallback.
    #[must_use]
    pub fn new(config: AuditConfig) -> Self {
        let sink = FanoutSink::new()
            .with(Arc::new(TracingSink))
            .with(Arc::new(TextSink::stderr()));
        Self::with_sink(config, Arc::new(sink))
    }

    /// Layer with a caller-provided diagnostic sink.
    #[must_use]
    pub fn with_sink(config: AuditConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            mode: config.mode,
            sink,
        }
    }

    /// The configured strategy.
    #[must_use]
    pub const fn mode(&self) -> AuditMode {
        self.mode
    }

    /// Builds a controller through the injected engine factory.
    ///
    /// The returned wrapper records watch declarations only in instrumented
    /// mode; in both modes every registration is forwarded to the engine
    /// as-is.
    ///
    /// # Errors
    /// Factory errors propagate unchanged.
    pub fn build_controller<C, F>(
        &self,
        name: &str,
        factory: F,
    ) -> Result<RecordingController<C>, ControllerError>
    where
        C: Controller,
        F: FnOnce(&str) -> Result<C, ControllerError>,
    {
        let inner = factory(name)?;
        let registry = self.mode.is_instrumented().then(WatchRegistry::new);
        Ok(RecordingController::new(
            name.to_string(),
            inner,
            registry,
            Arc::clone(&self.sink),
        ))
    }

    /// Ends the setup phase.
    ///
    /// Consumes the wrapper and freezes the registry it accumulated. From
    /// here on the registry is immutable; the host must not register
    /// further watches through retained engine handles.
    #[must_use]
    pub fn complete<C: Controller>(&self, controller: RecordingController<C>) -> CompletedController<C> {
        let (name, inner, registry) = controller.into_parts();
        CompletedController {
            name,
            controller: inner,
            coverage: registry.map(|registry| Arc::new(registry.freeze())),
            sink: Arc::clone(&self.sink),
        }
    }
}

/// A control loop whose setup phase has ended.
pub struct CompletedController<C> {
    name: String,
    /// The raw engine controller, ready to run.
    pub controller: C,
    coverage: Option<Arc<Coverage>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<C> CompletedController<C> {
    /// Coverage captured during setup; `None` in passthrough mode.
    #[must_use]
    pub fn coverage(&self) -> Option<&Arc<Coverage>> {
        self.coverage.as_ref()
    }

    /// Wraps the data-access client for this control loop.
    ///
    /// In passthrough mode the wrapper carries no coverage and behaves
    /// identically to `store`.
    #[must_use]
    pub fn client<S: ObjectStore>(&self, store: S) -> AuditedStore<S> {
        AuditedStore::new(
            store,
            self.name.clone(),
            self.coverage.clone(),
            Arc::clone(&self.sink),
        )
    }
}
