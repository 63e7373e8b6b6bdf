//! The bridge handle.

use nativefs_jobs::{EventBus, JobRegistry};
use nativefs_types::{Capability, JobId, NativeEngine, Result, unsupported};
use std::sync::Arc;
use tracing::debug;

/// Filesystem and transfer bridge over a [`NativeEngine`].
///
/// Each `NativeFs` owns one [`JobRegistry`]; job ids are unique and strictly
/// increasing per instance.
pub struct NativeFs {
    pub(crate) engine: Arc<dyn NativeEngine>,
    pub(crate) registry: JobRegistry,
}

impl NativeFs {
    /// Creates a bridge over `engine`, routing transfer events from `bus`.
    ///
    /// The engine must publish its events on the same bus.
    #[must_use]
    pub fn new(engine: Arc<dyn NativeEngine>, bus: Arc<dyn EventBus>) -> Self {
        Self {
            engine,
            registry: JobRegistry::new(bus),
        }
    }

    /// Creates a bridge over a [`LocalEngine`](nativefs_engine::LocalEngine)
    /// and an in-process event bus.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine's HTTP client cannot be created.
    #[cfg(feature = "local")]
    pub fn local(config: nativefs_engine::EngineConfig) -> Result<Self> {
        let bus = Arc::new(nativefs_jobs::LocalEventBus::new());
        let engine = nativefs_engine::LocalEngine::new(config, Arc::clone(&bus))?;
        Ok(Self::new(Arc::new(engine), bus))
    }

    /// Returns the underlying engine.
    #[must_use]
    pub fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }

    /// Returns the job registry.
    #[must_use]
    pub const fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Returns the engine's platform name.
    #[must_use]
    pub fn platform(&self) -> &str {
        self.engine.platform()
    }

    /// Returns true if the engine provides `capability`.
    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.engine.supports(capability)
    }

    /// Asks the engine to stop the transfer running as `job_id`.
    ///
    /// Best effort: the job still settles through the engine, and its
    /// listeners are released then.
    pub fn cancel(&self, job_id: JobId) {
        debug!(%job_id, "cancel requested");
        self.engine.stop_transfer(job_id);
    }

    pub(crate) fn require(&self, capability: Capability) -> Result<()> {
        if self.engine.supports(capability) {
            Ok(())
        } else {
            Err(unsupported(self.engine.as_ref(), capability))
        }
    }
}

impl std::fmt::Debug for NativeFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFs")
            .field("platform", &self.engine.platform())
            .field("registry", &self.registry)
            .finish()
    }
}
