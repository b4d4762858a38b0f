//! ASR engine registry
//!
//! Keyed map of engine id to engine instance with static capability
//! descriptors. Engines are expensive to load, so each entry is lazily
//! initialized behind a mutex; the first acquirer performs the load and
//! every later caller shares the same instance.

use crate::PipelineError;
use katha_core::{AsrEngine, EngineCapabilities, EngineId};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type EngineFactory =
    Box<dyn Fn() -> Result<Arc<dyn AsrEngine>, PipelineError> + Send + Sync>;

/// One registered engine: descriptor plus lazily-loaded instance.
pub struct EngineEntry {
    capabilities: EngineCapabilities,
    factory: EngineFactory,
    instance: OnceCell<Arc<dyn AsrEngine>>,
    load_guard: Mutex<()>,
}

impl EngineEntry {
    fn get_or_load(&self) -> Result<Arc<dyn AsrEngine>, PipelineError> {
        if let Some(engine) = self.instance.get() {
            return Ok(engine.clone());
        }

        let _guard = self.load_guard.lock();
        // Double-check after acquiring the guard
        if let Some(engine) = self.instance.get() {
            return Ok(engine.clone());
        }

        let engine = (self.factory)()?;
        let _ = self.instance.set(engine.clone());
        tracing::info!(engine = %self.capabilities.id, "ASR engine loaded");
        Ok(engine)
    }

    pub fn is_loaded(&self) -> bool {
        self.instance.get().is_some()
    }
}

/// Engine registry: `engine_id -> engine instance`.
#[derive(Default)]
pub struct EngineRegistry {
    entries: HashMap<EngineId, EngineEntry>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine with a deferred constructor.
    pub fn register<F>(&mut self, capabilities: EngineCapabilities, factory: F)
    where
        F: Fn() -> Result<Arc<dyn AsrEngine>, PipelineError> + Send + Sync + 'static,
    {
        let id = capabilities.id.clone();
        self.entries.insert(
            id,
            EngineEntry {
                capabilities,
                factory: Box::new(factory),
                instance: OnceCell::new(),
                load_guard: Mutex::new(()),
            },
        );
    }

    /// Register an already-constructed engine (tests, pre-warmed setups).
    pub fn register_instance(&mut self, engine: Arc<dyn AsrEngine>) {
        let capabilities = engine.capabilities();
        let id = capabilities.id.clone();
        let cell = OnceCell::new();
        let _ = cell.set(engine);
        self.entries.insert(
            id,
            EngineEntry {
                capabilities,
                factory: Box::new(|| {
                    Err(PipelineError::EngineLoad {
                        engine: "pre-loaded".to_string(),
                        reason: "factory unavailable".to_string(),
                    })
                }),
                instance: cell,
                load_guard: Mutex::new(()),
            },
        );
    }

    /// Get an engine, loading it on first use.
    pub fn get(&self, id: &str) -> Result<Arc<dyn AsrEngine>, PipelineError> {
        self.entries
            .get(id)
            .ok_or_else(|| PipelineError::UnknownEngine(id.to_string()))?
            .get_or_load()
    }

    pub fn capabilities(&self, id: &str) -> Option<&EngineCapabilities> {
        self.entries.get(id).map(|e| &e.capabilities)
    }

    /// Ids of all registered engines reporting themselves available.
    pub fn available_engines(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .entries
            .values()
            .filter(|e| e.capabilities.is_available)
            .map(|e| e.capabilities.id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }
}
