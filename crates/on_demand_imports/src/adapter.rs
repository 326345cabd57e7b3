use swc_ecma_ast::{CallExpr, ImportDecl};

use crate::cfg::{ConfigError, EngineConfig, TransformJSONConfig};
use crate::engine::ImportEngine;
use crate::host::{HostError, ImportHandle, ImportHost};
use crate::state::UnitState;

/// Lifecycle hooks fired while a unit is walked.
///
/// Every hook defaults to a no-op, so an implementation only overrides the
/// events it cares about.
pub trait UnitHooks {
    fn unit_enter(&self, _state: &mut UnitState) {}

    fn import_decl(&self, _node: &ImportDecl, _handle: ImportHandle, _state: &mut UnitState) {}

    fn call_expr(
        &self,
        _node: &mut CallExpr,
        _host: &mut dyn ImportHost,
        _state: &mut UnitState,
    ) -> Result<(), HostError> {
        Ok(())
    }

    fn unit_exit(&self, _host: &mut dyn ImportHost, _state: &mut UnitState) {}
}

/// Builds the hook instances for a run from configuration.
pub trait EngineFactory {
    fn create_engines(&self) -> Vec<Box<dyn UnitHooks>>;
}

impl EngineFactory for [EngineConfig] {
    fn create_engines(&self) -> Vec<Box<dyn UnitHooks>> {
        self.iter()
            .map(|config| Box::new(ImportEngine::new(config.clone())) as Box<dyn UnitHooks>)
            .collect()
    }
}

/// Fans every traversal event out to each configured engine, in
/// configuration order.
///
/// Built once per run and handed to [crate::transform_module] for every
/// unit; engines carry no per-unit data, so they are shared by all units.
pub struct VisitorAdapter {
    engines: Vec<Box<dyn UnitHooks>>,
}

impl VisitorAdapter {
    pub fn new(engines: Vec<Box<dyn UnitHooks>>) -> Self {
        Self { engines }
    }

    pub fn from_factory<F: EngineFactory + ?Sized>(factory: &F) -> Self {
        Self::new(factory.create_engines())
    }

    pub fn from_json_config(config: TransformJSONConfig) -> Result<Self, ConfigError> {
        let configs = config.into_engine_configs()?;
        Ok(Self::from_factory(configs.as_slice()))
    }

    /// Drops the current engines and builds a fresh set. Units transformed
    /// afterwards see only the new engines.
    pub fn reset<F: EngineFactory + ?Sized>(&mut self, factory: &F) {
        self.engines = factory.create_engines();
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn unit_enter(&self, state: &mut UnitState) {
        for engine in &self.engines {
            engine.unit_enter(state);
        }
    }

    pub fn import_decl(&self, node: &ImportDecl, handle: ImportHandle, state: &mut UnitState) {
        for engine in &self.engines {
            engine.import_decl(node, handle, state);
        }
    }

    /// Stops at the first engine whose host call fails.
    pub fn call_expr(
        &self,
        node: &mut CallExpr,
        host: &mut dyn ImportHost,
        state: &mut UnitState,
    ) -> Result<(), HostError> {
        for engine in &self.engines {
            engine.call_expr(node, host, state)?;
        }
        Ok(())
    }

    /// Runs every engine's exit hook, then closes the unit.
    pub fn unit_exit(&self, host: &mut dyn ImportHost, state: &mut UnitState) {
        for engine in &self.engines {
            engine.unit_exit(host, state);
        }
        state.finalize();
    }
}
