mod adapter;
mod bindings;
mod cfg;
mod engine;
mod host;
mod naming;
mod state;
mod swc_host;
mod transform;

pub use adapter::{EngineFactory, UnitHooks, VisitorAdapter};
pub use bindings::BindingTable;
pub use cfg::{
    ConfigError, EngineConfig, EngineJSONConfig, TransformJSONConfig, DEFAULT_LIBRARY_DIRECTORY,
};
pub use engine::ImportEngine;
pub use host::{Binding, DeclarationKind, HostError, ImportHandle, ImportHost};
pub use naming::{submodule_path, transform_symbol_name};
pub use state::{Diagnostic, LibraryUnitState, UnitPhase, UnitState};
pub use swc_host::{SwcImportHost, TransformReport};
pub use transform::{transform_module, transform_source, TransformError, TransformedSource};
