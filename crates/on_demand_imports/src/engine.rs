use swc_atoms::Atom;
use swc_ecma_ast::{CallExpr, Callee, Expr, Ident, ImportDecl, ImportSpecifier, ModuleExportName};
use tracing::{debug, trace};

use crate::adapter::UnitHooks;
use crate::cfg::EngineConfig;
use crate::host::{Binding, DeclarationKind, HostError, ImportHandle, ImportHost};
use crate::naming::{submodule_path, transform_symbol_name};
use crate::state::{LibraryUnitState, UnitState};

/// Rewrites the barrel imports of a single library.
///
/// The engine holds configuration only. Everything it learns about a unit
/// lives in the [UnitState] handed to each hook.
#[derive(Debug, Clone)]
pub struct ImportEngine {
    config: EngineConfig,
}

impl ImportEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn library_name(&self) -> &str {
        &self.config.library_name
    }

    /// Returns the binding of the per-module import for `exported`, creating
    /// the import (and its style import) the first time the symbol is needed.
    ///
    /// The caller always gets its own copy of the binding, never the memoized
    /// one.
    pub fn import_method(
        &self,
        exported: &Atom,
        host: &mut dyn ImportHost,
        state: &mut LibraryUnitState,
    ) -> Result<Ident, HostError> {
        if let Some(existing) = state.materialized_imports.get(exported) {
            return Ok(existing.clone());
        }

        let file_name = transform_symbol_name(exported, &self.config.separator);
        let module_path = submodule_path(
            self.library_name(),
            &self.config.library_directory,
            &file_name,
        );
        let local = host.add_default_import(&module_path, exported)?;
        debug!(
            "materialized {} from {} as {}",
            exported, module_path, local.sym
        );
        state
            .materialized_imports
            .insert(exported.clone(), local.clone());

        if self.config.include_styles {
            host.add_side_effect_import(&format!("{}/style", module_path))?;
        }
        Ok(local)
    }

    /// The exported name `ident` stands for, if it is a reference to a named
    /// import of this library rather than a local that shadows one.
    fn tracked_symbol(
        &self,
        ident: &Ident,
        host: &dyn ImportHost,
        state: &LibraryUnitState,
    ) -> Option<Atom> {
        let exported = state.specifier_map.get(&ident.sym)?;
        match host.resolve_binding(ident) {
            Some(Binding {
                kind: DeclarationKind::ImportNamed,
                ..
            }) => Some(exported.clone()),
            other => {
                trace!(
                    "{} is shadowed by {:?}, leaving it untouched",
                    ident.sym,
                    other.map(|binding| binding.kind)
                );
                None
            }
        }
    }
}

fn exported_name(imported: &Option<ModuleExportName>, local: &Ident) -> Atom {
    match imported {
        Some(ModuleExportName::Ident(ident)) => ident.sym.clone(),
        Some(ModuleExportName::Str(str_)) => str_.value.clone(),
        None => local.sym.clone(),
    }
}

impl UnitHooks for ImportEngine {
    fn unit_enter(&self, state: &mut UnitState) {
        state.begin_unit();
        state.library_mut(self.library_name());
    }

    fn import_decl(&self, node: &ImportDecl, handle: ImportHandle, state: &mut UnitState) {
        if state.is_finalized() || &*node.src.value != self.library_name() {
            return;
        }

        let mut rebound = Vec::new();
        let library = state.library_mut(self.library_name());
        for spec in &node.specifiers {
            let (local, was_bound) = match spec {
                ImportSpecifier::Named(named) => (
                    &named.local,
                    library.record_named(
                        named.local.sym.clone(),
                        exported_name(&named.imported, &named.local),
                    ),
                ),
                ImportSpecifier::Default(default) => (
                    &default.local,
                    library.record_whole_module(default.local.sym.clone()),
                ),
                ImportSpecifier::Namespace(namespace) => (
                    &namespace.local,
                    library.record_whole_module(namespace.local.sym.clone()),
                ),
            };
            if was_bound {
                rebound.push(local);
            }
        }
        library.imports_to_delete.push(handle);
        trace!(
            "tracking import #{} of {}",
            handle.index(),
            self.library_name()
        );

        for local in rebound {
            state.push_diagnostic(
                local.span,
                format!(
                    "{} is imported from {} more than once; the last import wins",
                    local.sym,
                    self.library_name()
                ),
            );
        }
    }

    fn call_expr(
        &self,
        node: &mut CallExpr,
        host: &mut dyn ImportHost,
        state: &mut UnitState,
    ) -> Result<(), HostError> {
        if state.is_finalized() {
            return Ok(());
        }
        let library = state.library_mut(self.library_name());
        if library.specifier_map.is_empty() {
            return Ok(());
        }

        if let Callee::Expr(callee) = &mut node.callee {
            let exported = match &**callee {
                Expr::Ident(ident) => self.tracked_symbol(ident, &*host, library),
                _ => None,
            };
            if let Some(exported) = exported {
                let local = self.import_method(&exported, host, library)?;
                **callee = Expr::Ident(local);
            }
        }

        for arg in node.args.iter_mut() {
            if arg.spread.is_some() {
                continue;
            }
            let exported = match &*arg.expr {
                Expr::Ident(ident) => self.tracked_symbol(ident, &*host, library),
                _ => None,
            };
            if let Some(exported) = exported {
                let local = self.import_method(&exported, host, library)?;
                *arg.expr = Expr::Ident(local);
            }
        }
        Ok(())
    }

    fn unit_exit(&self, host: &mut dyn ImportHost, state: &mut UnitState) {
        let library = state.library_mut(self.library_name());
        for handle in &library.imports_to_delete {
            if host.is_removed(*handle) {
                continue;
            }
            debug!(
                "removing barrel import #{} of {}",
                handle.index(),
                self.config.library_name
            );
            host.remove(*handle);
        }
    }
}
