use ahashmap::{AHashMap, AHashSet};
use swc_atoms::Atom;
use swc_common::Span;
use swc_ecma_ast::Ident;

use crate::host::ImportHandle;

/// What one engine has learned about its library within the current unit.
#[derive(Debug, Default)]
pub struct LibraryUnitState {
    /// local binding name -> name exported by the library
    pub specifier_map: AHashMap<Atom, Atom>,
    /// local names bound by `import x from` / `import * as x from`
    pub namespace_or_default_bindings: AHashSet<Atom>,
    /// exported name -> binding of the per-module import created for it
    pub materialized_imports: AHashMap<Atom, Ident>,
    /// barrel imports of the library, in source order
    pub imports_to_delete: Vec<ImportHandle>,
}

impl LibraryUnitState {
    /// Records `import { exported as local }`. A local name can only be bound
    /// by one import form, so an earlier default/namespace binding of the
    /// same name is dropped.
    pub fn record_named(&mut self, local: Atom, exported: Atom) -> bool {
        let was_whole = self.namespace_or_default_bindings.remove(&local);
        let was_named = self.specifier_map.insert(local, exported).is_some();
        was_whole || was_named
    }

    /// Records `import local from` or `import * as local from`.
    pub fn record_whole_module(&mut self, local: Atom) -> bool {
        let was_named = self.specifier_map.remove(&local).is_some();
        let was_whole = !self.namespace_or_default_bindings.insert(local);
        was_whole || was_named
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitPhase {
    // hooks may record imports and rewrite calls
    Collecting,
    // barrel imports have been swept; nothing else may change
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
}

/// Per compilation unit state, shared by every engine of an adapter.
///
/// Each engine keeps its own slot keyed by library name, so engines for
/// different libraries never see each other's bindings.
#[derive(Debug)]
pub struct UnitState {
    libraries: AHashMap<String, LibraryUnitState>,
    phase: UnitPhase,
    diagnostics: Vec<Diagnostic>,
}

impl UnitState {
    pub fn new() -> Self {
        Self {
            libraries: AHashMap::default(),
            phase: UnitPhase::Collecting,
            diagnostics: Vec::new(),
        }
    }

    pub fn phase(&self) -> UnitPhase {
        self.phase
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == UnitPhase::Finalized
    }

    /// Starts collecting for a new unit. Calling this again while still
    /// collecting keeps whatever other engines have already recorded.
    pub fn begin_unit(&mut self) {
        if self.is_finalized() {
            *self = Self::new();
        }
    }

    pub fn finalize(&mut self) {
        self.phase = UnitPhase::Finalized;
    }

    pub fn library(&self, library_name: &str) -> Option<&LibraryUnitState> {
        self.libraries.get(library_name)
    }

    /// The slot for `library_name`, created empty on first access.
    pub fn library_mut(&mut self, library_name: &str) -> &mut LibraryUnitState {
        self.libraries
            .entry(library_name.to_string())
            .or_default()
    }

    pub fn push_diagnostic(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            span,
            message: message.into(),
        });
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for UnitState {
    fn default() -> Self {
        Self::new()
    }
}
