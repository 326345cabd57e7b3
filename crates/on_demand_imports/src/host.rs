use swc_common::Span;
use swc_ecma_ast::Ident;

/// Identifies a top-level import statement of the unit being transformed.
///
/// Import declarations can only appear at module top level, so the index of
/// the statement within the module body is a stable handle for as long as
/// the host buffers its own insertions until the unit is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportHandle(usize);

impl ImportHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// How a name was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    // import { a } from 'x' / import { a as b } from 'x'
    ImportNamed,
    // import a from 'x'
    ImportDefault,
    // import * as a from 'x'
    ImportNamespace,
    // var / let / const / using
    Var,
    Function,
    Class,
    Param,
    CatchParam,
    TsEnum,
    // import a = require('x')
    TsImportEquals,
}

impl DeclarationKind {
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            DeclarationKind::ImportNamed
                | DeclarationKind::ImportDefault
                | DeclarationKind::ImportNamespace
                | DeclarationKind::TsImportEquals
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub kind: DeclarationKind,
    // span of the declaring identifier
    pub span: Span,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("cannot import an empty module path")]
    EmptyModulePath,
    #[error("cannot import invalid module path {0:?}")]
    InvalidModulePath(String),
}

/// The primitives the engine needs from whatever owns the syntax tree.
///
/// Implementations mutate the unit they were created for; the engine never
/// touches module-level structure itself.
pub trait ImportHost {
    /// Adds `import <local> from '<module_path>'` to the top of the unit and
    /// returns the new local binding. `name_hint` seeds the local name.
    fn add_default_import(&mut self, module_path: &str, name_hint: &str)
        -> Result<Ident, HostError>;

    /// Adds `import '<module_path>'` to the top of the unit.
    fn add_side_effect_import(&mut self, module_path: &str) -> Result<(), HostError>;

    /// Finds the declaration `ident` refers to, if it is declared in the unit.
    fn resolve_binding(&self, ident: &Ident) -> Option<Binding>;

    /// Removes an import statement. Removing it twice is a no-op.
    fn remove(&mut self, handle: ImportHandle);

    fn is_removed(&self, handle: ImportHandle) -> bool;
}

/// Rejects module paths no import statement could carry.
pub fn validate_module_path(module_path: &str) -> Result<(), HostError> {
    if module_path.is_empty() {
        return Err(HostError::EmptyModulePath);
    }
    if module_path
        .chars()
        .any(|c| c == '\0' || c == '\n' || c == '\r')
    {
        return Err(HostError::InvalidModulePath(module_path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use super::{validate_module_path, DeclarationKind, HostError};

    #[test]
    fn test_validate_module_path() {
        assert_eq!(validate_module_path("uilib/lib/button"), Ok(()));
        assert_eq!(validate_module_path(""), Err(HostError::EmptyModulePath));
        assert_eq!(
            validate_module_path("uilib/\nbutton"),
            Err(HostError::InvalidModulePath("uilib/\nbutton".to_string()))
        );
    }

    #[test]
    fn test_import_kinds() {
        assert!(DeclarationKind::ImportNamed.is_import());
        assert!(DeclarationKind::ImportNamespace.is_import());
        assert!(!DeclarationKind::Param.is_import());
        assert!(!DeclarationKind::Var.is_import());
    }
}
