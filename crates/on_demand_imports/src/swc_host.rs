use ahashmap::AHashSet;
use swc_atoms::Atom;
use swc_common::{SyntaxContext, DUMMY_SP};
use swc_ecma_ast::{
    Ident, ImportDecl, ImportDefaultSpecifier, ImportPhase, ImportSpecifier, Module, ModuleDecl,
    ModuleItem, Str,
};
use tracing::trace;

use crate::bindings::BindingTable;
use crate::host::{validate_module_path, Binding, DeclarationKind, HostError, ImportHandle, ImportHost};

/// Edits applied to a module when a unit is finalized.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransformReport {
    // module paths of every injected import, in insertion order
    pub injected_imports: Vec<String>,
    // number of barrel import statements dropped
    pub removed_imports: usize,
}

/// [ImportHost] over an swc [Module].
///
/// The module is being walked mutably while the engine runs, so nothing is
/// spliced into its body until [SwcImportHost::apply]. Until then every
/// [ImportHandle] keeps pointing at the same statement.
pub struct SwcImportHost {
    bindings: BindingTable,
    injected: Vec<(String, ModuleItem)>,
    removed: AHashSet<usize>,
}

fn import_item(specifiers: Vec<ImportSpecifier>, module_path: &str) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers,
        src: Box::new(Str {
            span: DUMMY_SP,
            value: module_path.into(),
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}

/// Reduces a hint to something usable as an identifier, camel-casing across
/// characters that are not allowed in one: `date-picker` -> `datePicker`.
fn to_identifier(hint: &str) -> String {
    let mut out = String::with_capacity(hint.len());
    let mut upper_next = false;
    for c in hint.chars() {
        if c.is_alphanumeric() || c == '_' || c == '$' {
            if upper_next && !out.is_empty() {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    out
}

impl SwcImportHost {
    pub fn new(bindings: BindingTable) -> Self {
        Self {
            bindings,
            injected: Vec::new(),
            removed: AHashSet::default(),
        }
    }

    /// Picks `_<hint>`, `_<hint>2`, `_<hint>3`, ... whichever is first unused
    /// anywhere in the unit.
    fn unique_name(&self, hint: &str) -> Atom {
        let base = to_identifier(hint);
        let base = base
            .trim_start_matches('_')
            .trim_end_matches(|c: char| c.is_ascii_digit());
        let base = if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
            "temp"
        } else {
            base
        };

        let mut i = 1;
        loop {
            let candidate = if i > 1 {
                format!("_{}{}", base, i)
            } else {
                format!("_{}", base)
            };
            if !self.bindings.is_name_taken(&candidate) {
                return Atom::from(candidate);
            }
            i += 1;
        }
    }

    /// Drops every removed statement and inserts the injected imports at the
    /// top of the module, in the order they were requested.
    pub fn apply(self, module: &mut Module) -> TransformReport {
        let before = module.body.len();
        let removed = self.removed;
        module.body = std::mem::take(&mut module.body)
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !removed.contains(index))
            .map(|(_, item)| item)
            .collect();
        let removed_imports = before - module.body.len();

        let (injected_imports, items): (Vec<String>, Vec<ModuleItem>) =
            self.injected.into_iter().unzip();
        module.body.splice(0..0, items);

        TransformReport {
            injected_imports,
            removed_imports,
        }
    }
}

impl ImportHost for SwcImportHost {
    fn add_default_import(
        &mut self,
        module_path: &str,
        name_hint: &str,
    ) -> Result<Ident, HostError> {
        validate_module_path(module_path)?;
        let local = Ident::new(
            self.unique_name(name_hint),
            DUMMY_SP,
            SyntaxContext::empty(),
        );
        self.bindings.declare(&local, DeclarationKind::ImportDefault);
        trace!("injecting default import {} from {}", local.sym, module_path);
        self.injected.push((
            module_path.to_string(),
            import_item(
                vec![ImportSpecifier::Default(ImportDefaultSpecifier {
                    span: DUMMY_SP,
                    local: local.clone(),
                })],
                module_path,
            ),
        ));
        Ok(local)
    }

    fn add_side_effect_import(&mut self, module_path: &str) -> Result<(), HostError> {
        validate_module_path(module_path)?;
        trace!("injecting side effect import {}", module_path);
        self.injected
            .push((module_path.to_string(), import_item(vec![], module_path)));
        Ok(())
    }

    fn resolve_binding(&self, ident: &Ident) -> Option<Binding> {
        self.bindings.resolve(ident)
    }

    fn remove(&mut self, handle: ImportHandle) {
        self.removed.insert(handle.index());
    }

    fn is_removed(&self, handle: ImportHandle) -> bool {
        self.removed.contains(&handle.index())
    }
}
