use ahashmap::{hash_map::Entry, AHashMap, AHashSet};
use swc_atoms::Atom;
use swc_ecma_ast::{
    ArrowExpr, CatchClause, ClassDecl, ClassExpr, Constructor, FnDecl, FnExpr, Function, Id,
    Ident, ImportDecl, ImportSpecifier, Module, ParamOrTsParamProp, Pat, SetterProp,
    TsEnumDecl, TsImportEqualsDecl, TsParamPropParam, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::host::{Binding, DeclarationKind};

/// Every declaration in a unit, keyed by the identifier's [Id].
///
/// The module must have been through swc's resolver first: the resolver
/// gives each scope its own syntax context, which is what lets a parameter
/// named `Button` be told apart from an imported `Button`.
#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: AHashMap<Id, Binding>,
    // every identifier symbol that appears anywhere in the unit
    names: AHashSet<Atom>,
}

impl BindingTable {
    pub fn collect(module: &Module) -> Self {
        let mut table = Self::default();
        module.visit_with(&mut BindingCollector { table: &mut table });
        table
    }

    pub fn resolve(&self, ident: &Ident) -> Option<Binding> {
        self.bindings.get(&ident.to_id()).copied()
    }

    /// Registers a binding created after collection, e.g. an injected import.
    pub fn declare(&mut self, ident: &Ident, kind: DeclarationKind) {
        self.names.insert(ident.sym.clone());
        self.bindings.insert(
            ident.to_id(),
            Binding {
                kind,
                span: ident.span,
            },
        );
    }

    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names.contains(&Atom::from(name))
    }
}

struct BindingCollector<'a> {
    table: &'a mut BindingTable,
}

impl BindingCollector<'_> {
    fn declare(&mut self, ident: &Ident, kind: DeclarationKind) {
        // The first declaration wins: `var` redeclarations and function
        // overloads keep pointing at the original binding.
        if let Entry::Vacant(entry) = self.table.bindings.entry(ident.to_id()) {
            entry.insert(Binding {
                kind,
                span: ident.span,
            });
        }
    }

    fn visit_binding_pattern(&mut self, pattern: &Pat, kind: DeclarationKind) {
        match pattern {
            Pat::Ident(binding) => {
                self.declare(&binding.id, kind);
            }
            Pat::Array(array_pat) => {
                for subpattern in array_pat.elems.iter().flatten() {
                    self.visit_binding_pattern(subpattern, kind);
                }
            }
            Pat::Object(object_pat) => {
                for prop in &object_pat.props {
                    match prop {
                        swc_ecma_ast::ObjectPatProp::KeyValue(kv) => {
                            self.visit_binding_pattern(&kv.value, kind);
                        }
                        swc_ecma_ast::ObjectPatProp::Assign(assign_prop) => {
                            // let { a = defaultValue } = destructured_object;
                            self.declare(&assign_prop.key.id, kind);
                        }
                        swc_ecma_ast::ObjectPatProp::Rest(rest) => {
                            self.visit_binding_pattern(&rest.arg, kind);
                        }
                    }
                }
            }
            Pat::Rest(rest_pat) => {
                self.visit_binding_pattern(&rest_pat.arg, kind);
            }
            Pat::Assign(assign_pat) => {
                self.visit_binding_pattern(&assign_pat.left, kind);
            }
            // assignment targets, not declarations
            Pat::Expr(_) | Pat::Invalid(_) => {}
        }
    }
}

impl Visit for BindingCollector<'_> {
    fn visit_ident(&mut self, node: &Ident) {
        self.table.names.insert(node.sym.clone());
    }

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        for spec in &node.specifiers {
            match spec {
                ImportSpecifier::Named(named_spec) => {
                    self.declare(&named_spec.local, DeclarationKind::ImportNamed);
                }
                ImportSpecifier::Default(default_spec) => {
                    self.declare(&default_spec.local, DeclarationKind::ImportDefault);
                }
                ImportSpecifier::Namespace(namespace_spec) => {
                    self.declare(&namespace_spec.local, DeclarationKind::ImportNamespace);
                }
            }
        }
        node.visit_children_with(self);
    }

    fn visit_ts_import_equals_decl(&mut self, node: &TsImportEqualsDecl) {
        self.declare(&node.id, DeclarationKind::TsImportEquals);
        node.visit_children_with(self);
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        for decl in &node.decls {
            self.visit_binding_pattern(&decl.name, DeclarationKind::Var);
        }
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.declare(&node.ident, DeclarationKind::Function);
        node.visit_children_with(self);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        if let Some(ident) = &node.ident {
            self.declare(ident, DeclarationKind::Function);
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        for param in &node.params {
            self.visit_binding_pattern(&param.pat, DeclarationKind::Param);
        }
        node.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        for param in &node.params {
            self.visit_binding_pattern(param, DeclarationKind::Param);
        }
        node.visit_children_with(self);
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        for param in &node.params {
            match param {
                ParamOrTsParamProp::Param(param) => {
                    self.visit_binding_pattern(&param.pat, DeclarationKind::Param);
                }
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(binding) => {
                        self.declare(&binding.id, DeclarationKind::Param);
                    }
                    TsParamPropParam::Assign(assign) => {
                        self.visit_binding_pattern(&assign.left, DeclarationKind::Param);
                    }
                },
            }
        }
        node.visit_children_with(self);
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.visit_binding_pattern(&node.param, DeclarationKind::Param);
        node.visit_children_with(self);
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        if let Some(param) = &node.param {
            self.visit_binding_pattern(param, DeclarationKind::CatchParam);
        }
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.declare(&node.ident, DeclarationKind::Class);
        node.visit_children_with(self);
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        if let Some(ident) = &node.ident {
            self.declare(ident, DeclarationKind::Class);
        }
        node.visit_children_with(self);
    }

    fn visit_ts_enum_decl(&mut self, node: &TsEnumDecl) {
        self.declare(&node.id, DeclarationKind::TsEnum);
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use swc_common::{Globals, Mark, GLOBALS};
    use swc_ecma_ast::{Expr, Ident, Module};
    use swc_ecma_transforms::resolver;
    use swc_ecma_visit::{Visit, VisitMutWith, VisitWith};

    use super::BindingTable;
    use crate::host::DeclarationKind;

    // every identifier used as a call argument, in source order
    struct ArgCollector(Vec<Ident>);
    impl Visit for ArgCollector {
        fn visit_call_expr(&mut self, node: &swc_ecma_ast::CallExpr) {
            for arg in &node.args {
                if let Expr::Ident(ident) = &*arg.expr {
                    self.0.push(ident.clone());
                }
            }
            node.visit_children_with(self);
        }
    }

    fn resolved(src: &str) -> (BindingTable, Vec<Ident>) {
        GLOBALS.set(&Globals::new(), || {
            let (_cm, mut module): (_, Module) =
                swc_utils_parse::parse_ecma_src("test.ts", src).unwrap();
            let mut resolver = resolver(Mark::fresh(Mark::root()), Mark::fresh(Mark::root()), true);
            module.visit_mut_with(&mut resolver);
            let mut args = ArgCollector(Vec::new());
            module.visit_with(&mut args);
            (BindingTable::collect(&module), args.0)
        })
    }

    fn kinds(src: &str) -> Vec<Option<DeclarationKind>> {
        let (table, args) = resolved(src);
        args.iter()
            .map(|ident| table.resolve(ident).map(|binding| binding.kind))
            .collect()
    }

    #[test]
    fn test_import_forms() {
        assert_eq!(
            kinds(
                r#"
                import { Button, Select as Sel } from "uilib";
                import ui from "uilib";
                import * as icons from "icons";
                use(Button, Sel, ui, icons);
                "#
            ),
            vec![
                Some(DeclarationKind::ImportNamed),
                Some(DeclarationKind::ImportNamed),
                Some(DeclarationKind::ImportDefault),
                Some(DeclarationKind::ImportNamespace),
            ]
        );
    }

    #[test]
    fn test_shadowing_declarations() {
        assert_eq!(
            kinds(
                r#"
                import { Button } from "uilib";
                function param(Button) { use(Button); }
                function local() { const Button = 1; use(Button); }
                const arrow = ([Button]) => use(Button);
                try {} catch (Button) { use(Button); }
                use(Button);
                "#
            ),
            vec![
                Some(DeclarationKind::Param),
                Some(DeclarationKind::Var),
                Some(DeclarationKind::Param),
                Some(DeclarationKind::CatchParam),
                Some(DeclarationKind::ImportNamed),
            ]
        );
    }

    #[test]
    fn test_unresolved_global() {
        assert_eq!(kinds("use(window);"), vec![None]);
    }

    #[test]
    fn test_names_in_use() {
        let (table, _) = resolved(
            r#"
            import { Button } from "uilib";
            const _Button = Button;
            "#,
        );
        assert!(table.is_name_taken("Button"));
        assert!(table.is_name_taken("_Button"));
        assert!(!table.is_name_taken("_Button2"));
    }
}
