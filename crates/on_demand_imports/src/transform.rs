use logger::Logger;
use logger_srcfile::{SrcFileLogger, WrapFileLogger};
use normalize_src::{ast_to_str, PrintArgs};
use swc_common::comments::SingleThreadedComments;
use swc_common::sync::Lrc;
use swc_common::{FileName, Globals, Mark, SourceMap, Spanned, GLOBALS};
use swc_ecma_ast::{CallExpr, ImportDecl, Module, ModuleDecl, ModuleItem};
use swc_ecma_transforms::resolver;
use swc_ecma_visit::{VisitMut, VisitMutWith};
use tracing::debug;

use crate::adapter::VisitorAdapter;
use crate::bindings::BindingTable;
use crate::host::{HostError, ImportHandle};
use crate::state::UnitState;
use crate::swc_host::{SwcImportHost, TransformReport};

#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("{file}:{line}:{col} :: failed to parse: {message}")]
    Parse {
        file: String,
        line: usize,
        col: usize,
        message: String,
    },
    #[error("failed to print {file}: {message}")]
    Print { file: String, message: String },
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Drives the adapter's hooks over one unit.
struct OnDemandVisitor<'a> {
    adapter: &'a VisitorAdapter,
    host: &'a mut SwcImportHost,
    state: &'a mut UnitState,
    // first host failure; nothing is dispatched after it
    error: Option<HostError>,
}

impl VisitMut for OnDemandVisitor<'_> {
    fn visit_mut_module(&mut self, module: &mut Module) {
        self.adapter.unit_enter(&mut *self.state);

        // Import declarations are hoisted, so every one of them is recorded
        // (in source order) before any call site is visited. Only top level
        // imports are dispatched: imports inside a `declare module "x" {}`
        // block are type-only and stay as written.
        for (index, item) in module.body.iter().enumerate() {
            if let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item {
                self.adapter
                    .import_decl(import, ImportHandle::new(index), &mut *self.state);
            }
        }

        module.visit_mut_children_with(self);

        if self.error.is_none() {
            self.adapter.unit_exit(&mut *self.host, &mut *self.state);
        }
    }

    // top level imports are already dispatched from visit_mut_module
    fn visit_mut_import_decl(&mut self, _node: &mut ImportDecl) {}

    fn visit_mut_call_expr(&mut self, node: &mut CallExpr) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self
            .adapter
            .call_expr(node, &mut *self.host, &mut *self.state)
        {
            self.error = Some(err);
            return;
        }
        node.visit_mut_children_with(self);
    }
}

fn with_globals<R>(op: impl FnOnce() -> R) -> R {
    if GLOBALS.is_set() {
        op()
    } else {
        GLOBALS.set(&Globals::new(), op)
    }
}

/// Rewrites the barrel imports of one module in place.
///
/// Runs swc's resolver over the module first, so scoping is known for the
/// shadowing check. On a host failure the error is returned and no imports
/// are injected or removed; call sites visited before the failure may
/// already have been rewritten, so the module should be discarded.
pub fn transform_module(
    module: &mut Module,
    adapter: &VisitorAdapter,
    logger: &impl SrcFileLogger,
) -> Result<TransformReport, TransformError> {
    with_globals(|| {
        let mut resolver = resolver(Mark::fresh(Mark::root()), Mark::fresh(Mark::root()), true);
        module.visit_mut_with(&mut resolver);

        let mut host = SwcImportHost::new(BindingTable::collect(module));
        let mut state = UnitState::new();
        let error = {
            let mut visitor = OnDemandVisitor {
                adapter,
                host: &mut host,
                state: &mut state,
                error: None,
            };
            module.visit_mut_with(&mut visitor);
            visitor.error
        };

        for diagnostic in state.take_diagnostics() {
            logger.src_warn(&diagnostic.span, diagnostic.message);
        }
        if let Some(err) = error {
            return Err(err.into());
        }

        let report = host.apply(module);
        debug!(
            "injected {} imports, removed {} barrel imports",
            report.injected_imports.len(),
            report.removed_imports
        );
        Ok(report)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedSource {
    pub code: String,
    pub report: TransformReport,
}

/// Parses `src`, rewrites it, and prints it back to source text.
pub fn transform_source<TLogger: Logger>(
    file_name: &str,
    src: &str,
    adapter: &VisitorAdapter,
    logger: TLogger,
) -> Result<TransformedSource, TransformError> {
    let cm = Lrc::<SourceMap>::default();
    let comments = SingleThreadedComments::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Real(file_name.into())),
        src.to_string(),
    );

    let mut module =
        swc_utils_parse::parse_source_file(&fm, Some(&comments)).map_err(|err| {
            let (line, col) = if err.span().is_dummy() {
                (0, 0)
            } else {
                let loc = cm.lookup_char_pos(err.span().lo);
                (loc.line, loc.col_display)
            };
            TransformError::Parse {
                file: file_name.to_string(),
                line,
                col,
                message: err.kind().msg().to_string(),
            }
        })?;

    let file_logger = WrapFileLogger::new(cm.clone(), logger);
    let report = transform_module(&mut module, adapter, &file_logger)?;

    let code = ast_to_str(
        &cm,
        &module,
        PrintArgs {
            comments: Some(&comments),
            ..Default::default()
        },
    )
    .map_err(|err| TransformError::Print {
        file: file_name.to_string(),
        message: format!("{:#}", err),
    })?;

    Ok(TransformedSource { code, report })
}
