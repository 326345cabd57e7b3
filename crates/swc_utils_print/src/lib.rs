use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::sync::Lrc;
use swc_common::SourceMap;
pub use swc_compiler_base::PrintArgs;
use swc_ecma_ast::Module;

pub fn ast_to_str(
    cm: &Lrc<SourceMap>,
    module: &Module,
    print_args: PrintArgs<'_>,
) -> Result<String, anyhow::Error> {
    let out = swc_compiler_base::print(cm.clone(), module, print_args)?;
    Ok(out.code)
}

/// Round-trips `src` through the parser and printer, so hand-written
/// expectations can be compared with printed transform output regardless
/// of whitespace and quoting.
pub fn normalise_src(src: &str, print_args: PrintArgs) -> Result<String, anyhow::Error> {
    let mut pargs = print_args;

    // Backup value for comments in case it is not provided.
    //
    // Declared at the function level so it outlives the borrow stored in
    // `pargs`, even though it is only initialized in the branch below.
    let own_comments: Option<SingleThreadedComments>;
    if pargs.comments.is_none() {
        own_comments = Some(SingleThreadedComments::default());
        pargs.comments = own_comments.as_ref().map(|c| c as &dyn Comments);
    }

    let (cm, parsed) = swc_utils_parse::parse_ecma_src_comments("test.ts", src, pargs.comments)
        .map_err(|err| anyhow::anyhow!("failed to parse source for normalisation: {:?}", err))?;
    ast_to_str(&cm, &parsed, pargs)
}
