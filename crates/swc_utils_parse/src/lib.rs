use swc_common::comments::Comments;
use swc_common::sync::Lrc;
use swc_common::{FileName, SourceFile, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::error::Error;
use swc_ecma_parser::{lexer::Lexer, StringInput, Syntax};
use swc_ecma_parser::{Capturing, Parser, TsSyntax};

pub fn create_lexer<'a>(fm: &'a SourceFile, comments: Option<&'a dyn Comments>) -> Lexer<'a> {
    let filename = fm.name.to_string();
    Lexer::new(
        Syntax::Typescript(TsSyntax {
            tsx: filename.ends_with(".tsx") || filename.ends_with(".jsx"),
            decorators: true,
            ..Default::default()
        }),
        Default::default(),
        StringInput::from(fm),
        comments,
    )
}

pub fn create_parser<'a>(
    fm: &'a Lrc<SourceFile>,
    comments: Option<&'a dyn Comments>,
) -> Parser<Capturing<Lexer<'a>>> {
    let lexer = create_lexer(fm, comments);
    let capturing = Capturing::new(lexer);

    Parser::new_from(capturing)
}

/// Parses an already-registered source file as a module.
///
/// Recoverable errors are treated as failures: a unit that only parsed
/// with recovery would be printed back differently from its input.
pub fn parse_source_file(
    fm: &Lrc<SourceFile>,
    comments: Option<&dyn Comments>,
) -> Result<Module, Error> {
    let mut parser = create_parser(fm, comments);
    let module = parser.parse_typescript_module()?;
    if let Some(recovered) = parser.take_errors().into_iter().next() {
        return Err(recovered);
    }
    Ok(module)
}

pub fn parse_ecma_src<TName, TBody>(
    name_str: TName,
    body: TBody,
) -> Result<(Lrc<SourceMap>, Module), Error>
where
    TName: Into<String>,
    TBody: ToString,
{
    parse_ecma_src_comments(name_str, body, None)
}

pub fn parse_ecma_src_comments<TName, TBody>(
    name_str: TName,
    body: TBody,
    comments: Option<&dyn Comments>,
) -> Result<(Lrc<SourceMap>, Module), Error>
where
    TName: Into<String>,
    TBody: ToString,
{
    let cm = Lrc::<SourceMap>::default();
    let fname: Lrc<FileName> = Lrc::new(FileName::Custom(name_str.into()));
    let fm = cm.new_source_file(fname, body.to_string());

    let module = parse_source_file(&fm, comments)?;
    Ok((cm, module))
}

#[cfg(test)]
mod test {
    use crate::parse_ecma_src;
    use swc_ecma_ast::{ModuleDecl, ModuleItem};

    #[test]
    fn test_parses_imports_and_calls() {
        let (_cm, module) = parse_ecma_src(
            "test.ts",
            r#"
            import { Button } from "uilib";
            Button();
            "#,
        )
        .unwrap();
        assert_eq!(module.body.len(), 2);
        assert!(matches!(
            module.body[0],
            ModuleItem::ModuleDecl(ModuleDecl::Import(_))
        ));
    }

    #[test]
    fn test_syntax_error_is_returned() {
        assert!(parse_ecma_src("test.ts", "import { from 'uilib';").is_err());
    }
}
