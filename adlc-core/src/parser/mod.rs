//! ADL lexer and parser (§4.1).
//!
//! Single-pass, single-file: `parse_module` takes a [`SourceFile`] and
//! returns an unresolved [`Module`] AST or an [`AdlError::ParseError`] with
//! the offending file/line/column. No I/O beyond the caller-supplied source
//! text; module loading and import resolution are the loader's job
//! (`crate::loader`), not the parser's.

use nom::bytes::complete::take_while;
use nom::character::complete::{char, satisfy};
use nom::combinator::{cut, recognize};
use nom::error::context;
use nom::multi::separated_list1;
use nom::sequence::preceded;
use nom::{Finish, IResult, Parser};
use nom_language::error::{VerboseError, VerboseErrorKind};

use crate::ast::Module;
use crate::error::AdlError;
use crate::file::SourceFile;
use crate::nom_tools::{ws, NomSpan, State, ToRange};

mod decl;
mod json;
mod module;
mod type_expr;

pub use json::json_literal;
pub use type_expr::type_expr;

/// Rich parser error type used throughout the parser, matching the
/// teacher's `TimuParserError`: accumulates a stack of contexts so a
/// failure deep in a nested type expression still reports the outer
/// production that was being attempted.
pub type AdlParserError<'a> = VerboseError<NomSpan<'a>>;

/// `[A-Za-z_][A-Za-z0-9_]*` (§3 Identifier), trivia-tolerant on the left.
pub fn ident(input: NomSpan<'_>) -> IResult<NomSpan<'_>, String, AdlParserError<'_>> {
    let (input, _) = ws(input)?;
    let (input, text) = recognize((
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)?;
    Ok((input, text.fragment().to_string()))
}

/// A dot-separated sequence of identifiers: `foo`, `foo.bar.Baz`. Used for
/// module names, scoped names, and type-expression heads (§6 `scopedname`).
pub fn dotted_path(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Vec<String>, AdlParserError<'_>> {
    let (input, _) = ws(input)?;
    separated_list1(char('.'), ident).parse(input)
}

pub fn semicolon(input: NomSpan<'_>) -> IResult<NomSpan<'_>, char, AdlParserError<'_>> {
    let (input, _) = ws(input)?;
    context("expected ';'", cut(char(';'))).parse(input)
}

/// Parses one ADL source file into an unresolved [`Module`].
pub fn parse_module(source: &SourceFile) -> Result<Module, AdlError> {
    let state = State::new(source.clone());
    let input = NomSpan::new_extra(source.text.as_str(), state);

    let result = preceded(ws, context("module", module::module)).parse(input).finish();
    let mut parsed = match result {
        Ok((_remaining, parsed)) => parsed,
        Err(error) => return Err(to_adl_error(source, error)),
    };
    module::apply_annotation_statements(&mut parsed.decls, parsed.annotation_stmts)?;
    Ok(Module {
        name: parsed.name,
        imports: parsed.imports,
        decls: parsed.decls,
        source: parsed.source,
    })
}

fn to_adl_error(source: &SourceFile, error: AdlParserError<'_>) -> AdlError {
    let context_msg = error.errors.iter().find_map(|(span, kind)| match kind {
        VerboseErrorKind::Context(msg) => Some((span, msg.to_string())),
        _ => None,
    });
    let (span, message) = match context_msg.or_else(|| error.errors.first().map(|(span, kind)| (span, format!("{kind:?}")))) {
        Some((span, message)) => (Some(span), message),
        None => (None, "parse error".to_string()),
    };

    let range = span.map(|s| s.to_range()).unwrap_or(0..0);
    let found = span.map(|s| s.fragment().chars().take(20).collect()).unwrap_or_default();
    let loc = crate::nom_tools::Loc::new(source.clone(), range);
    AdlError::ParseError { loc, message: message.clone(), expected: message, found }
}
