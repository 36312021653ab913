//! Type expression parsing (§6 `typeExpr`):
//! `(ident | scopedname) ('<' typeExpr (',' typeExpr)* '>')?`

use nom::combinator::{consumed, opt};
use nom::error::context;
use nom::{IResult, Parser};

use crate::ast::TypeExpr;
use crate::nom_tools::{angled, comma_separated1, ws, Loc, NomSpan};

use super::{dotted_path, AdlParserError};

pub fn type_expr(input: NomSpan<'_>) -> IResult<NomSpan<'_>, TypeExpr, AdlParserError<'_>> {
    let (input, _) = ws(input)?;
    let (input, (head_span, path)) = consumed(dotted_path).parse(input)?;
    let (input, parameters) = opt(angled(comma_separated1(type_expr))).parse(input)?;
    let loc = Loc::from_span(&head_span);
    Ok((input, TypeExpr::unresolved(path, parameters.unwrap_or_default(), loc)))
}

pub fn type_expr_context(input: NomSpan<'_>) -> IResult<NomSpan<'_>, TypeExpr, AdlParserError<'_>> {
    context("type expression", type_expr).parse(input)
}
