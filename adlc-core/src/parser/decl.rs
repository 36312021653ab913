//! Declaration-level parsing (§6): struct/union bodies, type aliases,
//! newtypes, fields, type parameter lists, and standalone `annotation`
//! statements.

use nom::branch::alt;
use nom::combinator::{consumed, cut, map, opt};
use nom::error::context;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::{IResult, Parser};

use crate::ast::{
    Annotations, Decl, DeclBody, Field, ModuleName, NewTypeBody, ScopedName, StructBody, TypeDefBody, UnionBody,
};
use crate::nom_tools::{angled, braced, comma_separated1, lit, skip_trivia, Loc, NomSpan};

use super::type_expr::type_expr_context;
use super::{dotted_path, ident, json_literal, semicolon, AdlParserError};

fn doc_annotation(doc_lines: Vec<String>) -> Annotations {
    let mut annotations = Annotations::new();
    if !doc_lines.is_empty() {
        let doc = doc_lines.join("\n");
        let doc_scope = ScopedName::new(ModuleName::parse("sys.annotations"), "Doc");
        annotations.insert(doc_scope, crate::ast::Literal::Str(doc));
    }
    annotations
}

fn type_params(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Vec<String>, AdlParserError<'_>> {
    map(opt(angled(comma_separated1(ident))), |params| params.unwrap_or_default()).parse(input)
}

fn field(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Field, AdlParserError<'_>> {
    let (input, doc_lines) = skip_trivia(input)?;
    let (input, (span, type_expr)) = consumed(type_expr_context).parse(input)?;
    let (input, name) = context("field name", cut(ident)).parse(input)?;
    let (input, default) = opt(preceded(lit("="), cut(json_literal))).parse(input)?;
    let (input, _) = semicolon(input)?;
    Ok((
        input,
        Field {
            name,
            type_expr,
            default,
            annotations: doc_annotation(doc_lines),
            loc: Loc::from_span(&span),
        },
    ))
}

fn fields_block(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Vec<Field>, AdlParserError<'_>> {
    braced(many0(field)).parse(input)
}

fn struct_decl(input: NomSpan<'_>) -> IResult<NomSpan<'_>, DeclBody, AdlParserError<'_>> {
    let (input, type_params) = type_params(input)?;
    let (input, fields) = fields_block(input)?;
    Ok((input, DeclBody::Struct(StructBody { type_params, fields })))
}

fn union_decl(input: NomSpan<'_>) -> IResult<NomSpan<'_>, DeclBody, AdlParserError<'_>> {
    let (input, type_params) = type_params(input)?;
    let (input, fields) = fields_block(input)?;
    Ok((input, DeclBody::Union(UnionBody { type_params, fields })))
}

fn type_alias_decl(input: NomSpan<'_>) -> IResult<NomSpan<'_>, DeclBody, AdlParserError<'_>> {
    let (input, type_params) = type_params(input)?;
    let (input, _) = lit("=")(input)?;
    let (input, type_expr) = context("type alias target", cut(type_expr_context)).parse(input)?;
    Ok((input, DeclBody::TypeDef(TypeDefBody { type_params, type_expr })))
}

fn newtype_decl(input: NomSpan<'_>) -> IResult<NomSpan<'_>, DeclBody, AdlParserError<'_>> {
    let (input, type_params) = type_params(input)?;
    let (input, _) = lit("=")(input)?;
    let (input, type_expr) = context("newtype underlying type", cut(type_expr_context)).parse(input)?;
    let (input, default) = opt(preceded(lit("="), cut(json_literal))).parse(input)?;
    Ok((input, DeclBody::NewType(NewTypeBody { type_params, type_expr, default })))
}

pub fn decl(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Decl, AdlParserError<'_>> {
    let (input, doc_lines) = skip_trivia(input)?;
    let (input, (span, (name, body))) = consumed(alt((
        |input| {
            let (input, _) = lit("struct")(input)?;
            let (input, name) = context("struct name", cut(ident)).parse(input)?;
            let (input, body) = cut(struct_decl).parse(input)?;
            let (input, _) = semicolon(input)?;
            Ok((input, (name, body)))
        },
        |input| {
            let (input, _) = lit("union")(input)?;
            let (input, name) = context("union name", cut(ident)).parse(input)?;
            let (input, body) = cut(union_decl).parse(input)?;
            let (input, _) = semicolon(input)?;
            Ok((input, (name, body)))
        },
        |input| {
            let (input, _) = lit("type")(input)?;
            let (input, name) = context("type alias name", cut(ident)).parse(input)?;
            let (input, body) = cut(type_alias_decl).parse(input)?;
            let (input, _) = semicolon(input)?;
            Ok((input, (name, body)))
        },
        |input| {
            let (input, _) = lit("newtype")(input)?;
            let (input, name) = context("newtype name", cut(ident)).parse(input)?;
            let (input, body) = cut(newtype_decl).parse(input)?;
            let (input, _) = semicolon(input)?;
            Ok((input, (name, body)))
        },
    )))
    .parse(input)?;

    Ok((
        input,
        Decl {
            name,
            version: None,
            body,
            annotations: doc_annotation(doc_lines),
            loc: Loc::from_span(&span),
        },
    ))
}

/// Path naming a decl or one of its fields, `Name` or `Name.field`,
/// used by the standalone `annotation` statement (§6 `declRef`).
#[derive(Debug, Clone, PartialEq)]
pub struct DeclRef {
    pub decl_name: String,
    pub field_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStmt {
    pub target: DeclRef,
    pub annotation: ScopedName,
    pub value: crate::ast::Literal,
    pub loc: Loc,
}

fn decl_ref(input: NomSpan<'_>) -> IResult<NomSpan<'_>, DeclRef, AdlParserError<'_>> {
    let (input, mut parts) = dotted_path(input)?;
    let field_name = if parts.len() > 1 { Some(parts.pop().unwrap()) } else { None };
    let decl_name = parts.pop().unwrap();
    Ok((input, DeclRef { decl_name, field_name }))
}

pub fn annotation_stmt(input: NomSpan<'_>) -> IResult<NomSpan<'_>, AnnotationStmt, AdlParserError<'_>> {
    let (input, _) = skip_trivia(input)?;
    let (input, (span, (target, scoped_path, value))) = consumed(|input| {
        let (input, _) = lit("annotation")(input)?;
        let (input, target) = context("annotation target", cut(decl_ref)).parse(input)?;
        let (input, scoped_path) = context("annotation type", cut(dotted_path)).parse(input)?;
        let (input, value) = context("annotation value", cut(json_literal)).parse(input)?;
        let (input, _) = semicolon(input)?;
        Ok((input, (target, scoped_path, value)))
    })
    .parse(input)?;

    let module = ModuleName::new(scoped_path[..scoped_path.len() - 1].to_vec());
    let name = scoped_path.last().cloned().unwrap_or_default();
    Ok((
        input,
        AnnotationStmt {
            target,
            annotation: ScopedName::new(module, name),
            value,
            loc: Loc::from_span(&span),
        },
    ))
}
