//! Module-level parsing (§6): `module name { (import | decl)* }`, followed
//! by applying any standalone `annotation` statements onto the decls/fields
//! they name.

use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::{cut, map, opt};
use nom::error::context;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::{IResult, Parser};

use crate::ast::{self, Decl, Import, ModuleName};
use crate::error::AdlError;
use crate::nom_tools::{braced, lit, NomSpan};

use super::decl::{annotation_stmt, decl, AnnotationStmt};
use super::{dotted_path, semicolon, AdlParserError};

enum Item {
    Import(Import),
    Decl(Decl),
    Annotation(AnnotationStmt),
}

/// Module AST before standalone `annotation` statements (§6, §9) have been
/// applied onto their targets — kept separate from [`ast::Module`] so that
/// a target-not-found error surfaces as a precise [`AdlError`] from
/// `parse_module` rather than a generic nom parse failure.
pub struct ParsedModule {
    pub name: ModuleName,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
    pub annotation_stmts: Vec<AnnotationStmt>,
    pub source: crate::file::SourceFile,
}

fn module_name(input: NomSpan<'_>) -> IResult<NomSpan<'_>, ModuleName, AdlParserError<'_>> {
    map(dotted_path, ModuleName::new).parse(input)
}

fn import(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Import, AdlParserError<'_>> {
    let (input, _) = lit("import")(input)?;
    let (input, mut parts) = context("import path", cut(dotted_path)).parse(input)?;
    let (input, is_wildcard) = opt(preceded(lit("."), char('*'))).parse(input)?;
    let (input, _) = semicolon(input)?;

    let import = if is_wildcard.is_some() {
        Import::WholeModule(ModuleName::new(parts))
    } else {
        let name = parts.pop().expect("separated_list1 is non-empty");
        Import::Scoped(ast::ScopedName::new(ModuleName::new(parts), name))
    };
    Ok((input, import))
}

fn item(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Item, AdlParserError<'_>> {
    alt((
        map(import, Item::Import),
        map(annotation_stmt, Item::Annotation),
        map(decl, Item::Decl),
    ))
    .parse(input)
}

pub fn module(input: NomSpan<'_>) -> IResult<NomSpan<'_>, ParsedModule, AdlParserError<'_>> {
    let source = input.extra.file.clone();
    let (input, _) = lit("module")(input)?;
    let (input, name) = context("module name", cut(module_name)).parse(input)?;
    let (input, items) = context("module body", cut(braced(many0(item)))).parse(input)?;

    let mut imports = Vec::new();
    let mut decls = Vec::new();
    let mut annotation_stmts = Vec::new();
    for item in items {
        match item {
            Item::Import(import) => imports.push(import),
            Item::Decl(decl) => decls.push(decl),
            Item::Annotation(stmt) => annotation_stmts.push(stmt),
        }
    }

    Ok((input, ParsedModule { name, imports, decls, annotation_stmts, source }))
}

/// Applies standalone `annotation` statements (§6, §9) onto the decl or
/// field they name. Unlike sidecar annotations (§4.3), a target that
/// doesn't exist in this file is a hard error: the statement names a path
/// the author wrote directly in this source file.
pub fn apply_annotation_statements(decls: &mut [Decl], stmts: Vec<AnnotationStmt>) -> Result<(), AdlError> {
    for stmt in stmts {
        let decl = decls
            .iter_mut()
            .find(|d| d.name == stmt.target.decl_name)
            .ok_or_else(|| AdlError::UnknownType {
                name: stmt.target.decl_name.clone(),
                loc: stmt.loc.clone(),
            })?;
        match &stmt.target.field_name {
            None => {
                decl.annotations.insert(stmt.annotation, stmt.value);
            }
            Some(field_name) => {
                let field = decl
                    .body
                    .fields()
                    .iter()
                    .position(|f| &f.name == field_name)
                    .ok_or_else(|| AdlError::UnknownType {
                        name: format!("{}.{}", stmt.target.decl_name, field_name),
                        loc: stmt.loc.clone(),
                    })?;
                let fields = match &mut decl.body {
                    ast::DeclBody::Struct(s) => &mut s.fields,
                    ast::DeclBody::Union(u) => &mut u.fields,
                    ast::DeclBody::TypeDef(_) | ast::DeclBody::NewType(_) => unreachable!("no fields on type/newtype"),
                };
                fields[field].annotations.insert(stmt.annotation, stmt.value);
            }
        }
    }
    Ok(())
}
