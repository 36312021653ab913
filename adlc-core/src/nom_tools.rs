//! Parser combinator plumbing shared across the lexer/parser.
//!
//! Mirrors the teacher's `nom_tools` module: a [`State`] carried through
//! every [`NomSpan`] via `nom_locate`, plus helpers for turning a parsed
//! span into a byte range and for skipping whitespace, nested block
//! comments, and triple-slash doc lines.

use nom::bytes::complete::tag;
use nom::character::complete::char;
use nom::combinator::map;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use nom_locate::LocatedSpan;

use crate::file::SourceFile;

/// Parser state threaded through every span: the file being lexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub file: SourceFile,
}

impl State {
    pub fn new(file: SourceFile) -> Self {
        Self { file }
    }
}

/// `nom_locate` span carrying [`State`] as its extra payload.
pub type NomSpan<'a> = LocatedSpan<&'a str, State>;

pub trait ToRange {
    fn to_range(&self) -> std::ops::Range<usize>;
}

impl ToRange for NomSpan<'_> {
    fn to_range(&self) -> std::ops::Range<usize> {
        let start = self.location_offset();
        start..start + self.fragment().len()
    }
}

/// A source position with no lifetime dependency, suitable for storing in
/// the AST and in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loc {
    pub file: SourceFile,
    pub range: std::ops::Range<usize>,
}

impl Loc {
    pub fn new(file: SourceFile, range: std::ops::Range<usize>) -> Self {
        Self { file, range }
    }

    pub fn from_span(span: &NomSpan<'_>) -> Self {
        Loc::new(span.extra.file.clone(), span.to_range())
    }

    pub fn synthetic() -> Self {
        Loc::new(SourceFile::synthetic("<standard>", ""), 0..0)
    }
}

/// One `///` line, text after the slashes with a single leading space
/// trimmed (if present), not including the newline.
fn doc_line(input: NomSpan<'_>) -> IResult<NomSpan<'_>, String> {
    let (input, _) = tag("///").parse(input)?;
    let (input, text) = nom::bytes::complete::take_till(|c| c == '\n')(input)?;
    let text = text.fragment().strip_prefix(' ').unwrap_or(text.fragment());
    Ok((input, text.to_string()))
}

fn block_comment(input: NomSpan<'_>) -> IResult<NomSpan<'_>, ()> {
    // Nested `/* ... */` comments: scan manually, since nom has no native
    // recursive-comment combinator.
    let (rest, _) = tag("/*").parse(input)?;
    let text = *rest.fragment();
    let bytes = text.as_bytes();
    let mut depth = 1i32;
    let mut i = 0usize;
    while i < bytes.len() && depth > 0 {
        if text[i..].starts_with("/*") {
            depth += 1;
            i += 2;
        } else if text[i..].starts_with("*/") {
            depth -= 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    if depth != 0 {
        return Err(nom::Err::Error(nom::error::Error::new(rest, nom::error::ErrorKind::TakeUntil)));
    }
    let (after, _) = nom::bytes::complete::take(i)(rest)?;
    Ok((after, ()))
}

fn line_comment(input: NomSpan<'_>) -> IResult<NomSpan<'_>, ()> {
    // A plain `//` comment that is *not* a doc comment (no third slash).
    let (input, _) = tag("//").parse(input)?;
    let (input, _) = nom::combinator::peek(nom::combinator::not(char('/'))).parse(input)?;
    let (input, _) = nom::bytes::complete::take_till(|c| c == '\n')(input)?;
    Ok((input, ()))
}

/// Skips whitespace and comments, accumulating any `///` doc lines
/// encountered (consecutive doc lines concatenate with `\n`).
///
/// Generic over the error type so it can be used both from plain nom
/// parsers and from the `VerboseError`-based parser in `crate::parser`.
pub fn skip_trivia<'a, E: nom::error::ParseError<NomSpan<'a>>>(mut input: NomSpan<'a>) -> IResult<NomSpan<'a>, Vec<String>, E> {
    let mut docs = Vec::new();
    loop {
        if let Ok((rest, _)) = nom::character::complete::multispace1::<NomSpan<'_>, ()>(input.clone()) {
            input = rest;
            continue;
        }
        if let Ok((rest, line)) = doc_line(input.clone()) {
            docs.push(line);
            input = rest;
            continue;
        }
        if let Ok((rest, ())) = line_comment(input.clone()) {
            input = rest;
            continue;
        }
        if let Ok((rest, ())) = block_comment(input.clone()) {
            input = rest;
            continue;
        }
        break;
    }
    Ok((input, docs))
}

pub fn ws<'a, E: nom::error::ParseError<NomSpan<'a>>>(input: NomSpan<'a>) -> IResult<NomSpan<'a>, (), E> {
    map(skip_trivia, |_| ()).parse(input)
}

pub fn lit<'a, E: nom::error::ParseError<NomSpan<'a>>>(s: &'static str) -> impl FnMut(NomSpan<'a>) -> IResult<NomSpan<'a>, NomSpan<'a>, E> {
    move |input| {
        let (input, _) = ws(input)?;
        tag(s).parse(input)
    }
}

pub fn parenthesized<'a, O, E, F>(f: F) -> impl FnMut(NomSpan<'a>) -> IResult<NomSpan<'a>, O, E>
where
    E: nom::error::ParseError<NomSpan<'a>>,
    F: Parser<NomSpan<'a>, Output = O, Error = E>,
{
    let mut inner = delimited(lit("("), preceded(ws, f), preceded(ws, lit(")")));
    move |input| inner.parse(input)
}

pub fn braced<'a, O, E, F>(f: F) -> impl FnMut(NomSpan<'a>) -> IResult<NomSpan<'a>, O, E>
where
    E: nom::error::ParseError<NomSpan<'a>>,
    F: Parser<NomSpan<'a>, Output = O, Error = E>,
{
    let mut inner = delimited(lit("{"), preceded(ws, f), preceded(ws, lit("}")));
    move |input| inner.parse(input)
}

pub fn angled<'a, O, E, F>(f: F) -> impl FnMut(NomSpan<'a>) -> IResult<NomSpan<'a>, O, E>
where
    E: nom::error::ParseError<NomSpan<'a>>,
    F: Parser<NomSpan<'a>, Output = O, Error = E>,
{
    let mut inner = delimited(lit("<"), preceded(ws, f), preceded(ws, lit(">")));
    move |input| inner.parse(input)
}

pub fn comma_separated0<'a, O, E, F>(f: F) -> impl FnMut(NomSpan<'a>) -> IResult<NomSpan<'a>, Vec<O>, E>
where
    E: nom::error::ParseError<NomSpan<'a>>,
    F: Parser<NomSpan<'a>, Output = O, Error = E> + Copy,
{
    move |input| nom::multi::separated_list0(preceded(ws, char(',')), preceded(ws, f)).parse(input)
}

pub fn comma_separated1<'a, O, E, F>(f: F) -> impl FnMut(NomSpan<'a>) -> IResult<NomSpan<'a>, Vec<O>, E>
where
    E: nom::error::ParseError<NomSpan<'a>>,
    F: Parser<NomSpan<'a>, Output = O, Error = E> + Copy,
{
    move |input| nom::multi::separated_list1(preceded(ws, char(',')), preceded(ws, f)).parse(input)
}
