//! JSON literal parsing (§4.1): default values and annotation values are
//! written as full JSON — numbers preserved as exact decimal text, strings
//! UTF-8, arrays/objects recursive. Object keys are arbitrary strings at
//! this stage; type-checking against a field's declared type happens later
//! in the resolver (§4.4 step 6).

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, none_of, one_of};
use nom::combinator::{cut, map, opt, recognize, value};
use nom::error::context;
use nom::multi::{fold, many1, separated_list0};
use nom::sequence::{delimited, pair, preceded, separated_pair, terminated};
use nom::{IResult, Parser};

use indexmap::IndexMap;

use crate::ast::Literal;
use crate::nom_tools::{ws, NomSpan};

use super::AdlParserError;

fn escaped_char(input: NomSpan<'_>) -> IResult<NomSpan<'_>, char, AdlParserError<'_>> {
    let (input, c) = none_of("\"\\")(input)?;
    Ok((input, c))
}

fn escape_sequence(input: NomSpan<'_>) -> IResult<NomSpan<'_>, char, AdlParserError<'_>> {
    preceded(
        char('\\'),
        alt((
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            value('\\', char('\\')),
            value('"', char('"')),
            value('/', char('/')),
        )),
    )
    .parse(input)
}

fn json_string_raw(input: NomSpan<'_>) -> IResult<NomSpan<'_>, String, AdlParserError<'_>> {
    delimited(
        char('"'),
        fold(0.., alt((escape_sequence, escaped_char)), String::new, |mut s, c| {
            s.push(c);
            s
        }),
        cut(char('"')),
    )
    .parse(input)
}

fn json_string(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Literal, AdlParserError<'_>> {
    map(json_string_raw, Literal::Str).parse(input)
}

fn json_number(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Literal, AdlParserError<'_>> {
    let digits = || recognize(many1(one_of("0123456789")));
    let (input, text) = recognize((
        opt(char('-')),
        digits(),
        opt(pair(char('.'), digits())),
        opt((one_of("eE"), opt(one_of("+-")), digits())),
    ))
    .parse(input)?;
    Ok((input, Literal::Number(text.fragment().to_string())))
}

fn json_bool(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Literal, AdlParserError<'_>> {
    alt((value(Literal::Bool(true), tag("true")), value(Literal::Bool(false), tag("false")))).parse(input)
}

fn json_null(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Literal, AdlParserError<'_>> {
    value(Literal::Null, tag("null")).parse(input)
}

fn json_array(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Literal, AdlParserError<'_>> {
    map(
        delimited(
            char('['),
            separated_list0(preceded(ws, char(',')), preceded(ws, json_literal)),
            preceded(ws, cut(char(']'))),
        ),
        Literal::Array,
    )
    .parse(input)
}

fn json_object(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Literal, AdlParserError<'_>> {
    let entry = separated_pair(preceded(ws, json_string_raw), preceded(ws, char(':')), preceded(ws, json_literal));
    map(
        delimited(char('{'), separated_list0(preceded(ws, char(',')), entry), preceded(ws, cut(char('}')))),
        |entries| Literal::Object(entries.into_iter().collect::<IndexMap<_, _>>()),
    )
    .parse(input)
}

/// Parses one JSON literal value, per §4.1 / §6 `jsonLiteral`.
pub fn json_literal(input: NomSpan<'_>) -> IResult<NomSpan<'_>, Literal, AdlParserError<'_>> {
    let (input, _) = ws(input)?;
    context(
        "JSON literal",
        alt((json_object, json_array, json_string, json_bool, json_null, json_number)),
    )
    .parse(input)
}
