use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace1, none_of, not_line_ending, space0, space1},
    combinator::{eof, map, opt, value},
    error::{Error, ErrorKind},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

/// One statement of a config file.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Include(String),
    Field {
        path: Vec<String>,
        value: RawValue,
        append: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Pieces(Vec<Piece>),
    Object(Vec<Node>),
    Array(Vec<RawValue>),
}

/// Parts of a scalar value that are concatenated once substitutions are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Quoted(String),
    Unquoted(String),
    Substitution { path: String, optional: bool },
}

// Characters that end an unquoted value.
const FORBIDDEN_UNQUOTED: &str = "$\"{}[]:=,+#`^?!@*&\\\r\n";

pub fn parse_document(input: &str) -> Result<Vec<Node>, String> {
    let root = alt((
        delimited(pair(filler, char('{')), fields, pair(filler, char('}'))),
        fields,
    ));

    match terminated(root, pair(filler, eof))(input) {
        Ok((_, nodes)) => Ok(nodes),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
            Err(describe_position(input, err.input))
        }
        Err(nom::Err::Incomplete(_)) => Err("unexpected end of input".to_string()),
    }
}

fn describe_position(full: &str, rest: &str) -> String {
    let offset = full.len() - rest.len();
    let line = full[..offset].matches('\n').count() + 1;
    let snippet: String = rest.chars().take(20).collect();
    format!("unexpected input at line {line}: {snippet:?}")
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(alt((tag("#"), tag("//"))), not_line_ending)(input)
}

// Whitespace, newlines, comments and commas between statements.
fn filler(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, comment, tag(",")))))(input)
}

fn fields(input: &str) -> IResult<&str, Vec<Node>> {
    many0(preceded(filler, alt((include, field))))(input)
}

fn include(input: &str) -> IResult<&str, Node> {
    map(preceded(pair(tag("include"), space1), quoted_string), Node::Include)(input)
}

fn field(input: &str) -> IResult<&str, Node> {
    let (input, path) = key_path(input)?;
    let (input, _) = space0(input)?;
    let (input, (append, value)) = alt((
        map(object, |value| (false, value)),
        map(
            tuple((alt((tag("+="), tag("="), tag(":"))), space0, raw_value)),
            |(separator, _, value)| (separator == "+=", value),
        ),
    ))(input)?;

    Ok((
        input,
        Node::Field {
            path,
            value,
            append,
        },
    ))
}

fn key_path(input: &str) -> IResult<&str, Vec<String>> {
    separated_list1(char('.'), key_segment)(input)
}

fn key_segment(input: &str) -> IResult<&str, String> {
    alt((
        quoted_string,
        map(
            take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_'),
            String::from,
        ),
    ))(input)
}

fn raw_value(input: &str) -> IResult<&str, RawValue> {
    alt((object, array, map(pieces, RawValue::Pieces)))(input)
}

fn object(input: &str) -> IResult<&str, RawValue> {
    map(
        delimited(char('{'), fields, pair(filler, char('}'))),
        RawValue::Object,
    )(input)
}

fn array(input: &str) -> IResult<&str, RawValue> {
    map(
        delimited(
            char('['),
            many0(preceded(filler, raw_value)),
            pair(filler, char(']')),
        ),
        RawValue::Array,
    )(input)
}

fn pieces(input: &str) -> IResult<&str, Vec<Piece>> {
    let (rest, mut pieces) = many1(alt((
        map(quoted_string, Piece::Quoted),
        substitution,
        map(unquoted_text, |text: &str| Piece::Unquoted(text.to_string())),
    )))(input)?;

    // Whitespace before a comment or the end of the line is not part of the value.
    if let Some(Piece::Unquoted(text)) = pieces.last_mut() {
        let trimmed = text.trim_end().to_string();
        *text = trimmed;
    }
    pieces.retain(|piece| !matches!(piece, Piece::Unquoted(text) if text.is_empty()));

    Ok((rest, pieces))
}

fn substitution(input: &str) -> IResult<&str, Piece> {
    map(
        delimited(
            tag("${"),
            pair(opt(char('?')), take_while1(|c: char| c != '}')),
            char('}'),
        ),
        |(optional, path): (Option<char>, &str)| Piece::Substitution {
            path: path.trim().to_string(),
            optional: optional.is_some(),
        },
    )(input)
}

fn unquoted_text(input: &str) -> IResult<&str, &str> {
    let mut end = 0;
    for (idx, c) in input.char_indices() {
        if FORBIDDEN_UNQUOTED.contains(c) || input[idx..].starts_with("//") {
            break;
        }
        end = idx + c.len_utf8();
    }

    if end == 0 {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }
    Ok((&input[end..], &input[..end]))
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('"'),
            many0(alt((
                value('"', tag("\\\"")),
                value('\\', tag("\\\\")),
                value('\n', tag("\\n")),
                value('\t', tag("\\t")),
                value('\r', tag("\\r")),
                value('/', tag("\\/")),
                none_of("\"\\\n"),
            ))),
            char('"'),
        ),
        |chars| chars.into_iter().collect(),
    )(input)
}
