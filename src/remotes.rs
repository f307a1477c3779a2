//! The `remotes` attribute of a factory location.
//!
//! The attribute carries a list of git remotes in one of two shapes:
//!
//! ```markdown
//! {https://github.com/a/repo.git,https://github.com/b/repo.git}
//! {{origin,https://github.com/a/repo.git},{upstream,https://github.com/b/repo.git}}
//! ```
//!
//! In the first shape the names are positional: `origin`, `upstream`,
//! then `fork1`, `fork2`, and so on.
//! Tokens may be double quoted, which allows urls containing `,`, `{` or `}`.
use std::fmt::Display;

use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::char,
    combinator::{all_consuming, map},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::delimited,
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{LocationError, LocationResult};

/// A named pointer to a repository remote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GitRemote {
    pub name: String,
    pub url: String,
}

impl GitRemote {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The implicit name of the remote at `index` in a url only list.
    pub fn positional_name(index: usize) -> String {
        match index {
            0 => "origin".to_owned(),
            1 => "upstream".to_owned(),
            n => format!("fork{}", n - 1),
        }
    }
}

impl Display for GitRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Token(String),
    Group(Vec<Item>),
}

/// Parses the value of a `remotes` attribute.
///
/// An empty value yields no remotes.
pub fn parse_remotes(input: &str) -> LocationResult<Vec<GitRemote>> {
    if input.is_empty() {
        return Ok(vec![]);
    }
    let cleaned = strip_whitespace(input);
    let (_, items) = parse_items(&cleaned)
        .map_err(|e| LocationError::remotes_syntax(input, describe(&cleaned, e)))?;

    let remotes = match items.first() {
        Some(Item::Group(_)) => named_remotes(items, input)?,
        _ => positional_remotes(items, input)?,
    };
    tracing::debug!("Parsed {} remote(s) from: {input}", remotes.len());
    Ok(remotes)
}

/// Encodes remotes into the explicit `{{name,url},...}` shape.
///
/// An empty list encodes as the empty string, which parses back to no remotes.
pub fn remotes_to_param(remotes: &[GitRemote]) -> String {
    if remotes.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = remotes
        .iter()
        .map(|remote| {
            format!(
                "{{{},{}}}",
                encode_token(&remote.name),
                encode_token(&remote.url)
            )
        })
        .collect();
    format!("{{{}}}", pairs.join(","))
}

fn named_remotes(items: Vec<Item>, input: &str) -> LocationResult<Vec<GitRemote>> {
    items
        .into_iter()
        .map(|item| match item {
            Item::Group(pair) => match <[Item; 2]>::try_from(pair) {
                Ok([Item::Token(name), Item::Token(url)])
                    if !name.is_empty() && !url.is_empty() =>
                {
                    Ok(GitRemote::new(name, url))
                }
                _ => Err(LocationError::remotes_malformed(input)),
            },
            Item::Token(_) => Err(LocationError::remotes_malformed(input)),
        })
        .collect()
}

fn positional_remotes(items: Vec<Item>, input: &str) -> LocationResult<Vec<GitRemote>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Item::Token(url) if !url.is_empty() => {
                Ok(GitRemote::new(GitRemote::positional_name(index), url))
            }
            _ => Err(LocationError::remotes_malformed(input)),
        })
        .collect()
}

fn parse_items(input: &str) -> IResult<&str, Vec<Item>> {
    all_consuming(delimited(
        char('{'),
        separated_list1(char(','), item),
        char('}'),
    ))(input)
}

fn item(input: &str) -> IResult<&str, Item> {
    alt((map(group, Item::Group), map(token, Item::Token)))(input)
}

/// Groups nest to any depth, only pairs of tokens make a remote.
fn group(input: &str) -> IResult<&str, Vec<Item>> {
    delimited(char('{'), separated_list1(char(','), item), char('}'))(input)
}

fn token(input: &str) -> IResult<&str, String> {
    alt((quoted, map(is_not("{},\""), str::to_owned)))(input)
}

/// A double quoted token, `\` escapes the next character.
fn quoted(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('"')(input)?;
    let mut res = String::new();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('"') => return Ok((chars.as_str(), res)),
            Some('\\') => match chars.next() {
                Some(c) => res.push(c),
                None => return Err(nom::Err::Error(Error::new(rest, ErrorKind::Escaped))),
            },
            Some(c) => res.push(c),
            None => return Err(nom::Err::Error(Error::new(rest, ErrorKind::Char))),
        }
        rest = chars.as_str();
    }
}

/// Whitespace is insignificant everywhere except inside quoted tokens.
fn strip_whitespace(input: &str) -> String {
    let mut res = String::with_capacity(input.len());
    let mut quoted = false;
    let mut escaped = false;
    for c in input.chars() {
        if quoted {
            res.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                quoted = false;
            }
        } else if c == '"' {
            quoted = true;
            res.push(c);
        } else if !c.is_whitespace() {
            res.push(c);
        }
    }
    res
}

fn describe(cleaned: &str, err: nom::Err<Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "Unexpected end of input.".to_owned(),
        nom::Err::Error(e) | nom::Err::Failure(e) => match e.input.chars().next() {
            None => "Unexpected end of input.".to_owned(),
            Some(c) => {
                let position = cleaned.len() - e.input.len();
                format!("Unexpected character '{c}' at position {position}.")
            }
        },
    }
}

fn encode_token(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| matches!(c, '{' | '}' | ',' | '"' | '\\') || c.is_whitespace());
    if !needs_quotes {
        return token.to_owned();
    }
    let mut res = String::with_capacity(token.len() + 2);
    res.push('"');
    for c in token.chars() {
        if matches!(c, '"' | '\\') {
            res.push('\\');
        }
        res.push(c);
    }
    res.push('"');
    res
}
