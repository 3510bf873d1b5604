//! Lexer and outline for OpenVPN configuration text
//!
//! Tokenizes a document and classifies each line against the catalog, so a
//! front-end can show which lines the model understands and which it only
//! carries along.
//!
//! This is a display aid. It tokenizes properly and is therefore stricter
//! than the substring matching the model indexes with; the two can disagree
//! on odd lines (e.g. `tls-client` is `Unrecognized` here but indexes the
//! `client` flag).
//!
//! Key features:
//! - Newlines are significant (one directive per line)
//! - `#` and `;` start a comment that runs to the end of the line
//! - `<tag>` / `</tag>` delimit inline blocks

use crate::catalog::{self, DirectiveKind};
use logos::{Logos, Span};
use std::fmt;

/// Source location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// A token with its location in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Location,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: impl Into<Location>) -> Self {
        Self {
            value,
            span: span.into(),
        }
    }
}

/// Token types
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Carriage returns are dropped so CRLF documents lex like LF ones
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Whitespace,

    #[token("\n")]
    Newline,

    /// `# ...` or `; ...` up to the end of the line
    #[regex(r"[#;][^\n]*", |lex| lex.slice().to_string())]
    Comment(String),

    /// `<tag>`
    #[regex(r"<[A-Za-z][A-Za-z0-9-]*>", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    TagOpen(String),

    /// `</tag>`
    #[regex(r"</[A-Za-z][A-Za-z0-9-]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].to_string()
    })]
    TagClose(String),

    /// A `<` that does not start a tag
    #[token("<")]
    Angle,

    /// Directive names, arguments, and block content
    #[regex(r"[^ \t\f\r\n#;<][^ \t\f\r\n<]*", |lex| lex.slice().to_string())]
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Newline => write!(f, "\\n"),
            Token::Comment(s) => write!(f, "{}", s),
            Token::TagOpen(s) => write!(f, "<{}>", s),
            Token::TagClose(s) => write!(f, "</{}>", s),
            Token::Angle => write!(f, "<"),
            Token::Word(s) => write!(f, "{}", s),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Tokenize a configuration document.
///
/// Every character belongs to some token (`Word` takes anything that is not
/// whitespace, a comment start or `<`), so tokenizing cannot fail.
pub fn tokenize(source: &str) -> Vec<Spanned<Token>> {
    Token::lexer(source)
        .spanned()
        .filter_map(|(result, span)| match result {
            Ok(Token::Whitespace) | Err(()) => None,
            Ok(token) => Some(Spanned::new(token, span)),
        })
        .collect()
}

/// Classification of one non-blank line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Catalog value directive with its arguments
    Value { name: String, value: String },
    /// Catalog flag directive
    Flag { name: String },
    /// Part of an inline `<tag>` block
    Block { tag: String },
    Comment,
    /// Anything else; retained but not indexed
    Unrecognized { name: String },
}

/// A classified line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    /// 1-based line number
    pub number: usize,
    pub kind: LineKind,
    /// Line text without surrounding whitespace
    pub text: String,
}

/// Classify every non-blank line of `source`
pub fn outline(source: &str) -> Vec<OutlineLine> {
    let tokens = tokenize(source);
    // Flushes a final line that has no trailing newline
    let end = Spanned::new(Token::Newline, source.len()..source.len());
    let mut lines = Vec::new();
    let mut open_block: Option<String> = None;
    let mut number = 1;
    let mut current: Vec<&Spanned<Token>> = Vec::new();

    for token in tokens.iter().chain(std::iter::once(&end)) {
        if token.value != Token::Newline {
            current.push(token);
            continue;
        }

        if let (Some(first), Some(last)) = (current.first(), current.last()) {
            let kind = classify(source, &current, &mut open_block);
            lines.push(OutlineLine {
                number,
                kind,
                text: source[first.span.start..last.span.end].to_string(),
            });
        }
        current.clear();
        number += 1;
    }

    lines
}

fn classify(source: &str, line: &[&Spanned<Token>], open_block: &mut Option<String>) -> LineKind {
    if let Some(tag) = open_block.clone() {
        if line.iter().any(|t| t.value == Token::TagClose(tag.clone())) {
            *open_block = None;
        }
        return LineKind::Block { tag };
    }

    match &line[0].value {
        Token::Comment(_) => LineKind::Comment,
        Token::TagOpen(tag) => {
            if !line.iter().any(|t| t.value == Token::TagClose(tag.clone())) {
                *open_block = Some(tag.clone());
            }
            LineKind::Block { tag: tag.clone() }
        }
        Token::Word(name) => {
            let args: Vec<_> = line[1..]
                .iter()
                .take_while(|t| !matches!(t.value, Token::Comment(_)))
                .collect();

            match (catalog::kind_of(name), args.first(), args.last()) {
                (Some(DirectiveKind::Value), Some(first), Some(last)) => LineKind::Value {
                    name: name.clone(),
                    value: source[first.span.start..last.span.end].to_string(),
                },
                (Some(DirectiveKind::Flag), _, _) => LineKind::Flag { name: name.clone() },
                _ => LineKind::Unrecognized { name: name.clone() },
            }
        }
        other => LineKind::Unrecognized {
            name: other.to_string(),
        },
    }
}
