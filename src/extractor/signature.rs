//! Parameter lists to ordered `(name, type, default)` triples.

use std::ops::Range;

use crate::extractor::lexer::{LexSyntax, Source, closes_angle, opens_angle};
use crate::model::Parameter;

/// Token order of one parameter declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSyntax {
    /// `final int x = 1` (C#, Java)
    TypeThenName,
    /// `x?: number = 1`, `mut x: u8` (TypeScript, Rust)
    NameColonType,
    /// `a, b int` (Go)
    NameThenType,
    /// `?Foo &$x = null` (PHP)
    Sigil,
    /// `x = 1` (JavaScript)
    Bare,
    /// `{ok, X}` (Erlang)
    Pattern,
}

const PARAM_MODIFIERS: &[&str] = &[
    "final", "ref", "out", "in", "params", "this", "readonly", "scoped", "public", "private",
    "protected", "override", "mut", "const", "volatile",
];

impl ParamSyntax {
    fn lex_syntax(self) -> LexSyntax {
        match self {
            ParamSyntax::NameColonType => LexSyntax {
                quotes: b"\"`",
                rust_literals: true,
                ..LexSyntax::C_FAMILY
            },
            ParamSyntax::NameThenType => LexSyntax {
                quotes: b"\"'",
                raw_quotes: b"`",
                ..LexSyntax::C_FAMILY
            },
            _ => LexSyntax {
                quotes: b"\"'`",
                ..LexSyntax::C_FAMILY
            },
        }
    }
}

/// Parses a standalone parameter-list string (without the parentheses).
pub fn parse_parameters(raw: &str, syntax: ParamSyntax) -> Vec<Parameter> {
    let src = Source::lex(raw, &syntax.lex_syntax());
    parse_parameters_in(&src, 0..raw.len(), syntax)
}

/// Parses the parameter list occupying `range` of an already lexed file.
pub fn parse_parameters_in(
    src: &Source<'_>,
    range: Range<usize>,
    syntax: ParamSyntax,
) -> Vec<Parameter> {
    let masked = src.masked_str(range.clone());
    let code = src.code_str(range);
    if masked.len() != code.len() {
        return Vec::new();
    }
    let mut params: Vec<Parameter> = split_top_level(masked, b',')
        .into_iter()
        .filter(|segment| !masked[segment.clone()].trim().is_empty())
        .filter_map(|segment| {
            parse_segment(&code[segment.clone()], &masked[segment], syntax)
        })
        .collect();
    if syntax == ParamSyntax::NameThenType {
        group_types(&mut params);
    }
    params
}

fn parse_segment(code: &str, masked: &str, syntax: ParamSyntax) -> Option<Parameter> {
    let (left_end, default_value) = match syntax {
        ParamSyntax::Pattern => (code.len(), None),
        _ => match split_default(masked) {
            Some(eq) => (eq, non_empty(code.get(eq + 1..).unwrap_or(""))),
            None => (code.len(), None),
        },
    };
    let left = trimmed_range(code, 0..left_end);
    let left_code = code.get(left.clone())?;
    let left_masked = masked.get(left)?;
    let mut param = match syntax {
        ParamSyntax::TypeThenName => type_then_name(left_code, left_masked)?,
        ParamSyntax::NameColonType => name_colon_type(left_code, left_masked)?,
        ParamSyntax::NameThenType => name_then_type(left_code, left_masked)?,
        ParamSyntax::Sigil => sigil(left_code, left_masked)?,
        ParamSyntax::Bare | ParamSyntax::Pattern => {
            Parameter::new(non_empty(&collapse_ws(left_code))?)
        }
    };
    param.default_value = default_value;
    Some(param)
}

fn trimmed_range(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = text.get(range.clone()).unwrap_or("");
    let start = range.start + (slice.len() - slice.trim_start().len());
    start..start + slice.trim().len()
}

fn tokens<'a>(code: &'a str, masked: &str) -> Vec<&'a str> {
    words(masked)
        .into_iter()
        .filter_map(|range| code.get(range))
        .collect()
}

fn type_then_name(code: &str, masked: &str) -> Option<Parameter> {
    let tokens: Vec<&str> = tokens(code, masked)
        .into_iter()
        .filter(|token| {
            !PARAM_MODIFIERS.contains(token) && !token.starts_with('@') && !token.starts_with('[')
        })
        .collect();
    let (name, type_tokens) = tokens.split_last()?;
    let mut param = Parameter::new(*name);
    param.declared_type = non_empty(&type_tokens.join(" "));
    Some(param)
}

fn name_colon_type(code: &str, masked: &str) -> Option<Parameter> {
    let (name_part, declared_type) = match find_colon(masked) {
        Some(colon) => (
            code.get(..colon).unwrap_or(""),
            non_empty(&collapse_ws(code.get(colon + 1..).unwrap_or(""))),
        ),
        None => (code, None),
    };
    let name_masked = masked.get(..name_part.len()).unwrap_or("");
    let tokens: Vec<&str> = tokens(name_part, name_masked)
        .into_iter()
        .filter(|token| !PARAM_MODIFIERS.contains(token))
        .collect();
    let name = tokens.join(" ");
    let name = name.trim_end_matches(['?', '!']);
    let mut param = Parameter::new(non_empty(name)?);
    param.declared_type = declared_type;
    Some(param)
}

fn name_then_type(code: &str, masked: &str) -> Option<Parameter> {
    let tokens = tokens(code, masked);
    let (name, type_tokens) = tokens.split_first()?;
    let mut param = Parameter::new(*name);
    param.declared_type = non_empty(&type_tokens.join(" "));
    Some(param)
}

fn sigil(code: &str, masked: &str) -> Option<Parameter> {
    let tokens = tokens(code, masked);
    let idx = tokens.iter().position(|token| token.contains('$'))?;
    let token = tokens[idx];
    let name = &token[token.find('$')? + 1..];
    let mut param = Parameter::new(non_empty(name)?);
    let type_tokens: Vec<&str> = tokens[..idx]
        .iter()
        .copied()
        .filter(|token| !PARAM_MODIFIERS.contains(token) && !token.starts_with("#["))
        .collect();
    param.declared_type = non_empty(&type_tokens.join(" "));
    Some(param)
}

/// Go shares one type across grouped names: `a, b int`.
fn group_types(params: &mut [Parameter]) {
    if params.iter().all(|param| param.declared_type.is_none()) {
        for param in params.iter_mut() {
            param.declared_type = Some(std::mem::replace(&mut param.name, "_".to_string()));
        }
        return;
    }
    let mut pending: Option<String> = None;
    for param in params.iter_mut().rev() {
        match &param.declared_type {
            Some(declared) => pending = Some(declared.clone()),
            None => param.declared_type = pending.clone(),
        }
    }
}

/// Splits at `sep` outside brackets and generic angle brackets. Operates on
/// masked text, so separators inside string literals are already hidden.
pub fn split_top_level(masked: &str, sep: u8) -> Vec<Range<usize>> {
    let bytes = masked.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut last = 0;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'<' if opens_angle(bytes, i) => angle += 1,
            b'>' if angle > 0 && closes_angle(bytes, i) => angle -= 1,
            _ if b == sep && depth == 0 && angle == 0 => {
                parts.push(last..i);
                last = i + 1;
            }
            _ => {}
        }
    }
    parts.push(last..bytes.len());
    parts
}

/// Whitespace separated tokens, keeping bracketed, generic and quoted groups
/// whole.
pub fn words(masked: &str) -> Vec<Range<usize>> {
    let bytes = masked.as_bytes();
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = None;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            _ if quote == Some(b) => quote = None,
            _ if quote.is_some() => {}
            b'"' | b'`' => quote = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'<' if opens_angle(bytes, i) => angle += 1,
            b'>' if angle > 0 && closes_angle(bytes, i) => angle -= 1,
            _ => {}
        }
        if b.is_ascii_whitespace() && depth == 0 && angle == 0 && quote.is_none() {
            if let Some(begin) = start.take() {
                out.push(begin..i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(begin) = start {
        out.push(begin..bytes.len());
    }
    out
}

/// Position of the first top-level assignment `=`.
pub fn split_default(masked: &str) -> Option<usize> {
    let bytes = masked.as_bytes();
    let mut depth = 0usize;
    let mut angle = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'<' if opens_angle(bytes, i) => angle += 1,
            b'>' if angle > 0 && closes_angle(bytes, i) => angle -= 1,
            b'=' if depth == 0 && angle == 0 => {
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                let next = bytes.get(i + 1).copied().unwrap_or(b' ');
                if !matches!(prev, b'=' | b'!' | b'<' | b'>' | b':')
                    && !matches!(next, b'=' | b'>')
                {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn find_colon(masked: &str) -> Option<usize> {
    let bytes = masked.as_bytes();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'<' if opens_angle(bytes, i) => angle += 1,
            b'>' if angle > 0 && closes_angle(bytes, i) => angle -= 1,
            b':' if bytes.get(i + 1) == Some(&b':') => i += 1,
            b':' if depth == 0 && angle == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Collapses runs of whitespace into single spaces.
pub fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
