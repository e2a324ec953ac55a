//! Declaration headers: the text between a member's start and its body.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::extractor::lexer::{
    Source, closes_angle, find_close, find_top_level, is_ident_byte, skip_ws, trim_end,
};
use crate::extractor::profile::{HeaderGrammar, InheritanceRule, Profile};
use crate::extractor::signature::{collapse_ws, split_top_level, words};
use crate::model::DeclKind;

static GO_TYPE_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:type\s+)?(?P<name>[A-Za-z_]\w*)\s*(?:\[[^\]]*\])?\s+(?P<kind>struct|interface)$",
    )
    .expect("valid type spec pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHeader {
    /// `None` for anonymous classes.
    pub name: Option<String>,
    pub kind: DeclKind,
    pub modifiers: Vec<String>,
    pub base_types: Vec<String>,
    pub capabilities: Vec<String>,
    /// Positional components: `record P(int x)`, `struct P(u8, u8)`.
    pub components: Option<Range<usize>>,
}

pub fn type_header(profile: &Profile, src: &Source<'_>, head: Range<usize>) -> Option<TypeHeader> {
    match profile.headers {
        HeaderGrammar::Keyword => keyword_header(profile, src, head),
        HeaderGrammar::GoTypeSpec => go_type_spec(src, head),
    }
}

fn go_type_spec(src: &Source<'_>, head: Range<usize>) -> Option<TypeHeader> {
    let text = collapse_ws(src.masked_str(head));
    let caps = GO_TYPE_SPEC.captures(&text)?;
    let kind = match caps.name("kind")?.as_str() {
        "struct" => DeclKind::Struct,
        _ => DeclKind::Interface,
    };
    Some(TypeHeader {
        name: Some(caps.name("name")?.as_str().to_string()),
        kind,
        modifiers: Vec::new(),
        base_types: Vec::new(),
        capabilities: Vec::new(),
        components: None,
    })
}

fn keyword_header(profile: &Profile, src: &Source<'_>, head: Range<usize>) -> Option<TypeHeader> {
    let masked = src.masked_str(head.clone());
    let tokens = words(masked);
    let keyword_idx = tokens
        .iter()
        .position(|range| profile.decl_kind(&masked[range.clone()]).is_some())?;
    let mut modifiers = Vec::new();
    for range in &tokens[..keyword_idx] {
        let word = &masked[range.clone()];
        if !profile.is_modifier(word) {
            return None;
        }
        modifiers.push(src.code_str(head.start + range.start..head.start + range.end).to_string());
    }
    let kind = profile.decl_kind(&masked[tokens[keyword_idx].clone()])?;
    let mut name_idx = keyword_idx + 1;
    // `record struct`, `record class`
    if tokens
        .get(name_idx)
        .is_some_and(|range| profile.decl_kind(&masked[range.clone()]).is_some())
    {
        name_idx += 1;
    }
    let (name, rest) = match tokens.get(name_idx) {
        Some(range) => {
            let word = &masked[range.clone()];
            let ident = word
                .bytes()
                .take_while(|b| is_ident_byte(*b) || *b == b'$')
                .count();
            let ident_word = &word[..ident];
            if ident == 0 || matches!(ident_word, "extends" | "implements") {
                (None, range.start)
            } else {
                (Some(ident_word.to_string()), range.start + ident)
            }
        }
        None => (None, masked.len()),
    };

    let m = src.masked();
    let end = head.end;
    let mut pos = skip_ws(m, head.start + rest, end);
    if pos < end && m[pos] == b'<' {
        pos = find_close(m, pos, end).map(|close| close + 1).unwrap_or(end);
        pos = skip_ws(m, pos, end);
    }
    let mut components = None;
    if pos < end && m[pos] == b'(' {
        let close = find_close(m, pos, end).unwrap_or(end);
        components = Some(pos + 1..close);
        pos = (close + 1).min(end);
    }
    let tail = src.code_str(pos..end);
    let tail_masked = src.masked_str(pos..end);
    let (base_types, capabilities) = inheritance(profile.inheritance, kind, tail, tail_masked);
    Some(TypeHeader {
        name,
        kind,
        modifiers,
        base_types,
        capabilities,
        components,
    })
}

fn inheritance(
    rule: InheritanceRule,
    kind: DeclKind,
    tail: &str,
    masked: &str,
) -> (Vec<String>, Vec<String>) {
    match rule {
        InheritanceRule::ColonList => {
            let Some(list) = before_word(tail, masked, "where").trim().strip_prefix(':') else {
                return (Vec::new(), Vec::new());
            };
            let mut bases = Vec::new();
            let mut capabilities = Vec::new();
            for entry in type_list(list, b',') {
                let capability = match kind {
                    DeclKind::Struct => true,
                    DeclKind::Interface => false,
                    _ => looks_like_interface(&entry),
                };
                if capability {
                    capabilities.push(entry);
                } else {
                    bases.push(entry);
                }
            }
            (bases, capabilities)
        }
        InheritanceRule::ExtendsImplements => {
            // [extends, implements]
            let mut clauses = [String::new(), String::new()];
            let mut current = None;
            for range in words(masked) {
                let word = tail.get(range).unwrap_or("");
                match word {
                    "extends" => current = Some(0),
                    "implements" => current = Some(1),
                    _ => {
                        if let Some(idx) = current {
                            clauses[idx].push(' ');
                            clauses[idx].push_str(word);
                        }
                    }
                }
            }
            let [extends, implements] = clauses;
            let extends = type_list(&extends, b',');
            let implements = type_list(&implements, b',');
            match kind {
                DeclKind::Interface => ([extends, implements].concat(), Vec::new()),
                _ => (extends, implements),
            }
        }
        InheritanceRule::Supertraits => {
            let Some(list) = before_word(tail, masked, "where").trim().strip_prefix(':') else {
                return (Vec::new(), Vec::new());
            };
            let bases = type_list(list, b'+')
                .into_iter()
                .filter(|entry| !entry.starts_with('\''))
                .collect();
            (bases, Vec::new())
        }
        InheritanceRule::Embedded => (Vec::new(), Vec::new()),
    }
}

/// C# convention: `IDisposable`, `IEnumerable<T>`.
fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

fn before_word<'a>(text: &'a str, masked: &str, stop: &str) -> &'a str {
    words(masked)
        .into_iter()
        .find(|range| masked.get(range.clone()) == Some(stop))
        .and_then(|range| text.get(..range.start))
        .unwrap_or(text)
}

/// Splits a type list, dropping constructor arguments (`Base(x)`).
pub fn type_list(list: &str, sep: u8) -> Vec<String> {
    split_top_level(list, sep)
        .into_iter()
        .filter_map(|range| list.get(range))
        .map(|entry| {
            let entry = entry.trim();
            let entry = match entry.find('(') {
                Some(open) if entry.ends_with(')') => &entry[..open],
                _ => entry,
            };
            collapse_ws(entry)
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplHeader {
    pub type_name: String,
    pub trait_name: Option<String>,
}

/// `impl<T> Trait for Type<T> where ..`
pub fn rust_impl(src: &Source<'_>, head: Range<usize>) -> Option<ImplHeader> {
    let masked = src.masked_str(head.clone());
    let tokens = words(masked);
    let impl_idx = tokens.iter().position(|range| {
        let word = &masked[range.clone()];
        word == "impl" || word.starts_with("impl<")
    })?;
    if tokens[..impl_idx]
        .iter()
        .any(|range| !matches!(&masked[range.clone()], "unsafe" | "default"))
    {
        return None;
    }
    let m = src.masked();
    let mut pos = skip_ws(m, head.start + tokens[impl_idx].start + 4, head.end);
    if pos < head.end && m[pos] == b'<' {
        pos = find_close(m, pos, head.end)? + 1;
    }
    let rest = src.code_str(pos..head.end);
    let rest_masked = src.masked_str(pos..head.end);
    let rest = before_word(rest, rest_masked, "where");
    let rest_masked = &rest_masked[..rest.len()];
    let for_word = words(rest_masked)
        .into_iter()
        .find(|range| &rest_masked[range.clone()] == "for");
    let (trait_part, type_part) = match for_word {
        Some(range) => (Some(&rest[..range.start]), &rest[range.end..]),
        None => (None, rest),
    };
    let type_name = base_ident(type_part)?;
    let trait_name = trait_part
        .map(str::trim)
        .filter(|name| !name.starts_with('!'))
        .map(collapse_ws)
        .filter(|name| !name.is_empty());
    Some(ImplHeader {
        type_name,
        trait_name,
    })
}

/// Bare type identifier: `&mut crate::a::Foo<T>` gives `Foo`.
pub fn base_ident(text: &str) -> Option<String> {
    let mut text = text.trim();
    loop {
        let stripped = text
            .trim_start_matches(['&', '*'])
            .trim_start()
            .trim_start_matches("mut ")
            .trim_start_matches("dyn ")
            .trim_start();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    let path_end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':' || c == '.' || c == '\\'))
        .unwrap_or(text.len());
    let path = &text[..path_end];
    let name = path
        .rsplit(|c| c == ':' || c == '.' || c == '\\')
        .next()
        .unwrap_or(path);
    (!name.is_empty()).then(|| name.to_string())
}

/// Positions of a callable header `prefix name(params) tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParts {
    pub prefix: Range<usize>,
    pub name: Range<usize>,
    pub params: Range<usize>,
    pub tail: Range<usize>,
}

pub fn signature_parts(src: &Source<'_>, head: Range<usize>) -> Option<SignatureParts> {
    let m = src.masked();
    let open = find_top_level(m, head.clone(), b'(')?;
    let close = find_close(m, open, head.end)?;
    let mut name_end = trim_end(m, head.start, open);
    if name_end > head.start && m[name_end - 1] == b'>' && closes_angle(m, name_end - 1) {
        name_end = trim_end(m, head.start, matching_open_angle(m, head.start, name_end - 1)?);
    } else if name_end > head.start && m[name_end - 1] == b']' {
        // Go type parameters: `Map[K comparable, V any](..)`
        let open = m[head.start..name_end - 1].iter().rposition(|b| *b == b'[')?;
        name_end = trim_end(m, head.start, head.start + open);
    }
    while name_end > head.start && matches!(m[name_end - 1], b'?' | b'!') {
        name_end -= 1;
    }
    let mut name_start = name_end;
    while name_start > head.start && is_name_byte(m[name_start - 1]) {
        name_start -= 1;
    }
    if name_start == name_end {
        return None;
    }
    Some(SignatureParts {
        prefix: head.start..name_start,
        name: name_start..name_end,
        params: open + 1..close,
        tail: (close + 1).min(head.end)..head.end,
    })
}

fn is_name_byte(b: u8) -> bool {
    is_ident_byte(b) || matches!(b, b'$' | b'#' | b'.')
}

fn matching_open_angle(m: &[u8], start: usize, close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (start..=close).rev() {
        match m[i] {
            b'>' if closes_angle(m, i) => depth += 1,
            b'<' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
