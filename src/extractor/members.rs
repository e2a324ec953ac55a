//! Classifies member statements and free functions per member grammar.

use std::ops::Range;

use crate::extractor::headers::{SignatureParts, base_ident, signature_parts};
use crate::extractor::lexer::{Source, find_close, find_top_level, is_ident_byte, skip_ws};
use crate::extractor::profile::{FunctionGrammar, MemberGrammar, Profile, VisibilityRule};
use crate::extractor::signature::{
    collapse_ws, parse_parameters_in, split_default, split_top_level, words,
};
use crate::model::{Callable, DeclKind, Field, Parameter, Visibility};

/// What encloses a member statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberScope {
    /// `None` inside a Rust `impl` block.
    pub kind: Option<DeclKind>,
    pub trait_impl: bool,
}

impl MemberScope {
    pub fn decl(kind: DeclKind) -> Self {
        Self {
            kind: Some(kind),
            trait_impl: false,
        }
    }

    pub fn rust_impl(trait_impl: bool) -> Self {
        Self {
            kind: None,
            trait_impl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Fields(Vec<Field>),
    /// A callable and the fields its parameters promote (`constructor(private x: X)`).
    Callable(Callable, Vec<Field>),
    Capabilities(Vec<String>),
    BaseTypes(Vec<String>),
    Skip,
}

/// A statement head split into whitespace tokens, with absolute positions.
struct Head<'s, 'a> {
    src: &'s Source<'a>,
    range: Range<usize>,
    tokens: Vec<Range<usize>>,
}

impl<'s, 'a> Head<'s, 'a> {
    fn new(src: &'s Source<'a>, range: Range<usize>) -> Self {
        let tokens = words(src.masked_str(range.clone()))
            .into_iter()
            .map(|token| range.start + token.start..range.start + token.end)
            .collect();
        Self { src, range, tokens }
    }

    fn masked(&self, idx: usize) -> &'s str {
        self.tokens
            .get(idx)
            .map(|range| self.src.masked_str(range.clone()))
            .unwrap_or("")
    }

    fn code(&self, idx: usize) -> &'s str {
        self.tokens
            .get(idx)
            .map(|range| self.src.code_str(range.clone()))
            .unwrap_or("")
    }

    fn position(&self, word: &str) -> Option<usize> {
        (0..self.tokens.len()).find(|idx| self.masked(*idx) == word)
    }

    /// Number of leading tokens that are modifiers.
    fn modifier_count(&self, profile: &Profile) -> usize {
        (0..self.tokens.len())
            .take_while(|idx| profile.is_modifier(self.masked(*idx)))
            .count()
    }
}

pub fn classify(
    profile: &Profile,
    src: &Source<'_>,
    head: Range<usize>,
    scope: MemberScope,
) -> Member {
    let parsed = Head::new(src, head.clone());
    if parsed.tokens.is_empty()
        || (0..parsed.tokens.len()).any(|idx| {
            let word = parsed.masked(idx);
            profile.ignored_keywords.contains(&word) || word == "@interface"
        })
    {
        return Member::Skip;
    }
    let member = match profile.members {
        MemberGrammar::TypeFirst => type_first(profile, src, &parsed, scope),
        MemberGrammar::Php => php_member(profile, src, &parsed, scope),
        MemberGrammar::Script => script_member(profile, src, &parsed, scope),
        MemberGrammar::Go => go_member(profile, src, &parsed, scope),
        MemberGrammar::Rust => rust_member(profile, src, &parsed, scope),
    };
    member.unwrap_or(Member::Skip)
}

fn type_first(
    profile: &Profile,
    src: &Source<'_>,
    head: &Head<'_, '_>,
    scope: MemberScope,
) -> Option<Member> {
    let range = head.range.clone();
    let masked = src.masked_str(range.clone());
    let arrow = masked.find("=>").map(|pos| range.start + pos);
    let eq = split_default(masked).map(|pos| range.start + pos);
    let cut = [arrow, eq].into_iter().flatten().min().unwrap_or(range.end);
    let paren = find_top_level(src.masked(), range.start..cut, b'(');
    if paren.is_some() {
        let parts = signature_parts(src, range.start..cut)?;
        let prefix = Head::new(src, parts.prefix.clone());
        let mut modifiers = Vec::new();
        let mut type_tokens = Vec::new();
        for idx in 0..prefix.tokens.len() {
            let word = prefix.masked(idx);
            if profile.is_modifier(word) {
                modifiers.push(word);
            } else if !word.starts_with(['<', '@', '[', '~']) {
                type_tokens.push(prefix.code(idx));
            }
        }
        let name = src.code_str(parts.name.clone());
        let mut callable = build_callable(profile, src, &parts, name, &modifiers, scope);
        callable.return_type = non_empty(&type_tokens.join(" "));
        return Some(Member::Callable(callable, Vec::new()));
    }

    let field_end = arrow.unwrap_or(range.end);
    let segments = split_top_level(src.masked_str(range.start..field_end), b',');
    let mut fields = Vec::new();
    let mut modifiers: Vec<&str> = Vec::new();
    let mut declared_type = None;
    for (n, segment) in segments.into_iter().enumerate() {
        let segment = range.start + segment.start..range.start + segment.end;
        let left_end = split_default(src.masked_str(segment.clone()))
            .map(|pos| segment.start + pos)
            .unwrap_or(segment.end);
        let part = Head::new(src, segment.start..left_end);
        let name_idx = if n == 0 {
            let mut type_tokens = Vec::new();
            for idx in 0..part.tokens.len() {
                let word = part.masked(idx);
                if profile.is_modifier(word) {
                    modifiers.push(word);
                } else if !word.starts_with('@') && !word.starts_with('[') {
                    type_tokens.push(idx);
                }
            }
            if type_tokens.len() < 2 {
                return None;
            }
            let (name_idx, type_idx) = type_tokens.split_last()?;
            declared_type = non_empty(
                &type_idx
                    .iter()
                    .map(|idx| part.code(*idx))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
            *name_idx
        } else {
            0
        };
        let name = part.code(name_idx);
        if !is_plain_name(name) {
            continue;
        }
        let mut field = Field::new(name, visibility(profile, &modifiers, name, scope));
        field.declared_type = declared_type.clone();
        field.is_static = static_flag(profile, &modifiers);
        fields.push(field);
    }
    (!fields.is_empty()).then_some(Member::Fields(fields))
}

fn php_member(
    profile: &Profile,
    src: &Source<'_>,
    head: &Head<'_, '_>,
    scope: MemberScope,
) -> Option<Member> {
    let first = head.modifier_count(profile);
    if head.masked(first) == "use" {
        let start = head.tokens.get(first)?.end;
        let list = src.code_str(start..head.range.end);
        let capabilities: Vec<String> = list
            .split(',')
            .map(|entry| entry.trim().trim_start_matches('\\').to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        return Some(Member::Capabilities(capabilities));
    }
    if head.masked(first) == "const" {
        return php_constants(profile, src, head, first, scope);
    }
    if let Some(fn_idx) = head.position("function") {
        let modifiers: Vec<&str> = (0..fn_idx).map(|idx| head.masked(idx)).collect();
        let start = head.tokens[fn_idx].end;
        let parts = signature_parts(src, start..head.range.end)?;
        let name = src.code_str(parts.name.clone());
        let mut callable = build_callable(profile, src, &parts, name, &modifiers, scope);
        callable.return_type = colon_return(src.code_str(parts.tail.clone()));
        let promoted = if name == "__construct" {
            promoted_fields(profile, src, parts.params.clone())
        } else {
            Vec::new()
        };
        return Some(Member::Callable(callable, promoted));
    }
    let range = head.range.clone();
    let mut fields = Vec::new();
    let mut modifiers: Vec<&str> = Vec::new();
    let mut declared_type = None;
    for (n, segment) in split_top_level(src.masked_str(range.clone()), b',')
        .into_iter()
        .enumerate()
    {
        let segment = range.start + segment.start..range.start + segment.end;
        let left_end = split_default(src.masked_str(segment.clone()))
            .map(|pos| segment.start + pos)
            .unwrap_or(segment.end);
        let part = Head::new(src, segment.start..left_end);
        let Some(var_idx) = (0..part.tokens.len()).find(|idx| part.masked(*idx).starts_with('$'))
        else {
            continue;
        };
        if n == 0 {
            let mut type_tokens = Vec::new();
            for idx in 0..var_idx {
                let word = part.masked(idx);
                if profile.is_modifier(word) {
                    modifiers.push(word);
                } else {
                    type_tokens.push(part.code(idx));
                }
            }
            declared_type = non_empty(&type_tokens.join(" "));
        }
        let name = part.code(var_idx).trim_start_matches('$');
        if name.is_empty() {
            continue;
        }
        let mut field = Field::new(name, visibility(profile, &modifiers, name, scope));
        field.declared_type = declared_type.clone();
        field.is_static = static_flag(profile, &modifiers);
        fields.push(field);
    }
    (!fields.is_empty()).then_some(Member::Fields(fields))
}

/// `[final] public const [type] A = 1, B = 2;`, reported as static fields.
fn php_constants(
    profile: &Profile,
    src: &Source<'_>,
    head: &Head<'_, '_>,
    const_idx: usize,
    scope: MemberScope,
) -> Option<Member> {
    let modifiers: Vec<&str> = (0..const_idx).map(|idx| head.masked(idx)).collect();
    let start = head.tokens.get(const_idx)?.end;
    let range = start..head.range.end;
    let mut declared_type = None;
    let mut fields = Vec::new();
    for (n, segment) in split_top_level(src.masked_str(range.clone()), b',')
        .into_iter()
        .enumerate()
    {
        let segment = range.start + segment.start..range.start + segment.end;
        let left_end = split_default(src.masked_str(segment.clone()))
            .map(|pos| segment.start + pos)
            .unwrap_or(segment.end);
        let part = Head::new(src, segment.start..left_end);
        let Some(last) = part.tokens.len().checked_sub(1) else {
            continue;
        };
        if n == 0 {
            let type_tokens: Vec<&str> = (0..last).map(|idx| part.code(idx)).collect();
            declared_type = non_empty(&type_tokens.join(" "));
        }
        let name = part.code(last);
        if !is_plain_name(name) {
            continue;
        }
        let mut field = Field::new(name, visibility(profile, &modifiers, name, scope));
        field.declared_type = declared_type.clone();
        field.is_static = Some(true);
        fields.push(field);
    }
    (!fields.is_empty()).then_some(Member::Fields(fields))
}

fn script_member(
    profile: &Profile,
    src: &Source<'_>,
    head: &Head<'_, '_>,
    scope: MemberScope,
) -> Option<Member> {
    let mut first = head.modifier_count(profile);
    if first == head.tokens.len() {
        // A lone `get` or `static` is the member's name.
        first = first.saturating_sub(1);
    }
    let modifiers: Vec<&str> = (0..first).map(|idx| head.masked(idx)).collect();
    let m = src.masked();
    let mut start = head.tokens.get(first)?.start;
    if m.get(start) == Some(&b'*') {
        start = skip_ws(m, start + 1, head.range.end);
    }
    let rest = start..head.range.end;
    let masked = src.masked_str(rest.clone());
    let eq = split_default(masked).map(|pos| rest.start + pos);
    let colon = find_top_level(m, rest.clone(), b':');
    let paren = find_top_level(m, rest.clone(), b'(');
    let before = |pos: Option<usize>, other: Option<usize>| match (pos, other) {
        (Some(pos), Some(other)) => pos < other,
        (Some(_), None) => true,
        _ => false,
    };
    if before(paren, eq) && before(paren, colon) {
        let parts = signature_parts(src, rest.clone())?;
        if parts.name.start != rest.start {
            return None;
        }
        let name = src.code_str(parts.name.clone());
        let mut callable = build_callable(profile, src, &parts, name, &modifiers, scope);
        callable.return_type = colon_return(src.code_str(parts.tail.clone()));
        let promoted = if name == "constructor" {
            promoted_fields(profile, src, parts.params.clone())
        } else {
            Vec::new()
        };
        return Some(Member::Callable(callable, promoted));
    }

    let name_len = masked
        .bytes()
        .take_while(|b| is_ident_byte(*b) || matches!(b, b'$' | b'#'))
        .count();
    let name = src.code_str(rest.start..rest.start + name_len);
    if name.is_empty() {
        return None;
    }
    let after = masked[name_len..].trim_start();
    if !(after.is_empty() || after.starts_with(['?', '!', ':', '=', ';'])) {
        return None;
    }
    let mut field = Field::new(name, visibility(profile, &modifiers, name, scope));
    if let Some(colon) = colon.filter(|colon| eq.is_none_or(|eq| *colon < eq)) {
        field.declared_type =
            non_empty(&collapse_ws(src.code_str(colon + 1..eq.unwrap_or(rest.end))));
    }
    field.is_static = static_flag(profile, &modifiers);
    Some(Member::Fields(vec![field]))
}

fn go_member(
    profile: &Profile,
    src: &Source<'_>,
    head: &Head<'_, '_>,
    scope: MemberScope,
) -> Option<Member> {
    let mut count = head.tokens.len();
    if count > 1 && head.masked(count - 1).starts_with(['`', '"']) {
        count -= 1;
    }
    if scope.kind == Some(DeclKind::Interface) {
        if find_top_level(src.masked(), head.range.clone(), b'(').is_some() {
            let parts = signature_parts(src, head.range.clone())?;
            let name = src.code_str(parts.name.clone());
            let mut callable = build_callable(profile, src, &parts, name, &[], scope);
            callable.return_type = non_empty(&collapse_ws(src.code_str(parts.tail.clone())));
            return Some(Member::Callable(callable, Vec::new()));
        }
        if count == 1 && is_type_path(head.code(0)) {
            return Some(Member::BaseTypes(vec![head.code(0).to_string()]));
        }
        return None;
    }
    if count == 1 {
        let embedded = head.code(0).trim_start_matches('*');
        return is_type_path(embedded).then(|| Member::BaseTypes(vec![embedded.to_string()]));
    }
    let mut names = Vec::new();
    let mut idx = 0;
    while idx < count {
        let word = head.code(idx);
        names.extend(
            word.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        );
        idx += 1;
        if !word.ends_with(',') {
            break;
        }
    }
    let declared_type = non_empty(
        &(idx..count)
            .map(|idx| head.code(idx))
            .collect::<Vec<_>>()
            .join(" "),
    );
    let fields = names
        .into_iter()
        .filter(|name| is_plain_name(name))
        .map(|name| {
            let mut field = Field::new(name, visibility(profile, &[], name, scope));
            field.declared_type = declared_type.clone();
            field
        })
        .collect::<Vec<_>>();
    (!fields.is_empty()).then_some(Member::Fields(fields))
}

fn rust_member(
    profile: &Profile,
    src: &Source<'_>,
    head: &Head<'_, '_>,
    scope: MemberScope,
) -> Option<Member> {
    if let Some(fn_idx) = head.position("fn") {
        let callable = rust_fn(profile, src, head, fn_idx, scope)?;
        return Some(Member::Callable(callable, Vec::new()));
    }
    if scope.kind != Some(DeclKind::Struct) {
        return None;
    }
    let range = head.range.clone();
    let colon = find_top_level(src.masked(), range.clone(), b':')?;
    let name_part = Head::new(src, range.start..colon);
    let count = name_part.tokens.len();
    let modifiers: Vec<&str> = (0..count.saturating_sub(1))
        .map(|idx| name_part.masked(idx))
        .collect();
    let name = name_part.code(count.checked_sub(1)?);
    if !is_plain_name(name) {
        return None;
    }
    let mut field = Field::new(name, visibility(profile, &modifiers, name, scope));
    field.declared_type = non_empty(&collapse_ws(src.code_str(colon + 1..range.end)));
    Some(Member::Fields(vec![field]))
}

fn rust_fn(
    profile: &Profile,
    src: &Source<'_>,
    head: &Head<'_, '_>,
    fn_idx: usize,
    scope: MemberScope,
) -> Option<Callable> {
    let modifiers: Vec<&str> = (0..fn_idx).map(|idx| head.masked(idx)).collect();
    if modifiers
        .iter()
        .any(|word| !profile.is_modifier(word) && !word.starts_with('"'))
    {
        return None;
    }
    let parts = signature_parts(src, head.tokens[fn_idx].end..head.range.end)?;
    let name = src.code_str(parts.name.clone());
    let mut callable = build_callable(profile, src, &parts, name, &modifiers, scope);
    callable.parameters.retain(|param| !is_self_receiver(param));
    let tail = src.code_str(parts.tail.clone());
    callable.return_type = tail.split_once("->").and_then(|(_, ret)| {
        let ret: Vec<&str> = ret
            .split_whitespace()
            .take_while(|word| *word != "where")
            .collect();
        non_empty(&ret.join(" "))
    });
    Some(callable)
}

fn is_self_receiver(param: &Parameter) -> bool {
    let name = param.name.as_str();
    name == "self" || name.ends_with(" self") || name.ends_with("&self")
}

/// A function declared outside any type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeFunction {
    pub callable: Callable,
    /// Receiver type of a Go method.
    pub receiver: Option<String>,
}

pub fn free_function(
    profile: &Profile,
    src: &Source<'_>,
    head: Range<usize>,
) -> Option<FreeFunction> {
    let parsed = Head::new(src, head.clone());
    let scope = MemberScope {
        kind: None,
        trait_impl: false,
    };
    match profile.functions {
        FunctionGrammar::None => None,
        FunctionGrammar::Keyword => {
            let callable = keyword_function(profile, src, &parsed)
                .or_else(|| arrow_function(profile, src, &parsed))?;
            Some(FreeFunction {
                callable,
                receiver: None,
            })
        }
        FunctionGrammar::Go => go_function(profile, src, &parsed),
        FunctionGrammar::Rust => {
            let fn_idx = parsed.position("fn")?;
            let callable = rust_fn(profile, src, &parsed, fn_idx, scope)?;
            Some(FreeFunction {
                callable,
                receiver: None,
            })
        }
    }
}

fn keyword_function(profile: &Profile, src: &Source<'_>, head: &Head<'_, '_>) -> Option<Callable> {
    let fn_idx = (0..head.tokens.len()).find(|idx| {
        let word = head.masked(*idx);
        word == "function" || word == "function*"
    })?;
    if (0..fn_idx).any(|idx| !profile.is_modifier(head.masked(idx))) {
        return None;
    }
    let parts = signature_parts(src, head.tokens[fn_idx].end..head.range.end)?;
    let name = src.code_str(parts.name.clone());
    if name.is_empty() || name == "function" {
        return None;
    }
    let mut callable = Callable::new(name);
    callable.parameters = parse_parameters_in(src, parts.params.clone(), profile.params);
    callable.return_type = colon_return(src.code_str(parts.tail.clone()));
    Some(callable)
}

/// `const name = (a, b) => ..`, `const name = async function (..)`, `const f = x => ..`
fn arrow_function(profile: &Profile, src: &Source<'_>, head: &Head<'_, '_>) -> Option<Callable> {
    let mut idx = 0;
    if head.masked(idx) == "export" {
        idx += 1;
    }
    if !matches!(head.masked(idx), "const" | "let" | "var") {
        return None;
    }
    let name_token = head.code(idx + 1);
    let name_len = name_token
        .bytes()
        .take_while(|b| is_ident_byte(*b) || *b == b'$')
        .count();
    let name = &name_token[..name_len];
    if name.is_empty() {
        return None;
    }
    let m = src.masked();
    let range = head.range.clone();
    let eq = range.start + split_default(src.masked_str(range.clone()))?;
    let mut pos = skip_ws(m, eq + 1, range.end);
    for keyword in ["async", "function"] {
        if src.masked_str(pos..range.end).starts_with(keyword) {
            pos = skip_ws(m, pos + keyword.len(), range.end);
        }
    }
    let mut callable = Callable::new(name);
    if m.get(pos) == Some(&b'(') {
        let close = find_close(m, pos, range.end)?;
        let after = src.masked_str(close + 1..range.end);
        let arrow = after.find("=>");
        let is_function = arrow.is_some() || src.masked_str(eq + 1..pos).contains("function");
        if !is_function {
            return None;
        }
        callable.parameters = parse_parameters_in(src, pos + 1..close, profile.params);
        if let Some(arrow) = arrow {
            callable.return_type = colon_return(src.code_str(close + 1..close + 1 + arrow));
        }
        return Some(callable);
    }
    let rest = src.masked_str(pos..range.end);
    let param_len = rest
        .bytes()
        .take_while(|b| is_ident_byte(*b) || *b == b'$')
        .count();
    if param_len == 0 || !rest[param_len..].trim_start().starts_with("=>") {
        return None;
    }
    callable.parameters = vec![Parameter::new(src.code_str(pos..pos + param_len))];
    Some(callable)
}

fn go_function(profile: &Profile, src: &Source<'_>, head: &Head<'_, '_>) -> Option<FreeFunction> {
    if head.masked(0) != "func" && !head.masked(0).starts_with("func(") {
        return None;
    }
    let m = src.masked();
    let end = head.range.end;
    let mut pos = skip_ws(m, head.tokens[0].start + 4, end);
    let mut receiver = None;
    if m.get(pos) == Some(&b'(') {
        let close = find_close(m, pos, end)?;
        let text = Head::new(src, pos + 1..close);
        let last = text.tokens.len().checked_sub(1)?;
        receiver = base_ident(text.code(last));
        pos = close + 1;
    }
    let parts = signature_parts(src, pos..end)?;
    let name = src.code_str(parts.name.clone());
    let scope = MemberScope {
        kind: None,
        trait_impl: false,
    };
    let mut callable = build_callable(profile, src, &parts, name, &[], scope);
    callable.return_type = non_empty(&collapse_ws(src.code_str(parts.tail.clone())));
    callable.receiver = receiver.clone();
    Some(FreeFunction { callable, receiver })
}

fn build_callable(
    profile: &Profile,
    src: &Source<'_>,
    parts: &SignatureParts,
    name: &str,
    modifiers: &[&str],
    scope: MemberScope,
) -> Callable {
    let mut callable = Callable::new(name);
    callable.visibility = Some(visibility(profile, modifiers, name, scope));
    callable.parameters = parse_parameters_in(src, parts.params.clone(), profile.params);
    callable
}

/// Constructor parameters carrying an access modifier also declare fields.
fn promoted_fields(profile: &Profile, src: &Source<'_>, params: Range<usize>) -> Vec<Field> {
    let masked = src.masked_str(params.clone());
    split_top_level(masked, b',')
        .into_iter()
        .filter_map(|segment| {
            let segment = params.start + segment.start..params.start + segment.end;
            let part = Head::new(src, segment.clone());
            let modifiers: Vec<&str> = (0..part.modifier_count(profile))
                .map(|idx| part.masked(idx))
                .collect();
            if !modifiers
                .iter()
                .any(|word| matches!(*word, "public" | "private" | "protected" | "readonly"))
            {
                return None;
            }
            let param = parse_parameters_in(src, segment, profile.params).into_iter().next()?;
            let scope = MemberScope::decl(DeclKind::Class);
            let mut field = Field::new(
                param.name.as_str(),
                visibility(profile, &modifiers, &param.name, scope),
            );
            field.declared_type = param.declared_type;
            field.is_static = static_flag(profile, &[]);
            Some(field)
        })
        .collect()
}

pub fn visibility(
    profile: &Profile,
    modifiers: &[&str],
    name: &str,
    scope: MemberScope,
) -> Visibility {
    match profile.visibility {
        VisibilityRule::Keywords {
            member_default,
            interface_default,
        } => {
            for word in modifiers {
                match *word {
                    "public" => return Visibility::Public,
                    "protected" => return Visibility::Protected,
                    "private" => return Visibility::Private,
                    "internal" => return Visibility::Internal,
                    _ => {}
                }
            }
            if name.starts_with('#') {
                Visibility::Private
            } else if scope.kind == Some(DeclKind::Interface) {
                interface_default
            } else {
                member_default
            }
        }
        VisibilityRule::Capitalized => {
            if name.starts_with(|c: char| c.is_uppercase()) {
                Visibility::Public
            } else {
                Visibility::Private
            }
        }
        VisibilityRule::RustPub => {
            if scope.kind == Some(DeclKind::Trait) || scope.trait_impl {
                return Visibility::Public;
            }
            match modifiers.iter().find(|word| word.starts_with("pub")) {
                Some(&"pub") => Visibility::Public,
                Some(_) => Visibility::Internal,
                None => Visibility::Private,
            }
        }
    }
}

fn static_flag(profile: &Profile, modifiers: &[&str]) -> Option<bool> {
    profile
        .tracks_static()
        .then(|| modifiers.iter().any(|word| profile.static_keywords.contains(word)))
}

/// `: ReturnType` after a parameter list (PHP, TypeScript).
fn colon_return(tail: &str) -> Option<String> {
    let ret = tail.trim().strip_prefix(':')?;
    non_empty(&collapse_ws(ret))
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| is_ident_byte(b) || matches!(b, b'$' | b'#' | b'@'))
}

fn is_type_path(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| is_ident_byte(b) || matches!(b, b'.' | b'[' | b']' | b','))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::profile::{CSHARP, GO, JAVA, PHP, RUST, TYPESCRIPT};
    use pretty_assertions::assert_eq;

    fn member(profile: &Profile, text: &str, scope: MemberScope) -> Member {
        let src = Source::lex(text, &profile.syntax);
        classify(profile, &src, 0..text.len(), scope)
    }

    fn class() -> MemberScope {
        MemberScope::decl(DeclKind::Class)
    }

    #[test]
    fn csharp_property_is_field() {
        let Member::Fields(fields) = member(&CSHARP, "public int Count", class()) else {
            panic!("expected field");
        };
        assert_eq!(fields[0].name, "Count");
        assert_eq!(fields[0].declared_type.as_deref(), Some("int"));
        assert_eq!(fields[0].visibility, Visibility::Public);
        assert_eq!(fields[0].is_static, Some(false));
    }

    #[test]
    fn java_multi_declarator_fields() {
        let Member::Fields(fields) = member(
            &JAVA,
            "private static final Map<String, Integer> a = new HashMap<>(), b",
            class(),
        ) else {
            panic!("expected fields");
        };
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(fields[1].declared_type.as_deref(), Some("Map<String, Integer>"));
        assert_eq!(fields[1].is_static, Some(true));
    }

    #[test]
    fn java_generic_method() {
        let Member::Callable(callable, _) = member(
            &JAVA,
            "public <T> List<T> wrap(T item, int count) throws IOException",
            class(),
        ) else {
            panic!("expected callable");
        };
        assert_eq!(callable.name, "wrap");
        assert_eq!(callable.return_type.as_deref(), Some("List<T>"));
        assert_eq!(callable.parameter_names(), vec!["item", "count"]);
        assert_eq!(callable.visibility, Some(Visibility::Public));
    }

    #[test]
    fn interface_members_default_public() {
        let Member::Callable(callable, _) =
            member(&JAVA, "void run()", MemberScope::decl(DeclKind::Interface))
        else {
            panic!("expected callable");
        };
        assert_eq!(callable.visibility, Some(Visibility::Public));
        let Member::Callable(callable, _) = member(&CSHARP, "void Run()", class()) else {
            panic!("expected callable");
        };
        assert_eq!(callable.visibility, Some(Visibility::Private));
    }

    #[test]
    fn php_members() {
        let Member::Fields(fields) = member(&PHP, "protected static ?array $items = []", class())
        else {
            panic!("expected field");
        };
        assert_eq!(fields[0].name, "items");
        assert_eq!(fields[0].declared_type.as_deref(), Some("?array"));
        assert_eq!(fields[0].visibility, Visibility::Protected);
        assert_eq!(fields[0].is_static, Some(true));

        assert_eq!(
            member(&PHP, "use HasFactory, Notifiable", class()),
            Member::Capabilities(vec!["HasFactory".into(), "Notifiable".into()])
        );

        let Member::Callable(callable, promoted) = member(
            &PHP,
            "public function __construct(private Mailer $mailer, int $retries = 3)",
            class(),
        ) else {
            panic!("expected callable");
        };
        assert_eq!(callable.parameter_names(), vec!["mailer", "retries"]);
        assert_eq!(promoted.len(), 1);
        assert_eq!(promoted[0].name, "mailer");
        assert_eq!(promoted[0].visibility, Visibility::Private);
    }

    #[test]
    fn typescript_members() {
        let Member::Fields(fields) = member(
            &TYPESCRIPT,
            "private readonly cache?: Map<string, number> = new Map()",
            class(),
        ) else {
            panic!("expected field");
        };
        assert_eq!(fields[0].name, "cache");
        assert_eq!(fields[0].declared_type.as_deref(), Some("Map<string, number>"));
        assert_eq!(fields[0].visibility, Visibility::Private);

        let Member::Callable(callable, _) =
            member(&TYPESCRIPT, "async load(id: string, force = false): Promise<void>", class())
        else {
            panic!("expected callable");
        };
        assert_eq!(callable.name, "load");
        assert_eq!(callable.return_type.as_deref(), Some("Promise<void>"));
        assert_eq!(callable.parameters[1].default_value.as_deref(), Some("false"));

        let Member::Fields(fields) =
            member(&TYPESCRIPT, "onClick = (e: Event) => this.handle(e)", class())
        else {
            panic!("expected field");
        };
        assert_eq!(fields[0].name, "onClick");
    }

    #[test]
    fn go_struct_fields() {
        let scope = MemberScope::decl(DeclKind::Struct);
        let Member::Fields(fields) = member(&GO, "X, y int `json:\"x\"`", scope) else {
            panic!("expected fields");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].visibility, Visibility::Public);
        assert_eq!(fields[1].visibility, Visibility::Private);
        assert_eq!(fields[1].declared_type.as_deref(), Some("int"));
        assert_eq!(fields[1].is_static, None);
        assert_eq!(
            member(&GO, "*sync.Mutex", scope),
            Member::BaseTypes(vec!["sync.Mutex".into()])
        );
    }

    #[test]
    fn rust_struct_field_and_method() {
        let Member::Fields(fields) =
            member(&RUST, "pub(crate) items: Vec<String>", MemberScope::decl(DeclKind::Struct))
        else {
            panic!("expected field");
        };
        assert_eq!(fields[0].visibility, Visibility::Internal);
        assert_eq!(fields[0].declared_type.as_deref(), Some("Vec<String>"));

        let Member::Callable(callable, _) = member(
            &RUST,
            "pub fn get<'a>(&'a self, key: &str) -> Option<&'a str>",
            MemberScope::rust_impl(false),
        ) else {
            panic!("expected callable");
        };
        assert_eq!(callable.parameter_names(), vec!["key"]);
        assert_eq!(callable.return_type.as_deref(), Some("Option<&'a str>"));
        assert_eq!(callable.visibility, Some(Visibility::Public));
    }

    #[test]
    fn go_method_receiver() {
        let text = "func (s *Server) Start(ctx context.Context, port int) error";
        let src = Source::lex(text, &GO.syntax);
        let function = free_function(&GO, &src, 0..text.len()).unwrap();
        assert_eq!(function.receiver.as_deref(), Some("Server"));
        assert_eq!(function.callable.name, "Start");
        assert_eq!(function.callable.return_type.as_deref(), Some("error"));
        assert_eq!(function.callable.visibility, Some(Visibility::Public));
    }

    #[test]
    fn script_arrow_constants() {
        let text = "export const fetchUser = async (id: string): Promise<User> => api.get(id)";
        let src = Source::lex(text, &TYPESCRIPT.syntax);
        let function = free_function(&TYPESCRIPT, &src, 0..text.len()).unwrap();
        assert_eq!(function.callable.name, "fetchUser");
        assert_eq!(function.callable.parameter_names(), vec!["id"]);
        assert_eq!(function.callable.return_type.as_deref(), Some("Promise<User>"));

        let text = "const total = items.length";
        let src = Source::lex(text, &TYPESCRIPT.syntax);
        assert!(free_function(&TYPESCRIPT, &src, 0..text.len()).is_none());
    }
}
