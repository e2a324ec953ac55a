//! Erlang: dot-terminated forms, attributes and function clauses.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::extractor::comments::doc_comment_before;
use crate::extractor::extract::LanguageExtractor;
use crate::extractor::lexer::{CommentKind, LexSyntax, Source, find_close, skip_ws, trim_end};
use crate::extractor::signature::{ParamSyntax, collapse_ws, parse_parameters_in, split_top_level};
use crate::model::{
    Callable, DeclKind, Dependency, Field, Language, NormalizedRecord, TypeDeclaration, Visibility,
};
use crate::util;

const ERLANG_SYNTAX: LexSyntax = LexSyntax {
    line_comments: &["%"],
    block_comments: false,
    quotes: b"\"'",
    char_prefix: Some(b'$'),
    ..LexSyntax::C_FAMILY
};

const DOC_COMMENTS: &[CommentKind] = &[CommentKind::Line];

static FUNCTION_ARITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z][\w@]*|'[^']*')\s*/\s*(\d+)").expect("valid arity pattern")
});

static ATOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z][\w@]*|'[^']*')").expect("valid atom pattern"));

#[derive(Debug, Default)]
pub struct ErlangExtractor;

impl ErlangExtractor {
    pub fn new() -> Self {
        Self
    }
}

/// Parameter types and return type declared by a `-spec`.
struct Spec {
    params: Vec<String>,
    return_type: Option<String>,
}

#[derive(Default)]
struct Module {
    exports: HashSet<(String, usize)>,
    export_all: bool,
    specs: HashMap<(String, usize), Spec>,
    functions: Vec<(Callable, usize)>,
}

impl LanguageExtractor for ErlangExtractor {
    fn language(&self) -> Language {
        Language::Erlang
    }

    fn extract(&mut self, source: &str, path: &Path) -> Result<NormalizedRecord> {
        let src = Source::lex(source, &ERLANG_SYNTAX);
        let mut record = NormalizedRecord::new(Language::Erlang, util::record_name(path));
        let mut module = Module::default();
        for form in forms(&src) {
            let comment = doc_comment_before(&src, form.start, DOC_COMMENTS);
            if src.masked()[form.start] == b'-' {
                attribute(&src, form, comment, &mut record, &mut module);
            } else if let Some(entry) = function(&src, form, comment) {
                module.functions.push(entry);
            }
        }
        for (mut callable, arity) in module.functions {
            let key = (callable.name.clone(), arity);
            let exported = module.export_all || module.exports.contains(&key);
            callable.visibility = Some(if exported {
                Visibility::Public
            } else {
                Visibility::Private
            });
            if let Some(spec) = module.specs.get(&key) {
                for (param, declared) in callable.parameters.iter_mut().zip(&spec.params) {
                    param.declared_type = Some(declared.clone());
                }
                callable.return_type = spec.return_type.clone();
            }
            record.top_level_callables.push(callable);
        }
        Ok(record)
    }
}

/// Forms end at a top-level `.` followed by whitespace or end of input.
fn forms(src: &Source<'_>) -> Vec<Range<usize>> {
    let m = src.masked();
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = skip_ws(m, 0, m.len());
    let mut i = start;
    while i < m.len() {
        match m[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 && m.get(i + 1).is_none_or(|b| b.is_ascii_whitespace()) => {
                if i > start {
                    out.push(start..i);
                }
                start = skip_ws(m, i + 1, m.len());
                i = start;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    let end = trim_end(m, start, m.len());
    if end > start {
        out.push(start..end);
    }
    out
}

fn attribute(
    src: &Source<'_>,
    form: Range<usize>,
    comment: Option<String>,
    record: &mut NormalizedRecord,
    module: &mut Module,
) {
    let m = src.masked();
    let mut name_end = form.start + 1;
    while name_end < form.end && (m[name_end].is_ascii_alphanumeric() || m[name_end] == b'_') {
        name_end += 1;
    }
    let name = src.code_str(form.start + 1..name_end);
    let open = skip_ws(m, name_end, form.end);
    let args = if open < form.end && m[open] == b'(' {
        match find_close(m, open, form.end) {
            Some(close) if trim_end(m, close + 1, form.end) == close + 1 => open + 1..close,
            // `-spec f(A) -> R.` written without outer parentheses
            _ => open..form.end,
        }
    } else {
        open..form.end
    };
    let text = src.code_str(args.clone()).trim();
    match name {
        "module" => {
            record.module_context = text.to_string();
            record.module_comment = comment;
        }
        "export" => module.exports.extend(arities(text)),
        "compile" => module.export_all |= text.contains("export_all"),
        "import" => {
            let parts = split_top_level(src.masked_str(args.clone()), b',');
            let Some(first) = parts.first() else {
                return;
            };
            let source = src.code_str(args.start + first.start..args.start + first.end).trim();
            for (function, arity) in arities(text.get(first.end..).unwrap_or("")) {
                record
                    .dependencies
                    .push(Dependency::new(format!("{function}/{arity}"), source));
            }
        }
        "include" | "include_lib" => {
            let path = text.trim_matches('"');
            if !path.is_empty() {
                let file = path.rsplit('/').next().unwrap_or(path);
                record.dependencies.push(Dependency::new(file, path));
            }
        }
        "record" => {
            if let Some(decl) = record_declaration(src, args, comment) {
                record.declarations.push(decl);
            }
        }
        "spec" => {
            if let Some((key, spec)) = spec(src, args) {
                module.specs.entry(key).or_insert(spec);
            }
        }
        _ => {}
    }
}

fn arities(text: &str) -> Vec<(String, usize)> {
    FUNCTION_ARITY
        .captures_iter(text)
        .filter_map(|caps| {
            let arity = caps.get(2)?.as_str().parse().ok()?;
            Some((caps.get(1)?.as_str().to_string(), arity))
        })
        .collect()
}

/// `-record(name, {a = 1 :: integer(), b})`
fn record_declaration(
    src: &Source<'_>,
    args: Range<usize>,
    comment: Option<String>,
) -> Option<TypeDeclaration> {
    let m = src.masked();
    let parts = split_top_level(src.masked_str(args.clone()), b',');
    let name_part = parts.first()?;
    let name = src
        .code_str(args.start + name_part.start..args.start + name_part.end)
        .trim();
    if name.is_empty() {
        return None;
    }
    let mut decl = TypeDeclaration::new(name, DeclKind::Record);
    decl.comment = comment;
    let open = (args.start + name_part.end..args.end).find(|i| m[*i] == b'{')?;
    let close = find_close(m, open, args.end)?;
    let body = src.masked_str(open + 1..close);
    for segment in split_top_level(body, b',') {
        let range = open + 1 + segment.start..open + 1 + segment.end;
        let masked = src.masked_str(range.clone());
        if masked.trim().is_empty() {
            continue;
        }
        let type_pos = masked.find("::");
        let name_end = [masked.find('='), type_pos]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(masked.len());
        let field_name = src.code_str(range.start..range.start + name_end).trim();
        if field_name.is_empty() {
            continue;
        }
        let mut field = Field::new(field_name, Visibility::Public);
        field.comment = doc_comment_before(src, skip_ws(m, range.start, range.end), DOC_COMMENTS);
        if let Some(pos) = type_pos {
            let declared = collapse_ws(src.code_str(range.start + pos + 2..range.end));
            field.declared_type = (!declared.is_empty()).then_some(declared);
        }
        decl.fields.push(field);
    }
    Some(decl)
}

/// `-spec name(T1, T2) -> R.`; only the first clause of an overloaded spec counts.
fn spec(src: &Source<'_>, args: Range<usize>) -> Option<((String, usize), Spec)> {
    let m = src.masked();
    let start = skip_ws(m, args.start, args.end);
    let masked = src.masked_str(start..args.end);
    let atom = ATOM.find(masked)?;
    let mut name = src.code_str(start..start + atom.end()).to_string();
    let mut pos = start + atom.end();
    // `Mod:name(..)`
    if m.get(pos) == Some(&b':') {
        let rest = src.masked_str(pos + 1..args.end);
        let atom = ATOM.find(rest)?;
        name = src.code_str(pos + 1..pos + 1 + atom.end()).to_string();
        pos = pos + 1 + atom.end();
    }
    let open = skip_ws(m, pos, args.end);
    if m.get(open) != Some(&b'(') {
        return None;
    }
    let close = find_close(m, open, args.end)?;
    let params_masked = src.masked_str(open + 1..close);
    let params: Vec<String> = split_top_level(params_masked, b',')
        .into_iter()
        .map(|range| collapse_ws(src.code_str(open + 1 + range.start..open + 1 + range.end)))
        .filter(|param| !param.is_empty())
        .collect();
    let after = src.masked_str(close + 1..args.end);
    let return_type = after.find("->").and_then(|arrow| {
        let ret_start = close + 1 + arrow + 2;
        let ret_masked = src.masked_str(ret_start..args.end);
        let ret_end = [find_word(ret_masked, "when"), find_clause_end(ret_masked)]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(ret_masked.len());
        let ret = collapse_ws(src.code_str(ret_start..ret_start + ret_end));
        (!ret.is_empty()).then_some(ret)
    });
    let arity = params.len();
    Some((
        (name, arity),
        Spec {
            params,
            return_type,
        },
    ))
}

fn find_word(masked: &str, word: &str) -> Option<usize> {
    masked.match_indices(word).map(|(idx, _)| idx).find(|idx| {
        let before = masked[..*idx].chars().next_back();
        let after = masked[idx + word.len()..].chars().next();
        before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
    })
}

fn find_clause_end(masked: &str) -> Option<usize> {
    split_top_level(masked, b';')
        .first()
        .filter(|first| first.end < masked.len())
        .map(|first| first.end)
}

/// First clause of a function form: `name(Patterns) [when Guard] -> Body`.
fn function(
    src: &Source<'_>,
    form: Range<usize>,
    comment: Option<String>,
) -> Option<(Callable, usize)> {
    let m = src.masked();
    let masked = src.masked_str(form.clone());
    let atom = ATOM.find(masked)?;
    let open = skip_ws(m, form.start + atom.end(), form.end);
    if m.get(open) != Some(&b'(') {
        return None;
    }
    let close = find_close(m, open, form.end)?;
    if !src.masked_str(close + 1..form.end).contains("->") {
        return None;
    }
    let mut callable = Callable::new(src.code_str(form.start..form.start + atom.end()));
    callable.comment = comment;
    callable.parameters = parse_parameters_in(src, open + 1..close, ParamSyntax::Pattern);
    let arity = callable.parameters.len();
    Some((callable, arity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_forms_on_terminal_dots() {
        let text = "-module(m).\nf(X) -> X + 1.5.\ng() -> ok.";
        let src = Source::lex(text, &ERLANG_SYNTAX);
        let forms: Vec<_> = forms(&src)
            .into_iter()
            .map(|range| src.code_str(range).to_string())
            .collect();
        assert_eq!(forms, vec!["-module(m)", "f(X) -> X + 1.5", "g() -> ok"]);
    }

    #[test]
    fn spec_types_apply_by_arity() {
        let source = indoc! {r#"
            -module(calc).
            -export([add/2]).

            -spec add(integer(), integer()) -> integer().
            add(A, B) -> A + B.

            helper(X) -> X.
        "#};
        let record = ErlangExtractor::new()
            .extract(source, Path::new("calc.erl"))
            .unwrap();
        let add = &record.top_level_callables[0];
        assert_eq!(add.visibility, Some(Visibility::Public));
        assert_eq!(add.parameters[0].declared_type.as_deref(), Some("integer()"));
        assert_eq!(add.return_type.as_deref(), Some("integer()"));
        assert_eq!(
            record.top_level_callables[1].visibility,
            Some(Visibility::Private)
        );
    }
}
