//! Decomposes one import-style statement into dependencies.

use std::sync::LazyLock;

use regex::Regex;

use crate::extractor::profile::ImportGrammar;
use crate::extractor::signature::{collapse_ws, split_top_level};
use crate::model::Dependency;

static CSHARP_USING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:global\s+)?using\s+(?P<static>static\s+)?(?:(?P<alias>\w+)\s*=\s*)?(?P<path>[\w.]+(?:<.*>)?)\s*;?$",
    )
    .expect("valid using pattern")
});

static JAVA_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^import\s+(?:static\s+)?(?P<path>[\w.]+(?:\.\*)?)\s*;?$")
        .expect("valid import pattern")
});

static ES_IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s+(?:type\s+)?(?P<clause>.+?)\s+from\s*['"](?P<src>[^'"]+)['"]"#)
        .expect("valid import pattern")
});

static ES_IMPORT_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s*['"](?P<src>[^'"]+)['"]"#).expect("valid import pattern")
});

static ES_EXPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^export\s+(?:type\s+)?(?P<clause>\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"](?P<src>[^'"]+)['"]"#,
    )
    .expect("valid export pattern")
});

static ES_REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?:export\s+)?(?:(?:const|let|var)\s+(?P<clause>[\w$]+|\{[^}]*\})"#,
        r#"|import\s+(?P<name>[\w$]+))"#,
        r#"\s*=\s*require\(\s*['"](?P<src>[^'"]+)['"]\s*\)"#,
    ))
    .expect("valid require pattern")
});

static GO_IMPORT_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:(?P<alias>[\w.]+)\s+)?(?:"(?P<path>[^"]+)"|`(?P<raw>[^`]+)`)"#)
        .expect("valid import spec pattern")
});

static RUST_EXTERN_CRATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:pub(?:\([^)]*\))?\s+)?extern\s+crate\s+(?P<name>\w+)(?:\s+as\s+(?P<alias>\w+))?",
    )
    .expect("valid extern crate pattern")
});

static RUST_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?use\s+(?P<tree>.+?)\s*;?$").expect("valid use pattern")
});

/// Dependencies declared by `statement`, or `None` when it is not an import.
pub fn parse_import(grammar: ImportGrammar, statement: &str) -> Option<Vec<Dependency>> {
    match grammar {
        ImportGrammar::CSharpUsing => csharp_using(&collapse_ws(statement)),
        ImportGrammar::JavaImport => java_import(&collapse_ws(statement)),
        ImportGrammar::PhpUse => php_use(&collapse_ws(statement)),
        ImportGrammar::EsModule => es_module(&collapse_ws(statement)),
        ImportGrammar::GoImport => go_import(statement.trim()),
        ImportGrammar::RustUse => rust_use(&collapse_ws(statement)),
    }
}

fn csharp_using(text: &str) -> Option<Vec<Dependency>> {
    let caps = CSHARP_USING.captures(text)?;
    let path = caps.name("path")?.as_str();
    let alias = caps.name("alias").map(|m| m.as_str().to_string());
    let imported = if caps.name("static").is_some() || alias.is_some() {
        last_segment(path, ".")
    } else {
        path
    };
    Some(vec![Dependency::new(imported, path).with_alias(alias)])
}

fn java_import(text: &str) -> Option<Vec<Dependency>> {
    let caps = JAVA_IMPORT.captures(text)?;
    let path = caps.name("path")?.as_str();
    Some(vec![Dependency::new(last_segment(path, "."), path)])
}

fn php_use(text: &str) -> Option<Vec<Dependency>> {
    let rest = text.strip_prefix("use ")?;
    let rest = strip_php_use_kind(rest.trim());
    let mut deps = Vec::new();
    if let Some(open) = rest.find('{') {
        let prefix = rest[..open].trim().trim_end_matches('\\');
        let close = rest.rfind('}')?;
        for item in rest.get(open + 1..close)?.split(',') {
            let item = strip_php_use_kind(item.trim());
            if item.is_empty() {
                continue;
            }
            let (path, alias) = split_alias(item, " as ");
            let full = format!("{prefix}\\{path}");
            deps.push(php_dependency(&full, alias));
        }
    } else {
        for item in rest.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let (path, alias) = split_alias(item, " as ");
            deps.push(php_dependency(path, alias));
        }
    }
    (!deps.is_empty()).then_some(deps)
}

fn strip_php_use_kind(text: &str) -> &str {
    text.strip_prefix("function ")
        .or_else(|| text.strip_prefix("const "))
        .unwrap_or(text)
        .trim()
}

fn php_dependency(path: &str, alias: Option<&str>) -> Dependency {
    let path = path.trim().trim_start_matches('\\');
    Dependency::new(last_segment(path, "\\"), path).with_alias(alias.map(str::to_string))
}

fn es_module(text: &str) -> Option<Vec<Dependency>> {
    if let Some(caps) = ES_IMPORT_FROM.captures(text) {
        let src = caps.name("src")?.as_str();
        return Some(es_clause(caps.name("clause")?.as_str(), src, " as "));
    }
    if let Some(caps) = ES_IMPORT_BARE.captures(text) {
        let src = caps.name("src")?.as_str();
        return Some(vec![Dependency::new(src, src)]);
    }
    if let Some(caps) = ES_EXPORT_FROM.captures(text) {
        let src = caps.name("src")?.as_str();
        return Some(es_clause(caps.name("clause")?.as_str(), src, " as "));
    }
    if let Some(caps) = ES_REQUIRE.captures(text) {
        let src = caps.name("src")?.as_str();
        if let Some(name) = caps.name("name") {
            return Some(vec![Dependency::new(name.as_str(), src)]);
        }
        return Some(es_clause(caps.name("clause")?.as_str(), src, ":"));
    }
    None
}

/// `a, { b, c as d }`, `* as ns`, or `{ a, b: c }` for destructured requires.
fn es_clause(clause: &str, src: &str, alias_sep: &str) -> Vec<Dependency> {
    let clause = clause.trim();
    let (head, braces) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => {
            (&clause[..open], Some(&clause[open + 1..close]))
        }
        _ => (clause, None),
    };
    let mut deps = Vec::new();
    for part in head.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.strip_prefix('*') {
            Some(rest) => {
                let alias = rest.trim().strip_prefix("as").map(|alias| alias.trim().to_string());
                deps.push(Dependency::new("*", src).with_alias(alias));
            }
            None => deps.push(Dependency::new(part, src)),
        }
    }
    for item in braces.into_iter().flat_map(|inner| inner.split(',')) {
        let item = item.trim();
        let item = item.strip_prefix("type ").unwrap_or(item).trim();
        if item.is_empty() {
            continue;
        }
        let (name, alias) = split_alias(item, alias_sep);
        deps.push(Dependency::new(name, src).with_alias(alias.map(str::to_string)));
    }
    deps
}

fn go_import(text: &str) -> Option<Vec<Dependency>> {
    let rest = text.strip_prefix("import")?;
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '`') {
        return None;
    }
    let deps: Vec<Dependency> = GO_IMPORT_SPEC
        .captures_iter(rest)
        .filter_map(|caps| {
            let path = caps.name("path").or_else(|| caps.name("raw"))?.as_str();
            let alias = caps.name("alias").map(|m| m.as_str().to_string());
            Some(Dependency::new(last_segment(path, "/"), path).with_alias(alias))
        })
        .collect();
    Some(deps)
}

fn rust_use(text: &str) -> Option<Vec<Dependency>> {
    if let Some(caps) = RUST_EXTERN_CRATE.captures(text) {
        let name = caps.name("name")?.as_str();
        let alias = caps.name("alias").map(|m| m.as_str().to_string());
        return Some(vec![Dependency::new(name, name).with_alias(alias)]);
    }
    let caps = RUST_USE.captures(text)?;
    let mut deps = Vec::new();
    expand_use_tree("", caps.name("tree")?.as_str(), &mut deps);
    Some(deps)
}

fn expand_use_tree(prefix: &str, tree: &str, out: &mut Vec<Dependency>) {
    let tree = tree.trim().trim_start_matches("::");
    if tree.is_empty() {
        return;
    }
    if let Some(open) = tree.find('{') {
        let base = tree[..open].trim().trim_end_matches("::");
        let close = tree.rfind('}').unwrap_or(tree.len());
        let inner = tree.get(open + 1..close).unwrap_or("");
        let prefix = join_path(prefix, base);
        for range in split_top_level(inner, b',') {
            expand_use_tree(&prefix, &inner[range], out);
        }
        return;
    }
    let (path, alias) = split_alias(tree, " as ");
    let alias = alias.map(str::to_string);
    if path == "self" {
        if !prefix.is_empty() {
            out.push(Dependency::new(last_segment(prefix, "::"), prefix).with_alias(alias));
        }
        return;
    }
    let full = join_path(prefix, path);
    out.push(Dependency::new(last_segment(&full, "::"), full.as_str()).with_alias(alias));
}

fn join_path(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{prefix}::{path}"),
    }
}

fn split_alias<'a>(item: &'a str, sep: &str) -> (&'a str, Option<&'a str>) {
    match item.split_once(sep) {
        Some((name, alias)) => (name.trim(), Some(alias.trim()).filter(|a| !a.is_empty())),
        None => (item.trim(), None),
    }
}

fn last_segment<'a>(path: &'a str, sep: &str) -> &'a str {
    path.rsplit(sep).next().unwrap_or(path)
}
