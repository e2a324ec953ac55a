use crate::extractor::comments::normalize_lines;
use crate::extractor::extract::{ExtractError, LanguageExtractor};
use crate::model::{
    Callable, DeclKind, Dependency, Field, Language, NormalizedRecord, Parameter, TypeDeclaration,
    Visibility,
};
use crate::util;
use anyhow::Result;
use std::path::Path;
use tree_sitter::{Node, Parser};

pub struct PythonExtractor {
    parser: Parser,
}

impl PythonExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser })
    }
}

impl LanguageExtractor for PythonExtractor {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extract(&mut self, source: &str, path: &Path) -> Result<NormalizedRecord> {
        let tree = self.parser.parse(source, None).ok_or(ExtractError::Parse {
            language: Language::Python,
        })?;
        let root = tree.root_node();
        let mut record = NormalizedRecord::new(Language::Python, util::record_name(path));
        record.module_comment = extract_docstring(root, source);
        collect_imports(root, source, &mut record.dependencies);
        collect_classes(root, source, &mut record.declarations);

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if let Some(function) = function_node(child) {
                record
                    .top_level_callables
                    .push(callable(function, source, false));
            }
        }
        Ok(record)
    }
}

/// Unwraps `decorated_definition`, returning the definition and its decorator names.
fn definition<'t>(node: Node<'t>, source: &str) -> (Node<'t>, Vec<String>) {
    if node.kind() != "decorated_definition" {
        return (node, Vec::new());
    }
    let mut decorators = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "decorator" {
            decorators.push(node_text(child, source).trim_start_matches('@').to_string());
        }
    }
    match node.child_by_field_name("definition") {
        Some(inner) => (inner, decorators),
        None => (node, decorators),
    }
}

fn function_node(node: Node<'_>) -> Option<Node<'_>> {
    let inner = if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition")?
    } else {
        node
    };
    matches!(
        inner.kind(),
        "function_definition" | "async_function_definition"
    )
    .then_some(inner)
}

fn collect_imports(node: Node<'_>, source: &str, out: &mut Vec<Dependency>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for name in node.children_by_field_name("name", &mut cursor) {
                let (path, alias) = aliased(name, source);
                out.push(Dependency::new(path.clone(), path).with_alias(alias));
            }
            return;
        }
        "import_from_statement" => {
            let module = node
                .child_by_field_name("module_name")
                .map(|module| node_text(module, source))
                .unwrap_or_default();
            let mut cursor = node.walk();
            let mut names: Vec<Node<'_>> =
                node.children_by_field_name("name", &mut cursor).collect();
            if names.is_empty() {
                let mut cursor = node.walk();
                names = node
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "wildcard_import")
                    .collect();
            }
            for name in names {
                let (imported, alias) = aliased(name, source);
                let source_path = if module.ends_with('.') {
                    format!("{module}{imported}")
                } else {
                    format!("{module}.{imported}")
                };
                out.push(Dependency::new(imported, source_path).with_alias(alias));
            }
            return;
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_imports(child, source, out);
    }
}

fn aliased(node: Node<'_>, source: &str) -> (String, Option<String>) {
    if node.kind() == "aliased_import" {
        let name = node
            .child_by_field_name("name")
            .map(|name| node_text(name, source))
            .unwrap_or_default();
        let alias = node
            .child_by_field_name("alias")
            .map(|alias| node_text(alias, source));
        return (name, alias);
    }
    (node_text(node, source), None)
}

/// Every class in the file, each followed by the classes nested inside it.
fn collect_classes(node: Node<'_>, source: &str, out: &mut Vec<TypeDeclaration>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let (inner, _) = definition(child, source);
        if inner.kind() == "class_definition" {
            if let Some(decl) = class_declaration(inner, source) {
                out.push(decl);
            }
        }
        collect_classes(inner, source, out);
    }
}

fn class_declaration(node: Node<'_>, source: &str) -> Option<TypeDeclaration> {
    let name = node_text(node.child_by_field_name("name")?, source);
    let mut decl = TypeDeclaration::new(name, DeclKind::Class);
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            if matches!(
                base.kind(),
                "keyword_argument" | "list_splat" | "dictionary_splat" | "comment"
            ) {
                continue;
            }
            let base = node_text(base, source);
            if !base.is_empty() {
                decl.base_types.push(base);
            }
        }
    }
    let Some(body) = node.child_by_field_name("body") else {
        return Some(decl);
    };
    decl.comment = extract_docstring(body, source);
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        let (inner, decorators) = definition(child, source);
        match inner.kind() {
            "function_definition" | "async_function_definition" => {
                let is_static = decorators.iter().any(|name| name == "staticmethod");
                let method = callable(inner, source, !is_static);
                if method.name == "__init__" {
                    if let Some(init_body) = inner.child_by_field_name("body") {
                        self_assignments(init_body, source, &mut decl.fields);
                    }
                }
                decl.callables.push(method);
            }
            "expression_statement" => {
                if let Some(field) = class_attribute(inner, source) {
                    push_field(&mut decl.fields, field);
                }
            }
            _ => {}
        }
    }
    Some(decl)
}

/// `name: T = value` or `name = value` at class level.
fn class_attribute(statement: Node<'_>, source: &str) -> Option<Field> {
    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    let name = node_text(left, source);
    let mut field = Field::new(name.as_str(), visibility(&name));
    field.declared_type = assignment
        .child_by_field_name("type")
        .map(|ty| node_text(ty, source));
    Some(field)
}

/// `self.x = ..` assignments in a constructor body, nested blocks included.
fn self_assignments(node: Node<'_>, source: &str, fields: &mut Vec<Field>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" | "async_function_definition" | "class_definition"
            | "decorated_definition" | "lambda" => continue,
            "assignment" => {
                if let Some(left) = child.child_by_field_name("left")
                    && left.kind() == "attribute"
                    && left
                        .child_by_field_name("object")
                        .is_some_and(|object| node_text(object, source) == "self")
                    && let Some(attribute) = left.child_by_field_name("attribute")
                {
                    let name = node_text(attribute, source);
                    let mut field = Field::new(name.as_str(), visibility(&name));
                    field.declared_type = child
                        .child_by_field_name("type")
                        .map(|ty| node_text(ty, source));
                    push_field(fields, field);
                }
            }
            _ => {}
        }
        self_assignments(child, source, fields);
    }
}

fn push_field(fields: &mut Vec<Field>, field: Field) {
    if !fields.iter().any(|existing| existing.name == field.name) {
        fields.push(field);
    }
}

fn callable(node: Node<'_>, source: &str, drop_receiver: bool) -> Callable {
    let name = node
        .child_by_field_name("name")
        .map(|name| node_text(name, source))
        .unwrap_or_default();
    let mut callable = Callable::new(name.as_str());
    callable.visibility = Some(visibility(&name));
    callable.comment = node
        .child_by_field_name("body")
        .and_then(|body| extract_docstring(body, source));
    callable.return_type = node
        .child_by_field_name("return_type")
        .map(|ret| node_text(ret, source));
    if let Some(params) = node.child_by_field_name("parameters") {
        callable.parameters = parameters(params, source);
    }
    if drop_receiver
        && callable
            .parameters
            .first()
            .is_some_and(|first| matches!(first.name.as_str(), "self" | "cls"))
    {
        callable.parameters.remove(0);
    }
    callable
}

fn parameters(node: Node<'_>, source: &str) -> Vec<Parameter> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let param = match child.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                Parameter::new(node_text(child, source))
            }
            "typed_parameter" => {
                let Some(name) = child.named_child(0) else {
                    continue;
                };
                let mut param = Parameter::new(node_text(name, source));
                param.declared_type = child
                    .child_by_field_name("type")
                    .map(|ty| node_text(ty, source));
                param
            }
            "default_parameter" | "typed_default_parameter" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                let mut param = Parameter::new(node_text(name, source));
                param.declared_type = child
                    .child_by_field_name("type")
                    .map(|ty| node_text(ty, source));
                param.default_value = child
                    .child_by_field_name("value")
                    .map(|value| node_text(value, source));
                param
            }
            _ => continue,
        };
        if !param.name.is_empty() {
            out.push(param);
        }
    }
    out
}

/// `__name` private, `_name` protected, dunder and plain names public.
fn visibility(name: &str) -> Visibility {
    if name.starts_with("__") && !name.ends_with("__") {
        Visibility::Private
    } else if name.starts_with('_') && !name.starts_with("__") {
        Visibility::Protected
    } else {
        Visibility::Public
    }
}

fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}

fn extract_docstring(node: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let mut children = node.named_children(&mut cursor);
    let first = children.find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string_node = first.named_child(0)?;
    if string_node.kind() != "string" {
        return None;
    }
    let raw = node_text(string_node, source);
    let text = unquote_string_literal(&raw).unwrap_or(raw);
    Some(normalize_lines(&text))
}

fn unquote_string_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut idx = 0;
    for (offset, ch) in trimmed.char_indices() {
        if ch.is_ascii_alphabetic() {
            idx = offset + ch.len_utf8();
        } else {
            break;
        }
    }
    let rest = &trimmed[idx..];
    for quote in ["'''", "\"\"\"", "\"", "'"] {
        if rest.len() >= 2 * quote.len() && rest.starts_with(quote) && rest.ends_with(quote) {
            return Some(rest[quote.len()..rest.len() - quote.len()].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquotes_prefixed_literals() {
        assert_eq!(unquote_string_literal(r#"r"""doc""""#).as_deref(), Some("doc"));
        assert_eq!(unquote_string_literal("'x'").as_deref(), Some("x"));
        assert_eq!(unquote_string_literal("x"), None);
    }

    #[test]
    fn underscore_visibility() {
        assert_eq!(visibility("__secret"), Visibility::Private);
        assert_eq!(visibility("_internal"), Visibility::Protected);
        assert_eq!(visibility("__init__"), Visibility::Public);
        assert_eq!(visibility("name"), Visibility::Public);
    }
}
