//! Normalized record to ordered YAML document.

use anyhow::{Context, Result};
use serde_yaml_ng::{Mapping, Value};

use crate::extractor::comments::line_prefixed;
use crate::extractor::profile;
use crate::model::{Callable, Dependency, Field, NormalizedRecord, Parameter, TypeDeclaration};

/// Builds the output mapping with its fixed key order.
pub fn build(record: &NormalizedRecord) -> Mapping {
    let mut doc = Mapping::new();
    insert(&mut doc, "name", string(&record.name));
    insert(
        &mut doc,
        profile::module_key(record.language),
        string(&record.module_context),
    );
    insert(&mut doc, "module_comment", comment(record.module_comment.as_deref()));
    insert(
        &mut doc,
        "dependencies",
        list(record.dependencies.iter().map(dependency)),
    );
    insert(
        &mut doc,
        "declarations",
        list(record.declarations.iter().map(declaration)),
    );
    insert(
        &mut doc,
        "functions",
        list(record.top_level_callables.iter().map(callable)),
    );
    doc
}

pub fn render(record: &NormalizedRecord) -> Result<String> {
    serde_yaml_ng::to_string(&Value::Mapping(build(record)))
        .with_context(|| format!("render {}", record.name))
}

pub fn render_json(record: &NormalizedRecord) -> Result<String> {
    serde_json::to_string_pretty(&build(record)).with_context(|| format!("render {}", record.name))
}

fn dependency(dep: &Dependency) -> Value {
    let mut map = Mapping::new();
    insert(&mut map, "name", string(dep.display_name()));
    insert(&mut map, "source", string(&dep.source_path));
    Value::Mapping(map)
}

fn declaration(decl: &TypeDeclaration) -> Value {
    let mut map = Mapping::new();
    insert(&mut map, "name", string(&decl.name));
    insert(&mut map, "kind", string(decl.kind.as_str()));
    insert(&mut map, "comment", comment(decl.comment.as_deref()));
    insert(&mut map, "modifiers", strings(&decl.modifiers));
    insert(&mut map, "base_types", strings(&decl.base_types));
    insert(&mut map, "implements", strings(&decl.implemented_capabilities));
    insert(&mut map, "fields", list(decl.fields.iter().map(field)));
    insert(&mut map, "methods", list(decl.callables.iter().map(callable)));
    Value::Mapping(map)
}

fn field(field: &Field) -> Value {
    let mut map = Mapping::new();
    insert(&mut map, "name", string(&field.name));
    insert(&mut map, "type", optional(field.declared_type.as_deref()));
    insert(&mut map, "visibility", string(field.visibility.as_str()));
    insert(
        &mut map,
        "static",
        field.is_static.map(Value::Bool).unwrap_or(Value::Null),
    );
    insert(&mut map, "comment", comment(field.comment.as_deref()));
    Value::Mapping(map)
}

fn callable(callable: &Callable) -> Value {
    let mut map = Mapping::new();
    insert(&mut map, "name", string(&callable.name));
    insert(
        &mut map,
        "visibility",
        optional(callable.visibility.map(|vis| vis.as_str())),
    );
    insert(&mut map, "receiver", optional(callable.receiver.as_deref()));
    insert(
        &mut map,
        "parameters",
        list(callable.parameters.iter().map(parameter)),
    );
    insert(&mut map, "return_type", optional(callable.return_type.as_deref()));
    insert(&mut map, "comment", comment(callable.comment.as_deref()));
    Value::Mapping(map)
}

fn parameter(param: &Parameter) -> Value {
    let mut map = Mapping::new();
    insert(&mut map, "name", string(&param.name));
    insert(&mut map, "type", optional(param.declared_type.as_deref()));
    insert(&mut map, "default", optional(param.default_value.as_deref()));
    Value::Mapping(map)
}

fn insert(map: &mut Mapping, key: &str, value: Value) {
    map.insert(string(key), value);
}

fn string(value: &str) -> Value {
    Value::String(value.to_string())
}

fn optional(value: Option<&str>) -> Value {
    value.map(string).unwrap_or(Value::Null)
}

fn comment(value: Option<&str>) -> Value {
    value
        .map(|text| Value::String(line_prefixed(text)))
        .unwrap_or(Value::Null)
}

fn strings(values: &[String]) -> Value {
    list(values.iter().map(|value| string(value)))
}

fn list(values: impl Iterator<Item = Value>) -> Value {
    Value::Sequence(values.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclKind, Language, Visibility};
    use pretty_assertions::assert_eq;

    fn keys(map: &Mapping) -> Vec<&str> {
        map.keys().filter_map(Value::as_str).collect()
    }

    #[test]
    fn document_keys_follow_profile_labels() {
        let record = NormalizedRecord::new(Language::Java, "Empty");
        let doc = build(&record);
        assert_eq!(
            keys(&doc),
            vec!["name", "package", "module_comment", "dependencies", "declarations", "functions"]
        );
        assert_eq!(doc.get("package"), Some(&Value::String(String::new())));
        assert_eq!(doc.get("module_comment"), Some(&Value::Null));
    }

    #[test]
    fn absent_values_render_as_null() {
        let mut record = NormalizedRecord::new(Language::Go, "server");
        let mut decl = TypeDeclaration::new("Server", DeclKind::Struct);
        decl.fields.push(Field::new("addr", Visibility::Private));
        record.declarations.push(decl);
        let yaml = render(&record).unwrap();
        assert!(yaml.contains("static: null"));
        assert!(yaml.contains("type: null"));
        assert!(yaml.contains("comment: null"));
    }

    #[test]
    fn comments_are_line_prefixed() {
        let mut record = NormalizedRecord::new(Language::Rust, "lib");
        record.module_comment = Some("First.\n\nSecond.".to_string());
        let doc = build(&record);
        assert_eq!(
            doc.get("module_comment"),
            Some(&Value::String("# First.\n#\n# Second.".to_string()))
        );
    }
}
