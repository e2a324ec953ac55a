use pretty_assertions::assert_eq;
use shapedoc::extractor::brace::BraceExtractor;
use shapedoc::extractor::extract::LanguageExtractor;
use shapedoc::extractor::profile::RUST;
use shapedoc::model::{DeclKind, Visibility};
use std::path::Path;

const SETTINGS: &str = r#"//! Configuration loading.
//! Second line.

use std::collections::HashMap;
use serde::{Deserialize, Serialize as Ser};
use crate::error::Result;

/// Runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Listen address.
    pub addr: String,
    pub(crate) limits: HashMap<String, u32>,
    retries: u8,
}

/// Loads settings.
pub trait Loader: Send + Sync + 'static {
    fn load(&self, path: &Path) -> Result<Settings>;
    fn name(&self) -> &str { "loader" }
}

impl Settings {
    /// Builds defaults.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), limits: HashMap::new(), retries: 3 }
    }

    pub(crate) async fn refresh(&mut self, force: bool) -> Result<()> {
        Ok(())
    }

    fn retries(&self) -> u8 { self.retries }
}

impl Loader for Settings {
    fn load(&self, path: &Path) -> Result<Settings> {
        todo!()
    }
}

enum Mode { Fast, Slow }

pub fn parse<T: FromStr>(input: &str, fallback: Option<T>) -> Option<T>
where
    T: Clone,
{
    None
}

mod inner {
    pub struct Unit;
}
"#;

#[test]
fn extract_settings_module() {
    let mut extractor = BraceExtractor::new(&RUST).unwrap();
    let record = extractor.extract(SETTINGS, Path::new("src/settings.rs")).unwrap();

    assert_eq!(record.name, "settings");
    assert_eq!(record.module_context, "");
    assert_eq!(
        record.module_comment.as_deref(),
        Some("Configuration loading.\nSecond line.")
    );

    let deps: Vec<_> = record
        .dependencies
        .iter()
        .map(|dep| (dep.display_name(), dep.source_path.as_str()))
        .collect();
    assert_eq!(
        deps,
        vec![
            ("HashMap", "std::collections::HashMap"),
            ("Deserialize", "serde::Deserialize"),
            ("Ser", "serde::Serialize"),
            ("Result", "crate::error::Result"),
        ]
    );

    let names: Vec<_> = record.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Settings", "Loader", "Unit"]);

    let settings = record.declaration("Settings").unwrap();
    assert_eq!(settings.kind, DeclKind::Struct);
    assert_eq!(settings.comment.as_deref(), Some("Runtime settings."));
    assert_eq!(settings.modifiers, vec!["pub"]);
    let fields: Vec<_> = settings
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.declared_type.as_deref(), f.visibility))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("addr", Some("String"), Visibility::Public),
            ("limits", Some("HashMap<String, u32>"), Visibility::Internal),
            ("retries", Some("u8"), Visibility::Private),
        ]
    );
    assert_eq!(settings.fields[0].comment.as_deref(), Some("Listen address."));
    assert_eq!(settings.fields[0].is_static, None);
    assert_eq!(settings.implemented_capabilities, vec!["Loader"]);

    let methods: Vec<_> = settings
        .callables
        .iter()
        .map(|c| (c.name.as_str(), c.visibility, c.return_type.as_deref()))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("new", Some(Visibility::Public), Some("Self")),
            ("refresh", Some(Visibility::Internal), Some("Result<()>")),
            ("retries", Some(Visibility::Private), Some("u8")),
            ("load", Some(Visibility::Public), Some("Result<Settings>")),
        ]
    );
    let new = settings.callable("new").unwrap();
    assert_eq!(new.comment.as_deref(), Some("Builds defaults."));
    assert_eq!(new.receiver.as_deref(), Some("Settings"));
    assert_eq!(new.parameters[0].declared_type.as_deref(), Some("impl Into<String>"));
    assert_eq!(settings.callable("refresh").unwrap().parameter_names(), vec!["force"]);
    assert!(settings.callable("retries").unwrap().parameters.is_empty());

    let loader = record.declaration("Loader").unwrap();
    assert_eq!(loader.kind, DeclKind::Trait);
    assert_eq!(loader.comment.as_deref(), Some("Loads settings."));
    assert_eq!(loader.base_types, vec!["Send", "Sync"]);
    let trait_methods: Vec<_> = loader
        .callables
        .iter()
        .map(|c| (c.name.as_str(), c.visibility, c.return_type.as_deref()))
        .collect();
    assert_eq!(
        trait_methods,
        vec![
            ("load", Some(Visibility::Public), Some("Result<Settings>")),
            ("name", Some(Visibility::Public), Some("&str")),
        ]
    );
    assert_eq!(loader.callables[0].parameter_names(), vec!["path"]);

    assert_eq!(record.top_level_callables.len(), 1);
    let parse = &record.top_level_callables[0];
    assert_eq!(parse.name, "parse");
    assert_eq!(parse.return_type.as_deref(), Some("Option<T>"));
    let params: Vec<_> = parse
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.declared_type.as_deref()))
        .collect();
    assert_eq!(
        params,
        vec![("input", Some("&str")), ("fallback", Some("Option<T>"))]
    );
}

#[test]
fn generic_impls_and_unit_returns() {
    let source = "pub struct Stack<T> { items: Vec<T> }\n\
                  impl<T: Clone> Stack<T> where T: Default {\n\
                      pub fn push(&mut self, item: T) { self.items.push(item) }\n\
                  }\n";
    let mut extractor = BraceExtractor::new(&RUST).unwrap();
    let record = extractor.extract(source, Path::new("stack.rs")).unwrap();
    assert_eq!(record.module_comment, None);
    let stack = record.declaration("Stack").unwrap();
    assert_eq!(stack.fields[0].declared_type.as_deref(), Some("Vec<T>"));
    let push = stack.callable("push").unwrap();
    assert_eq!(push.return_type, None);
    assert_eq!(push.parameter_names(), vec!["item"]);
    assert_eq!(push.receiver.as_deref(), Some("Stack"));
}
