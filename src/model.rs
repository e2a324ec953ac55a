use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    CSharp,
    Java,
    Php,
    JavaScript,
    TypeScript,
    Go,
    Rust,
    Erlang,
    Python,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::CSharp,
        Language::Java,
        Language::Php,
        Language::JavaScript,
        Language::TypeScript,
        Language::Go,
        Language::Rust,
        Language::Erlang,
        Language::Python,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Php => "php",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Erlang => "erlang",
            Language::Python => "python",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural summary of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub language: Language,
    pub name: String,
    pub module_context: String,
    pub module_comment: Option<String>,
    pub dependencies: Vec<Dependency>,
    pub declarations: Vec<TypeDeclaration>,
    pub top_level_callables: Vec<Callable>,
}

impl NormalizedRecord {
    pub fn new(language: Language, name: impl Into<String>) -> Self {
        Self {
            language,
            name: name.into(),
            module_context: String::new(),
            module_comment: None,
            dependencies: Vec::new(),
            declarations: Vec::new(),
            top_level_callables: Vec::new(),
        }
    }

    pub fn declaration(&self, name: &str) -> Option<&TypeDeclaration> {
        self.declarations.iter().find(|decl| decl.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub imported_name: String,
    pub source_path: String,
    pub alias: Option<String>,
}

impl Dependency {
    pub fn new(imported_name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            imported_name: imported_name.into(),
            source_path: source_path.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias.filter(|value| !value.is_empty());
        self
    }

    /// Name the dependency is known by inside the file.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.imported_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Struct,
    Interface,
    Trait,
    Record,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Interface => "interface",
            DeclKind::Trait => "trait",
            DeclKind::Record => "record",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: DeclKind,
    pub comment: Option<String>,
    pub modifiers: Vec<String>,
    pub base_types: Vec<String>,
    pub implemented_capabilities: Vec<String>,
    pub fields: Vec<Field>,
    pub callables: Vec<Callable>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            comment: None,
            modifiers: Vec::new(),
            base_types: Vec::new(),
            implemented_capabilities: Vec::new(),
            fields: Vec::new(),
            callables: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn callable(&self, name: &str) -> Option<&Callable> {
        self.callables.iter().find(|callable| callable.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Internal,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub declared_type: Option<String>,
    pub visibility: Visibility,
    pub comment: Option<String>,
    pub is_static: Option<bool>,
}

impl Field {
    pub fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            visibility,
            comment: None,
            is_static: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callable {
    pub name: String,
    pub comment: Option<String>,
    pub visibility: Option<Visibility>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub receiver: Option<String>,
}

impl Callable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            visibility: None,
            parameters: Vec::new(),
            return_type: None,
            receiver: None,
        }
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub declared_type: Option<String>,
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default_value: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files: usize,
    pub processed: usize,
    pub skipped: usize,
    pub duration_ms: u128,
}
