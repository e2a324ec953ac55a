//! Static keyword and token tables, one per language.

use crate::extractor::lexer::{AttributeStyle, CommentKind, LexSyntax};
use crate::extractor::signature::ParamSyntax;
use crate::model::{DeclKind, Language, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportGrammar {
    CSharpUsing,
    JavaImport,
    PhpUse,
    EsModule,
    GoImport,
    RustUse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderGrammar {
    /// `modifiers keyword Name<..> tail`
    Keyword,
    /// `type Name struct`
    GoTypeSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRule {
    Keywords {
        member_default: Visibility,
        interface_default: Visibility,
    },
    Capitalized,
    RustPub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceRule {
    /// `: Base, IFoo` (C#)
    ColonList,
    ExtendsImplements,
    /// `: A + B` (Rust)
    Supertraits,
    /// Embedded fields, collected from the body (Go).
    Embedded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberGrammar {
    TypeFirst,
    Php,
    Script,
    Go,
    Rust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionGrammar {
    None,
    /// `function name(..)` plus JavaScript/TypeScript arrow constants.
    Keyword,
    Go,
    Rust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleDoc {
    None,
    /// Leading `//!` or `/*! */` comments.
    InnerDoc,
    /// Comment bound to the `package` clause.
    PackageClause,
}

#[derive(Debug)]
pub struct Profile {
    pub language: Language,
    pub extensions: &'static [&'static str],
    /// Output key holding the module context.
    pub module_key: &'static str,
    pub module_pattern: Option<&'static str>,
    pub module_doc: ModuleDoc,
    pub syntax: LexSyntax,
    pub attributes: AttributeStyle,
    pub doc_comments: &'static [CommentKind],
    pub imports: ImportGrammar,
    pub headers: HeaderGrammar,
    pub decl_keywords: &'static [(&'static str, DeclKind)],
    pub modifiers: &'static [&'static str],
    /// Member heads containing one of these words are not fields or callables.
    pub ignored_keywords: &'static [&'static str],
    pub visibility: VisibilityRule,
    pub inheritance: InheritanceRule,
    pub members: MemberGrammar,
    pub params: ParamSyntax,
    pub functions: FunctionGrammar,
    pub namespace_blocks: &'static [&'static str],
    /// Modifiers marking a field static; empty when the language has none.
    pub static_keywords: &'static [&'static str],
}

impl Profile {
    pub fn decl_kind(&self, word: &str) -> Option<DeclKind> {
        self.decl_keywords
            .iter()
            .find(|(keyword, _)| *keyword == word)
            .map(|(_, kind)| *kind)
    }

    pub fn is_modifier(&self, word: &str) -> bool {
        self.modifiers.contains(&word)
            || (self.visibility == VisibilityRule::RustPub && word.starts_with("pub"))
    }

    pub fn tracks_static(&self) -> bool {
        !self.static_keywords.is_empty()
    }
}

const JS_DOCS: &[CommentKind] = &[CommentKind::DocBlock];

pub static CSHARP: Profile = Profile {
    language: Language::CSharp,
    extensions: &["cs"],
    module_key: "namespace",
    module_pattern: Some(r"(?m)^\s*namespace\s+([\w.]+)"),
    module_doc: ModuleDoc::None,
    syntax: LexSyntax {
        triple_quotes: true,
        verbatim_strings: true,
        ..LexSyntax::C_FAMILY
    },
    attributes: AttributeStyle::Bracket,
    doc_comments: &[CommentKind::DocLine, CommentKind::DocBlock],
    imports: ImportGrammar::CSharpUsing,
    headers: HeaderGrammar::Keyword,
    decl_keywords: &[
        ("class", DeclKind::Class),
        ("struct", DeclKind::Struct),
        ("interface", DeclKind::Interface),
        ("record", DeclKind::Record),
    ],
    modifiers: &[
        "public", "private", "protected", "internal", "static", "abstract", "sealed", "partial",
        "readonly", "unsafe", "new", "file", "ref", "virtual", "override", "async", "extern",
        "const", "volatile", "required", "event", "delegate", "implicit", "explicit",
    ],
    ignored_keywords: &["enum", "operator"],
    visibility: VisibilityRule::Keywords {
        member_default: Visibility::Private,
        interface_default: Visibility::Public,
    },
    inheritance: InheritanceRule::ColonList,
    members: MemberGrammar::TypeFirst,
    params: ParamSyntax::TypeThenName,
    functions: FunctionGrammar::None,
    namespace_blocks: &["namespace"],
    static_keywords: &["static", "const"],
};

pub static JAVA: Profile = Profile {
    language: Language::Java,
    extensions: &["java"],
    module_key: "package",
    module_pattern: Some(r"(?m)^\s*package\s+([\w.]+)\s*;"),
    module_doc: ModuleDoc::None,
    syntax: LexSyntax {
        triple_quotes: true,
        ..LexSyntax::C_FAMILY
    },
    attributes: AttributeStyle::At,
    doc_comments: &[CommentKind::DocBlock],
    imports: ImportGrammar::JavaImport,
    headers: HeaderGrammar::Keyword,
    decl_keywords: &[
        ("class", DeclKind::Class),
        ("interface", DeclKind::Interface),
        ("record", DeclKind::Record),
    ],
    modifiers: &[
        "public", "private", "protected", "static", "final", "abstract", "sealed", "non-sealed",
        "strictfp", "synchronized", "native", "transient", "volatile", "default",
    ],
    ignored_keywords: &["enum"],
    visibility: VisibilityRule::Keywords {
        member_default: Visibility::Internal,
        interface_default: Visibility::Public,
    },
    inheritance: InheritanceRule::ExtendsImplements,
    members: MemberGrammar::TypeFirst,
    params: ParamSyntax::TypeThenName,
    functions: FunctionGrammar::None,
    namespace_blocks: &[],
    static_keywords: &["static"],
};

pub static PHP: Profile = Profile {
    language: Language::Php,
    extensions: &["php"],
    module_key: "namespace",
    module_pattern: Some(r"(?m)^\s*namespace\s+([\w\\]+)"),
    module_doc: ModuleDoc::None,
    syntax: LexSyntax {
        line_comments: &["//", "#"],
        hash_attributes: true,
        php_tags: true,
        ..LexSyntax::C_FAMILY
    },
    attributes: AttributeStyle::Hash,
    doc_comments: JS_DOCS,
    imports: ImportGrammar::PhpUse,
    headers: HeaderGrammar::Keyword,
    decl_keywords: &[
        ("class", DeclKind::Class),
        ("interface", DeclKind::Interface),
        ("trait", DeclKind::Trait),
    ],
    modifiers: &[
        "public", "private", "protected", "static", "abstract", "final", "readonly", "var",
    ],
    ignored_keywords: &["enum", "case"],
    visibility: VisibilityRule::Keywords {
        member_default: Visibility::Public,
        interface_default: Visibility::Public,
    },
    inheritance: InheritanceRule::ExtendsImplements,
    members: MemberGrammar::Php,
    params: ParamSyntax::Sigil,
    functions: FunctionGrammar::Keyword,
    namespace_blocks: &["namespace"],
    static_keywords: &["static"],
};

const SCRIPT_SYNTAX: LexSyntax = LexSyntax {
    quotes: b"\"'`",
    newline_terminates: true,
    ..LexSyntax::C_FAMILY
};

pub static JAVASCRIPT: Profile = Profile {
    language: Language::JavaScript,
    extensions: &["js", "jsx", "mjs", "cjs"],
    module_key: "module",
    module_pattern: None,
    module_doc: ModuleDoc::None,
    syntax: SCRIPT_SYNTAX,
    attributes: AttributeStyle::At,
    doc_comments: JS_DOCS,
    imports: ImportGrammar::EsModule,
    headers: HeaderGrammar::Keyword,
    decl_keywords: &[("class", DeclKind::Class)],
    modifiers: &["export", "default", "static", "async", "get", "set"],
    ignored_keywords: &[],
    visibility: VisibilityRule::Keywords {
        member_default: Visibility::Public,
        interface_default: Visibility::Public,
    },
    inheritance: InheritanceRule::ExtendsImplements,
    members: MemberGrammar::Script,
    params: ParamSyntax::Bare,
    functions: FunctionGrammar::Keyword,
    namespace_blocks: &[],
    static_keywords: &["static"],
};

pub static TYPESCRIPT: Profile = Profile {
    language: Language::TypeScript,
    extensions: &["ts", "tsx", "mts", "cts"],
    module_key: "namespace",
    module_pattern: Some(r"(?m)^\s*(?:export\s+)?(?:declare\s+)?(?:namespace|module)\s+([\w.]+)"),
    module_doc: ModuleDoc::None,
    syntax: SCRIPT_SYNTAX,
    attributes: AttributeStyle::At,
    doc_comments: JS_DOCS,
    imports: ImportGrammar::EsModule,
    headers: HeaderGrammar::Keyword,
    decl_keywords: &[("class", DeclKind::Class), ("interface", DeclKind::Interface)],
    modifiers: &[
        "export", "default", "declare", "abstract", "public", "private", "protected", "static",
        "readonly", "async", "override", "accessor", "get", "set",
    ],
    ignored_keywords: &[],
    visibility: VisibilityRule::Keywords {
        member_default: Visibility::Public,
        interface_default: Visibility::Public,
    },
    inheritance: InheritanceRule::ExtendsImplements,
    members: MemberGrammar::Script,
    params: ParamSyntax::NameColonType,
    functions: FunctionGrammar::Keyword,
    namespace_blocks: &["namespace", "module"],
    static_keywords: &["static"],
};

pub static GO: Profile = Profile {
    language: Language::Go,
    extensions: &["go"],
    module_key: "package",
    module_pattern: Some(r"(?m)^\s*package\s+(\w+)"),
    module_doc: ModuleDoc::PackageClause,
    syntax: LexSyntax {
        quotes: b"\"'",
        raw_quotes: b"`",
        newline_terminates: true,
        ..LexSyntax::C_FAMILY
    },
    attributes: AttributeStyle::None,
    doc_comments: &[
        CommentKind::Line,
        CommentKind::DocLine,
        CommentKind::Block,
        CommentKind::DocBlock,
    ],
    imports: ImportGrammar::GoImport,
    headers: HeaderGrammar::GoTypeSpec,
    decl_keywords: &[("struct", DeclKind::Struct), ("interface", DeclKind::Interface)],
    modifiers: &[],
    ignored_keywords: &[],
    visibility: VisibilityRule::Capitalized,
    inheritance: InheritanceRule::Embedded,
    members: MemberGrammar::Go,
    params: ParamSyntax::NameThenType,
    functions: FunctionGrammar::Go,
    namespace_blocks: &[],
    static_keywords: &[],
};

pub static RUST: Profile = Profile {
    language: Language::Rust,
    extensions: &["rs"],
    module_key: "module",
    module_pattern: None,
    module_doc: ModuleDoc::InnerDoc,
    syntax: LexSyntax {
        nested_block_comments: true,
        quotes: b"\"",
        rust_literals: true,
        ..LexSyntax::C_FAMILY
    },
    attributes: AttributeStyle::Hash,
    doc_comments: &[CommentKind::DocLine, CommentKind::DocBlock],
    imports: ImportGrammar::RustUse,
    headers: HeaderGrammar::Keyword,
    decl_keywords: &[("struct", DeclKind::Struct), ("trait", DeclKind::Trait)],
    modifiers: &["unsafe", "async", "const", "extern", "default", "auto"],
    ignored_keywords: &["type", "macro_rules!"],
    visibility: VisibilityRule::RustPub,
    inheritance: InheritanceRule::Supertraits,
    members: MemberGrammar::Rust,
    params: ParamSyntax::NameColonType,
    functions: FunctionGrammar::Rust,
    namespace_blocks: &["mod"],
    static_keywords: &[],
};

/// Profiles driven by the generic brace engine.
pub static BRACE_PROFILES: [&Profile; 7] = [
    &CSHARP,
    &JAVA,
    &PHP,
    &JAVASCRIPT,
    &TYPESCRIPT,
    &GO,
    &RUST,
];

pub const ERLANG_EXTENSIONS: &[&str] = &["erl", "hrl"];
pub const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];

pub fn extensions(language: Language) -> &'static [&'static str] {
    match language {
        Language::Erlang => ERLANG_EXTENSIONS,
        Language::Python => PYTHON_EXTENSIONS,
        other => brace_profile(other).map(|profile| profile.extensions).unwrap_or(&[]),
    }
}

/// Output key holding the module context for `language`.
pub fn module_key(language: Language) -> &'static str {
    match language {
        Language::Erlang | Language::Python => "module",
        other => brace_profile(other)
            .map(|profile| profile.module_key)
            .unwrap_or("module"),
    }
}

pub fn brace_profile(language: Language) -> Option<&'static Profile> {
    BRACE_PROFILES
        .iter()
        .copied()
        .find(|profile| profile.language == language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_extensions() {
        for language in Language::ALL {
            assert!(!extensions(language).is_empty(), "{language}");
        }
    }

    #[test]
    fn extensions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for language in Language::ALL {
            for ext in extensions(language) {
                assert!(seen.insert(*ext), "duplicate extension {ext}");
            }
        }
    }

    #[test]
    fn module_keys() {
        assert_eq!(module_key(Language::CSharp), "namespace");
        assert_eq!(module_key(Language::Java), "package");
        assert_eq!(module_key(Language::Go), "package");
        assert_eq!(module_key(Language::Erlang), "module");
    }

    #[test]
    fn rust_visibility_words_are_modifiers() {
        assert!(RUST.is_modifier("pub"));
        assert!(RUST.is_modifier("pub(crate)"));
        assert!(!RUST.is_modifier("struct"));
    }
}
