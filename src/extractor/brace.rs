//! Generic extractor for brace-delimited languages, driven by a [`Profile`].

use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::extractor::comments::{doc_comment_before, normalize};
use crate::extractor::extract::LanguageExtractor;
use crate::extractor::headers::{ImplHeader, TypeHeader, rust_impl, type_header};
use crate::extractor::imports::parse_import;
use crate::extractor::lexer::{
    AttributeStyle, Chunk, ChunkRules, CommentKind, Source, find_close, skip_attributes, skip_ws,
    split_chunks,
};
use crate::extractor::members::{Member, MemberScope, classify, free_function, visibility};
use crate::extractor::profile::{MemberGrammar, ModuleDoc, Profile};
use crate::extractor::signature::{parse_parameters_in, split_top_level, words};
use crate::model::{
    Callable, DeclKind, Dependency, Field, Language, NormalizedRecord, TypeDeclaration, Visibility,
};
use crate::util;

pub struct BraceExtractor {
    profile: &'static Profile,
    module_pattern: Option<Regex>,
}

impl BraceExtractor {
    pub fn new(profile: &'static Profile) -> Result<Self> {
        let module_pattern = profile
            .module_pattern
            .map(Regex::new)
            .transpose()
            .with_context(|| format!("compile {} module pattern", profile.language))?;
        Ok(Self {
            profile,
            module_pattern,
        })
    }

    fn module_context(&self, src: &Source<'_>) -> String {
        let Some(pattern) = &self.module_pattern else {
            return String::new();
        };
        pattern
            .captures(src.masked_str(0..src.len()))
            .and_then(|caps| caps.get(1))
            .map(|name| src.code_str(name.range()).to_string())
            .unwrap_or_default()
    }

    fn module_comment(&self, src: &Source<'_>) -> Option<String> {
        match self.profile.module_doc {
            ModuleDoc::None => None,
            ModuleDoc::InnerDoc => {
                let code_start = src.code_start();
                let raw: Vec<&str> = src
                    .comments()
                    .iter()
                    .take_while(|comment| comment.start < code_start)
                    .filter(|comment| comment.kind == CommentKind::InnerDoc)
                    .map(|comment| src.comment_text(comment))
                    .collect();
                (!raw.is_empty()).then(|| normalize(&raw.join("\n")))
            }
            ModuleDoc::PackageClause => {
                let clause = self
                    .module_pattern
                    .as_ref()?
                    .find(src.masked_str(0..src.len()))?;
                let pos = skip_ws(src.masked(), clause.start(), clause.end());
                doc_comment_before(src, pos, self.profile.doc_comments)
            }
        }
    }
}

impl LanguageExtractor for BraceExtractor {
    fn language(&self) -> Language {
        self.profile.language
    }

    fn extract(&mut self, source: &str, path: &Path) -> Result<NormalizedRecord> {
        let src = Source::lex(source, &self.profile.syntax);
        let mut record = NormalizedRecord::new(self.profile.language, util::record_name(path));
        record.module_context = self.module_context(&src);
        record.module_comment = self.module_comment(&src);
        let mut walker = Walker {
            profile: self.profile,
            src: &src,
            record_name: record.name.clone(),
            dependencies: Vec::new(),
            declarations: Vec::new(),
            pending: Vec::new(),
        };
        walker.walk_items(0..src.len());
        walker.finish(&mut record);
        Ok(record)
    }
}

/// Callables found outside any type body, resolved once the whole file is seen.
enum Pending {
    Free(Callable),
    Bound {
        type_name: String,
        callables: Vec<Callable>,
        capability: Option<String>,
    },
}

struct Walker<'s, 'a> {
    profile: &'static Profile,
    src: &'s Source<'a>,
    record_name: String,
    dependencies: Vec<Dependency>,
    declarations: Vec<TypeDeclaration>,
    pending: Vec<Pending>,
}

impl Walker<'_, '_> {
    fn statement_rules(&self) -> ChunkRules {
        ChunkRules {
            separator: b';',
            newline_terminates: self.profile.syntax.newline_terminates,
            angle_aware: false,
            attributes: self.profile.attributes,
        }
    }

    fn head(&self, chunk: &Chunk) -> Range<usize> {
        let start = skip_attributes(
            self.src.masked(),
            chunk.start,
            chunk.head_end,
            self.profile.attributes,
        );
        start..chunk.head_end
    }

    fn comment_at(&self, chunk: &Chunk, head: &Range<usize>) -> Option<String> {
        let kinds = self.profile.doc_comments;
        doc_comment_before(self.src, chunk.start, kinds)
            .or_else(|| doc_comment_before(self.src, head.start, kinds))
    }

    /// File-level and namespace-level items.
    fn walk_items(&mut self, range: Range<usize>) {
        for chunk in split_chunks(self.src, range, self.statement_rules()) {
            let head = self.head(&chunk);
            if head.is_empty() {
                continue;
            }
            let comment = self.comment_at(&chunk, &head);
            match chunk.body.clone() {
                None => {
                    let statement = self.src.code_str(head.clone());
                    if let Some(deps) = parse_import(self.profile.imports, statement) {
                        tracing::trace!(count = deps.len(), "dependencies");
                        self.dependencies.extend(deps);
                    } else if let Some(inner) = self.go_type_group(&head) {
                        self.walk_items(inner);
                    } else if let Some(header) = type_header(self.profile, self.src, head.clone()) {
                        self.declaration(header, None, comment);
                    } else {
                        self.function(head, comment);
                    }
                }
                Some(body) => {
                    if self.is_namespace_block(&head) {
                        self.walk_items(body);
                    } else if let Some(header) = type_header(self.profile, self.src, head.clone())
                    {
                        self.declaration(header, Some(body), comment);
                    } else if let Some(imp) = self.rust_impl(&head) {
                        self.impl_block(imp, body);
                    } else {
                        self.function(head, comment);
                    }
                }
            }
        }
    }

    /// `type ( A struct {..}; B interface {..} )`
    fn go_type_group(&self, head: &Range<usize>) -> Option<Range<usize>> {
        if self.profile.language != Language::Go {
            return None;
        }
        let masked = self.src.masked_str(head.clone());
        let rest = masked.strip_prefix("type")?.trim_start();
        if !rest.starts_with('(') {
            return None;
        }
        let open = head.start + masked.len() - rest.len();
        let close = find_close(self.src.masked(), open, head.end)?;
        Some(open + 1..close)
    }

    fn is_namespace_block(&self, head: &Range<usize>) -> bool {
        let masked = self.src.masked_str(head.clone());
        words(masked)
            .into_iter()
            .map(|range| &masked[range])
            .find(|word| !self.profile.is_modifier(word))
            .is_some_and(|word| self.profile.namespace_blocks.contains(&word))
    }

    fn rust_impl(&self, head: &Range<usize>) -> Option<ImplHeader> {
        if self.profile.members != MemberGrammar::Rust {
            return None;
        }
        rust_impl(self.src, head.clone())
    }

    fn function(&mut self, head: Range<usize>, comment: Option<String>) {
        let Some(function) = free_function(self.profile, self.src, head) else {
            return;
        };
        let mut callable = function.callable;
        callable.comment = comment;
        match function.receiver {
            Some(type_name) => self.pending.push(Pending::Bound {
                type_name,
                callables: vec![callable],
                capability: None,
            }),
            None => self.pending.push(Pending::Free(callable)),
        }
    }

    fn declaration(
        &mut self,
        header: TypeHeader,
        body: Option<Range<usize>>,
        comment: Option<String>,
    ) {
        let name = header.name.unwrap_or_else(|| self.record_name.clone());
        tracing::trace!(%name, kind = header.kind.as_str(), "declaration");
        let mut decl = TypeDeclaration::new(name, header.kind);
        decl.comment = comment;
        decl.modifiers = header.modifiers;
        decl.base_types = header.base_types;
        decl.implemented_capabilities = header.capabilities;
        if let Some(components) = header.components {
            decl.fields = self.components(components);
        }
        let idx = self.declarations.len();
        self.declarations.push(decl);
        if let Some(body) = body {
            self.members(idx, body, MemberScope::decl(header.kind));
        }
    }

    /// Positional fields: record components, or indexed tuple struct fields.
    fn components(&self, range: Range<usize>) -> Vec<Field> {
        let profile = self.profile;
        if profile.members != MemberGrammar::Rust {
            return parse_parameters_in(self.src, range, profile.params)
                .into_iter()
                .map(|param| {
                    let mut field = Field::new(param.name, Visibility::Public);
                    field.declared_type = param.declared_type;
                    field.is_static = profile.tracks_static().then_some(false);
                    field
                })
                .collect();
        }
        let masked = self.src.masked_str(range.clone());
        split_top_level(masked, b',')
            .into_iter()
            .filter(|segment| !masked[segment.clone()].trim().is_empty())
            .enumerate()
            .map(|(idx, segment)| {
                let segment = range.start + segment.start..range.start + segment.end;
                let start = skip_attributes(
                    self.src.masked(),
                    segment.start,
                    segment.end,
                    AttributeStyle::Hash,
                );
                let text = self.src.masked_str(start..segment.end);
                let tokens = words(text);
                let modifiers: Vec<&str> = tokens
                    .iter()
                    .map(|token| &text[token.clone()])
                    .take_while(|word| word.starts_with("pub"))
                    .collect();
                let type_start = tokens
                    .get(modifiers.len())
                    .map(|token| start + token.start)
                    .unwrap_or(segment.end);
                let scope = MemberScope::decl(DeclKind::Struct);
                let mut field =
                    Field::new(idx.to_string(), visibility(profile, &modifiers, "", scope));
                let declared = self.src.code_str(type_start..segment.end).trim();
                field.declared_type = (!declared.is_empty()).then(|| declared.to_string());
                field
            })
            .collect()
    }

    fn member_rules(&self, kind: DeclKind) -> ChunkRules {
        if self.profile.members == MemberGrammar::Rust && kind == DeclKind::Struct {
            ChunkRules {
                separator: b',',
                newline_terminates: false,
                angle_aware: true,
                attributes: AttributeStyle::Hash,
            }
        } else {
            self.statement_rules()
        }
    }

    fn members(&mut self, idx: usize, body: Range<usize>, scope: MemberScope) {
        let rules = self.member_rules(scope.kind.unwrap_or(DeclKind::Class));
        for chunk in split_chunks(self.src, body, rules) {
            let head = self.head(&chunk);
            if head.is_empty() {
                continue;
            }
            let comment = self.comment_at(&chunk, &head);
            if let Some(header) = type_header(self.profile, self.src, head.clone()) {
                self.declaration(header, chunk.body.clone(), comment);
                continue;
            }
            let member = classify(self.profile, self.src, head, scope);
            let decl = &mut self.declarations[idx];
            match member {
                Member::Fields(fields) => {
                    if chunk.body.is_some() && self.profile.members == MemberGrammar::Script {
                        continue;
                    }
                    decl.fields.extend(fields.into_iter().map(|mut field| {
                        field.comment = comment.clone();
                        field
                    }));
                }
                Member::Callable(mut callable, promoted) => {
                    callable.comment = comment;
                    decl.callables.push(callable);
                    decl.fields.extend(promoted);
                }
                Member::Capabilities(capabilities) => {
                    decl.implemented_capabilities.extend(capabilities);
                }
                Member::BaseTypes(base_types) => decl.base_types.extend(base_types),
                Member::Skip => {}
            }
        }
    }

    fn impl_block(&mut self, imp: ImplHeader, body: Range<usize>) {
        let scope = MemberScope::rust_impl(imp.trait_name.is_some());
        let mut callables = Vec::new();
        for chunk in split_chunks(self.src, body, self.statement_rules()) {
            let head = self.head(&chunk);
            if head.is_empty() {
                continue;
            }
            let comment = self.comment_at(&chunk, &head);
            if let Member::Callable(mut callable, _) = classify(self.profile, self.src, head, scope)
            {
                callable.comment = comment;
                callable.receiver = Some(imp.type_name.clone());
                callables.push(callable);
            }
        }
        self.pending.push(Pending::Bound {
            type_name: imp.type_name,
            callables,
            capability: imp.trait_name,
        });
    }

    fn finish(self, record: &mut NormalizedRecord) {
        record.dependencies = self.dependencies;
        record.declarations = self.declarations;
        for pending in self.pending {
            match pending {
                Pending::Free(callable) => record.top_level_callables.push(callable),
                Pending::Bound {
                    type_name,
                    callables,
                    capability,
                } => match record
                    .declarations
                    .iter_mut()
                    .find(|decl| decl.name == type_name)
                {
                    Some(decl) => {
                        if let Some(capability) = capability
                            && !decl.implemented_capabilities.contains(&capability)
                        {
                            decl.implemented_capabilities.push(capability);
                        }
                        decl.callables.extend(callables);
                    }
                    None => record.top_level_callables.extend(callables),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::profile::{CSHARP, GO, RUST};
    use pretty_assertions::assert_eq;

    fn run(profile: &'static Profile, path: &str, source: &str) -> NormalizedRecord {
        BraceExtractor::new(profile)
            .unwrap()
            .extract(source, Path::new(path))
            .unwrap()
    }

    #[test]
    fn nested_declarations_follow_container() {
        let record = run(
            &CSHARP,
            "Outer.cs",
            "namespace N { class Outer { class Inner { int x; } string name; } class After {} }",
        );
        let names: Vec<_> = record.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Inner", "After"]);
        assert_eq!(record.declarations[0].fields[0].name, "name");
        assert_eq!(record.declarations[1].fields[0].name, "x");
        assert_eq!(record.module_context, "N");
    }

    #[test]
    fn rust_impls_bind_to_declared_types() {
        let record = run(
            &RUST,
            "shape.rs",
            "//! Shapes.\n\
             pub struct Point(pub i32, i32);\n\
             impl Point { pub fn new(x: i32) -> Self { Point(x, 0) } }\n\
             impl Display for Point { fn fmt(&self, f: &mut Formatter) -> Result { Ok(()) } }\n\
             impl Other { fn orphan(&self) {} }\n",
        );
        assert_eq!(record.module_comment.as_deref(), Some("Shapes."));
        let point = record.declaration("Point").unwrap();
        assert_eq!(point.fields.len(), 2);
        assert_eq!(point.fields[0].name, "0");
        assert_eq!(point.fields[0].visibility, Visibility::Public);
        assert_eq!(point.fields[1].visibility, Visibility::Private);
        assert_eq!(point.implemented_capabilities, vec!["Display"]);
        let methods: Vec<_> = point.callables.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(methods, vec!["new", "fmt"]);
        assert_eq!(point.callables[1].visibility, Some(Visibility::Public));
        assert_eq!(record.top_level_callables.len(), 1);
        assert_eq!(record.top_level_callables[0].receiver.as_deref(), Some("Other"));
    }

    #[test]
    fn go_package_comment_and_grouped_types() {
        let record = run(
            &GO,
            "server.go",
            "// Package srv serves.\npackage srv\n\ntype (\n\tA struct {\n\t\tX int\n\t}\n\tB interface {\n\t\tRun() error\n\t}\n)\n",
        );
        assert_eq!(record.module_context, "srv");
        assert_eq!(record.module_comment.as_deref(), Some("Package srv serves."));
        let names: Vec<_> = record.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(record.declarations[1].callables[0].name, "Run");
    }
}
