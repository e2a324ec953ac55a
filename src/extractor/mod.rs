use crate::extractor::extract::{ExtractError, LanguageExtractor};
use crate::model::{Language, NormalizedRecord};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

pub mod batch;
pub mod brace;
pub mod comments;
pub mod erlang;
pub mod extract;
pub mod headers;
pub mod imports;
pub mod lexer;
pub mod members;
pub mod profile;
pub mod python;
pub mod scan;
pub mod signature;

/// One extractor per language, reused across files.
pub struct Extractor {
    extractors: HashMap<Language, Box<dyn LanguageExtractor>>,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        let mut all: Vec<Box<dyn LanguageExtractor>> = Vec::new();
        for profile in profile::BRACE_PROFILES {
            all.push(Box::new(brace::BraceExtractor::new(profile)?));
        }
        all.push(Box::new(erlang::ErlangExtractor::new()));
        all.push(Box::new(python::PythonExtractor::new()?));
        let extractors = all
            .into_iter()
            .map(|extractor| (extractor.language(), extractor))
            .collect();
        Ok(Self { extractors })
    }

    /// Extracts `content`, choosing the language from the extension of `path`.
    pub fn extract(&mut self, content: &str, path: &Path) -> Result<NormalizedRecord> {
        let language = scan::language_for_path(path)
            .ok_or_else(|| ExtractError::UnsupportedLanguage(path.display().to_string()))?;
        self.extract_as(language, content, path)
    }

    pub fn extract_as(
        &mut self,
        language: Language,
        content: &str,
        path: &Path,
    ) -> Result<NormalizedRecord> {
        let extractor = self
            .extractors
            .get_mut(&language)
            .ok_or_else(|| ExtractError::UnsupportedLanguage(language.to_string()))?;
        tracing::debug!(path = %path.display(), %language, "extract");
        extractor.extract(content, path)
    }
}

/// Extracts a single file with a fresh [`Extractor`].
pub fn extract(content: &str, path: &Path) -> Result<NormalizedRecord> {
    Extractor::new()?.extract(content, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_matching_extractor() {
        let extractor = Extractor::new().unwrap();
        assert_eq!(extractor.extractors.len(), Language::ALL.len());
        for language in Language::ALL {
            let registered = extractor.extractors.get(&language).unwrap();
            assert_eq!(registered.language(), language);
        }
    }

    #[test]
    fn extract_as_ignores_the_path_extension() {
        let mut extractor = Extractor::new().unwrap();
        let record = extractor
            .extract_as(Language::Go, "package util\n\nfunc Run() {}\n", Path::new("util.txt"))
            .unwrap();
        assert_eq!(record.language, Language::Go);
        assert_eq!(record.module_context, "util");
        assert_eq!(record.top_level_callables[0].name, "Run");
    }
}
