use crate::model::{Language, NormalizedRecord};
use anyhow::Result;
use std::path::Path;
use thiserror::Error;

pub trait LanguageExtractor {
    fn language(&self) -> Language;

    /// Builds the record for one file. `path` only contributes the record name.
    fn extract(&mut self, source: &str, path: &Path) -> Result<NormalizedRecord>;
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no language profile for {0}")]
    UnsupportedLanguage(String),
    #[error("{language} parser returned no syntax tree")]
    Parse { language: Language },
}
