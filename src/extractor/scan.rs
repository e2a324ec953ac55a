use crate::extractor::profile;
use crate::model::Language;
use anyhow::{Result, bail};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct LanguageFilter {
    pub name: &'static str,
    pub languages: &'static [Language],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub no_ignore: bool,
}

impl ScanOptions {
    pub fn new(no_ignore: bool) -> Self {
        Self { no_ignore }
    }
}

static LANGUAGE_FILTERS: &[LanguageFilter] = &[
    LanguageFilter {
        name: "csharp",
        languages: &[Language::CSharp],
    },
    LanguageFilter {
        name: "c#",
        languages: &[Language::CSharp],
    },
    LanguageFilter {
        name: "cs",
        languages: &[Language::CSharp],
    },
    LanguageFilter {
        name: "java",
        languages: &[Language::Java],
    },
    LanguageFilter {
        name: "php",
        languages: &[Language::Php],
    },
    LanguageFilter {
        name: "laravel",
        languages: &[Language::Php],
    },
    LanguageFilter {
        name: "javascript",
        languages: &[Language::JavaScript],
    },
    LanguageFilter {
        name: "js",
        languages: &[Language::JavaScript],
    },
    LanguageFilter {
        name: "typescript",
        languages: &[Language::TypeScript],
    },
    LanguageFilter {
        name: "ts",
        languages: &[Language::TypeScript],
    },
    LanguageFilter {
        name: "go",
        languages: &[Language::Go],
    },
    LanguageFilter {
        name: "golang",
        languages: &[Language::Go],
    },
    LanguageFilter {
        name: "rust",
        languages: &[Language::Rust],
    },
    LanguageFilter {
        name: "rs",
        languages: &[Language::Rust],
    },
    LanguageFilter {
        name: "erlang",
        languages: &[Language::Erlang],
    },
    LanguageFilter {
        name: "erl",
        languages: &[Language::Erlang],
    },
    LanguageFilter {
        name: "python",
        languages: &[Language::Python],
    },
    LanguageFilter {
        name: "py",
        languages: &[Language::Python],
    },
];

pub fn language_filters() -> &'static [LanguageFilter] {
    LANGUAGE_FILTERS
}

/// Supported files under `root`, sorted by relative path.
pub fn scan_tree(
    root: &Path,
    options: ScanOptions,
    languages: Option<&[Language]>,
) -> Result<Vec<ScannedFile>> {
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let walker = builder
        .hidden(false)
        .filter_entry(|entry| !is_ignored_entry(entry))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "walk error");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let Some(language) = language_for_path(path) else {
            continue;
        };
        if languages.is_some_and(|allowed| !allowed.contains(&language)) {
            continue;
        }
        let rel_path = crate::util::normalize_rel_path(root, path)?;
        files.push(ScannedFile {
            rel_path,
            abs_path: path.to_path_buf(),
            language,
        });
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

fn is_ignored_entry(entry: &ignore::DirEntry) -> bool {
    entry.file_name() == OsStr::new(".git")
}

pub fn language_for_path(path: &Path) -> Option<Language> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    Language::ALL
        .into_iter()
        .find(|language| profile::extensions(*language).contains(&ext))
}

pub fn normalize_language_filter(raw: Option<&[String]>) -> Result<Option<Vec<Language>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let mut expanded = Vec::new();
    for lang in raw {
        let key = lang.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        let values = match expand_language(&key) {
            Some(value) => value,
            None => bail!("unknown language filter: {lang}"),
        };
        expanded.extend(values.iter().copied());
    }
    if expanded.is_empty() {
        return Ok(None);
    }
    expanded.sort_unstable();
    expanded.dedup();
    Ok(Some(expanded))
}

fn expand_language(name: &str) -> Option<&'static [Language]> {
    LANGUAGE_FILTERS
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.languages)
}
