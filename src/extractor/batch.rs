use crate::extractor::Extractor;
use crate::extractor::scan::{self, ScanOptions, ScannedFile};
use crate::model::{Language, RunStats};
use crate::render;
use crate::util;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Settings for one extraction run over a source tree.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scan: ScanOptions,
    pub languages: Option<Vec<Language>>,
    /// Files above this size are skipped.
    pub max_file_bytes: u64,
    /// Extension of the written documents, without the dot.
    pub output_ext: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            languages: None,
            max_file_bytes: 4 * 1024 * 1024,
            output_ext: "yaml".to_string(),
        }
    }
}

/// Walks a source root and writes one document per supported file under a
/// mirrored destination root. A file that fails is skipped; the run goes on.
pub struct Runner {
    source_root: PathBuf,
    dest_root: PathBuf,
    options: RunOptions,
    extractor: Extractor,
}

impl Runner {
    pub fn new(source_root: PathBuf, dest_root: PathBuf, options: RunOptions) -> Result<Self> {
        Ok(Self {
            source_root,
            dest_root,
            options,
            extractor: Extractor::new()?,
        })
    }

    pub fn run(&mut self) -> Result<RunStats> {
        let started = Instant::now();
        let scanned = scan::scan_tree(
            &self.source_root,
            self.options.scan,
            self.options.languages.as_deref(),
        )?;
        let mut stats = RunStats {
            files: scanned.len(),
            ..RunStats::default()
        };
        let mut written: HashMap<PathBuf, String> = HashMap::new();

        for file in &scanned {
            let dest = self.dest_path(&file.rel_path);
            if let Some(previous) = written.get(&dest) {
                tracing::warn!(
                    path = %file.rel_path,
                    previous = %previous,
                    dest = %dest.display(),
                    "output path collision, later file wins"
                );
            }
            match self.process(file, &dest) {
                Ok(()) => {
                    stats.processed += 1;
                    written.insert(dest, file.rel_path.clone());
                }
                Err(err) => {
                    stats.skipped += 1;
                    tracing::warn!(path = %file.rel_path, error = %format!("{err:#}"), "skipped");
                }
            }
        }

        stats.duration_ms = started.elapsed().as_millis();
        tracing::info!(
            files = stats.files,
            processed = stats.processed,
            skipped = stats.skipped,
            duration_ms = stats.duration_ms as u64,
            "extraction finished"
        );
        Ok(stats)
    }

    fn process(&mut self, file: &ScannedFile, dest: &Path) -> Result<()> {
        let source = util::read_source(&file.abs_path, self.options.max_file_bytes)?;
        let record = self
            .extractor
            .extract_as(file.language, &source, &file.abs_path)?;
        let document = render::render(&record)?;
        util::ensure_parent_dir(dest)?;
        fs::write(dest, document).with_context(|| format!("write {}", dest.display()))
    }

    /// `<dest>/<dir>/<stem>.<ext>` for a root-relative source path.
    pub fn dest_path(&self, rel_path: &str) -> PathBuf {
        mirrored_path(&self.dest_root, rel_path, &self.options.output_ext)
    }
}

pub fn mirrored_path(dest_root: &Path, rel_path: &str, ext: &str) -> PathBuf {
    let rel = Path::new(rel_path);
    let mut dest = dest_root.to_path_buf();
    if let Some(parent) = rel.parent() {
        dest.push(parent);
    }
    let stem = rel
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.push(format!("{stem}.{ext}"));
    dest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_directories_and_swaps_extension() {
        let root = Path::new("/out");
        assert_eq!(
            mirrored_path(root, "src/app/user.service.ts", "yaml"),
            PathBuf::from("/out/src/app/user.service.yaml")
        );
        assert_eq!(
            mirrored_path(root, "main.go", "yml"),
            PathBuf::from("/out/main.yml")
        );
    }
}
