use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Component, Path};

/// Reads a source file, refusing files above `max_bytes` and content that is
/// not valid UTF-8.
pub fn read_source(path: &Path, max_bytes: u64) -> Result<String> {
    let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.len() > max_bytes {
        bail!(
            "{} is {} bytes, above the {} byte limit",
            path.display(),
            meta.len(),
            max_bytes
        );
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("decode {} as UTF-8", path.display()))
}

pub fn normalize_rel_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).with_context(|| {
        format!("strip prefix {} from {}", root.display(), path.display())
    })?;
    Ok(normalize_path(rel))
}

pub fn normalize_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for comp in path.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_string_lossy().to_string()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            _ => {}
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    Ok(())
}

/// Record name for a file: the file name up to its first `.`, falling back
/// to the path stem and then to `module`.
pub fn record_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    if let Some(head) = file_name.split('.').next().filter(|head| !head.is_empty()) {
        return head.to_string();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "module".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_name_stops_at_first_dot() {
        assert_eq!(record_name(Path::new("src/Widget.cs")), "Widget");
        assert_eq!(record_name(Path::new("app/user.service.spec.ts")), "user");
        assert_eq!(record_name(Path::new(".eslintrc.js")), ".eslintrc");
        assert_eq!(record_name(Path::new("")), "module");
    }

    #[test]
    fn normalize_path_uses_forward_slashes() {
        assert_eq!(normalize_path(Path::new("./a/b/../c.rs")), "a/b/../c.rs");
        assert_eq!(normalize_path(Path::new(".")), ".");
    }
}
