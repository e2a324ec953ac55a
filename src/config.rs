// Configuration module for shapedoc
// Reads from environment variables with sensible defaults

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to scan when `--source` is omitted (SHAPEDOC_SOURCE_ROOT)
    pub source_root: Option<PathBuf>,

    /// Directory to mirror output into when `--dest` is omitted (SHAPEDOC_DEST_ROOT)
    pub dest_root: Option<PathBuf>,

    /// Files above this size are skipped (SHAPEDOC_MAX_FILE_BYTES)
    pub max_file_bytes: u64,

    /// Extension of written documents (SHAPEDOC_OUTPUT_EXT)
    pub output_ext: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: None,
            dest_root: None,
            max_file_bytes: 4 * 1024 * 1024,
            output_ext: "yaml".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(val) = lookup("SHAPEDOC_SOURCE_ROOT").filter(|val| !val.trim().is_empty()) {
            config.source_root = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup("SHAPEDOC_DEST_ROOT").filter(|val| !val.trim().is_empty()) {
            config.dest_root = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup("SHAPEDOC_MAX_FILE_BYTES") {
            match val.trim().parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.max_file_bytes = parsed,
                _ => tracing::warn!(
                    value = %val,
                    default = config.max_file_bytes,
                    "invalid SHAPEDOC_MAX_FILE_BYTES, using default"
                ),
            }
        }

        if let Some(val) = lookup("SHAPEDOC_OUTPUT_EXT") {
            let ext = val.trim().trim_start_matches('.');
            if !ext.is_empty() && ext.chars().all(|ch| ch.is_ascii_alphanumeric()) {
                config.output_ext = ext.to_string();
            } else {
                tracing::warn!(
                    value = %val,
                    default = %config.output_ext,
                    "invalid SHAPEDOC_OUTPUT_EXT, using default"
                );
            }
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}
