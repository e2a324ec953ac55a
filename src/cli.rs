use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shapedoc",
    version,
    about = "Structural outline extractor",
    after_help = r#"Examples:
  shapedoc extract --source ./src --dest ./docs/shape
  shapedoc extract --source . --dest out --language rust,go
  shapedoc show src/Widget.cs
  shapedoc show app/models.py --format json
  shapedoc languages
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract every supported file under a source root into a mirrored destination root.
    Extract {
        /// Directory to scan (defaults to SHAPEDOC_SOURCE_ROOT, then ".").
        #[arg(long)]
        source: Option<PathBuf>,
        /// Directory to write documents into (defaults to SHAPEDOC_DEST_ROOT).
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Restrict extraction to specific languages.
        #[arg(long = "language", value_delimiter = ',')]
        languages: Vec<String>,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
    /// Print the document for a single file.
    Show {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
    /// List supported languages and their file extensions.
    Languages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}
