use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use shapedoc::config::Config;
use shapedoc::extractor::batch::{RunOptions, Runner};
use shapedoc::extractor::{Extractor, profile, scan};
use shapedoc::model::Language;
use shapedoc::{cli, render, util};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("SHAPEDOC_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = cli::Args::parse();
    let config = Config::get();

    match args.command {
        cli::Command::Extract {
            source,
            dest,
            languages,
            no_ignore,
        } => {
            let source_root = source
                .or_else(|| config.source_root.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let dest_root = dest
                .or_else(|| config.dest_root.clone())
                .context("no destination root: pass --dest or set SHAPEDOC_DEST_ROOT")?;
            let languages = if languages.is_empty() {
                None
            } else {
                scan::normalize_language_filter(Some(languages.as_slice()))?
            };
            let options = RunOptions {
                scan: scan::ScanOptions::new(no_ignore),
                languages,
                max_file_bytes: config.max_file_bytes,
                output_ext: config.output_ext.clone(),
            };
            let mut runner = Runner::new(source_root, dest_root, options)?;
            let stats = runner.run()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        cli::Command::Show { path, format } => {
            let content = util::read_source(&path, config.max_file_bytes)?;
            let mut extractor = Extractor::new()?;
            let record = extractor.extract(&content, &path)?;
            let document = match format {
                cli::OutputFormat::Yaml => render::render(&record)?,
                cli::OutputFormat::Json => render::render_json(&record)?,
            };
            print!("{document}");
            if !document.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        cli::Command::Languages => {
            let languages: Vec<_> = Language::ALL
                .into_iter()
                .map(|language| {
                    let aliases: Vec<&str> = scan::language_filters()
                        .iter()
                        .filter(|filter| filter.languages.contains(&language))
                        .map(|filter| filter.name)
                        .collect();
                    json!({
                        "language": language.name(),
                        "extensions": profile::extensions(language),
                        "module_key": profile::module_key(language),
                        "filters": aliases,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&languages)?);
            Ok(())
        }
    }
}
