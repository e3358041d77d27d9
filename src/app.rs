// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod output;
pub mod pattern;
pub mod scanner;


use anyhow::{Context, Result};
use clap::Parser;

use self::cli::Cli;
use self::config::{default_search_dirs, load_config, locate_config, resolve, ConfigSource};
use self::error::{ExtractError, ScanIssue};
use self::formatter::OutputGenerator;
use self::models::{RenderRequest, RenderedDocument, ScanRequest};
use self::output::{resolve_output_path, write_to_file};
use self::scanner::{select, Scanner};

/// Result of one scan-select-render pass. Nothing has been written yet.
#[derive(Debug)]
pub struct Extraction {
    pub selected: Vec<String>,
    pub document: RenderedDocument,
    /// Soft failures from collection and rendering, in that order.
    pub issues: Vec<ScanIssue>,
}

/// Collects, narrows to `only` (globs), optionally sorts, and renders.
pub fn extract(request: ScanRequest, only: &[String], sort: bool, title: &str) -> Result<Extraction, ExtractError> {
    let base_directory = request.base_directory.clone();
    let collected = Scanner::new(request).scan();
    let all: Vec<String> = collected.paths.into_iter().collect();

    let mut selected = select(&all, only)?;
    if sort {
        selected.sort();
    }

    let document = OutputGenerator::render(&RenderRequest {
        base_directory,
        selected_paths: selected.clone(),
        title: title.to_string(),
    });

    let mut issues = collected.issues;
    issues.extend(document.issues.iter().cloned());

    Ok(Extraction {
        selected,
        document,
        issues,
    })
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else {
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet);

    // 2. Locate and resolve configuration
    let source = match &args.config_file {
        Some(path) => ConfigSource::File(path.clone()),
        None => locate_config(&args.config, &default_search_dirs())?,
    };
    let config = load_config(&source)?;
    log::info!("Using config: {}", source.describe());

    if !args.directory.is_dir() {
        return Err(ExtractError::BaseDirectory(args.directory.clone()).into());
    }
    log::info!("Scanning base directory: {}", args.directory.display());

    let request = resolve(&config, &args.directory);
    log::debug!(
        "{} sections from {}, {} directory rules",
        config.sections.len(),
        config.origin,
        request.rules.len()
    );
    if !request.global_excluded_dirs.is_empty() {
        log::info!("Global excluded directories: {:?}", request.global_excluded_dirs);
    }
    if !request.global_excluded_files.is_empty() {
        log::info!("Global excluded files: {:?}", request.global_excluded_files);
    }

    // 3. Scan, select and render
    let only = args.only.clone().unwrap_or_default();
    let extraction = extract(request, &only, args.sort, &args.title)?;

    for issue in &extraction.issues {
        log::warn!("{}", issue);
    }

    if extraction.selected.is_empty() {
        log::warn!("No matching files found.");
        return Ok(());
    }

    // 4. Write outputs
    let document = &extraction.document.content;
    if args.stdout {
        print!("{}", document);
    } else {
        let config_name = args
            .config_file
            .as_ref()
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().trim_end_matches("_extract").to_string())
            .unwrap_or_else(|| args.config.clone());
        let output_path = resolve_output_path(args.output.as_deref(), &config_name);
        write_to_file(&output_path, document)
            .with_context(|| format!("Failed to write document to {}", output_path.display()))?;
        println!("Successfully wrote content to {}", output_path.display());
        println!("Total size: {} characters", document.chars().count());
    }

    write_to_file(&args.list_file, &OutputGenerator::file_list(&extraction.selected))
        .context("Failed to write file list")?;
    log::info!(
        "Generated {} listing {} extracted files.",
        args.list_file.display(),
        extraction.selected.len()
    );

    Ok(())
}
