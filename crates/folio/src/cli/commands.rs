//! # CLI Layer
//!
//! The CLI is a host for the library's headless page. It is the **only**
//! place that:
//! - Knows about terminal I/O (stdout, stderr, prompts)
//! - Reads files from disk for upload
//! - Installs the tracing subscriber
//! - Turns errors into exit codes
//!
//! Every command initializes the context, runs one load (as a page would on
//! startup), performs its actions through the `Portfolio` facade and prints
//! what the page ended up showing.

use super::print::{
    print_alerts, print_carousel, print_document, print_messages, print_rows, print_sections,
    SectionLine,
};
use super::setup::{Cli, Commands};
use super::sniff::detect_media_type;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use console::Term;
use folioapp::api::Portfolio;
use folioapp::commands::upload::IncomingFile;
use folioapp::commands::CmdMessage;
use folioapp::init::initialize;
use folioapp::model::{MediaKind, RecordId, SectionKey};
use folioapp::store::fs::FileStore;
use folioapp::surface::{HeadlessPage, Surface};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

type CliPortfolio = Portfolio<FileStore, HeadlessPage>;

const LOG_ENV_VAR: &str = "FOLIO_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = initialize(cli.data_dir.clone()).context("failed to initialize folio")?;
    debug!(data_dir = %ctx.data_dir.display(), "using data directory");

    let portfolio = &mut ctx.portfolio;
    portfolio.load_data().context("failed to load portfolio")?;

    match cli.command.unwrap_or(Commands::List { section: None }) {
        Commands::List { section } => handle_list(portfolio, section),
        Commands::Sections => handle_sections(portfolio),
        Commands::Upload {
            section,
            images,
            files,
        } => handle_upload(portfolio, section, images, files),
        Commands::Delete { id, yes } => handle_delete(portfolio, RecordId(id), yes),
        Commands::View {
            section,
            index,
            output,
        } => handle_view(portfolio, section, index, output),
        Commands::Carousel {
            section,
            index,
            frames,
            next,
            prev,
            hover,
        } => handle_carousel(portfolio, section, index, frames, next, prev, hover),
    }
}

/// `FOLIO_LOG` takes an env-filter directive; `-v` forces debug.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second init (tests) is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_list(portfolio: &mut CliPortfolio, section: Option<SectionKey>) -> Result<()> {
    let result = portfolio.list(section)?;
    print_rows(&result.listed);
    print_messages(&result.messages);
    Ok(())
}

fn handle_sections(portfolio: &mut CliPortfolio) -> Result<()> {
    let lines: Vec<SectionLine> = SectionKey::all()
        .map(|section| SectionLine {
            section,
            documents: portfolio.state().documents(section).len(),
            images: portfolio.state().images(section).len(),
            static_images: portfolio.surface().static_image_sources(section).len(),
        })
        .collect();
    print_sections(&lines);
    Ok(())
}

fn read_incoming(path: &Path) -> Result<IncomingFile> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = detect_media_type(&name, &bytes);
    debug!(%name, %media_type, size = bytes.len(), "file read");
    Ok(IncomingFile::new(name, media_type, bytes))
}

fn handle_upload(
    portfolio: &mut CliPortfolio,
    section: SectionKey,
    images: bool,
    files: Vec<PathBuf>,
) -> Result<()> {
    let kind = if images {
        MediaKind::Image
    } else {
        MediaKind::Pdf
    };
    let mut incoming = Vec::with_capacity(files.len());
    let mut unreadable = Vec::new();
    for path in &files {
        match read_incoming(path) {
            Ok(file) => incoming.push(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                unreadable.push(CmdMessage::error(format!("{:#}", e)));
            }
        }
    }

    let result = portfolio.upload(section, kind, incoming)?;
    // Alerts repeat the warning and error messages printed below.
    portfolio.surface_mut().take_alerts();
    print_messages(&unreadable);
    print_messages(&result.messages);
    if result.affected.is_empty() {
        println!("Nothing uploaded.");
    }
    Ok(())
}

fn confirm_on_terminal(question: &str) -> Result<bool> {
    let term = Term::stderr();
    if !term.is_term() {
        return Ok(false);
    }
    term.write_str(&format!("{} [y/N] ", question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn handle_delete(portfolio: &mut CliPortfolio, id: RecordId, yes: bool) -> Result<()> {
    let record = portfolio.record(id)?;
    let question = format!("Delete {} {} ({})?", record.kind, id, record.name);
    let answer = yes || confirm_on_terminal(&question)?;
    portfolio.surface_mut().confirm_answer = answer;

    match portfolio.delete(record.kind, id) {
        Ok(Some(result)) => {
            print_messages(&result.messages);
            Ok(())
        }
        Ok(None) => {
            println!("Aborted.");
            Ok(())
        }
        Err(e) => {
            let alerts = portfolio.surface_mut().take_alerts();
            print_alerts(&alerts);
            Err(e.into())
        }
    }
}

fn handle_view(
    portfolio: &mut CliPortfolio,
    section: SectionKey,
    position: usize,
    output: Option<PathBuf>,
) -> Result<()> {
    let index = position - 1;
    let name = portfolio
        .state()
        .documents(section)
        .get(index)
        .map(|entry| entry.name.clone())
        .ok_or_else(|| anyhow!("section {} has no document {}", section, position))?;

    portfolio.open_document(section, index)?;
    let url = portfolio.surface().document.frame_src.clone();
    let resolved = portfolio
        .resolve(&url)
        .ok_or_else(|| anyhow!("document {} is not available", url))?;

    print_document(&name, &url, resolved.bytes.len());
    if let Some(path) = output {
        fs::write(&path, &resolved.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved to {}", path.display());
    }

    portfolio.close_document();
    Ok(())
}

fn handle_carousel(
    portfolio: &mut CliPortfolio,
    section: SectionKey,
    position: usize,
    frames: usize,
    next: usize,
    prev: usize,
    hover: bool,
) -> Result<()> {
    if !portfolio.open_carousel(section, position - 1) {
        println!("No images in section {}.", section);
        return Ok(());
    }

    let count = portfolio.carousel().geometry().count;
    if position > count {
        portfolio.close_carousel();
        bail!("section {} has {} images, no image {}", section, count, position);
    }

    portfolio.set_hover(hover);
    for _ in 0..next {
        portfolio.carousel_next();
    }
    for _ in 0..prev {
        portfolio.carousel_prev();
    }
    for _ in 0..frames {
        portfolio.tick();
    }

    print_carousel(&portfolio.surface().carousel, portfolio.carousel());
    portfolio.close_carousel();
    Ok(())
}
