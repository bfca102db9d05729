// ABOUTME: CLI deciding whether a deployed site matches its build output.
// ABOUTME: Canonicalizes both sides into scratch trees and diffs them with the external diff tool.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use sitecmp_canon::{CanonOptions, Canonicalizer, CleaningConfig};
use url::Url;

mod pages;
mod report;

/// Compare a built site against its deployed counterpart.
#[derive(Parser, Debug)]
#[command(name = "sitecmp")]
#[command(about = "Compare build output against a live site, ignoring surface noise")]
struct Args {
    /// Directory holding the built site (defines the page set)
    #[arg(long = "build-dir")]
    build_dir: PathBuf,

    /// Base URL of the deployed site
    #[arg(long = "base-url")]
    base_url: String,

    /// Cleaning configuration JSON file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Reorder head children into canonical category order
    #[arg(long = "reorder-head")]
    reorder_head: bool,

    /// Recover from malformed markup via a tolerant reparse
    #[arg(long = "recover")]
    recover: bool,

    /// Scratch directory for the canonicalized trees (recreated per run)
    #[arg(long = "scratch", default_value = ".sitecmp")]
    scratch: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Print a JSON summary to stdout instead of the diff
    #[arg(long = "json")]
    json: bool,

    /// Suppress diff output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Write an HTML report of the diff to this file
    #[arg(long = "report")]
    report: Option<PathBuf>,

    /// Verbose logging to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

struct Outcome {
    pages: usize,
    missing: usize,
    differs: bool,
    diff: String,
}

fn load_config(path: Option<&Path>) -> Result<CleaningConfig> {
    let Some(path) = path else {
        return Ok(CleaningConfig::default());
    };
    let file = fs::File::open(path).with_context(|| format!("opening config {:?}", path))?;
    CleaningConfig::from_reader(io::BufReader::new(file))
        .with_context(|| format!("parsing config {:?}", path))
}

/// Write canonical text into a scratch tree, creating parent directories.
fn write_page(side_dir: &Path, identifier: &str, canonical: &str) -> Result<()> {
    let path = side_dir.join(identifier);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    fs::write(&path, format!("{}\n", canonical)).with_context(|| format!("writing {:?}", path))
}

fn run(args: &Args) -> Result<Outcome> {
    let config = load_config(args.config.as_deref())?;
    let options = CanonOptions::new()
        .with_reorder_head(args.reorder_head)
        .with_recover(args.recover)
        .with_config(config);
    let canonicalizer = Canonicalizer::new(options);

    let base = Url::parse(&args.base_url)
        .with_context(|| format!("parsing base URL {:?}", args.base_url))?;
    let fetcher = pages::Fetcher::new(Duration::from_secs(args.timeout))?;

    let identifiers = pages::collect(&args.build_dir)?;
    if identifiers.is_empty() {
        bail!("no .html/.htm pages under {:?}", args.build_dir);
    }
    tracing::debug!("comparing {} pages against {}", identifiers.len(), base);

    // Fresh scratch trees each run; stale files would corrupt the diff.
    if args.scratch.exists() {
        fs::remove_dir_all(&args.scratch)
            .with_context(|| format!("clearing scratch {:?}", args.scratch))?;
    }
    let local_dir = args.scratch.join("local");
    let live_dir = args.scratch.join("live");
    fs::create_dir_all(&local_dir)?;
    fs::create_dir_all(&live_dir)?;

    let mut missing = 0usize;
    for identifier in &identifiers {
        let raw = fs::read_to_string(args.build_dir.join(identifier))
            .with_context(|| format!("reading built page {}", identifier))?;
        let canonical = canonicalizer
            .canonicalize(&raw)
            .with_context(|| format!("canonicalizing built page {}", identifier))?;
        write_page(&local_dir, identifier, &canonical)?;

        let url = pages::page_url(&base, identifier)?;
        match fetcher.fetch(&url)? {
            Some(body) => {
                let canonical = canonicalizer
                    .canonicalize(&body)
                    .with_context(|| format!("canonicalizing live page {}", identifier))?;
                write_page(&live_dir, identifier, &canonical)?;
            }
            None => missing += 1,
        }
    }

    let output = Command::new("diff")
        .args(["-u", "-r", "local", "live"])
        .current_dir(&args.scratch)
        .output()
        .context("running diff (is it installed?)")?;
    let differs = match output.status.code() {
        Some(0) => false,
        Some(1) => true,
        _ => bail!(
            "diff failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ),
    };

    Ok(Outcome {
        pages: identifiers.len(),
        missing,
        differs,
        diff: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if args.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let outcome = match run(&args) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    if let Some(path) = &args.report {
        if let Err(e) = fs::write(path, report::render(&outcome.diff)) {
            eprintln!("error: writing report {:?}: {}", path, e);
            return ExitCode::from(2);
        }
    }

    if args.json {
        let summary = json!({
            "pages": outcome.pages,
            "missing": outcome.missing,
            "differs": outcome.differs,
        });
        println!("{}", summary);
    } else if !args.quiet && !outcome.diff.is_empty() {
        print!("{}", outcome.diff);
    }

    eprintln!(
        "{} pages, {} missing on live side, {}",
        outcome.pages,
        outcome.missing,
        if outcome.differs {
            "differences found"
        } else {
            "no differences"
        }
    );

    if outcome.differs {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
