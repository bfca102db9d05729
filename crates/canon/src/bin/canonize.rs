// ABOUTME: CLI binary canonicalizing a single HTML document.
// ABOUTME: Reads from a file or stdin, applies a cleaning configuration, prints canonical text.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sitecmp_canon::{canonicalize, CanonOptions, CleaningConfig};

#[derive(Parser, Debug)]
#[command(name = "canonize")]
#[command(about = "Canonicalize one HTML document for line-based comparison")]
struct Args {
    /// HTML file to canonicalize (default: stdin)
    #[arg()]
    file: Option<PathBuf>,

    /// Cleaning configuration JSON file; "-" reads it from stdin
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Reorder head children into canonical category order
    #[arg(long = "reorder-head")]
    reorder_head: bool,

    /// Recover from malformed markup via a tolerant reparse
    #[arg(long = "recover")]
    recover: bool,

    /// Verbose logging to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<CleaningConfig> {
    let Some(path) = &args.config else {
        return Ok(CleaningConfig::default());
    };
    if path.as_os_str() == "-" {
        return CleaningConfig::from_reader(io::stdin().lock())
            .context("reading configuration from stdin");
    }
    let file = fs::File::open(path).with_context(|| format!("opening config {:?}", path))?;
    CleaningConfig::from_reader(io::BufReader::new(file))
        .with_context(|| format!("parsing config {:?}", path))
}

fn load_html(args: &Args) -> Result<String> {
    match &args.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
        }
        None => {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("reading document from stdin")?;
            Ok(html)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let options = CanonOptions::new()
        .with_reorder_head(args.reorder_head)
        .with_recover(args.recover)
        .with_config(config);

    let html = load_html(args)?;
    let canonical = canonicalize(&html, &options)?;

    match &args.output {
        Some(path) => fs::write(path, canonical + "\n")
            .with_context(|| format!("writing to {:?}", path))?,
        None => println!("{}", canonical),
    }
    Ok(())
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

    // The document and the configuration cannot both come from stdin.
    let config_from_stdin = args
        .config
        .as_ref()
        .is_some_and(|p| p.as_os_str() == "-");
    if config_from_stdin && args.file.is_none() {
        eprintln!("error: --config - requires the document to come from a file");
        return ExitCode::from(2);
    }
    if args.file.is_none() && io::stdin().is_terminal() {
        eprintln!("error: no input file and stdin is a terminal");
        return ExitCode::from(2);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
