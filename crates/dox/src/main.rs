//! dox - document text extraction CLI
//!
//! Usage:
//!   dox extract <path>        Extract text from a file
//!   dox classify <path>       Report whether a PDF is text-based or scanned
//!   dox msg <path>            Print mail-message metadata as JSON
//!
//! OCR credentials come from the environment: `DOX_OCR_ENDPOINT` and
//! `DOX_OCR_KEY`. They are only exercised when a scanned PDF actually
//! reaches the OCR service.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dox_core::{
    extract_file, extract_msg_metadata, is_text_based, OcrConfig, PollPolicy, ReadOcrClient,
};

#[derive(Parser)]
#[command(name = "dox", version, about = "Document text extraction")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Seconds between OCR status polls
    #[arg(long, global = true, default_value_t = 1)]
    poll_interval: u64,

    /// Give up on an OCR job after this many polls (default: wait forever)
    #[arg(long, global = true)]
    max_polls: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text from a file (txt, csv, xlsx, html, docx, pdf)
    Extract {
        /// File to extract
        path: PathBuf,
    },
    /// Report whether a PDF is text-based or scanned
    Classify {
        /// PDF file to classify
        path: PathBuf,
    },
    /// Print metadata from an Outlook .msg file as JSON
    Msg {
        /// Message file to read
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let policy = PollPolicy {
        interval: Duration::from_secs(cli.poll_interval),
        max_attempts: cli.max_polls,
    };

    // Constructed once at startup, read-only thereafter. Credentials are
    // not validated here; a bad key surfaces at the first submission.
    let ocr = ReadOcrClient::new(&OcrConfig::from_env());

    match cli.command {
        Command::Extract { path } => {
            let text = extract_file(&path, &ocr, &policy)
                .with_context(|| format!("Failed to extract {}", path.display()))?;
            print!("{text}");
        }
        Command::Classify { path } => {
            let text_based = is_text_based(&path)
                .with_context(|| format!("Failed to classify {}", path.display()))?;
            if text_based {
                println!("{}", "text-based".green());
            } else {
                println!("{}", "scanned".yellow());
            }
        }
        Command::Msg { path } => {
            let metadata = extract_msg_metadata(&path)
                .with_context(|| format!("Failed to read message {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
    }

    Ok(())
}
