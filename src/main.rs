use anyhow::Result;
use clap::Parser;
use speakup::audio::{CaptureBackendFactory, CaptureConfig, CaptureSource};
use speakup::{Config, ConsoleView, HttpUploadClient, RecorderController, StopOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/speakup";

/// Record audio, upload it, and show the answer
#[derive(Debug, Parser)]
#[command(name = "speakup", version)]
struct Args {
    /// Config file (defaults to config/speakup.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Replay a 16-bit WAV file instead of the microphone
    #[arg(short, long)]
    input: Option<String>,

    /// Upload this book before recording (enables the book gate)
    #[arg(short, long)]
    book: Option<PathBuf>,

    /// Override the upload service base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load(DEFAULT_CONFIG).unwrap_or_else(|e| {
            warn!("No usable config at {} ({}), using defaults", DEFAULT_CONFIG, e);
            Config::default()
        }),
    };

    if let Some(base_url) = &args.base_url {
        cfg.server.base_url = base_url.clone();
    }
    if args.book.is_some() {
        cfg.recorder.require_book = true;
    }

    Ok(cfg)
}

fn print_help() {
    println!("Commands:");
    println!("  record        start recording");
    println!("  stop          stop and upload");
    println!("  book <path>   select a book");
    println!("  submit        upload the selected book");
    println!("  status        show recorder state");
    println!("  quit          exit");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = load_config(&args)?;

    info!("speakup v{}", env!("CARGO_PKG_VERSION"));
    info!("Upload service: {}", cfg.server.base_url);

    let source = match &args.input {
        Some(path) => CaptureSource::File(path.clone()),
        None => CaptureSource::Microphone,
    };
    let capture_config = CaptureConfig {
        buffer_duration_ms: cfg.capture.buffer_duration_ms,
    };
    let backend = CaptureBackendFactory::create(source, capture_config)?;
    let uploader = Arc::new(HttpUploadClient::new(&cfg.server)?);
    let view = Arc::new(ConsoleView::new(cfg.server.base_url.clone()));

    let mut controller = RecorderController::new(&cfg, backend, uploader, view);

    if let Some(book) = &args.book {
        controller.select_book(book.clone())?;
        if let Err(e) = controller.submit_book().await {
            warn!("{}", e);
        }
    }

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            "record" | "r" => {
                if let Err(e) = controller.start().await {
                    warn!("{}", e);
                }
            }
            "stop" | "s" => {
                if let StopOutcome::Failed(reason) = controller.stop().await {
                    warn!("Upload failed: {}", reason);
                }
            }
            "book" | "b" => {
                if rest.trim().is_empty() {
                    println!("usage: book <path>");
                } else if let Err(e) = controller.select_book(rest.trim()) {
                    warn!("{}", e);
                }
            }
            "submit" | "u" => {
                if let Err(e) = controller.submit_book().await {
                    warn!("{}", e);
                }
            }
            "status" => {
                println!(
                    "state: {}, book uploaded: {}",
                    controller.state(),
                    controller.prerequisite_satisfied()
                );
            }
            "quit" | "q" | "exit" => break,
            _ => print_help(),
        }
    }

    if controller.is_recording() {
        info!("Input closed while recording, uploading what was captured");
        controller.stop().await;
    }

    Ok(())
}
