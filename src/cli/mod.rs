//! Command-line interface for voxnote.
//!
//! Provides commands for watching the recordings folder, running a single
//! scan pass, and inspecting the resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use crate::adapters::OpenAiClient;
use crate::config::Config;
use crate::ingest::{DirectoryWatcher, IngestionQueue, PipelineNotice};
use crate::pipeline::ProcessingPipeline;
use crate::storage::LocalStorage;

/// voxnote - Turn voice recordings into Markdown notes
#[derive(Parser, Debug)]
#[command(name = "voxnote")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the recordings folder and process files as they appear
    Watch {
        /// Config file path (defaults to ~/.voxnote/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Process everything currently in the recordings folder, then exit
    Scan {
        /// Config file path (defaults to ~/.voxnote/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config {
        /// Config file path (defaults to ~/.voxnote/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Watch { config } => watch(config.as_deref()).await,
            Commands::Scan { config } => scan(config.as_deref()).await,
            Commands::Config { config } => show_config(config.as_deref()).await,
        }
    }
}

/// Build the pipeline and queue from resolved configuration
fn build_queue(config: &Config) -> Result<(IngestionQueue, mpsc::UnboundedReceiver<PipelineNotice>)> {
    let client = Arc::new(OpenAiClient::new(config.api_key.clone())?);
    let storage = Arc::new(LocalStorage::new());

    let pipeline = ProcessingPipeline::new(client.clone(), client, storage, config);

    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    let queue = IngestionQueue::start(pipeline, notice_tx);

    Ok((queue, notice_rx))
}

fn print_notice(notice: &PipelineNotice) {
    match notice {
        PipelineNotice::Started { path } => {
            eprintln!("⏳ Processing {}", path.display());
        }
        PipelineNotice::Succeeded { path, note_path } => {
            eprintln!("✅ {} -> {}", path.display(), note_path.display());
        }
        PipelineNotice::Failed { path, reason } => {
            eprintln!("❌ {} failed: {}", path.display(), reason);
        }
    }
}

/// Watch the recordings folder until interrupted
async fn watch(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let watcher = DirectoryWatcher::new(&config);
    watcher
        .validate()
        .with_context(|| format!("Cannot watch {}", config.watch_dir.display()))?;

    let (queue, mut notices) = build_queue(&config)?;

    // Pick up anything already sitting in the folder before going live
    let queued = watcher.scan_once(&queue.handle()).await?;
    if queued > 0 {
        eprintln!("📂 Found {} pending recording(s)", queued);
    }

    let handle = watcher.watch(queue.handle())?;
    eprintln!("👀 Watching {} (Ctrl-C to stop)", config.watch_dir.display());

    loop {
        tokio::select! {
            notice = notices.recv() => {
                match notice {
                    Some(n) => print_notice(&n),
                    None => break,
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for shutdown signal")?;
                eprintln!("\nShutting down...");
                break;
            }
        }
    }

    handle.stop().await;
    queue.shutdown().await;

    Ok(())
}

/// One-shot scan: process the current folder contents and exit
async fn scan(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let watcher = DirectoryWatcher::new(&config);

    let (queue, mut notices) = build_queue(&config)?;

    let queued = watcher.scan_once(&queue.handle()).await?;
    if queued == 0 {
        eprintln!("Nothing to process in {}", config.watch_dir.display());
        queue.shutdown().await;
        return Ok(());
    }

    eprintln!("📂 Processing {} recording(s)...", queued);

    // Closing the queue lets the worker drain the backlog and exit
    queue.shutdown().await;

    let mut succeeded = 0;
    let mut failed = 0;
    while let Ok(notice) = notices.try_recv() {
        print_notice(&notice);
        match notice {
            PipelineNotice::Succeeded { .. } => succeeded += 1,
            PipelineNotice::Failed { .. } => failed += 1,
            PipelineNotice::Started { .. } => {}
        }
    }

    eprintln!("\nDone: {} succeeded, {} failed", succeeded, failed);
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
async fn show_config(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("voxnote configuration");
    println!();
    println!(
        "Config file: {}",
        config_path
            .map(|p| p.display().to_string())
            .or_else(|| Config::default_path()
                .filter(|p| p.exists())
                .map(|p| p.display().to_string()))
            .unwrap_or_else(|| "(none - env only)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Watch:     {}", config.watch_dir.display());
    println!("  Output:    {}", config.output_dir.display());
    println!("  Processed: {}", config.processed_dir.display());
    println!();
    println!("Extensions: {}", config.extensions.join(", "));
    println!("Append transcript: {}", config.append_transcript);
    println!(
        "API key: {}...{}",
        &config.api_key[..config.api_key.len().min(5)],
        if config.api_key.len() > 9 {
            &config.api_key[config.api_key.len() - 4..]
        } else {
            ""
        }
    );

    Ok(())
}
