//! Uplink CLI: run a batch upload from the command line.
//!
//! Configuration comes from UPLINK_* environment variables (or `.env`).
//! Notifications are written to the log.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use uplink_cli::{encode_file, init_tracing};
use uplink_core::UploaderConfig;
use uplink_infra::LogNotifier;
use uplink_worker::{Dispatcher, UploadBridge};

#[derive(Parser)]
#[command(name = "uplink", about = "Batch blob uploads with commit and notifications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a batch of file descriptors
    Upload {
        #[arg(long)]
        post_id: String,
        /// Pre-signed SAS query string
        #[arg(long)]
        sas_token: String,
        /// JSON file holding the descriptor array
        #[arg(long)]
        files: PathBuf,
        /// Print the completion report as JSON
        #[arg(long)]
        wait: bool,
    },
    /// Build a descriptor array from local files and print it
    Encode {
        /// Files to encode
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Key prefix for uploaded objects (e.g. "posts/123")
        #[arg(long, default_value = "")]
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            post_id,
            sas_token,
            files,
            wait,
        } => {
            let raw = std::fs::read_to_string(&files)
                .with_context(|| format!("Failed to read {}", files.display()))?;
            let descriptors: Value =
                serde_json::from_str(&raw).context("Descriptor file is not valid JSON")?;

            let config = UploaderConfig::from_env().context("Invalid configuration")?;
            let dispatcher = Dispatcher::from_config(config, Arc::new(LogNotifier))
                .context("Failed to set up uploader")?;
            let bridge = UploadBridge::new(Arc::new(dispatcher));

            let outcome = bridge
                .execute("uploadFiles", &json!([post_id, sas_token, descriptors]))
                .await
                .context("Upload request rejected")?;
            if let Some(message) = outcome.message() {
                tracing::info!("{}", message);
            }

            // The process must outlive its upload tasks either way.
            if let Some(handle) = outcome.into_handle() {
                let report = handle.wait().await;
                if wait {
                    let out = serde_json::to_string_pretty(&report).context("Serialize report")?;
                    println!("{}", out);
                }
            }
        }
        Commands::Encode { paths, prefix } => {
            let descriptors = paths
                .iter()
                .map(|path| encode_file(path, &prefix))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let out = serde_json::to_string_pretty(&descriptors).context("Serialize descriptors")?;
            println!("{}", out);
        }
    }

    Ok(())
}
