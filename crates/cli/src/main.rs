//! Command-line front end for the upload guard.
//!
//! `inspect` shows what the guard would decide for a local file without moving
//! anything. `upload` stages each file through the spool transport, exactly as a
//! web server would, and then stores it.
//!
//! # Environment Variables
//! - `UPLOAD_IMG_DIR`: default destination for images (default: "./img/")
//! - `UPLOAD_DOC_DIR`: default destination for documents (default: "./docs/")
//! - `UPLOAD_GEN_DIR`: default destination for everything else (default: "./uploads/")
//! - `UPLOAD_SPOOL_DIR`: spool directory for staged uploads (default: "./spool/")
//! - `UPLOAD_MAX_SIZE`: per-file ceiling in bytes (default: 999999)

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload_guard::{
    ErrorCode, GuardConfig, SpoolTransport, UploadGuard, UploadOptions, UploadReport,
    UploadRequest,
};

#[derive(Parser)]
#[command(name = "upload-guard")]
#[command(about = "Validate uploaded files and move them into place")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the guard's decision for a file without moving it
    Inspect {
        /// File to inspect
        file: PathBuf,
        /// Explicit destination directory
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Maximum size in bytes
        #[arg(long)]
        max_size: Option<u64>,
        /// Declared MIME type
        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
        /// Print a JSON report instead of the field listing
        #[arg(long)]
        json: bool,
    },
    /// Stage and store one or more files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Explicit destination directory
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Maximum size in bytes
        #[arg(long)]
        max_size: Option<u64>,
        /// Declared MIME type
        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
        /// Replace existing files instead of numbering the new name
        #[arg(long)]
        overwrite: bool,
        /// Store under this name instead of the original one
        #[arg(long)]
        name: Option<String>,
    },
}

/// Settings shared by every file of one `upload` invocation.
struct UploadBatch<'a> {
    config: &'a GuardConfig,
    spool: &'a SpoolTransport,
    destination: Option<&'a Path>,
    max_size: Option<u64>,
    mime: &'a str,
    options: &'a UploadOptions,
}

impl UploadBatch<'_> {
    /// Stages and stores each file, writing one JSON report line per file to
    /// `out`. Unreadable files are reported as code 4 and the batch carries on.
    /// The spool is cleaned up before returning, whatever happened.
    ///
    /// Returns the number of files that were not stored.
    fn run(&self, files: &[PathBuf], out: &mut impl Write) -> anyhow::Result<usize> {
        let result = self.store_all(files, out);
        let cleanup = self.spool.cleanup();
        let failed = result?;
        cleanup.context("cannot clean up the spool directory")?;
        Ok(failed)
    }

    fn store_all(&self, files: &[PathBuf], out: &mut impl Write) -> anyhow::Result<usize> {
        let mut failed = 0usize;
        for file in files {
            let report = match self.spool.receive_file(file, self.mime) {
                Ok(request) => {
                    let mut guard = self.guard(request);
                    let outcome = guard.upload(self.spool, self.options);
                    UploadReport::finished(&guard, &outcome)
                }
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "cannot stage file");
                    let request =
                        UploadRequest::failed(file.display().to_string(), ErrorCode::NoFile);
                    UploadReport::pending(&self.guard(request))
                }
            };
            if !report.is_stored() {
                failed += 1;
            }
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
        Ok(failed)
    }

    fn guard(&self, request: UploadRequest) -> UploadGuard {
        UploadGuard::with_config(self.config, request, self.destination, self.max_size)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("upload_guard=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = GuardConfig::from_env_values(
        std::env::var("UPLOAD_IMG_DIR").ok(),
        std::env::var("UPLOAD_DOC_DIR").ok(),
        std::env::var("UPLOAD_GEN_DIR").ok(),
        std::env::var("UPLOAD_SPOOL_DIR").ok(),
        std::env::var("UPLOAD_MAX_SIZE").ok(),
    )?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect {
            file,
            dest,
            max_size,
            mime,
            json,
        }) => {
            let metadata = std::fs::metadata(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let original_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let request = UploadRequest::new(original_name, mime, &file, metadata.len(), 0);
            let guard = UploadGuard::with_config(&config, request, dest.as_deref(), max_size);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&UploadReport::pending(&guard))?
                );
            } else {
                println!("{guard}");
            }
        }
        Some(Commands::Upload {
            files,
            dest,
            max_size,
            mime,
            overwrite,
            name,
        }) => {
            std::fs::create_dir_all(config.spool_dir()).with_context(|| {
                format!("cannot create spool directory {}", config.spool_dir().display())
            })?;
            let spool = SpoolTransport::new(config.spool_dir())?;

            let mut options = UploadOptions::default().overwrite(overwrite);
            options.new_name = name;

            let batch = UploadBatch {
                config: &config,
                spool: &spool,
                destination: dest.as_deref(),
                max_size,
                mime: &mime,
                options: &options,
            };
            let failed = batch.run(&files, &mut std::io::stdout().lock())?;

            if failed > 0 {
                anyhow::bail!("{} of {} uploads failed", failed, files.len());
            }
        }
        None => {
            println!("Use 'upload-guard --help' for commands");
        }
    }

    Ok(())
}
