//! コマンドライン - serve / generate

use crate::config::Settings;
use crate::service::{BatchResult, PackingListService, ProcessOptions};
use crate::web;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "packlist", version, about = "KCB cheque book packing list generator")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the upload web server
    Serve {
        #[arg(long, help = "Address to bind (default from PACKLIST_BIND)")]
        bind: Option<String>,
        #[arg(long, help = "Port to listen on (default from PACKLIST_PORT)")]
        port: Option<u16>,
    },
    /// Generate packing list PDFs from .dat files
    Generate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long, help = "Directory for generated PDFs")]
        output_dir: Option<PathBuf>,
        #[arg(short, long, help = "Output file name (single file only)")]
        name: Option<String>,
        #[arg(short, long, help = "Order date (29/09/25, 290925, 29/09/2025 or 2025-09-29)")]
        date: Option<String>,
        #[arg(long, default_value_t = false, help = "Open generated PDFs")]
        open: bool,
    },
}

/// コマンドを実行 (すべて成功したら true)
pub fn run(cli: Cli, mut settings: Settings) -> Result<bool> {
    match cli.command {
        Commands::Serve { bind, port } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            if let Some(port) = port {
                settings.port = port;
            }

            let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            runtime
                .block_on(web::serve(settings))
                .context("Web server stopped")?;
            Ok(true)
        }
        Commands::Generate {
            files,
            output_dir,
            name,
            date,
            open,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| settings.output_dir.clone());
            let service = PackingListService::new(&settings);
            let batch = service.process_files(
                &files,
                &output_dir,
                &ProcessOptions {
                    order_date: date,
                    output_name: name,
                },
            );

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                print_batch(&batch);
            }

            if open {
                for output in batch.results.iter().filter_map(|r| r.output.as_ref()) {
                    if let Err(e) = open::that(output) {
                        warn!("Could not open {}: {}", output.display(), e);
                    }
                }
            }

            Ok(batch.failed() == 0)
        }
    }
}

fn print_batch(batch: &BatchResult) {
    for result in &batch.results {
        if let (Some(output), Some(summary)) = (&result.output, &result.summary) {
            println!("✓ {} -> {}", result.original, output.display());
            println!("{}", summary);
        } else {
            println!(
                "✗ {}: {}",
                result.original,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!(
        "Successfully generated {}/{} packing lists",
        batch.succeeded(),
        batch.total()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_arguments() {
        let cli = Cli::try_parse_from([
            "packlist",
            "generate",
            "a.dat",
            "b.dat",
            "--output-dir",
            "out",
            "--date",
            "29/09/25",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Generate {
                files,
                output_dir,
                date,
                name,
                open,
            } => {
                assert_eq!(files, [PathBuf::from("a.dat"), PathBuf::from("b.dat")]);
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert_eq!(date.as_deref(), Some("29/09/25"));
                assert!(name.is_none());
                assert!(!open);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn generate_requires_files() {
        assert!(Cli::try_parse_from(["packlist", "generate"]).is_err());
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from(["packlist", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Commands::Serve { bind, port } => {
                assert!(bind.is_none());
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
