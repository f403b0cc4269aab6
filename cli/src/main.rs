mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use travel_rules_core::DocumentKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "travel-rules", version, about = "Validate booking and fare XML documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate one or more documents
    Validate {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = KindArg::Auto)]
        kind: KindArg,
        /// Overrides the configured output format
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
    /// List XML files below a directory
    Scan { dir: PathBuf },
    /// Show or reset the stored configuration
    Config {
        /// Print the stored configuration (the default)
        #[arg(long)]
        show: bool,
        /// Overwrite the stored configuration with defaults, then print it
        #[arg(long, conflicts_with = "show")]
        reset: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Auto,
    Booking,
    Fare,
}

impl From<KindArg> for Option<DocumentKind> {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Auto => None,
            KindArg::Booking => Some(DocumentKind::Booking),
            KindArg::Fare => Some(DocumentKind::Fare),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Validate {
            paths,
            kind,
            format,
        } => {
            let cfg = config::load().unwrap_or_else(|e| {
                tracing::warn!(error=%e, "using default config");
                config::AppConfig::default()
            });
            let format = format.unwrap_or(match cfg.output.format.as_str() {
                "json" => Format::Json,
                _ => Format::Text,
            });
            let now = chrono::Utc::now().naive_utc();
            let reports = commands::validate_documents(&paths, kind.into(), &cfg.rules, Some(now));

            if format == Format::Json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", commands::render_text(report));
                }
            }
            Ok(reports.iter().all(|r| r.passed()))
        }
        Command::Scan { dir } => {
            for file in commands::scan_folder(&dir)? {
                println!("{}\t{}", file.size_bytes, file.path);
            }
            Ok(true)
        }
        Command::Config { reset, .. } => {
            let cfg = if reset {
                let cfg = config::reset()?;
                tracing::info!("Config reset to defaults");
                cfg
            } else {
                config::load()?
            };
            if let Ok(path) = config::config_path() {
                tracing::info!(path=%path.display(), "config location");
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&cfg).context("Failed to render config")?
            );
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error=%e, "command failed");
            ExitCode::from(2)
        }
    }
}
