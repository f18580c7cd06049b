//! ModelHub CLI entry point.

mod commands;

use clap::Parser;
use modelhub_core::{ConfigOverrides, LoggingConfig};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// ModelHub: tabular model training and inference service
#[derive(Parser, Debug)]
#[command(name = "modelhub", version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run a training pass over a JSON file of records and report the result
    Check {
        /// JSON file holding an array of records
        #[arg(long)]
        data: PathBuf,
        /// Target column
        #[arg(long)]
        target: String,
        /// Comma-separated feature columns (auto-selected when omitted)
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write the default configuration to the user config file
    Init,
    /// Show the resolved configuration
    Show,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        match &self.command {
            Commands::Serve { host, port } => ConfigOverrides {
                host: host.clone(),
                port: *port,
            },
            _ => ConfigOverrides::default(),
        }
    }
}

/// Stderr filter directive: `RUST_LOG` wins, then `-q`/`-v`, then the config.
fn filter_directive(verbose: u8, quiet: bool, configured: &str) -> String {
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !env.is_empty()
    {
        return env;
    }
    match verbose {
        0 if quiet => "error".to_string(),
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install a human-readable stderr layer and, when configured, a daily JSON file layer.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_tracing(filter: &str, logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_new(filter)?);

    let (json_layer, guard) = match &logging.json_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "modelhub.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .try_init()?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = modelhub_core::load_config(cli.config.as_deref(), &cli.overrides())
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let filter = filter_directive(cli.verbose, cli.quiet, &config.logging.level);
    let _guard = init_tracing(&filter, &config.logging)?;

    match cli.command {
        Commands::Serve { .. } => commands::serve(config).await,
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config_init(),
            ConfigAction::Show => commands::config_show(&config),
        },
        Commands::Check {
            data,
            target,
            features,
        } => {
            let report = commands::check(&config, &data, &target, features)?;
            println!("{report}");
            Ok(())
        }
    }
}
