use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate::api;
use authgate::config;

#[derive(Parser)]
#[command(name = "authgate")]
#[command(version)]
#[command(about = "Session-based authentication gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new authgate.toml configuration file
    Init,

    /// Run the HTTP server
    Serve {
        /// Bind host, overrides the configured value
        #[arg(long, env = "AUTHGATE_HOST")]
        host: Option<String>,

        /// Bind port, overrides the configured value
        #[arg(short, long, env = "AUTHGATE_PORT")]
        port: Option<u16>,

        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => init(),
        Commands::Serve { host, port, config } => serve(host, port, config).await,
    }
}

fn init() -> Result<()> {
    let path = std::path::Path::new("authgate.toml");
    if path.exists() {
        anyhow::bail!("authgate.toml already exists");
    }
    std::fs::write(path, config::loader::default_config_content())?;
    println!("Created authgate.toml");
    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => config::load_config_from_path(&path)?,
        None => config::load_config()?,
    };

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    api::run_server(config, &host, port).await?;
    Ok(())
}
