mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "filekit")]
#[command(about = "FileKit: multipart upload gateway and file toolkit")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.filekit/filekit.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running gateway's health endpoint
    Status,
    /// Print the URL slug for some text
    Slug { text: String },
    /// Load and validate the config, printing every finding
    CheckConfig,
    /// Write a config file populated with defaults
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| filekit_config::config_file_path(&filekit_config::config_dir()));

    match cli.command {
        Commands::Serve { port } => commands::serve(&config_path, port).await,
        Commands::Status => commands::status(&config_path).await,
        Commands::Slug { text } => {
            println!("{}", filekit_tools::slugify(&text)?);
            Ok(())
        }
        Commands::CheckConfig => commands::check_config(&config_path).await,
        Commands::InitConfig { force } => commands::init_config(&config_path, force).await,
    }
}
