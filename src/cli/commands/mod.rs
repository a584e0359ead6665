//! CLI parser and dispatch.

mod categories;
mod check;
mod config_cmd;
mod fetch;
mod tag;
mod text;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use opensextant_tagger::config::Config;

#[derive(Parser)]
#[command(name = "ost-tagger")]
#[command(about = "Tag document streams with entities from an OpenSextant service")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (before full parsing).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Tag a stream of JSON-lines documents
    Tag {
        /// Input file ("-" or omitted for stdin)
        input: Option<PathBuf>,

        /// Output file ("-" or omitted for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run the whitespace tokenizer first and align onto its tokens
        #[arg(long)]
        tokenize: bool,

        /// Tokenizer whose sentences supply the tokens
        #[arg(long)]
        source_tagger: Option<String>,

        /// OpenSextant host:port
        #[arg(long, env = "OPENSEXTANT_NETWORK_ADDRESS")]
        address: Option<String>,
    },

    /// Tokenize and tag a single string
    Text {
        text: String,

        /// OpenSextant host:port
        #[arg(long, env = "OPENSEXTANT_NETWORK_ADDRESS")]
        address: Option<String>,
    },

    /// Read URLs from stdin, download JSON-lines documents and tag them
    Fetch {
        /// Output file ("-" or omitted for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Download attempts per URL
        #[arg(long, default_value_t = fetch::DEFAULT_ATTEMPTS)]
        attempts: u32,

        /// Run the whitespace tokenizer first and align onto its tokens
        #[arg(long)]
        tokenize: bool,
    },

    /// Show how categories map to entity and mention types
    Resolve {
        #[arg(required = true)]
        categories: Vec<String>,
    },

    /// List the OpenSextant category taxonomy
    Categories {
        /// Only show categories that produce mentions
        #[arg(long)]
        mapped_only: bool,
    },

    /// Check that the OpenSextant service is reachable
    Check {
        /// OpenSextant host:port
        #[arg(long, env = "OPENSEXTANT_NETWORK_ADDRESS")]
        address: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration (password masked)
    Show,
}

async fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from_path(&path)
                .await
                .map_err(|e| anyhow::anyhow!(e))
        }
        None => Ok(Config::load().await),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config).await?;

    match cli.command {
        Commands::Tag {
            input,
            output,
            tokenize,
            source_tagger,
            address,
        } => {
            let options = tag::TagOptions {
                tokenize,
                source_tagger,
                address,
            };
            tag::cmd_tag(&config, input.as_deref(), output.as_deref(), options).await
        }
        Commands::Text { text, address } => text::cmd_text(&config, &text, address).await,
        Commands::Fetch {
            output,
            attempts,
            tokenize,
        } => fetch::cmd_fetch(&config, output.as_deref(), attempts, tokenize).await,
        Commands::Resolve { categories } => categories::cmd_resolve(&categories),
        Commands::Categories { mapped_only } => categories::cmd_categories(mapped_only),
        Commands::Check { address } => check::cmd_check(&config, address).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
        },
    }
}
