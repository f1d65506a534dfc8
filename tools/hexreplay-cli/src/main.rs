//! HexReplay CLI - Inspect and convert replay files
//!
//! # Commands
//!
//! - `hexreplay info` - Print replay metadata
//! - `hexreplay dump` - Print every recorded tick
//! - `hexreplay compress` - Convert `.ohr` to `.ohr.z`
//! - `hexreplay decompress` - Convert `.ohr.z` to `.ohr`
//! - `hexreplay config` - Print the effective configuration
//!
//! The format of an input file is chosen by its extension: `.ohr.z` is read
//! as compressed, anything else as raw.

mod convert;
mod inspect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HexReplay CLI - Inspect and convert replay files
#[derive(Parser)]
#[command(name = "hexreplay")]
#[command(about = "Inspect and convert replay files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print replay metadata
    Info {
        /// Replay file (.ohr or .ohr.z)
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one line per recorded tick
    Dump {
        /// Replay file (.ohr or .ohr.z)
        file: PathBuf,
    },

    /// Compress a raw replay
    Compress {
        /// Input replay (.ohr)
        input: PathBuf,

        /// Output file (defaults to input + ".z")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decompress a compressed replay
    Decompress {
        /// Input replay (.ohr.z)
        input: PathBuf,

        /// Output file (defaults to input without ".z")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file, json } => inspect::info(&file, json),
        Commands::Dump { file } => inspect::dump(&file),
        Commands::Compress { input, output } => convert::compress(&input, output),
        Commands::Decompress { input, output } => convert::decompress(&input, output),
        Commands::Config => {
            let config = hexreplay_core::config::load();
            print!("{}", toml::to_string_pretty(&config)?);
            match config.replays_dir() {
                Some(dir) => println!("# replays stored in {}", dir.display()),
                None => println!("# no replay directory available"),
            }
            Ok(())
        }
    }
}
