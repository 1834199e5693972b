use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidshelf")]
#[command(author, version, about = "Local video library catalog with range-request streaming")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Video directory to serve (overrides config)
        #[arg(long)]
        video_dir: Option<PathBuf>,
    },

    /// Print catalog statistics for the video directory
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate titles, descriptions and keywords for the given files
    Generate {
        /// Filenames within the video directory
        #[arg(required = true)]
        files: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
