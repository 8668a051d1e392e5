use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vidresolve")]
#[command(author, version, about = "Resolve video URLs into metadata and quality-capped download links", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Port to listen on (overrides WEB_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Disable the metadata cache
        #[arg(long)]
        no_cache: bool,

        /// Update yt-dlp before serving
        #[arg(long)]
        update_extractor: bool,
    },

    /// Resolve a single URL and print the JSON response
    Resolve {
        /// Video page URL
        url: String,

        /// Quality ceiling, e.g. 720 or 1080p
        #[arg(short, long, default_value = "720")]
        quality: String,

        /// Print metadata and the quality menu instead of a download link
        #[arg(long)]
        metadata: bool,
    },

    /// Check that yt-dlp is runnable and print its version
    CheckExtractor {
        /// Also try to update yt-dlp
        #[arg(long)]
        update: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
