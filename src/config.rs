// Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Print the word tokens of a text as JSON lines.
    Tokenize {
        #[arg(long, env = "TAXMAN_LANGUAGE", default_value = "en")]
        language: String,
        text: String,
    },
    /// Tag a text with the concepts of a seed file.
    Analyze {
        #[arg(long, env = "TAXMAN_SEED")]
        seed: PathBuf,
        #[arg(long, env = "TAXMAN_LANGUAGE", default_value = "en")]
        language: String,
        #[arg(long)]
        project: Option<String>,
        text: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "TAXMAN_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,
    /// Language whose concept labels are indexed.
    #[arg(long, env = "TAXMAN_LANGUAGE", default_value = "en")]
    pub language: String,
    /// JSONL (optionally gzipped) file of projects and concepts to load at startup.
    #[arg(long, env = "TAXMAN_SEED")]
    pub seed: Option<PathBuf>,
}
