// Taxonomy manager: serves the REST API or runs the analysis engine once from
// the command line.
//
// RUST_LOG controls verbosity, e.g. RUST_LOG=taxman=debug,tower_http=debug.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use taxman::config::{Args, Command};
use taxman::taxonomy::{load_taxonomy, AnalysisInput, TextAnalyzer};
use taxman::tokenize::{NlpWordTokenizer, WordTokenizer};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Serve(serve) => taxman::server::serve(&serve).await,
        Command::Tokenize { language, text } => {
            let tokenizer = NlpWordTokenizer::create(&language)?;
            for token in tokenizer.tokenize(&text) {
                println!("{}", serde_json::to_string(&token)?);
            }
            Ok(())
        }
        Command::Analyze {
            seed,
            language,
            project,
            text,
        } => {
            let taxonomy = load_taxonomy(&language, Some(&seed))?;
            let input = AnalysisInput {
                text,
                project_id: project,
            };
            let result = TextAnalyzer::new(&taxonomy).tag_document(&input)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
