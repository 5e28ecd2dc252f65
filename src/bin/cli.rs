//! Command-line front end
//!
//! Run with: cargo run -- "How many loans were approved?"

use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use corpus_rag::config::EmbeddingProviderKind;
use corpus_rag::{pipeline, Pipeline, RagConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "corpus-rag",
    version,
    about = "Ask questions over a local document corpus"
)]
struct Cli {
    /// Question to answer; omit for an interactive prompt
    question: Option<String>,

    /// Directory containing the source documents
    #[arg(long, default_value = "docs")]
    docs_dir: PathBuf,

    /// Number of chunks retrieved per question
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Use the hashing embedder instead of the ONNX model (no embedding model
    /// files needed)
    #[arg(long)]
    hash_embeddings: bool,

    /// Print answers as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpus_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = RagConfig::default();
    config.corpus.source_dir = cli.docs_dir;
    config.retrieval.top_k = cli.top_k;
    if cli.hash_embeddings {
        config.embeddings.provider = EmbeddingProviderKind::Hash;
    }

    // Built once; every question below reuses the same instance.
    let pipeline = pipeline::shared(&config)?;

    match cli.question {
        Some(question) => answer_one(pipeline, &question, cli.json)?,
        None => {
            let stdin = std::io::stdin();
            loop {
                print!("? ");
                std::io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if question == "exit" || question == "quit" {
                    break;
                }

                // A failed question leaves the session (and pipeline) usable.
                if let Err(e) = answer_one(pipeline, question, cli.json) {
                    eprintln!("error: {e}");
                }
            }
        }
    }

    Ok(())
}

fn answer_one(pipeline: &Pipeline, question: &str, json: bool) -> anyhow::Result<()> {
    let answer = pipeline.ask(question)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    println!("\n{}\n", answer.text);
    for (i, source) in answer.sources.iter().enumerate() {
        let preview: String = source.content.chars().take(200).collect();
        println!("[{}] ({:.2}) {}", i + 1, source.similarity, preview);
        for (key, value) in &source.metadata {
            println!("    {key}: {value}");
        }
    }

    Ok(())
}
