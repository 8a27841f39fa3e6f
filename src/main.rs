use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use typed_fetch_generator::{generate_with, GenerateOptions, OpenApi};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the OpenAPI document (.json, .yaml or .yml)
    #[arg(long)]
    openapi: PathBuf,
    /// Output file, stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Append the fetch-based client runtime to the generated types
    #[arg(long)]
    runtime: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typed_fetch_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let spec = OpenApi::from_path(&cli.openapi)
        .with_context(|| format!("failed to load {}", cli.openapi.display()))?;
    let options = GenerateOptions {
        runtime: cli.runtime,
    };
    let content = generate_with(&spec, &options).context("failed to generate client")?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote client");
        }
        None => println!("{content}"),
    }

    Ok(())
}
