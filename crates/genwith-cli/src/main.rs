//! genwith CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use genwith_core::{provenance, Flags, FormatPipeline, Generator, TemplateRenderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "genwith")]
#[command(author, version, about = "Generate new functional option clients", long_about = None)]
struct Cli {
    #[command(flatten)]
    flags: Flags,

    /// Load flags from a YAML or TOML file; command-line flags are applied on top
    #[arg(long)]
    flags_file: Option<PathBuf>,

    /// Directory the generated file is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Use an alternate template body instead of the built-in one
    #[arg(long)]
    template: Option<PathBuf>,

    /// Skip gofmt and goimports
    #[arg(long)]
    no_format: bool,
}

/// Attach the failing stage to a core error
fn staged<T>(result: genwith_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(stage)
    })
}

async fn run(cli: Cli, invocation: String) -> anyhow::Result<PathBuf> {
    let flags = match &cli.flags_file {
        Some(path) => {
            let from_file = staged(Flags::from_file(path).await)
                .with_context(|| format!("reading flags from {}", path.display()))?;
            from_file.overlay(&cli.flags)
        }
        None => cli.flags.clone(),
    };

    let config = staged(flags.validate())?.with_invocation_summary(invocation);
    tracing::debug!(?config, "validated flags");

    let renderer = match &cli.template {
        Some(path) => {
            let source = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading template {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "custom".to_string());
            staged(TemplateRenderer::from_source(name, source))?
        }
        None => staged(TemplateRenderer::new())?,
    };

    let pipeline = if cli.no_format {
        FormatPipeline::empty()
    } else {
        FormatPipeline::go()
    };

    let generator = Generator::new(renderer, pipeline).with_output_dir(&cli.output_dir);
    staged(generator.generate(&config).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let invocation = provenance::summarize_args(std::env::args().skip(1));

    match run(cli, invocation).await {
        Ok(path) => {
            tracing::info!("generated {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("genwith: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
