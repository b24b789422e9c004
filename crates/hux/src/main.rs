use std::process::ExitCode;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use humon::{DEFAULT_TAB_SIZE, LoadOptions, Renderer, Trove};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Inspect Humon documents.
#[derive(Parser)]
#[command(name = "hux", version)]
struct Options {
    /// Columns between tab stops, used when reporting positions.
    #[arg(long, global = true, default_value_t = DEFAULT_TAB_SIZE)]
    tab_size: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report every error in a document.
    Check { path: Utf8PathBuf },
    /// Print the source text of the node at an address.
    Get { path: Utf8PathBuf, address: String },
    /// List the tokens of a document.
    Tokens { path: Utf8PathBuf },
    /// List every node with its address.
    Address { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_env("HUX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let options = Options::parse();
    let load_options = LoadOptions::new().with_tab_size(options.tab_size);

    match options.command {
        Command::Check { path } => {
            let trove = load(&path, load_options)?;
            let renderer = Renderer::styled();

            for diagnostic in trove.errors() {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), trove.source_text()));
            }

            if trove.has_errors() {
                eprintln!("{path}: {} error(s)", trove.errors().len());
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Get { path, address } => {
            let trove = load(&path, load_options)?;
            let node = trove.resolve(&address).with_context(|| format!("in `{path}`"))?;

            println!("{}", node.source_text());
            Ok(ExitCode::SUCCESS)
        }
        Command::Tokens { path } => {
            let trove = load(&path, load_options)?;

            for token in trove.tokens() {
                let (start, end) = (token.start(), token.end());
                println!(
                    "{}:{}-{}:{} {:<12} {:?}",
                    start.line,
                    start.col,
                    end.line,
                    end.col,
                    token.kind().name(),
                    token.raw()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Address { path } => {
            let trove = load(&path, load_options)?;

            for node in trove.nodes() {
                println!("{}\t{}", node.address(), node.kind().name());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(path: &Utf8Path, options: LoadOptions) -> anyhow::Result<Trove> {
    let trove =
        Trove::from_file(path, options).with_context(|| format!("failed to load `{path}`"))?;

    if trove.has_errors() {
        tracing::warn!(%path, errors = trove.errors().len(), "document has errors");
    }
    Ok(trove)
}
