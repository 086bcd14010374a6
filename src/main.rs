//! patchnotes - CLI entry point.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use patchnotes::{ConfigOverrides, Draft, NoterConfig, Strategy};

/// Draft release notes from the last release tag to the branch head.
#[derive(Parser, Debug)]
#[command(name = "patchnotes")]
#[command(about = "Draft release notes from the last release tag to the branch head")]
#[command(version)]
struct Cli {
    /// Path to the repository working copy
    #[arg(long)]
    repo_dir: Option<PathBuf>,

    /// Directory containing the `relnotes` tool (external-tool strategy)
    #[arg(long)]
    release_tools_dir: Option<PathBuf>,

    /// How to produce the release notes body
    #[arg(long, value_enum, default_value_t = Strategy::Gatherer)]
    strategy: Strategy,

    /// GitHub organization (defaults to the origin remote's owner)
    #[arg(long)]
    github_org: Option<String>,

    /// GitHub repository (defaults to the origin remote's name)
    #[arg(long)]
    github_repo: Option<String>,

    /// Skip GitHub PR fetching
    #[arg(long)]
    no_prs: bool,

    /// Write the document to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

#[derive(Serialize)]
struct JsonDraft<'a> {
    branch: &'a str,
    start: &'a str,
    end: &'a str,
    document: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = NoterConfig::load(ConfigOverrides {
        repo_dir: cli.repo_dir,
        release_tools_dir: cli.release_tools_dir,
        strategy: cli.strategy,
        github_org: cli.github_org,
        github_repo: cli.github_repo,
        no_prs: cli.no_prs,
    });

    let noter = config.build();
    let draft = noter
        .draft()
        .await
        .context("Failed to draft release notes")?;

    let rendered = render_output(&draft, cli.format)?;

    match cli.output {
        Some(path) => {
            write_atomically(&path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "✓ Release notes for {}..{} written to {}",
                draft.range.start,
                draft.range.end,
                path.display()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "patchnotes=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_output(draft: &Draft, format: Format) -> Result<String> {
    match format {
        Format::Markdown => Ok(draft.document.clone()),
        Format::Json => serde_json::to_string_pretty(&JsonDraft {
            branch: &draft.range.branch,
            start: &draft.range.start,
            end: &draft.range.end,
            document: &draft.document,
        })
        .context("Failed to serialize draft"),
    }
}

/// Write via a temp file in the target directory so readers never see a
/// partial document.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(path)?;
    Ok(())
}
