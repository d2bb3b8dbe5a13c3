//! Command-line interface for repomap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::digest::SummaryDigest;
use crate::model::RepoModel;
use crate::report::{self, Format};
use crate::stats::{RepoStats, DEFAULT_TOP};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Structural metadata extraction for remote repositories.
///
/// Repomap lists a GitLab project, detects its dominant language, and
/// records the classes, functions, variables and imports of every source
/// file plus the declared dependencies in a single JSON document.
#[derive(Parser)]
#[command(name = "repomap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract metadata from a GitLab project and write the document
    Extract(ExtractArgs),
    /// Summarize a previously written document
    Stats(StatsArgs),
    /// Print the reduced document used for summarization
    Digest(DigestArgs),
}

/// Arguments for the extract command.
#[derive(Parser)]
pub struct ExtractArgs {
    /// GitLab project id or namespaced path
    #[arg(short, long)]
    pub project_id: Option<String>,

    /// Private access token
    #[arg(short, long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// API base URL (e.g. https://gitlab.com/api/v4)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Branch used for raw file fetches
    #[arg(long)]
    pub branch: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the stats command.
#[derive(Parser)]
pub struct StatsArgs {
    /// Path to a metadata document
    #[arg(default_value = "repo_metadata.json")]
    pub document: PathBuf,

    /// Number of rows per ranking
    #[arg(long, default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the digest command.
#[derive(Parser)]
pub struct DigestArgs {
    /// Path to a metadata document
    #[arg(default_value = "repo_metadata.json")]
    pub document: PathBuf,
}

fn parse_format(value: &str) -> Option<Format> {
    let format = Format::parse(value);
    if format.is_none() {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", value);
    }
    format
}

/// Merge the config file (explicit or discovered) with CLI overrides.
pub fn resolve_config(args: &ExtractArgs) -> anyhow::Result<Config> {
    let path = args.config.clone().or_else(Config::discover);
    let mut config = match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            Config::parse_file(&p)?
        }
        None => Config::default(),
    };

    if let Some(id) = &args.project_id {
        config.gitlab.project_id = id.clone();
    }
    if let Some(token) = &args.token {
        config.gitlab.token = token.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(api_base) = &args.api_base {
        config.gitlab.api_base = api_base.clone();
    }
    if let Some(branch) = &args.branch {
        config.gitlab.branch = branch.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Run the extract command.
pub fn run_extract(args: &ExtractArgs) -> anyhow::Result<i32> {
    let format = match parse_format(&args.format) {
        Some(f) => f,
        None => return Ok(EXIT_ERROR),
    };

    let config = match resolve_config(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (model, run) = crate::run_extraction_with(&config)?;

    match format {
        Format::Json => report::write_json(&model)?,
        Format::Pretty => {
            report::write_pretty(&config.gitlab.project_id, &config.output, &model, &run)
        }
    }

    Ok(EXIT_SUCCESS)
}

/// Run the stats command.
pub fn run_stats(args: &StatsArgs) -> anyhow::Result<i32> {
    let format = match parse_format(&args.format) {
        Some(f) => f,
        None => return Ok(EXIT_ERROR),
    };

    let model = RepoModel::load(&args.document)?;
    let repo_stats = RepoStats::compute(&model.files, args.top);

    match format {
        Format::Json => report::write_stats_json(&repo_stats)?,
        Format::Pretty => report::write_stats_pretty(
            &args.document.to_string_lossy(),
            &model,
            &repo_stats,
        ),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the digest command.
pub fn run_digest(args: &DigestArgs) -> anyhow::Result<i32> {
    let model = RepoModel::load(&args.document)?;
    println!("{}", SummaryDigest::from(&model).to_json()?);
    Ok(EXIT_SUCCESS)
}
