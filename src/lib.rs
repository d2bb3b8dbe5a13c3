//! Repomap - structural metadata extraction for remote repositories.
//!
//! Repomap lists a repository through the GitLab API, detects its dominant
//! language, and records the classes, functions, variables and imports of
//! every source file together with the project's declared dependencies. The
//! result is a single JSON document consumed by dashboards and summarizers.
//!
//! # Architecture
//!
//! - `source`: repository access (GitLab client, in-memory source)
//! - `language`: dominant-language detection
//! - `extract`: per-file structural extractors (tree-sitter, regex)
//! - `manifest`: dependency manifest formats
//! - `builder`: orchestration of one extraction run
//! - `model`: the persisted document
//! - `stats`, `digest`: projections of the document for consumers
//! - `config`, `cli`, `report`: configuration and command-line surface
//!
//! # Adding a New Language
//!
//! Add a variant to `Language`, implement `StructureExtractor` in
//! `src/extract/`, and list its manifest formats in `manifest::formats_for`.

pub mod builder;
pub mod cli;
pub mod config;
pub mod digest;
pub mod extract;
pub mod language;
pub mod manifest;
pub mod model;
pub mod report;
pub mod source;
pub mod stats;

pub use builder::{is_test_path, BuildStats, ModelBuilder};
pub use config::Config;
pub use extract::{ParseError, StructureExtractor};
pub use language::Language;
pub use model::{FileEntry, FileRecord, ProjectMetadata, RepoModel};
pub use source::{GitLabSource, RepositorySource, SourceError, StaticSource};

/// Extract metadata for one GitLab project and persist it to the default
/// output path (`repo_metadata.json`).
pub fn run_extraction(token: &str, project_id: &str) -> anyhow::Result<RepoModel> {
    let config = Config::for_project(token, project_id);
    let (model, _) = run_extraction_with(&config)?;
    Ok(model)
}

/// Extract metadata with an explicit configuration and persist it to
/// `config.output`, replacing any previous document.
///
/// The configuration is used as given. An unreachable host or unknown
/// project yields the empty `unknown` document; only writing the document
/// can fail.
pub fn run_extraction_with(config: &Config) -> anyhow::Result<(RepoModel, BuildStats)> {
    let source = GitLabSource::new(&config.gitlab)?;
    let (model, stats) = ModelBuilder::new(&source).build_with_stats();

    model.persist(&config.output)?;
    tracing::info!(path = %config.output.display(), "metadata written");

    Ok((model, stats))
}
