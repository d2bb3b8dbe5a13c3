//! Repository access.
//!
//! The model builder reads a repository through the `RepositorySource` trait:
//! - `GitLabSource`: the GitLab REST API (tree listing + raw files)
//! - `StaticSource`: an in-memory tree, for offline runs and tests
//!
//! Sources swallow transport failures into empty/absent results. The
//! underlying `GitLabClient` keeps them observable as `SourceError`.

mod gitlab;

pub use gitlab::{GitLabClient, GitLabSource};

use std::collections::HashMap;
use thiserror::Error;

use crate::model::FileEntry;

/// Errors that can occur while talking to a repository host.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Read-only view of a repository.
pub trait RepositorySource {
    /// Full recursive listing. Empty on any failure.
    fn list_tree(&self) -> Vec<FileEntry>;

    /// Raw content of one file. `None` on any failure.
    fn file_content(&self, path: &str) -> Option<String>;
}

/// In-memory repository.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<FileEntry>,
    contents: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content. Entries keep insertion order.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.entries.push(FileEntry::blob(path));
        self.contents.insert(path.to_string(), content.to_string());
        self
    }

    /// Add a file whose content cannot be fetched.
    pub fn with_unreadable_file(mut self, path: &str) -> Self {
        self.entries.push(FileEntry::blob(path));
        self
    }

    /// Add a directory entry.
    pub fn with_dir(mut self, path: &str) -> Self {
        self.entries.push(FileEntry::tree(path));
        self
    }
}

impl RepositorySource for StaticSource {
    fn list_tree(&self) -> Vec<FileEntry> {
        self.entries.clone()
    }

    fn file_content(&self, path: &str) -> Option<String> {
        self.contents.get(path).cloned()
    }
}
