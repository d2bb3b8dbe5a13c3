//! GitLab REST API client.
//!
//! Tree listing: GET {api_base}/projects/{id}/repository/tree?recursive=true&per_page=N
//! Raw file:     GET {api_base}/projects/{id}/repository/files/{path}/raw?ref={branch}

use reqwest::Client;
use tokio::runtime::Runtime;

use super::{RepositorySource, SourceError};
use crate::config::GitLabConfig;
use crate::model::FileEntry;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Async client for one GitLab project.
pub struct GitLabClient {
    http: Client,
    api_base: String,
    project_id: String,
    token: String,
    branch: String,
    per_page: u32,
}

impl GitLabClient {
    /// Create a client for the project described by `config`.
    pub fn new(config: &GitLabConfig) -> Result<Self, SourceError> {
        let http = Client::builder()
            .user_agent(concat!("repomap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            token: config.token.clone(),
            branch: config.branch.clone(),
            per_page: config.per_page,
        })
    }

    fn project_url(&self) -> String {
        // Namespaced ids ("group/project") must be a single path segment.
        format!(
            "{}/projects/{}",
            self.api_base,
            urlencoding::encode(&self.project_id)
        )
    }

    /// URL of the recursive tree listing.
    pub fn tree_url(&self) -> String {
        format!(
            "{}/repository/tree?recursive=true&per_page={}",
            self.project_url(),
            self.per_page
        )
    }

    /// URL of the raw content of `path` at the configured branch.
    pub fn file_url(&self, path: &str) -> String {
        format!(
            "{}/repository/files/{}/raw?ref={}",
            self.project_url(),
            urlencoding::encode(path),
            urlencoding::encode(&self.branch)
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        if self.token.is_empty() {
            request
        } else {
            request.header(TOKEN_HEADER, &self.token)
        }
    }

    /// Fetch the recursive tree listing.
    pub async fn fetch_tree(&self) -> Result<Vec<FileEntry>, SourceError> {
        let url = self.tree_url();
        let response = self.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(response.json::<Vec<FileEntry>>().await?)
    }

    /// Fetch the raw content of one file.
    pub async fn fetch_file(&self, path: &str) -> Result<String, SourceError> {
        let url = self.file_url(path);
        let response = self.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}

/// Blocking `RepositorySource` over `GitLabClient`.
///
/// Requests run one at a time on a current-thread runtime.
pub struct GitLabSource {
    client: GitLabClient,
    runtime: Runtime,
}

impl GitLabSource {
    pub fn new(config: &GitLabConfig) -> Result<Self, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            client: GitLabClient::new(config)?,
            runtime,
        })
    }
}

impl RepositorySource for GitLabSource {
    fn list_tree(&self) -> Vec<FileEntry> {
        match self.runtime.block_on(self.client.fetch_tree()) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "tree listing failed");
                Vec::new()
            }
        }
    }

    fn file_content(&self, path: &str) -> Option<String> {
        match self.runtime.block_on(self.client.fetch_file(path)) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to fetch content");
                None
            }
        }
    }
}
