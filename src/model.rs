//! The repository metadata document.
//!
//! `RepoModel` is the single artifact the extractor produces. Its JSON shape
//! (`project_metadata` + `files`) is consumed by dashboards and the summary
//! collaborator, so field names here are part of the external interface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::language::Language;

/// Kind of an entry in the repository tree listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file.
    Blob,
    /// A directory.
    Tree,
    /// Anything else the host reports (e.g. submodule commits).
    #[serde(other)]
    Other,
}

/// One entry of the recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileEntry {
    /// Repo-relative path, `/`-separated.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Structural summary of one source file, before it is tied to a path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Structure {
    pub classes: Vec<String>,
    pub functions: Vec<String>,
    pub variables: Vec<String>,
    pub imports: BTreeSet<String>,
}

/// Per-file record in the persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileRecord {
    pub file_path: String,
    pub language: Language,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub imports: BTreeSet<String>,
}

impl FileRecord {
    pub fn new(file_path: impl Into<String>, language: Language, structure: Structure) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            classes: structure.classes,
            functions: structure.functions,
            variables: structure.variables,
            imports: structure.imports,
        }
    }
}

/// Repository-wide metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectMetadata {
    pub language: Language,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            language: Language::Unknown,
            dependencies: Vec::new(),
        }
    }
}

/// Top-level aggregate written at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepoModel {
    pub project_metadata: ProjectMetadata,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl RepoModel {
    /// Empty document for the given language.
    pub fn new(language: Language) -> Self {
        Self {
            project_metadata: ProjectMetadata {
                language,
                dependencies: Vec::new(),
            },
            files: Vec::new(),
        }
    }

    /// Read a previously persisted document.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        let model: RepoModel = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))?;
        Ok(model)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document, replacing whatever was at `path`.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| anyhow::anyhow!("creating {}: {}", parent.display(), e))?;
            }
        }
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| anyhow::anyhow!("writing {}: {}", path.display(), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_from_host_json() {
        let raw = r#"[
            {"id": "a1", "name": "src", "type": "tree", "path": "src", "mode": "040000"},
            {"id": "b2", "name": "app.py", "type": "blob", "path": "src/app.py", "mode": "100644"},
            {"id": "c3", "name": "vendor", "type": "commit", "path": "vendor", "mode": "160000"}
        ]"#;
        let entries: Vec<FileEntry> = serde_json::from_str(raw).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Tree);
        assert_eq!(entries[1], FileEntry::blob("src/app.py"));
        assert_eq!(entries[2].kind, EntryKind::Other);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(FileEntry::blob("a/b/pom.xml").file_name(), "pom.xml");
        assert_eq!(FileEntry::blob("pom.xml").file_name(), "pom.xml");
    }

    #[test]
    fn test_document_shape() {
        let mut structure = Structure::default();
        structure.classes.push("Foo".to_string());
        structure.imports.insert("os".to_string());

        let mut model = RepoModel::new(Language::Python);
        model.project_metadata.dependencies.push("requests".to_string());
        model
            .files
            .push(FileRecord::new("pkg/app.py", Language::Python, structure));

        let value: serde_json::Value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["project_metadata"]["language"], "python");
        assert_eq!(value["project_metadata"]["dependencies"][0], "requests");
        assert_eq!(value["files"][0]["file_path"], "pkg/app.py");
        assert_eq!(value["files"][0]["classes"][0], "Foo");
        assert_eq!(value["files"][0]["imports"][0], "os");
        assert!(value["files"][0].get("error").is_none());
    }

    #[test]
    fn test_persist_replaces_previous_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("out").join("repo_metadata.json");

        let mut first = RepoModel::new(Language::Java);
        first.project_metadata.dependencies.push("g:a:1".to_string());
        first.persist(&path).unwrap();

        let second = RepoModel::new(Language::Python);
        second.persist(&path).unwrap();

        let loaded = RepoModel::load(&path).unwrap();
        assert_eq!(loaded, second);
    }
}
