//! Reduced projection of a metadata document for summarization.
//!
//! Import sets dominate document size and add little to a prose summary, so
//! the digest keeps everything except per-file imports.

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::model::{ProjectMetadata, RepoModel};

/// File record without imports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DigestFile {
    pub file_path: String,
    pub language: Language,
    pub classes: Vec<String>,
    pub functions: Vec<String>,
    pub variables: Vec<String>,
}

/// Document handed to the summarization collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SummaryDigest {
    pub project_metadata: ProjectMetadata,
    pub files: Vec<DigestFile>,
}

impl SummaryDigest {
    pub fn from_model(model: &RepoModel) -> Self {
        Self {
            project_metadata: model.project_metadata.clone(),
            files: model
                .files
                .iter()
                .map(|f| DigestFile {
                    file_path: f.file_path.clone(),
                    language: f.language,
                    classes: f.classes.clone(),
                    functions: f.functions.clone(),
                    variables: f.variables.clone(),
                })
                .collect(),
        }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&RepoModel> for SummaryDigest {
    fn from(model: &RepoModel) -> Self {
        Self::from_model(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileRecord, Structure};

    #[test]
    fn test_digest_strips_imports_only() {
        let structure = Structure {
            classes: vec!["Foo".to_string()],
            functions: vec!["bar".to_string()],
            variables: vec!["x".to_string(), "x".to_string()],
            imports: ["os".to_string()].into_iter().collect(),
        };
        let mut model = RepoModel::new(Language::Python);
        model.project_metadata.dependencies.push("requests".to_string());
        model.files.push(FileRecord::new("app.py", Language::Python, structure));

        let digest = SummaryDigest::from(&model);
        assert_eq!(digest.project_metadata, model.project_metadata);
        assert_eq!(digest.files[0].classes, vec!["Foo"]);
        assert_eq!(digest.files[0].variables, vec!["x", "x"]);

        let value: serde_json::Value = serde_json::from_str(&digest.to_json().unwrap()).unwrap();
        assert!(value["files"][0].get("imports").is_none());
        assert_eq!(value["files"][0]["file_path"], "app.py");
    }
}
