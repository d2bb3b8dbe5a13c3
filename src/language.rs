//! Dominant-language detection from file extensions.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::FileEntry;

/// Languages the extractor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Unknown => "unknown",
        }
    }

    /// Source file extension (without dot), if the language has one.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Language::Python => Some("py"),
            Language::Java => Some("java"),
            Language::Unknown => None,
        }
    }

    /// Determine language from a file extension (without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            _ => None,
        }
    }

    /// Whether `path` is a source file of this language.
    pub fn matches_path(&self, path: &str) -> bool {
        match self.extension() {
            Some(ext) => extension_of(path) == Some(ext),
            None => false,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn extension_of(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}

/// Classify the dominant language of a tree.
///
/// Only blobs vote, and only `.py` and `.java` are counted. Python wins ties;
/// with neither extension present the result is `Unknown`.
pub fn detect(entries: &[FileEntry]) -> Language {
    let mut python = 0usize;
    let mut java = 0usize;

    for entry in entries.iter().filter(|e| e.is_blob()) {
        match extension_of(&entry.path).and_then(Language::from_extension) {
            Some(Language::Python) => python += 1,
            Some(Language::Java) => java += 1,
            _ => {}
        }
    }

    if python == 0 && java == 0 {
        Language::Unknown
    } else if python >= java {
        Language::Python
    } else {
        Language::Java
    }
}
