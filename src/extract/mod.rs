//! Per-file structural extraction.
//!
//! Every extractor answers the same four questions about a source file:
//! which classes, functions, variables and imports it declares.
//!
//! ```text
//! StructureExtractor trait
//!     ├── PythonExtractor  (tree-sitter syntax tree walk)
//!     └── JavaExtractor    (regular-expression heuristics)
//! ```
//!
//! Extractors are looked up by `Language`; `Unknown` has no extractor and
//! extracts to an empty structure.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::language::Language;
use crate::model::Structure;

mod java;
mod python;

pub use java::JavaExtractor;
pub use python::PythonExtractor;

/// Errors raised when a structural parser rejects a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The source is not syntactically valid.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    /// The parser itself could not be set up.
    #[error("parser setup failed: {0}")]
    Setup(String),
}

/// Source text prepared for extraction.
///
/// Tree-based extractors keep their syntax tree here so the four capability
/// passes share one parse.
pub struct ParsedSource {
    pub source: String,
    pub tree: Option<tree_sitter::Tree>,
}

impl ParsedSource {
    /// Source without a syntax tree.
    pub fn text(source: &str) -> Self {
        Self {
            source: source.to_string(),
            tree: None,
        }
    }

    /// Text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Language-specific structural extractor.
pub trait StructureExtractor: Send + Sync {
    /// The language this extractor handles.
    fn language(&self) -> Language;

    /// Prepare source for the capability passes.
    ///
    /// Returns an error if the source is rejected as a whole.
    fn parse(&self, source: &str) -> Result<ParsedSource, ParseError>;

    /// Declared class names, in declaration order.
    fn classes(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError>;

    /// Declared function and method names, in declaration order.
    fn functions(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError>;

    /// Assigned variable names. Duplicates are kept.
    fn variables(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError>;

    /// Imported module paths, deduplicated.
    fn imports(&self, parsed: &ParsedSource) -> Result<BTreeSet<String>, ParseError>;

    /// Run all four passes over one file.
    fn extract(&self, source: &str) -> Result<Structure, ParseError> {
        let parsed = self.parse(source)?;
        Ok(Structure {
            classes: self.classes(&parsed)?,
            functions: self.functions(&parsed)?,
            variables: self.variables(&parsed)?,
            imports: self.imports(&parsed)?,
        })
    }
}

static PYTHON_EXTRACTOR: Lazy<PythonExtractor> = Lazy::new(PythonExtractor::new);
static JAVA_EXTRACTOR: Lazy<JavaExtractor> = Lazy::new(JavaExtractor::new);

/// Get the extractor for a language.
pub fn for_language(language: Language) -> Option<&'static dyn StructureExtractor> {
    match language {
        Language::Python => Some(&*PYTHON_EXTRACTOR),
        Language::Java => Some(&*JAVA_EXTRACTOR),
        Language::Unknown => None,
    }
}

/// Extract the structure of `source` as `language`.
///
/// Languages without an extractor yield an empty structure.
pub fn extract(language: Language, source: &str) -> Result<Structure, ParseError> {
    match for_language(language) {
        Some(extractor) => extractor.extract(source),
        None => Ok(Structure::default()),
    }
}
