//! Repository model builder.
//!
//! Drives one extraction run: list the tree, detect the language, extract
//! every eligible source file in tree order, read the manifest, and assemble
//! the `RepoModel`. Runs are sequential and never abort on per-file problems.

use crate::extract;
use crate::language::{self, Language};
use crate::manifest;
use crate::model::{FileEntry, FileRecord, RepoModel};
use crate::source::RepositorySource;

/// Path segments that mark test-only code.
pub const TEST_MARKERS: &[&str] = &["test", "tests", "__tests__"];

/// Whether any segment of `path` is a test marker (case-insensitive).
pub fn is_test_path(path: &str) -> bool {
    path.split('/')
        .any(|segment| TEST_MARKERS.iter().any(|m| segment.eq_ignore_ascii_case(m)))
}

/// Counters for one run. Logged, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Entries returned by the tree listing.
    pub entries: usize,
    /// Blobs under a test-marker segment.
    pub skipped_tests: usize,
    /// Blobs whose extension does not match the dominant language.
    pub skipped_language: usize,
    /// Files whose content could not be fetched.
    pub fetch_failures: usize,
    /// Files with empty content.
    pub empty_files: usize,
    /// Files the structural parser rejected.
    pub parse_failures: usize,
    /// Records written to the document.
    pub records: usize,
}

/// Builds a `RepoModel` from a repository source.
pub struct ModelBuilder<'a, S: RepositorySource + ?Sized> {
    source: &'a S,
}

impl<'a, S: RepositorySource + ?Sized> ModelBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Build the document.
    pub fn build(&self) -> RepoModel {
        self.build_with_stats().0
    }

    /// Build the document and report run counters.
    pub fn build_with_stats(&self) -> (RepoModel, BuildStats) {
        let entries = self.source.list_tree();
        let language = language::detect(&entries);

        let mut stats = BuildStats {
            entries: entries.len(),
            ..Default::default()
        };
        let mut model = RepoModel::new(language);

        tracing::info!(entries = entries.len(), %language, "detected dominant language");

        for entry in entries.iter().filter(|e| e.is_blob()) {
            if is_test_path(&entry.path) {
                stats.skipped_tests += 1;
                continue;
            }
            if !language.matches_path(&entry.path) {
                stats.skipped_language += 1;
                continue;
            }
            if let Some(record) = self.extract_file(entry, language, &mut stats) {
                model.files.push(record);
            }
        }

        model.project_metadata.dependencies = self.dependencies(&entries, language);
        stats.records = model.files.len();

        tracing::info!(
            records = stats.records,
            fetch_failures = stats.fetch_failures,
            parse_failures = stats.parse_failures,
            dependencies = model.project_metadata.dependencies.len(),
            "extraction finished"
        );

        (model, stats)
    }

    fn extract_file(
        &self,
        entry: &FileEntry,
        language: Language,
        stats: &mut BuildStats,
    ) -> Option<FileRecord> {
        tracing::debug!(path = %entry.path, "processing file");

        let content = match self.source.file_content(&entry.path) {
            Some(content) => content,
            None => {
                stats.fetch_failures += 1;
                return None;
            }
        };
        if content.is_empty() {
            stats.empty_files += 1;
            return None;
        }

        match extract::extract(language, &content) {
            Ok(structure) => Some(FileRecord::new(entry.path.clone(), language, structure)),
            Err(e) => {
                tracing::debug!(path = %entry.path, error = %e, "dropping unparseable file");
                stats.parse_failures += 1;
                None
            }
        }
    }

    fn dependencies(&self, entries: &[FileEntry], language: Language) -> Vec<String> {
        let located = match manifest::locate(entries, language) {
            Some(found) => found,
            None => return Vec::new(),
        };

        tracing::debug!(path = located.path, "reading manifest");
        match self.source.file_content(located.path) {
            Some(content) if !content.is_empty() => located.format.dependencies(&content),
            _ => Vec::new(),
        }
    }
}
