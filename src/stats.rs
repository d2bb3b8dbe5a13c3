//! Chart-ready projections of a metadata document.
//!
//! These are the aggregates dashboards plot: import frequencies, per-class
//! function and variable counts, and a file-to-import Sankey link table.
//! Only data is produced here; rendering belongs to the consumer.

use serde::Serialize;
use std::collections::HashMap;

use crate::model::FileRecord;

/// Default number of rows/links kept by the projections.
pub const DEFAULT_TOP: usize = 10;
/// Default number of links kept in the Sankey table.
pub const DEFAULT_SANKEY_LINKS: usize = 20;
/// Default number of slices in the library share breakdown.
pub const DEFAULT_SHARE_SLICES: usize = 20;

const MAX_LABEL_LEN: usize = 25;
const LABEL_EDGE: usize = 10;

/// How often a library is imported across the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportCount {
    pub library: String,
    pub count: usize,
}

/// A library's share of all counted imports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryShare {
    pub library: String,
    pub count: usize,
    pub percent: f64,
}

/// A per-class metric (function or variable count of the declaring file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMetric {
    pub class: String,
    pub value: usize,
}

/// Library name used for grouping: the last dotted segment.
pub fn library_name(import: &str) -> &str {
    import.rsplit('.').next().unwrap_or(import)
}

/// Most imported libraries, by count descending then name.
pub fn top_imports(files: &[FileRecord], limit: usize) -> Vec<ImportCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for file in files {
        for import in &file.imports {
            *counts.entry(library_name(import)).or_default() += 1;
        }
    }

    let mut rows: Vec<ImportCount> = counts
        .into_iter()
        .map(|(library, count)| ImportCount {
            library: library.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.library.cmp(&b.library)));
    rows.truncate(limit);
    rows
}

/// Share of each of the top libraries among the top libraries.
pub fn library_shares(files: &[FileRecord], limit: usize) -> Vec<LibraryShare> {
    let top = top_imports(files, limit);
    let total: usize = top.iter().map(|r| r.count).sum();

    top.into_iter()
        .map(|r| LibraryShare {
            percent: if total == 0 {
                0.0
            } else {
                r.count as f64 * 100.0 / total as f64
            },
            library: r.library,
            count: r.count,
        })
        .collect()
}

fn per_class(files: &[FileRecord], limit: usize, metric: fn(&FileRecord) -> usize) -> Vec<ClassMetric> {
    let mut rows: Vec<ClassMetric> = files
        .iter()
        .flat_map(|file| {
            let value = metric(file);
            file.classes.iter().map(move |class| ClassMetric {
                class: class.clone(),
                value,
            })
        })
        .collect();
    // Stable: ties keep document order.
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows.truncate(limit);
    rows
}

/// Classes ranked by the number of functions in their file.
pub fn functions_per_class(files: &[FileRecord], limit: usize) -> Vec<ClassMetric> {
    per_class(files, limit, |f| f.functions.len())
}

/// Classes ranked by the number of variables in their file.
pub fn variables_per_class(files: &[FileRecord], limit: usize) -> Vec<ClassMetric> {
    per_class(files, limit, |f| f.variables.len())
}

/// Sankey diagram input: node labels plus parallel link columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SankeyLinks {
    pub labels: Vec<String>,
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<usize>,
}

/// Accumulates labelled links for a Sankey diagram.
///
/// Labels get indices in first-seen order. Repeated links are merged and
/// counted.
#[derive(Debug, Default)]
pub struct SankeyBuilder {
    index: HashMap<String, usize>,
    labels: Vec<String>,
    links: Vec<((usize, usize), usize)>,
    link_index: HashMap<(usize, usize), usize>,
}

impl SankeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `label`, assigning the next free one if unseen.
    pub fn label_index(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.labels.len();
        self.index.insert(label.to_string(), idx);
        self.labels.push(label.to_string());
        idx
    }

    /// Record one flow from `from` to `to`.
    pub fn link(&mut self, from: &str, to: &str) {
        let key = (self.label_index(from), self.label_index(to));
        match self.link_index.get(&key) {
            Some(&pos) => self.links[pos].1 += 1,
            None => {
                self.link_index.insert(key, self.links.len());
                self.links.push((key, 1));
            }
        }
    }

    /// Keep the `limit` heaviest links (ties in insertion order).
    pub fn finish(self, limit: usize) -> SankeyLinks {
        let mut links = self.links;
        links.sort_by(|a, b| b.1.cmp(&a.1));
        links.truncate(limit);

        let mut out = SankeyLinks {
            labels: self.labels,
            ..Default::default()
        };
        for ((source, target), value) in links {
            out.source.push(source);
            out.target.push(target);
            out.value.push(value);
        }
        out
    }
}

/// File-to-import flows across the repository.
pub fn import_sankey(files: &[FileRecord], limit: usize) -> SankeyLinks {
    let mut builder = SankeyBuilder::new();
    for file in files {
        builder.label_index(&file.file_path);
        for import in &file.imports {
            builder.link(&file.file_path, import);
        }
    }
    builder.finish(limit)
}

/// Compact node label: drops a `.java` suffix and elides long names.
pub fn shorten_label(label: &str) -> String {
    let label = label.strip_suffix(".java").unwrap_or(label);
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= MAX_LABEL_LEN {
        return label.to_string();
    }
    let head: String = chars[..LABEL_EDGE].iter().collect();
    let tail: String = chars[chars.len() - LABEL_EDGE..].iter().collect();
    format!("{}...{}", head, tail)
}

/// All projections bundled for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct RepoStats {
    pub top_imports: Vec<ImportCount>,
    pub library_shares: Vec<LibraryShare>,
    pub functions_per_class: Vec<ClassMetric>,
    pub variables_per_class: Vec<ClassMetric>,
    pub sankey: SankeyLinks,
}

impl RepoStats {
    pub fn compute(files: &[FileRecord], top: usize) -> Self {
        Self {
            top_imports: top_imports(files, top),
            library_shares: library_shares(files, DEFAULT_SHARE_SLICES),
            functions_per_class: functions_per_class(files, top),
            variables_per_class: variables_per_class(files, top),
            sankey: import_sankey(files, DEFAULT_SANKEY_LINKS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::model::Structure;

    fn record(path: &str, classes: &[&str], functions: usize, imports: &[&str]) -> FileRecord {
        let structure = Structure {
            classes: classes.iter().map(|s| s.to_string()).collect(),
            functions: (0..functions).map(|i| format!("f{}", i)).collect(),
            variables: vec!["v".to_string(); functions * 2],
            imports: imports.iter().map(|s| s.to_string()).collect(),
        };
        FileRecord::new(path, Language::Java, structure)
    }

    fn sample() -> Vec<FileRecord> {
        vec![
            record("a/A.java", &["A"], 3, &["java.util.List", "java.util.Map"]),
            record("b/B.java", &["B", "BInner"], 5, &["java.util.List", "org.x.Map"]),
            record("c/C.java", &[], 1, &["java.util.List"]),
        ]
    }

    #[test]
    fn test_top_imports_groups_by_last_segment() {
        let rows = top_imports(&sample(), 10);
        assert_eq!(
            rows,
            vec![
                ImportCount { library: "List".to_string(), count: 3 },
                ImportCount { library: "Map".to_string(), count: 2 },
            ]
        );
        assert_eq!(top_imports(&sample(), 1).len(), 1);
    }

    #[test]
    fn test_library_shares() {
        let shares = library_shares(&sample(), 20);
        assert_eq!(shares.len(), 2);
        assert!((shares[0].percent - 60.0).abs() < 1e-9);
        assert!((shares[1].percent - 40.0).abs() < 1e-9);
        assert!(library_shares(&[], 20).is_empty());
    }

    #[test]
    fn test_functions_per_class() {
        let rows = functions_per_class(&sample(), 2);
        assert_eq!(
            rows,
            vec![
                ClassMetric { class: "B".to_string(), value: 5 },
                ClassMetric { class: "BInner".to_string(), value: 5 },
            ]
        );
    }

    #[test]
    fn test_variables_per_class() {
        let rows = variables_per_class(&sample(), 10);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], ClassMetric { class: "A".to_string(), value: 6 });
    }

    #[test]
    fn test_sankey_builder_merges_links() {
        let mut builder = SankeyBuilder::new();
        assert_eq!(builder.label_index("a.py"), 0);
        builder.link("a.py", "os");
        builder.link("b.py", "os");
        builder.link("a.py", "os");
        assert_eq!(builder.label_index("os"), 1);

        let links = builder.finish(10);
        assert_eq!(links.labels, vec!["a.py", "os", "b.py"]);
        assert_eq!(links.source, vec![0, 2]);
        assert_eq!(links.target, vec![1, 1]);
        assert_eq!(links.value, vec![2, 1]);
    }

    #[test]
    fn test_import_sankey_limit() {
        let links = import_sankey(&sample(), 3);
        assert_eq!(links.source.len(), 3);
        assert_eq!(links.labels[0], "a/A.java");
    }

    #[test]
    fn test_shorten_label() {
        assert_eq!(shorten_label("OrderService.java"), "OrderService");
        assert_eq!(
            shorten_label("com/example/very/long/path/Thing.py"),
            "com/exampl...h/Thing.py"
        );
    }
}
