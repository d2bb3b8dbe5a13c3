//! Python structural extractor using tree-sitter.

use std::collections::BTreeSet;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use super::{ParseError, ParsedSource, StructureExtractor};
use crate::language::Language as SourceLanguage;

/// Class and function definitions anywhere in the tree.
const DECLARATION_QUERY: &str = r#"
(class_definition
  name: (identifier) @class_name
) @class

(function_definition
  name: (identifier) @func_name
) @function
"#;

/// Plain `name = value` assignments. Annotated assignments carry a `type`
/// field and are skipped.
const ASSIGNMENT_QUERY: &str = r#"
(assignment
  left: (identifier) @target
  !type
)
"#;

/// Module paths named by import statements.
const IMPORT_QUERY: &str = r#"
; import a.b, c
(import_statement
  name: (dotted_name) @module_name
)

; import a.b as ab
(import_statement
  name: (aliased_import
    name: (dotted_name) @module_name
  )
)

; from a.b import x
(import_from_statement
  module_name: (dotted_name) @module_name
)

; from .a import x / from .. import x
(import_from_statement
  module_name: (relative_import) @module_name
)

; from __future__ import x
(future_import_statement) @future
"#;

const FUTURE_MODULE: &str = "__future__";

pub struct PythonExtractor {
    language: Language,
}

impl PythonExtractor {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Setup(e.to_string()))?;
        Ok(parser)
    }

    fn query(&self, source: &str) -> Result<Query, ParseError> {
        Query::new(&self.language, source).map_err(|e| ParseError::Setup(e.to_string()))
    }

    fn root<'a>(&self, parsed: &'a ParsedSource) -> Result<Node<'a>, ParseError> {
        parsed
            .tree
            .as_ref()
            .map(|t| t.root_node())
            .ok_or_else(|| ParseError::Setup("source was not parsed".to_string()))
    }

    /// Collect `(definition start, name)` pairs for one capture kind.
    fn declarations(
        &self,
        parsed: &ParsedSource,
        name_capture: &str,
        node_capture: &str,
    ) -> Result<Vec<String>, ParseError> {
        let query = self.query(DECLARATION_QUERY)?;
        let root = self.root(parsed)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, parsed.source.as_bytes());

        let mut found: Vec<(usize, String)> = Vec::new();

        while let Some(m) = matches.next() {
            let mut name = None;
            let mut start = None;

            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                if capture_name == name_capture {
                    name = Some(parsed.node_text(capture.node).to_string());
                } else if capture_name == node_capture && !is_async(capture.node) {
                    start = Some(capture.node.start_byte());
                }
            }

            if let (Some(name), Some(start)) = (name, start) {
                if !name.is_empty() {
                    found.push((start, name));
                }
            }
        }

        // Depth-first pre-order is source order of the definitions.
        found.sort_by_key(|(start, _)| *start);
        Ok(found.into_iter().map(|(_, name)| name).collect())
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureExtractor for PythonExtractor {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::Python
    }

    fn parse(&self, source: &str) -> Result<ParsedSource, ParseError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::Setup("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let position = bad.start_position();
            let message = if bad.is_missing() {
                format!("missing {}", bad.kind())
            } else {
                "invalid syntax".to_string()
            };
            return Err(ParseError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
                message,
            });
        }

        if let Some(err) = python3_violation(root, source) {
            return Err(err);
        }

        Ok(ParsedSource {
            source: source.to_string(),
            tree: Some(tree),
        })
    }

    fn classes(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError> {
        self.declarations(parsed, "class_name", "class")
    }

    fn functions(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError> {
        self.declarations(parsed, "func_name", "function")
    }

    fn variables(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError> {
        let query = self.query(ASSIGNMENT_QUERY)?;
        let root = self.root(parsed)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, parsed.source.as_bytes());

        let mut found: Vec<(usize, String)> = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let name = parsed.node_text(capture.node);
                if !name.is_empty() {
                    found.push((capture.node.start_byte(), name.to_string()));
                }
            }
        }

        found.sort_by_key(|(start, _)| *start);
        Ok(found.into_iter().map(|(_, name)| name).collect())
    }

    fn imports(&self, parsed: &ParsedSource) -> Result<BTreeSet<String>, ParseError> {
        let query = self.query(IMPORT_QUERY)?;
        let root = self.root(parsed)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, parsed.source.as_bytes());

        let mut imports = BTreeSet::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "module_name" => {
                        let name = parsed.node_text(capture.node).trim();
                        if !name.is_empty() {
                            imports.insert(name.to_string());
                        }
                    }
                    "future" => {
                        imports.insert(FUTURE_MODULE.to_string());
                    }
                    _ => {}
                }
            }
        }

        Ok(imports)
    }
}

/// `async def` is a separate definition kind and is not collected.
fn is_async(node: Node) -> bool {
    let mut walker = node.walk();
    let found = node.children(&mut walker).any(|c| c.kind() == "async");
    found
}

/// Constructs the grammar accepts that Python 3 rejects: Python 2 `print`
/// and `exec` statements, and block indentation that is only consistent
/// for one tab size.
fn python3_violation(root: Node, source: &str) -> Option<ParseError> {
    let lines: Vec<&str> = source.lines().collect();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let message = match node.kind() {
            "print_statement" => Some("Missing parentheses in call to 'print'"),
            "exec_statement" => Some("Missing parentheses in call to 'exec'"),
            "block" if !consistent_block(node, &lines) => {
                Some("inconsistent use of tabs and spaces in indentation")
            }
            _ => None,
        };
        if let Some(message) = message {
            let position = node.start_position();
            return Some(ParseError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
                message: message.to_string(),
            });
        }

        let mut walker = node.walk();
        let children: Vec<Node> = node.children(&mut walker).collect();
        // Reverse so the first child is visited first.
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Indentation width of the line `node` starts, as `(tab size 8, tab size 1)`.
/// `None` if the node does not begin its line.
fn line_indent(node: Node, lines: &[&str]) -> Option<(usize, usize)> {
    let position = node.start_position();
    let line = lines.get(position.row)?;
    let prefix = line.get(..position.column)?;

    let (mut col, mut alt) = (0usize, 0usize);
    for ch in prefix.chars() {
        match ch {
            ' ' => {
                col += 1;
                alt += 1;
            }
            '\t' => {
                col = (col / 8 + 1) * 8;
                alt += 1;
            }
            '\x0c' => {
                col = 0;
                alt = 0;
            }
            _ => return None,
        }
    }
    Some((col, alt))
}

/// Statements of a block share one indentation, deeper than the header line
/// under both tab sizes.
fn consistent_block(block: Node, lines: &[&str]) -> bool {
    let header = block.parent().and_then(|p| line_indent(p, lines));

    let mut expected: Option<(usize, usize)> = None;
    let mut walker = block.walk();
    for child in block.named_children(&mut walker) {
        if child.kind() == "comment" {
            continue;
        }
        let indent = match line_indent(child, lines) {
            Some(indent) => indent,
            None => continue,
        };
        if let Some((col, alt)) = header {
            if indent.0 <= col || indent.1 <= alt {
                return false;
            }
        }
        match expected {
            None => expected = Some(indent),
            Some(first) if first != indent => return false,
            Some(_) => {}
        }
    }
    true
}

/// Find the first `ERROR` or `MISSING` node in document order.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut walker = node.walk();
    for child in node.children(&mut walker) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}
