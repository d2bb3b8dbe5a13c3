//! Java structural extractor using regular expressions.
//!
//! These patterns are heuristics over raw text. Multi-line signatures are
//! missed and some control-flow headers (`else if (...) {`) match as
//! functions. A file never fails to extract.

use regex::Regex;
use std::collections::BTreeSet;

use super::{ParseError, ParsedSource, StructureExtractor};
use crate::language::Language;

lazy_static::lazy_static! {
    static ref CLASS_RE: Regex = Regex::new(r"\bclass\s+(\w+)").unwrap();
    // [modifier] ReturnType name(params) {
    static ref FUNCTION_RE: Regex =
        Regex::new(r"(?:public|private|protected)?\s+\w+\s+(\w+)\s*\(.*?\)\s*\{").unwrap();
    static ref VARIABLE_RE: Regex =
        Regex::new(r"\b(?:int|String|float|double|boolean|char)\s+(\w+)\s*[=;]").unwrap();
    static ref IMPORT_RE: Regex = Regex::new(r"import\s+([\w.]+);").unwrap();
}

pub struct JavaExtractor;

impl JavaExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// All first-group matches of `re`, in match order.
fn captures(re: &Regex, source: &str) -> Vec<String> {
    re.captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

impl StructureExtractor for JavaExtractor {
    fn language(&self) -> Language {
        Language::Java
    }

    fn parse(&self, source: &str) -> Result<ParsedSource, ParseError> {
        Ok(ParsedSource::text(source))
    }

    fn classes(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError> {
        Ok(captures(&CLASS_RE, &parsed.source))
    }

    fn functions(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError> {
        Ok(captures(&FUNCTION_RE, &parsed.source))
    }

    fn variables(&self, parsed: &ParsedSource) -> Result<Vec<String>, ParseError> {
        Ok(captures(&VARIABLE_RE, &parsed.source))
    }

    fn imports(&self, parsed: &ParsedSource) -> Result<BTreeSet<String>, ParseError> {
        Ok(captures(&IMPORT_RE, &parsed.source).into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
package com.example.app;

import java.util.List;
import java.util.Map;
import java.util.List;
import static org.junit.Assert.assertEquals;

public class OrderService {
    private int count = 0;
    private String name;
    private List<String> items;

    public OrderService(String name) {
        this.name = name;
    }

    public int total(int a, int b) {
        int sum = a + b;
        return sum;
    }

    private void reset() {
        count = 0;
    }

    static class Helper {
        boolean ready;
    }
}
"#;

    #[test]
    fn test_classes() {
        let structure = JavaExtractor::new().extract(SOURCE).unwrap();
        assert_eq!(structure.classes, vec!["OrderService", "Helper"]);
    }

    #[test]
    fn test_functions() {
        let structure = JavaExtractor::new().extract(SOURCE).unwrap();
        // Constructors look like a method with the class name as return type.
        assert_eq!(structure.functions, vec!["OrderService", "total", "reset"]);
    }

    #[test]
    fn test_variables_keep_duplicates_in_order() {
        let structure = JavaExtractor::new().extract(SOURCE).unwrap();
        assert_eq!(structure.variables, vec!["count", "name", "sum", "ready"]);

        let dupes = JavaExtractor::new()
            .extract("int i = 0;\nint i = 1;\n")
            .unwrap();
        assert_eq!(dupes.variables, vec!["i", "i"]);
    }

    #[test]
    fn test_imports_deduplicated() {
        let structure = JavaExtractor::new().extract(SOURCE).unwrap();
        let expected: BTreeSet<String> = ["java.util.List", "java.util.Map"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(structure.imports, expected);
    }

    #[test]
    fn test_never_fails() {
        let structure = JavaExtractor::new().extract("}}}{{ not java at all").unwrap();
        assert!(structure.classes.is_empty());
        assert!(structure.functions.is_empty());
        assert!(structure.variables.is_empty());
        assert!(structure.imports.is_empty());
    }
}
