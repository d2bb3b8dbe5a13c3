//! Plain requirement lists (`requirements.txt`).

use super::ManifestFormat;

/// One requirement per line; blank lines and `#` comments are dropped.
pub struct RequirementsTxt;

impl ManifestFormat for RequirementsTxt {
    fn file_name(&self) -> &'static str {
        "requirements.txt"
    }

    fn dependencies(&self, content: &str) -> Vec<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements() {
        let content = "# pinned\nrequests==2.31.0\n\n  flask>=2.0  \n   # indented comment\nnumpy\r\n";
        assert_eq!(
            RequirementsTxt.dependencies(content),
            vec!["requests==2.31.0", "flask>=2.0", "numpy"]
        );
    }

    #[test]
    fn test_empty_requirements() {
        assert!(RequirementsTxt.dependencies("\n\n# nothing\n").is_empty());
    }
}
