//! Maven build descriptors (`pom.xml`).
//!
//! The POM is parsed as a namespace-aware tree. The default namespace is
//! taken from the root element; every `dependency` element in it yields
//! `group:artifact:version`.

use roxmltree::{Document, Node};

use super::ManifestFormat;

const DEPENDENCY: &str = "dependency";
const GROUP_ID: &str = "groupId";
const ARTIFACT_ID: &str = "artifactId";
const VERSION: &str = "version";

pub struct MavenPom;

impl MavenPom {
    fn parse(content: &str) -> Result<Vec<String>, roxmltree::Error> {
        let doc = Document::parse(content)?;
        let root = doc.root_element();
        let namespace = root.tag_name().namespace();

        let deps = root
            .descendants()
            .filter(|n| is_element(n, DEPENDENCY, namespace))
            .map(|dep| {
                format!(
                    "{}:{}:{}",
                    child_text(&dep, GROUP_ID, namespace),
                    child_text(&dep, ARTIFACT_ID, namespace),
                    child_text(&dep, VERSION, namespace)
                )
            })
            .collect();

        Ok(deps)
    }
}

impl ManifestFormat for MavenPom {
    fn file_name(&self) -> &'static str {
        "pom.xml"
    }

    fn dependencies(&self, content: &str) -> Vec<String> {
        match Self::parse(content) {
            Ok(deps) => deps,
            Err(e) => {
                tracing::warn!(error = %e, "malformed pom.xml");
                vec![format!("Error parsing pom.xml: {}", e)]
            }
        }
    }
}

fn is_element(node: &Node, name: &str, namespace: Option<&str>) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == namespace
}

/// Trimmed text of the first matching child, or "" if absent.
fn child_text<'a>(node: &Node<'a, '_>, name: &str, namespace: Option<&str>) -> &'a str {
    node.children()
        .find(|c| is_element(c, name, namespace))
        .and_then(|c| c.text())
        .map(str::trim)
        .unwrap_or("")
}
