//! Gradle build scripts (`build.gradle`, `build.gradle.kts`).

use regex::Regex;

use super::ManifestFormat;

lazy_static::lazy_static! {
    // implementation 'g:a:v' / implementation("g:a:v") and sibling configurations
    static ref DEPENDENCY_RE: Regex = Regex::new(
        r#"\b(?:implementation|api|compileOnly|runtimeOnly|annotationProcessor)\s*\(?\s*['"]([\w\-.:]+)['"]"#
    )
    .unwrap();
}

/// Coordinates declared through dependency configurations, in order.
pub struct GradleBuild {
    file_name: &'static str,
}

impl GradleBuild {
    /// Groovy DSL (`build.gradle`).
    pub const fn groovy() -> Self {
        Self {
            file_name: "build.gradle",
        }
    }

    /// Kotlin DSL (`build.gradle.kts`).
    pub const fn kotlin() -> Self {
        Self {
            file_name: "build.gradle.kts",
        }
    }
}

impl ManifestFormat for GradleBuild {
    fn file_name(&self) -> &'static str {
        self.file_name
    }

    fn dependencies(&self, content: &str) -> Vec<String> {
        DEPENDENCY_RE
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
