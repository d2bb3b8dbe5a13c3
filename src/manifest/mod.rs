//! Dependency manifest extraction.
//!
//! Each supported manifest format implements `ManifestFormat`. The formats
//! searched for a repository depend on its dominant language:
//!
//! ```text
//! python → requirements.txt
//! java   → pom.xml, build.gradle, build.gradle.kts
//! ```
//!
//! The first file name found wins; only that manifest is read.

use crate::language::Language;
use crate::model::FileEntry;

mod gradle;
mod maven;
mod requirements;

pub use gradle::GradleBuild;
pub use maven::MavenPom;
pub use requirements::RequirementsTxt;

/// A dependency manifest format.
pub trait ManifestFormat: Send + Sync {
    /// File name this format is stored under (e.g. `pom.xml`).
    fn file_name(&self) -> &'static str;

    /// Extract dependency descriptors from manifest content.
    ///
    /// Formats that can fail report the failure as a descriptor string
    /// rather than an error, so it stays visible in the output document.
    fn dependencies(&self, content: &str) -> Vec<String>;
}

static REQUIREMENTS_TXT: RequirementsTxt = RequirementsTxt;
static MAVEN_POM: MavenPom = MavenPom;
static GRADLE_BUILD: GradleBuild = GradleBuild::groovy();
static GRADLE_KOTLIN_BUILD: GradleBuild = GradleBuild::kotlin();

static PYTHON_FORMATS: &[&dyn ManifestFormat] = &[&REQUIREMENTS_TXT];
static JAVA_FORMATS: &[&dyn ManifestFormat] = &[&MAVEN_POM, &GRADLE_BUILD, &GRADLE_KOTLIN_BUILD];

/// Manifest formats for a language, in search priority order.
pub fn formats_for(language: Language) -> &'static [&'static dyn ManifestFormat] {
    match language {
        Language::Python => PYTHON_FORMATS,
        Language::Java => JAVA_FORMATS,
        Language::Unknown => &[],
    }
}

/// A manifest found in a repository tree.
pub struct LocatedManifest<'a> {
    pub format: &'static dyn ManifestFormat,
    pub path: &'a str,
}

/// Find the manifest to read for `language`.
///
/// Formats are tried in priority order; within a format the first blob in
/// tree order whose file name matches wins.
pub fn locate(entries: &[FileEntry], language: Language) -> Option<LocatedManifest<'_>> {
    formats_for(language).iter().find_map(|format| {
        entries
            .iter()
            .find(|e| e.is_blob() && e.file_name() == format.file_name())
            .map(|e| LocatedManifest {
                format: *format,
                path: e.path.as_str(),
            })
    })
}
