//! End-to-end extraction over in-memory repositories built from testdata.

use std::collections::BTreeSet;
use std::path::PathBuf;

use repomap::{Config, Language, ModelBuilder, RepoModel, StaticSource};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn fixture(rel: &str) -> String {
    std::fs::read_to_string(testdata_path().join(rel))
        .unwrap_or_else(|e| panic!("reading fixture {}: {}", rel, e))
}

fn python_repo() -> StaticSource {
    StaticSource::new()
        .with_dir("shop")
        .with_file("shop/orders.py", &fixture("python/orders.py"))
        .with_file("shop/broken.py", &fixture("python/broken.py"))
        .with_file("shop/legacy.py", &fixture("python/legacy.py"))
        .with_file("shop/__init__.py", "")
        .with_dir("shop/tests")
        .with_file("shop/tests/test_orders.py", "def test_total():\n    assert True\n")
        .with_file("shop/Legacy.java", &fixture("java/OrderService.java"))
        .with_file("requirements.txt", &fixture("python/requirements.txt"))
}

fn java_repo() -> StaticSource {
    StaticSource::new()
        .with_file("build.gradle", &fixture("java/build.gradle"))
        .with_dir("src/main/java")
        .with_file(
            "src/main/java/com/example/OrderService.java",
            &fixture("java/OrderService.java"),
        )
        .with_file(
            "src/test/java/com/example/OrderServiceTest.java",
            "class OrderServiceTest {}\n",
        )
        .with_file("pom.xml", &fixture("java/pom.xml"))
        .with_file("scripts/release.py", "VERSION = 1\n")
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Python
// =============================================================================

#[test]
fn test_python_repository() {
    let source = python_repo();
    let (model, stats) = ModelBuilder::new(&source).build_with_stats();

    assert_eq!(model.project_metadata.language, Language::Python);
    assert_eq!(
        model.project_metadata.dependencies,
        vec!["requests==2.31.0", "flask>=2.0", "streamlit"]
    );

    // broken.py and the Python 2 legacy.py fail to parse, __init__.py is
    // empty, the test file is skipped
    assert_eq!(model.files.len(), 1);
    assert_eq!(stats.parse_failures, 2);
    assert_eq!(stats.empty_files, 1);
    assert_eq!(stats.skipped_tests, 1);
    assert_eq!(stats.skipped_language, 2);

    let record = &model.files[0];
    assert_eq!(record.file_path, "shop/orders.py");
    assert_eq!(record.language, Language::Python);
    assert_eq!(record.classes, vec!["OrderService", "Meta"]);
    assert_eq!(record.functions, vec!["__init__", "helper", "inner"]);
    assert_eq!(
        record.variables,
        vec![
            "MAX_ITEMS",
            "default_currency",
            "cache",
            "result",
            "ordering",
            "total",
            "count"
        ]
    );
    assert_eq!(
        record.imports,
        set(&["__future__", "os", "json", "collections", ".models"])
    );
}

// =============================================================================
// Java
// =============================================================================

#[test]
fn test_java_repository_prefers_pom() {
    let source = java_repo();
    let (model, stats) = ModelBuilder::new(&source).build_with_stats();

    assert_eq!(model.project_metadata.language, Language::Java);
    // pom.xml wins over build.gradle even though the gradle file comes first
    assert_eq!(
        model.project_metadata.dependencies,
        vec!["org.springframework:spring-core:6.1.0", "junit:junit:"]
    );

    assert_eq!(model.files.len(), 1);
    assert_eq!(stats.skipped_tests, 1);

    let record = &model.files[0];
    assert_eq!(record.file_path, "src/main/java/com/example/OrderService.java");
    assert_eq!(record.language, Language::Java);
    assert_eq!(record.classes, vec!["OrderService"]);
    assert_eq!(record.functions, vec!["OrderService", "total"]);
    assert_eq!(record.variables, vec!["count", "name", "sum"]);
    assert_eq!(
        record.imports,
        set(&[
            "java.util.List",
            "java.util.ArrayList",
            "com.example.orders.model.Order"
        ])
    );
}

#[test]
fn test_java_repository_falls_back_to_gradle() {
    let source = StaticSource::new()
        .with_file("App.java", "public class App {}\n")
        .with_file("app/build.gradle", &fixture("java/build.gradle"));
    let model = ModelBuilder::new(&source).build();

    assert_eq!(
        model.project_metadata.dependencies,
        vec![
            "com.google.guava:guava:32.1.2-jre",
            "org.apache.commons:commons-lang3:3.13.0",
            "org.projectlombok:lombok:1.18.30",
        ]
    );
}

#[test]
fn test_malformed_pom_is_annotated() {
    let source = StaticSource::new()
        .with_file("App.java", "public class App {}\n")
        .with_file("pom.xml", &fixture("java/pom_malformed.xml"));
    let model = ModelBuilder::new(&source).build();

    let deps = &model.project_metadata.dependencies;
    assert_eq!(deps.len(), 1);
    assert!(deps[0].starts_with("Error parsing pom.xml: "));
    assert_eq!(model.files.len(), 1);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_records_follow_document_invariants() {
    for source in [python_repo(), java_repo()] {
        let model = ModelBuilder::new(&source).build();
        let language = model.project_metadata.language;
        let extension = language.extension().unwrap();

        for record in &model.files {
            assert_eq!(record.language, language);
            assert!(record.file_path.ends_with(extension));
            assert!(!repomap::is_test_path(&record.file_path));
        }
    }
}

#[test]
fn test_tie_goes_to_python() {
    let source = StaticSource::new()
        .with_file("a.py", "a = 1\n")
        .with_file("A.java", "class A {}\n");
    let model = ModelBuilder::new(&source).build();
    assert_eq!(model.project_metadata.language, Language::Python);
    assert_eq!(model.files.len(), 1);
    assert_eq!(model.files[0].file_path, "a.py");
}

#[test]
fn test_unknown_language_has_no_files() {
    let source = StaticSource::new()
        .with_file("README.md", "# readme\n")
        .with_file("requirements.txt", "requests\n");
    let model = ModelBuilder::new(&source).build();
    assert_eq!(model, RepoModel::new(Language::Unknown));
}

#[test]
fn test_build_is_idempotent() {
    let source = python_repo();
    let first = ModelBuilder::new(&source).build();
    let second = ModelBuilder::new(&source).build();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_unreachable_host_persists_degenerate_document() {
    let temp = tempfile::TempDir::new().unwrap();
    let output = temp.path().join("repo_metadata.json");

    let mut config = Config::for_project("", "");
    config.gitlab.api_base = "http://127.0.0.1:1/api/v4".to_string();
    config.output = output.clone();

    let (model, stats) = repomap::run_extraction_with(&config).expect("should persist");
    assert_eq!(model, RepoModel::new(Language::Unknown));
    assert_eq!(stats.entries, 0);
    assert_eq!(RepoModel::load(&output).unwrap(), model);
}
