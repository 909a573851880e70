//! Integration tests for build mode.
//!
//! Each test lays out a small project in a temp directory and runs the same
//! entry point the binary uses.

use clap::Parser;
use frontdev_cli::cli::Cli;
use frontdev_cli::commands;
use frontdev_cli::{BuildError, CliError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_project(dir: &Path) {
    fs::write(
        dir.join("index.tsx"),
        r#"
interface Props { name: string }
const greet = ({ name }: Props): string => `Hello, ${name}!`;
document.body.textContent = greet({ name: "world" });
"#,
    )
    .unwrap();
    fs::write(dir.join("index.html"), "<!doctype html><script src=\"index.js\"></script>").unwrap();
    fs::write(dir.join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();
}

fn build_cli(dir: &Path) -> Cli {
    Cli::parse_from(["frontdev", "--build", "--cwd", dir.to_str().unwrap()])
}

#[tokio::test]
async fn test_build_writes_bundle_and_copies_assets() {
    let temp = TempDir::new().unwrap();
    let project = temp.path();
    write_project(project);

    commands::execute(build_cli(project)).await.unwrap();

    let dist = project.join("dist");
    let js = fs::read_to_string(dist.join("index.js")).unwrap();
    assert!(js.contains("sourceMappingURL=index.js.map"));
    assert!(!js.contains("interface Props"), "types should be stripped");
    assert!(dist.join("index.js.map").exists());

    assert_eq!(
        fs::read(dist.join("index.html")).unwrap(),
        fs::read(project.join("index.html")).unwrap()
    );
    assert_eq!(fs::read(dist.join("favicon.ico")).unwrap(), [0u8, 0, 1, 0]);
}

#[tokio::test]
async fn test_build_missing_asset_fails_after_bundling() {
    let temp = TempDir::new().unwrap();
    let project = temp.path();
    write_project(project);
    fs::remove_file(project.join("favicon.ico")).unwrap();

    let err = commands::execute(build_cli(project)).await.unwrap_err();

    match err {
        CliError::Build(BuildError::MissingAsset(path)) => {
            assert!(path.ends_with("favicon.ico"))
        }
        other => panic!("expected MissingAsset, got {other:?}"),
    }
    // The bundle is already written; no asset is copied.
    assert!(project.join("dist/index.js").exists());
    assert!(!project.join("dist/index.html").exists());
}

#[tokio::test]
async fn test_build_syntax_error_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let project = temp.path();
    write_project(project);
    fs::write(project.join("index.tsx"), "const = ;").unwrap();

    let err = commands::execute(build_cli(project)).await.unwrap_err();

    assert!(matches!(err, CliError::Build(BuildError::Bundler(_))));
    assert!(!project.join("dist/index.js").exists());
    assert!(!project.join("dist/index.html").exists());
}

#[tokio::test]
async fn test_build_honors_config_file() {
    let temp = TempDir::new().unwrap();
    let project = temp.path();
    write_project(project);
    fs::write(
        project.join("frontdev.toml"),
        r#"
outfile = "public/app.js"
minify = false
"#,
    )
    .unwrap();

    commands::execute(build_cli(project)).await.unwrap();

    let public = project.join("public");
    assert!(public.join("app.js").exists());
    assert!(public.join("app.js.map").exists());
    assert!(public.join("index.html").exists());
    assert!(public.join("favicon.ico").exists());
    assert!(!project.join("dist").exists());
}

#[tokio::test]
async fn test_build_rejects_missing_project_dir() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");

    let err = commands::execute(build_cli(&missing)).await.unwrap_err();

    assert!(matches!(err, CliError::InvalidArgument(_)));
}
