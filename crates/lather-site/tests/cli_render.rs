#![forbid(unsafe_code)]

//! The `lather` command surface against a content directory on disk.

use std::path::Path;

use lather_content::ContentFile;
use lather_site::app::Page;
use lather_site::cli::{Cli, Commands, RenderArgs, run};
use lather_site::SiteError;

fn seed(dir: &Path) {
    for file in ContentFile::ALL {
        let json = match file {
            ContentFile::Fats => {
                r#"{"olive-oil": {"name": "Olive Oil", "fattyAcids": {"oleic": 70}, "references": ["dunn-2010"]}}"#
            }
            ContentFile::Glossary => {
                r#"{"trace": {"term": "Trace", "desc": "Thickened batter.", "related": ["saponification"]}, "saponification": {"term": "Saponification"}}"#
            }
            ContentFile::Sources => r#"{"dunn-2010": {"title": "Scientific Soapmaking", "year": 2010}}"#,
            _ => "{}",
        };
        std::fs::write(dir.join(file.file_name()), json).unwrap();
    }
}

fn config_file(root: &Path, content: &Path) -> std::path::PathBuf {
    let path = root.join("lather.toml");
    std::fs::write(
        &path,
        format!("content_dir = {:?}\nunit = \"oz\"\n", content.display().to_string()),
    )
    .unwrap();
    path
}

#[test]
fn render_writes_the_page_into_an_output_directory() {
    let root = tempfile::tempdir().unwrap();
    let content = root.path().join("data");
    let out = root.path().join("site");
    std::fs::create_dir_all(&content).unwrap();
    std::fs::create_dir_all(&out).unwrap();
    seed(&content);
    let recipe = root.path().join("recipe.json");
    std::fs::write(&recipe, r#"[{"id": "olive-oil", "weight": 16}]"#).unwrap();

    run(Cli {
        config: Some(config_file(root.path(), &content)),
        command: Commands::Render(RenderArgs {
            page: Page::Recipe,
            hash: None,
            out: Some(out.clone()),
            recipe: Some(recipe),
        }),
    })
    .unwrap();

    let html = std::fs::read_to_string(out.join("recipe.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Olive Oil"));
    assert!(html.contains(r#"<span id="recipeTotal">16.00 oz</span>"#));
    assert!(html.contains("100.0%"));
}

#[test]
fn render_applies_the_hash() {
    let root = tempfile::tempdir().unwrap();
    seed(root.path());
    let target = root.path().join("how.html");

    run(Cli {
        config: Some(config_file(root.path(), root.path())),
        command: Commands::Render(RenderArgs {
            page: Page::HowItWorks,
            hash: Some("#glossary".to_string()),
            out: Some(target.clone()),
            recipe: None,
        }),
    })
    .unwrap();

    let html = std::fs::read_to_string(target).unwrap();
    assert!(html.contains(r#"<section id="glossaryView" class="route-view">"#));
    assert!(html.contains(r#"<section id="landingView" class="route-view" hidden>"#));
}

#[test]
fn check_passes_clean_content_and_counts_broken_links() {
    let root = tempfile::tempdir().unwrap();
    seed(root.path());
    let config = config_file(root.path(), root.path());

    run(Cli {
        config: Some(config.clone()),
        command: Commands::Check,
    })
    .unwrap();

    std::fs::write(
        root.path().join(ContentFile::Equipment.file_name()),
        r#"{"scale": {"name": "Scale", "related": ["thermometer"], "references": ["nobody"]}}"#,
    )
    .unwrap();
    let error = run(Cli {
        config: Some(config),
        command: Commands::Check,
    })
    .unwrap_err();
    assert!(matches!(error, SiteError::BrokenLinks { count: 2 }));
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn malformed_config_exits_with_config_code() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("lather.toml");
    std::fs::write(&path, "unit = [").unwrap();
    let error = run(Cli {
        config: Some(path),
        command: Commands::Routes,
    })
    .unwrap_err();
    assert_eq!(error.exit_code(), 78);
}
