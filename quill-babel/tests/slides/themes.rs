//! Theme resolution, verification and installation.

use quill_babel::formats::slides::themes::{required_theme_files, ThemeResolver};
use quill_babel::ir::build::{document, para, section};
use quill_babel::{FormatError, FormatRegistry, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write_theme(root: &Path, name: &str, files: &[&str], base: Option<&str>) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), format!("/* {name}/{file} */\n")).unwrap();
    }
    if let Some(base) = base {
        fs::write(dir.join("__base__"), format!("# parent theme\n{base}\n")).unwrap();
    }
    dir
}

fn all_files() -> Vec<&'static str> {
    required_theme_files().collect()
}

fn chain_names(dirs: &[PathBuf]) -> Vec<String> {
    dirs.iter()
        .filter_map(|d| d.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

/// A search directory holding a complete `default` theme and `big` based on it.
fn theme_root() -> TempDir {
    let root = tempdir().unwrap();
    write_theme(root.path(), "default", &all_files(), None);
    let big = write_theme(root.path(), "big", &[], Some("default"));
    fs::write(big.join("slides.css"), "body { background: url(ui/default/bg.png); }\n").unwrap();
    root
}

#[test]
fn chain_follows_base_themes_to_default() {
    let root = theme_root();
    write_theme(root.path(), "bigger", &[], Some("big"));
    let dirs = vec![root.path().to_path_buf()];
    let chain = ThemeResolver::new(&dirs).resolve("bigger").unwrap();
    assert_eq!(chain_names(&chain.dirs), vec!["bigger", "big", "default"]);
}

#[test]
fn cyclic_bases_fall_back_to_default() {
    let root = theme_root();
    write_theme(root.path(), "a", &[], Some("b"));
    write_theme(root.path(), "b", &[], Some("a"));
    let dirs = vec![root.path().to_path_buf()];
    let chain = ThemeResolver::new(&dirs).resolve("a").unwrap();
    assert_eq!(chain_names(&chain.dirs), vec!["a", "b", "default"]);
}

#[test]
fn earlier_search_directories_win() {
    let first = tempdir().unwrap();
    let second = theme_root();
    write_theme(first.path(), "big", &["slides.css"], None);
    let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    let chain = ThemeResolver::new(&dirs).resolve("big").unwrap();
    assert!(chain.dirs[0].starts_with(fs::canonicalize(first.path()).unwrap()));
    assert_eq!(chain_names(&chain.dirs), vec!["big", "default"]);
}

#[test]
fn missing_base_theme_is_an_error() {
    let root = tempdir().unwrap();
    write_theme(root.path(), "orphan", &[], Some("nowhere"));
    let dirs = vec![root.path().to_path_buf()];
    let err = ThemeResolver::new(&dirs).resolve("orphan").unwrap_err();
    assert!(matches!(err, FormatError::ThemeNotFound(name) if name == "nowhere"));
}

#[test]
fn verify_reports_every_missing_file() {
    let root = tempdir().unwrap();
    write_theme(root.path(), "thin", &["slides.css", "slides.js"], None);
    let dirs = vec![root.path().to_path_buf()];
    let chain = ThemeResolver::new(&dirs).resolve("thin").unwrap();
    assert_eq!(chain_names(&chain.dirs), vec!["thin"]);

    let err = chain.verify().unwrap_err();
    let FormatError::MissingThemeFiles(missing) = err else {
        panic!("expected missing theme files");
    };
    assert_eq!(missing.len(), 8);
    assert_eq!(missing[0], "s5-core.css");
    assert!(!missing.iter().any(|f| f == "slides.css" || f == "slides.js"));
}

#[test]
fn install_copies_once_and_rewrites_theme_paths() {
    let root = theme_root();
    let dirs = vec![root.path().to_path_buf()];
    let chain = ThemeResolver::new(&dirs).resolve("big").unwrap();
    let out = tempdir().unwrap();
    let target = out.path().join("ui").join("big");

    let installed = chain.install(&target, false).unwrap();
    assert_eq!(installed.copied.len(), 10);
    assert_eq!(installed.dependencies.len(), 10);
    assert!(!target.join("__base__").exists());

    let css = fs::read_to_string(target.join("slides.css")).unwrap();
    assert_eq!(css, "body { background: url(ui/big/bg.png); }\n");
    let core = fs::read_to_string(target.join("s5-core.css")).unwrap();
    assert_eq!(core, "/* default/s5-core.css */\n");
}

#[test]
fn existing_files_are_kept_unless_overwriting() {
    let root = theme_root();
    let dirs = vec![root.path().to_path_buf()];
    let chain = ThemeResolver::new(&dirs).resolve("big").unwrap();
    let out = tempdir().unwrap();
    let target = out.path().join("ui").join("big");
    chain.install(&target, false).unwrap();
    fs::write(target.join("slides.css"), "edited").unwrap();

    let again = chain.install(&target, false).unwrap();
    assert!(again.copied.is_empty());
    assert!(again.dependencies.iter().all(|d| d.starts_with(&target)));
    assert_eq!(fs::read_to_string(target.join("slides.css")).unwrap(), "edited");

    let forced = chain.install(&target, true).unwrap();
    assert_eq!(forced.copied.len(), 10);
    assert_ne!(fs::read_to_string(target.join("slides.css")).unwrap(), "edited");
}

#[test]
fn writer_installs_theme_next_to_the_destination() {
    let root = theme_root();
    let out = tempdir().unwrap();
    let settings = Settings::default()
        .with_theme("big")
        .with_theme_dir(root.path())
        .with_destination(out.path().join("talk.html"));
    let doc = document(vec![section("Intro", vec![para("Hi.")])]);

    let rendered = FormatRegistry::with_defaults()
        .serialize_with_settings(&doc, "slides", &settings)
        .unwrap();
    assert!(rendered.text.contains("href=\"ui/big/slides.css\""));
    assert_eq!(rendered.dependencies.len(), 10);
    for file in all_files() {
        assert!(out.path().join("ui/big").join(file).is_file(), "{file}");
    }
}

#[test]
fn writer_fails_before_rendering_when_files_are_missing() {
    let root = tempdir().unwrap();
    write_theme(root.path(), "thin", &["slides.css"], None);
    let out = tempdir().unwrap();
    let settings = Settings::default()
        .with_theme("thin")
        .with_theme_dir(root.path())
        .with_destination(out.path().join("talk.html"));
    let doc = document(vec![para("Hi.")]);

    let err = FormatRegistry::with_defaults()
        .serialize_with_settings(&doc, "slides", &settings)
        .unwrap_err();
    assert!(matches!(err, FormatError::MissingThemeFiles(ref files) if files.len() == 9));
    assert!(!out.path().join("ui").exists());
}

#[test]
fn unknown_theme_is_reported() {
    let root = theme_root();
    let settings = Settings::default()
        .with_theme("nonexistent")
        .with_theme_dir(root.path());
    let err = FormatRegistry::with_defaults()
        .serialize_with_settings(&document(vec![]), "slides", &settings)
        .unwrap_err();
    assert!(matches!(err, FormatError::ThemeNotFound(name) if name == "nonexistent"));
}
