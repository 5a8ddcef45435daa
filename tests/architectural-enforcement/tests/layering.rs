//! Layering checks
//!
//! The curator core must be usable from any surface, so nothing in it may
//! reference a terminal or GUI framework - not in code, not in its
//! manifest. The TUI owns all rendering.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Crates the core must never reference
const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

fn workspace_root() -> PathBuf {
    // tests/architectural-enforcement -> workspace root
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn core_dir() -> PathBuf {
    workspace_root().join("curator").join("core")
}

fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|entry| entry.into_path())
        .collect()
}

#[test]
fn core_sources_do_not_reference_ui_crates() {
    let sources = rust_sources(&core_dir().join("src"));
    assert!(!sources.is_empty(), "expected core sources under curator/core/src");

    for path in sources {
        let contents = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
        for ui_crate in UI_CRATES {
            assert!(
                !contents.contains(ui_crate),
                "{} references UI crate `{}` - core must stay surface-agnostic",
                path.display(),
                ui_crate
            );
        }
    }
}

#[test]
fn core_manifest_does_not_depend_on_ui_crates() {
    let manifest_path = core_dir().join("Cargo.toml");
    let manifest = std::fs::read_to_string(&manifest_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", manifest_path.display()));

    for ui_crate in UI_CRATES {
        assert!(
            !manifest.contains(ui_crate),
            "curator-core/Cargo.toml depends on `{ui_crate}`"
        );
    }
}

#[test]
fn core_does_not_reference_the_surface_crate() {
    for path in rust_sources(&core_dir()) {
        let contents = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
        assert!(
            !contents.contains("cardwall_tui"),
            "{} references the TUI crate - dependencies only point inward",
            path.display()
        );
    }
}
