//! Path utilities for locating fonts and scratch directories.

use std::path::PathBuf;

use badge_common::AssetNames;

/// First installed TrueType font: `TEST_FONT` if set, then the renderer's
/// default system font list.
pub fn find_system_font() -> Option<PathBuf> {
    if let Ok(font) = std::env::var("TEST_FONT") {
        let path = PathBuf::from(font);
        if path.is_file() {
            return Some(path);
        }
    }

    AssetNames::default()
        .system_fonts
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_test_dir_is_removed_on_drop() {
        let dir = temp_test_dir();
        let path = dir.path().to_path_buf();
        assert!(path.is_dir());
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_found_font_is_a_file() {
        if let Some(path) = find_system_font() {
            assert!(path.is_file(), "{:?}", path);
        }
    }
}
