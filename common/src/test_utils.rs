//! Paths for artifacts that tests leave behind for inspection.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// `<workspace>/test_output`, created on first use.
pub fn test_output_dir() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        // This crate sits one level below the workspace root.
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("test_output");
        std::fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("Failed to create '{}': {e}", dir.display()));
        dir
    })
}

/// Path of a file named `name` inside [`test_output_dir`].
pub fn test_output_path(name: &str) -> PathBuf {
    test_output_dir().join(name)
}
