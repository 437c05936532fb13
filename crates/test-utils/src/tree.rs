//! Temporary directory trees for tests that scan the filesystem.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates a temporary directory containing empty files at the given
/// relative paths. Parent directories are created as needed.
///
/// The directory is deleted when the returned [`TempDir`] is dropped.
pub fn image_tree(paths: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for path in paths {
        write_file(dir.path(), path, "");
    }
    dir
}

/// Writes `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
