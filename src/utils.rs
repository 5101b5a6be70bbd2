/*!
 * Utility functions for projsnap
 */

use std::path::{Component, Path};

use walkdir::{DirEntry, WalkDir};

use crate::classifier::Classifier;

/// Root-relative form of `path` with `/` separators.
///
/// Returns `None` when `path` is not lexically under `root`. The root itself
/// maps to an empty string.
pub fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();

    for component in stripped.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    Some(parts.join("/"))
}

/// A symlink pointing at a directory; never followed and never listed
pub fn is_directory_symlink(entry: &DirEntry) -> bool {
    entry.path_is_symlink() && entry.path().is_dir()
}

/// Count the files a snapshot of `root` will contain, for progress tracking
pub fn count_files(root: &Path, classifier: &Classifier) -> u64 {
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !entry.file_type().is_dir()
            || !classifier.is_pruned(entry.path(), root)
    });

    walker
        .filter_map(Result::ok)
        .filter(|entry| !entry.file_type().is_dir() && !is_directory_symlink(entry))
        .filter(|entry| !classifier.is_excluded(entry.path(), root))
        .count() as u64
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_normalizes_separators() {
        let root = Path::new("/a/b");
        assert_eq!(
            relative_path(Path::new("/a/b/c/d.txt"), root).as_deref(),
            Some("c/d.txt")
        );
        assert_eq!(relative_path(Path::new("/a/b"), root).as_deref(), Some(""));
        assert_eq!(relative_path(Path::new("/a/other"), root), None);
        assert_eq!(
            relative_path(Path::new("./src/x.rs"), Path::new(".")).as_deref(),
            Some("src/x.rs")
        );
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(12), "12 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}
