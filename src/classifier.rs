/*!
 * Path classification
 *
 * Decides, for each entry the scanner meets, whether the directory subtree
 * is pruned, the file is excluded, listed without content, or included.
 */

use std::path::Path;

use crate::rules::{EntryKind, RuleSet};
use crate::utils::relative_path;

/// What happens to a filesystem entry in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Directory skipped along with everything beneath it
    Pruned,
    /// File left out of the report
    Excluded,
    /// File listed with the placeholder body
    ContentOmitted,
    /// File listed with its contents
    Included,
}

/// Applies a [`RuleSet`] to paths under a root
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
}

impl Classifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Whether the directory at `dir_path` should not be descended into
    pub fn is_pruned(&self, dir_path: &Path, root: &Path) -> bool {
        relative_path(dir_path, root)
            .is_some_and(|rel| self.path_matches(&rel, EntryKind::Directory))
    }

    /// Whether the file at `file_path` should be left out entirely
    pub fn is_excluded(&self, file_path: &Path, root: &Path) -> bool {
        relative_path(file_path, root).is_some_and(|rel| {
            self.path_matches(&rel, EntryKind::File) || self.rules.has_denied_extension(&rel)
        })
    }

    pub fn is_content_omitted(&self, rel_path: &str) -> bool {
        self.rules.is_content_omitted(rel_path)
    }

    pub fn classify_dir(&self, dir_path: &Path, root: &Path) -> Disposition {
        if self.is_pruned(dir_path, root) {
            Disposition::Pruned
        } else {
            Disposition::Included
        }
    }

    pub fn classify_file(&self, file_path: &Path, root: &Path) -> Disposition {
        if self.is_excluded(file_path, root) {
            return Disposition::Excluded;
        }

        match relative_path(file_path, root) {
            Some(rel) if self.is_content_omitted(&rel) => Disposition::ContentOmitted,
            _ => Disposition::Included,
        }
    }

    // The root itself is never matched
    fn path_matches(&self, rel_path: &str, kind: EntryKind) -> bool {
        !rel_path.is_empty() && self.rules.matches_path(rel_path, kind)
    }
}
