/*!
 * Directory traversal
 *
 * Walks the tree one directory at a time so that pruned directories are
 * never entered, and streams each surviving file into the snapshot.
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use walkdir::{DirEntry, WalkDir};

use crate::classifier::{Classifier, Disposition};
use crate::error::Result;
use crate::report::FileReportInfo;
use crate::rules::OMITTED_PLACEHOLDER;
use crate::utils::{is_directory_symlink, relative_path};
use crate::writer::{decode_dropping_invalid, RecordBody, SnapshotWriter};

/// Scanner statistics
#[derive(Debug, Clone, Default)]
pub struct ScannerStatistics {
    /// Files written with their contents
    pub files_included: usize,
    /// Files written with the placeholder body
    pub files_omitted: usize,
    /// Files left out by the rules
    pub files_excluded: usize,
    /// Directories not descended into
    pub dirs_pruned: usize,
    /// Files whose content could not be read
    pub read_errors: usize,
    /// Bytes of decoded content written
    pub content_bytes: u64,
    /// Per-file details, in traversal order
    pub file_details: Vec<FileReportInfo>,
}

/// Scanner for a project tree
pub struct Scanner {
    root: PathBuf,
    classifier: Classifier,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(root: PathBuf, classifier: Classifier, progress: Arc<ProgressBar>) -> Self {
        Self {
            root,
            classifier,
            progress,
        }
    }

    /// Walk the root and write every surviving file into `writer`.
    ///
    /// Only failures of `writer` itself abort the scan.
    pub fn scan<W: Write>(&self, writer: &mut SnapshotWriter<W>) -> Result<ScannerStatistics> {
        let mut stats = ScannerStatistics::default();
        self.scan_directory(&self.root, writer, &mut stats)?;
        Ok(stats)
    }

    fn scan_directory<W: Write>(
        &self,
        dir: &Path,
        writer: &mut SnapshotWriter<W>,
        stats: &mut ScannerStatistics,
    ) -> Result<()> {
        let entries: Vec<DirEntry> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .collect();

        let (dirs, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.file_type().is_dir());

        for entry in files {
            if is_directory_symlink(&entry) {
                log::debug!("Skipping directory symlink: {}", entry.path().display());
                continue;
            }
            self.process_file(entry.path(), writer, stats)?;
        }

        for entry in dirs {
            match self.classifier.classify_dir(entry.path(), &self.root) {
                Disposition::Pruned => {
                    log::debug!("Pruning: {}", entry.path().display());
                    stats.dirs_pruned += 1;
                }
                _ => self.scan_directory(entry.path(), writer, stats)?,
            }
        }

        Ok(())
    }

    fn process_file<W: Write>(
        &self,
        path: &Path,
        writer: &mut SnapshotWriter<W>,
        stats: &mut ScannerStatistics,
    ) -> Result<()> {
        let Some(rel_path) = relative_path(path, &self.root) else {
            return Ok(());
        };

        let disposition = self.classifier.classify_file(path, &self.root);
        if disposition == Disposition::Excluded {
            log::debug!("Excluding: {}", rel_path);
            stats.files_excluded += 1;
            return Ok(());
        }

        log::info!("Processing: {}", rel_path);
        self.progress.inc(1);
        self.progress
            .set_message(format!("Processing: {}", rel_path));

        if disposition == Disposition::ContentOmitted {
            writer.write_record(&rel_path, RecordBody::Omitted(OMITTED_PLACEHOLDER))?;
            stats.files_omitted += 1;
            stats.file_details.push(FileReportInfo {
                path: rel_path,
                lines: 0,
                bytes: 0,
                omitted: true,
            });
            return Ok(());
        }

        match fs::read(path) {
            Ok(bytes) => {
                let content = decode_dropping_invalid(&bytes);
                writer.write_record(&rel_path, RecordBody::Content(&content))?;

                stats.files_included += 1;
                stats.content_bytes += content.len() as u64;
                stats.file_details.push(FileReportInfo {
                    path: rel_path,
                    lines: content.lines().count(),
                    bytes: content.len() as u64,
                    omitted: false,
                });
            }
            Err(e) => {
                log::warn!("Error reading {}: {}", rel_path, e);
                writer.write_record(&rel_path, RecordBody::ReadError(&e))?;
                stats.read_errors += 1;
            }
        }

        Ok(())
    }
}
