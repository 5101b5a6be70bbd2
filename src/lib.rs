/*!
 * projsnap - Flatten a project directory into a single text snapshot
 *
 * Walks a project tree, prunes build and tooling directories before
 * descending, skips binary and sensitive files, and writes everything else
 * into one text file with per-file delimiters.
 */

pub mod classifier;
pub mod config;
pub mod error;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod utils;
pub mod writer;


use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;

// Re-export main components for easier access
pub use classifier::{Classifier, Disposition};
pub use config::Config;
pub use error::{Result, SnapError};
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use rules::{DynamicExclusions, EntryKind, Pattern, RuleSet};
pub use scanner::Scanner;
pub use writer::SnapshotWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Take a snapshot of `config.target_dir` into `config.output_file`.
///
/// The output file is created before the walk starts; failing to create it
/// is the only way a run fails outright.
pub fn create_snapshot(
    config: &Config,
    rules: RuleSet,
    progress: Arc<ProgressBar>,
) -> Result<ScanReport> {
    let start_time = Instant::now();

    let classifier = config.classifier(rules);
    log::debug!(
        "Dynamic exclusions: {:?}",
        classifier.rules().dynamic().paths()
    );

    let mut writer = SnapshotWriter::create(&config.output_file)?;
    writer.write_preamble(&config.target_dir)?;

    let scanner = Scanner::new(config.target_dir.clone(), classifier, progress);
    let statistics = scanner.scan(&mut writer)?;
    writer.finish()?;

    Ok(ScanReport {
        output_file: config.output_file.display().to_string(),
        duration: start_time.elapsed(),
        statistics,
    })
}
