/*!
 * Configuration handling for projsnap
 */

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::classifier::Classifier;
use crate::rules::{DynamicExclusions, RuleSet, DEFAULT_OUTPUT_FILE};

/// Command-line arguments for projsnap
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "projsnap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Flatten a project directory into a single text snapshot",
    long_about = "Walks a project tree, skips build artifacts, binaries and sensitive files, and concatenates everything else into one text file with per-file delimiters."
)]
pub struct Args {
    /// Project root to snapshot
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output file name, relative to the project root unless absolute
    #[clap(default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output
    #[clap(short, long)]
    pub quiet: bool,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project root to snapshot
    pub target_dir: PathBuf,

    /// Resolved snapshot file path
    pub output_file: PathBuf,

    /// Path of the running executable, excluded when it sits under the root
    pub tool_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    ///
    /// The default root `.` is replaced by the absolute working directory so
    /// the snapshot records where it was taken.
    pub fn from_args(args: Args) -> Self {
        let target_dir = match args.directory_path.as_str() {
            "." => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            path => PathBuf::from(path),
        };
        let output_file = target_dir.join(args.output_file);

        Self {
            target_dir,
            output_file,
            tool_path: std::env::current_exe().ok(),
        }
    }

    /// Configuration for `target_dir` writing the default output file
    #[cfg(test)]
    pub(crate) fn for_root(target_dir: impl Into<PathBuf>) -> Self {
        let target_dir = target_dir.into();
        Self {
            output_file: target_dir.join(DEFAULT_OUTPUT_FILE),
            target_dir,
            tool_path: None,
        }
    }

    /// Exclusions that only hold for this run
    pub fn dynamic_exclusions(&self) -> DynamicExclusions {
        DynamicExclusions::compute(
            &self.target_dir,
            &self.output_file,
            self.tool_path.as_deref(),
        )
    }

    /// Classifier over `rules` plus this run's dynamic exclusions
    pub fn classifier(&self, rules: RuleSet) -> Classifier {
        Classifier::new(rules.with_dynamic(self.dynamic_exclusions()))
    }
}
