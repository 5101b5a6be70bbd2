/*!
 * Run summary for projsnap
 *
 * Printed to the console after the snapshot is written; it is never part of
 * the snapshot itself.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::scanner::ScannerStatistics;
use crate::utils::format_file_size;

/// Information about a file written to the snapshot
#[derive(Debug, Clone, Default)]
pub struct FileReportInfo {
    /// Root-relative path
    pub path: String,
    /// Number of lines written
    pub lines: usize,
    /// Bytes of content written
    pub bytes: u64,
    /// Whether the placeholder was written instead of the content
    pub omitted: bool,
}

/// Summary of a snapshot run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Scanner statistics
    pub statistics: ScannerStatistics,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for snapshot runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let rows = vec![
            SummaryRow {
                key: "📂 Output File",
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Included",
                value: self.format_number(stats.files_included),
            },
            SummaryRow {
                key: "🙈 Content Omitted",
                value: self.format_number(stats.files_omitted),
            },
            SummaryRow {
                key: "🚫 Files Excluded",
                value: self.format_number(stats.files_excluded),
            },
            SummaryRow {
                key: "✂️ Directories Pruned",
                value: self.format_number(stats.dirs_pruned),
            },
            SummaryRow {
                key: "⚠️ Read Errors",
                value: self.format_number(stats.read_errors),
            },
            SummaryRow {
                key: "📦 Content Size",
                value: format!(
                    "{} (~{} tokens)",
                    format_file_size(stats.content_bytes),
                    self.format_number((stats.content_bytes / 4) as usize)
                ),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, files: &[&FileReportInfo]) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        let rows: Vec<FileRow> = files
            .iter()
            .map(|info| FileRow {
                path: truncate_path(&info.path, 60),
                lines: self.format_number(info.lines),
                size: format_file_size(info.bytes),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let mut files: Vec<&FileReportInfo> = report
            .statistics
            .file_details
            .iter()
            .filter(|info| !info.omitted)
            .collect();
        files.sort_by(|a, b| b.bytes.cmp(&a.bytes));
        files.truncate(10);

        let summary_table = self.create_summary_table(report);

        if files.is_empty() {
            return format!("✅  SNAPSHOT COMPLETE\n{}", summary_table);
        }

        format!(
            "📋  LARGEST FILES\n{}\n\n✅  SNAPSHOT COMPLETE\n{}",
            self.create_files_table(&files),
            summary_table
        )
    }
}

/// Keep the trailing segments of a long path
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let mut segments = Vec::new();
    let mut current_len = 3;
    for part in path.rsplit('/') {
        let part_len = part.len() + 1;
        if current_len + part_len > max_len {
            break;
        }
        segments.push(part);
        current_len += part_len;
    }

    if segments.is_empty() {
        let tail: String = path
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return format!("...{}", tail);
    }

    let mut result = String::from("...");
    for part in segments.iter().rev() {
        result.push('/');
        result.push_str(part);
    }
    result
}
