/*!
 * Command-line interface for projsnap
 */

use std::io;
use std::sync::Arc;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use projsnap::config::{Args, Config};
use projsnap::report::{ReportFormat, Reporter};
use projsnap::rules::RuleSet;
use projsnap::utils::count_files;

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    setup_logging(args.quiet, args.verbose);

    let config = Config::from_args(args);
    let rules = RuleSet::default();

    println!("Project Root: {}", config.target_dir.display());
    println!("Output File: {}", config.output_file.display());

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ⏱️  {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📊 Counting");

    // Count files for progress tracking
    let total_files = count_files(&config.target_dir, &config.classifier(rules.clone()));
    progress.set_length(total_files);
    progress.set_prefix("📊 Snapshot");

    let result = projsnap::create_snapshot(&config, rules, Arc::new(progress.clone()));
    progress.finish_and_clear();

    let report = result.map_err(|e| {
        log::error!("Snapshot failed: {}", e);
        io::Error::from(e)
    })?;

    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    println!("Project snapshot created: {}", config.output_file.display());

    Ok(())
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}
