//! icf2scorm CLI - ICF to SCORM 1.2 package converter
//!
//! A command-line tool for repackaging ICF content bundles (.icf / .zip)
//! as SCORM 1.2 zip packages.

use clap::{Parser, Subcommand};
use colored::*;
use icf2scorm::{ConversionReport, PackageOptions, TestLoadFailure};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Default output file name, matching the name offered for download by the
/// web converter.
const DEFAULT_OUTPUT: &str = "scorm_package.zip";

/// ICF content bundle to SCORM 1.2 package conversion
#[derive(Parser)]
#[command(
    name = "icf2scorm",
    author = "iyulab",
    version,
    about = "Convert ICF content bundles to SCORM 1.2 packages",
    long_about = "icf2scorm - Repackage ICF content bundles as SCORM 1.2 packages.\n\n\
                  Finds the chapter*.html page, generates an index.html wrapper and an\n\
                  imsmanifest.xml, and writes a deflate-compressed zip."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an ICF bundle to a SCORM package
    Convert {
        /// Input .icf or .zip file
        input: PathBuf,

        /// Output file path (default: scorm_package.zip next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wrapper page title
        #[arg(long)]
        title: Option<String>,

        /// Wrapper page heading
        #[arg(long)]
        heading: Option<String>,

        /// Manifest organization title
        #[arg(long)]
        organization: Option<String>,

        /// Manifest item title
        #[arg(long)]
        item: Option<String>,

        /// Show an error in the page when test JSON fails to load
        #[arg(long)]
        visible_test_errors: bool,

        /// Stage the conversion in a scratch directory under DIR instead of memory
        #[arg(long, value_name = "DIR")]
        scratch_dir: Option<PathBuf>,

        /// Print the conversion report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what a conversion would package, without writing anything
    Inspect {
        /// Input .icf or .zip file
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            title,
            heading,
            organization,
            item,
            visible_test_errors,
            scratch_dir,
            json,
        } => {
            let mut options = PackageOptions::new();
            if let Some(title) = title {
                options = options.with_page_title(title);
            }
            if let Some(heading) = heading {
                options = options.with_heading(heading);
            }
            if let Some(organization) = organization {
                options = options.with_organization_title(organization);
            }
            if let Some(item) = item {
                options = options.with_item_title(item);
            }
            if visible_test_errors {
                options = options.with_test_load_failure(TestLoadFailure::Visible);
            }
            if let Some(dir) = scratch_dir {
                options = options.with_disk_scratch(Some(dir));
            }

            let output = output.unwrap_or_else(|| default_output(&input));

            let pb = create_spinner("Converting to SCORM package...");
            let conversion = icf2scorm::convert_file(&input, &options);
            pb.finish_and_clear();
            let conversion = conversion?;

            fs::write(&output, &conversion.bytes)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&conversion.report)?);
            } else {
                println!(
                    "{} SCORM package created: {}",
                    "✓".green().bold(),
                    output.display()
                );
                print_report(&conversion.report);
            }
        }

        Commands::Inspect { input, json } => {
            let pb = create_spinner("Inspecting archive...");
            let report = fs::read(&input)
                .map_err(icf2scorm::Error::from)
                .and_then(|data| icf2scorm::inspect(&data));
            pb.finish_and_clear();
            let report = report?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", "Archive Information".cyan().bold());
                println!("{}", "─".repeat(40));
                println!(
                    "{}: {}",
                    "File".bold(),
                    input.file_name().unwrap_or_default().to_string_lossy()
                );
                print_report(&report);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) => parent.join(DEFAULT_OUTPUT),
        None => PathBuf::from(DEFAULT_OUTPUT),
    }
}

fn print_report(report: &ConversionReport) {
    println!("{}: {}", "Main content".bold(), report.content);
    if let Some(ref wrapper) = report.unwrapped {
        println!("{}: {}/", "Unwrapped folder".bold(), wrapper);
    }
    println!("{}: {}", "Files".bold(), report.files);
    println!(
        "{}: {}",
        "Pre-test".bold(),
        presence(report.has_pretest, icf2scorm::synth::PRETEST_PATH)
    );
    println!(
        "{}: {}",
        "Post-test".bold(),
        presence(report.has_posttest, icf2scorm::synth::POSTTEST_PATH)
    );
    if report.output_size > 0 {
        println!("{}: {} bytes", "Package size".bold(), report.output_size);
    }
}

fn presence(found: bool, path: &str) -> ColoredString {
    if found {
        path.green()
    } else {
        format!("{} (missing)", path).yellow()
    }
}

fn print_version() {
    println!("{} {}", "icf2scorm".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("ICF content bundle to SCORM 1.2 package converter");
    println!();
    println!("Input formats: .icf, .zip");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
