//! pdf2image CLI - extract PDF images as PNG

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use pdf2image::{Error, ExtractOptions, ExtractionReport, Extractor, OutputOrder};

#[derive(Parser)]
#[command(name = "pdf2image")]
#[command(version)]
#[command(
    about = "Extract the images of a PDF as PNG, merging soft masks into their images",
    long_about = None
)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Order in which images are numbered
    #[arg(long, value_enum, default_value = "object")]
    order: OrderArg,

    /// File name prefix for raw extracted images
    #[arg(long, value_name = "PREFIX", default_value = pdf2image::options::DEFAULT_ASSET_PREFIX)]
    asset_prefix: String,

    /// pdfimages executable
    #[arg(long, value_name = "PATH", env = "PDF2IMAGE_PDFIMAGES")]
    pdfimages: Option<PathBuf>,

    /// ImageMagick convert executable
    #[arg(long, value_name = "PATH", env = "PDF2IMAGE_CONVERT")]
    convert: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    /// Ascending PDF object number
    Object,
    /// Order of first appearance in the image listing
    Inventory,
}

impl From<OrderArg> for OutputOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Object => OutputOrder::ObjectNumber,
            OrderArg::Inventory => OutputOrder::Inventory,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let Some(input) = cli.input.as_deref() else {
        println!("{}", "An input PDF file is required".yellow());
        println!("Usage: pdf2image [OPTIONS] <FILE>");
        process::exit(1);
    };

    let mut options = ExtractOptions::new()
        .with_order(cli.order.into())
        .with_asset_prefix(cli.asset_prefix.as_str())
        .with_quiet(cli.quiet);
    if let Some(ref program) = cli.pdfimages {
        options = options.with_pdfimages(program);
    }
    if let Some(ref program) = cli.convert {
        options = options.with_convert(program);
    }

    if let Err(e) = cmd_extract(input, options, cli.json, cli.quiet) {
        if let Some(Error::ExternalProcess {
            command,
            stdout,
            stderr,
            ..
        }) = e.downcast_ref::<Error>()
        {
            println!("An error occurred while running {}", command);
            println!("stdout: {}", stdout);
            println!("stderr: {}", stderr);
        } else {
            eprintln!("{}: {}", "Error".red().bold(), e);
        }
        process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    options: ExtractOptions,
    json: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = Extractor::new(options).run(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ExtractionReport) {
    println!("\n{}", "Output files:".green().bold());
    let count = report.files.len();
    for (i, file) in report.files.iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {} {}", branch.dimmed(), name);
    }

    println!(
        "\n{} {} images in {} ({} merged, {} copied)",
        "Done!".green().bold(),
        count,
        report.output_dir.display(),
        report.merged_count,
        report.copied_count
    );
    if !report.skipped_objects.is_empty() {
        println!(
            "{} {} soft masks without an image",
            "Skipped".yellow(),
            report.skipped_objects.len()
        );
    }
}
