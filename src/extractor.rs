//! End-to-end extraction of one PDF.

use crate::assets::{remove_raw_assets, AssetPathIndex};
use crate::error::{Error, Result};
use crate::inventory::correlate;
use crate::options::ExtractOptions;
use crate::reconstruct::Reconstructor;
use crate::tools::{SystemRunner, ToolRunner};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// The PDF that was processed
    pub input: PathBuf,
    /// Directory holding the final images
    pub output_dir: PathBuf,
    /// Final PNG files, in output order
    pub files: Vec<PathBuf>,
    /// Images produced by merging a soft mask
    pub merged_count: usize,
    /// Images copied through unchanged
    pub copied_count: usize,
    /// Objects dropped because they only had a soft mask
    pub skipped_objects: Vec<u32>,
    /// Raw assets deleted at the end of the run
    pub removed_assets: usize,
}

impl ExtractionReport {
    /// Number of final images.
    pub fn image_count(&self) -> usize {
        self.files.len()
    }
}

/// Directory that receives the images of `pdf`: the same path without its
/// extension.
pub fn output_dir_for(pdf: &Path) -> Result<PathBuf> {
    if pdf.extension().is_none() {
        return Err(Error::InvalidInput(format!(
            "{} has no file extension, output directory would replace it",
            pdf.display()
        )));
    }
    Ok(pdf.with_extension(""))
}

/// Prefix the raw assets of a run into `output_dir` are written under.
///
/// Final images are named after the output directory, so when that name
/// equals the configured prefix the raw assets get `<prefix>-raw` instead and
/// cleanup can never match a final image.
fn raw_asset_prefix(output_dir: &Path, configured: &str) -> String {
    if output_dir.file_name().and_then(|n| n.to_str()) == Some(configured) {
        let alternate = format!("{}-raw", configured);
        log::debug!(
            "Output name matches asset prefix '{}', extracting as '{}'",
            configured,
            alternate
        );
        alternate
    } else {
        configured.to_string()
    }
}

/// Runs the extract, correlate, reconstruct and clean up sequence.
///
/// The output directory is wiped at the start of every run. Steps run
/// strictly in order and the first error aborts the run.
///
/// # Example
///
/// ```no_run
/// use pdf2image::{ExtractOptions, Extractor};
///
/// let report = Extractor::new(ExtractOptions::new().quiet()).run("slides.pdf")?;
/// println!("{} images in {}", report.image_count(), report.output_dir.display());
/// # Ok::<(), pdf2image::Error>(())
/// ```
pub struct Extractor<R: ToolRunner = SystemRunner> {
    options: ExtractOptions,
    runner: R,
}

impl Extractor<SystemRunner> {
    /// Create an extractor that runs the real tools.
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_runner(options, SystemRunner::new())
    }
}

impl<R: ToolRunner> Extractor<R> {
    /// Create an extractor with a custom tool runner.
    pub fn with_runner(options: ExtractOptions, runner: R) -> Self {
        Self { options, runner }
    }

    /// Options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Tool runner in use.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Process one PDF.
    pub fn run<P: AsRef<Path>>(&self, pdf: P) -> Result<ExtractionReport> {
        let pdf = pdf.as_ref();
        let output_dir = output_dir_for(pdf)?;
        let prefix = raw_asset_prefix(&output_dir, &self.options.asset_prefix);
        let prefix = prefix.as_str();

        if output_dir.exists() {
            log::debug!("Removing previous output {}", output_dir.display());
            fs::remove_dir_all(&output_dir)?;
        }
        fs::create_dir_all(&output_dir)?;

        self.progress(format_args!(
            "Extract image data from PDF to [{}]",
            output_dir.display()
        ));
        let root = output_dir.join(prefix);
        self.runner
            .run(&self.options.tools.extract_invocation(pdf, &root))?;

        self.progress(format_args!("Gather extracted image paths"));
        let assets = AssetPathIndex::locate(&output_dir, prefix)?;

        self.progress(format_args!("Parse PDF image metadata"));
        let group = correlate(pdf, &self.options.tools, &self.runner)?;

        self.progress(format_args!(
            "Merging masked images, copying standalone images"
        ));
        let summary = Reconstructor::new(&self.options.tools, &self.runner)
            .with_compose_mode(self.options.compose_mode)
            .with_order(self.options.order)
            .reconstruct(&group, &assets, &output_dir)?;
        self.progress(format_args!(
            "Images sorted and merged using {} in [{}]",
            self.options.compose_mode,
            output_dir.display()
        ));

        let removed_assets = remove_raw_assets(&output_dir, prefix, &summary.written)?;

        Ok(ExtractionReport {
            input: pdf.to_path_buf(),
            output_dir,
            files: summary.written,
            merged_count: summary.merged_count,
            copied_count: summary.copied_count,
            skipped_objects: summary.skipped_objects,
            removed_assets,
        })
    }

    fn progress(&self, message: std::fmt::Arguments<'_>) {
        if !self.options.quiet {
            log::info!("{}", message);
        }
    }
}
