//! # pdf2image
//!
//! Extract the raster images embedded in a PDF as PNG files.
//!
//! PDFs often store a transparent picture as two objects: an opaque base
//! image and a grayscale soft mask (`/SMask`) carrying its alpha channel.
//! Dumping the raw streams yields two unrelated files. This crate lists the
//! images of a document, pairs each base image with its soft mask by PDF
//! object number, and merges the pair back into one PNG with an alpha
//! channel. Images without a mask are copied through unchanged.
//!
//! The heavy lifting is delegated to external tools: poppler's `pdfimages`
//! lists and extracts the raw images, ImageMagick's `convert` composites
//! them. Both are reached through the [`tools::ToolRunner`] trait.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdf2image::Result<()> {
//!     // Writes slides/slides-001.png, slides/slides-002.png, ...
//!     let report = pdf2image::extract_images("slides.pdf")?;
//!     println!("{} images, {} merged", report.image_count(), report.merged_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Output layout
//!
//! For `path/to/name.pdf` the directory `path/to/name/` is recreated empty
//! and receives `name-001.png`, `name-002.png`, ... in object order.

pub mod assets;
pub mod error;
pub mod extractor;
pub mod inventory;
pub mod options;
pub mod reconstruct;
pub mod tools;

// Re-export commonly used types
pub use assets::AssetPathIndex;
pub use error::{Error, Result};
pub use extractor::{output_dir_for, ExtractionReport, Extractor};
pub use inventory::{ImageMetadataRecord, ObjectEntry, ObjectGroup};
pub use options::{ComposeMode, ExtractOptions, OutputOrder, ToolPaths};
pub use reconstruct::{output_file_name, Reconstructor, ReconstructionSummary};
pub use tools::{SystemRunner, ToolInvocation, ToolOutput, ToolRunner};

use std::path::Path;

/// Extract the images of a PDF with default options.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
///
/// # Example
///
/// ```no_run
/// use pdf2image::extract_images;
///
/// let report = extract_images("document.pdf").unwrap();
/// for file in &report.files {
///     println!("{}", file.display());
/// }
/// ```
pub fn extract_images<P: AsRef<Path>>(path: P) -> Result<ExtractionReport> {
    Extractor::new(ExtractOptions::default()).run(path)
}

/// Extract the images of a PDF with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf2image::{extract_images_with_options, ExtractOptions, OutputOrder};
///
/// let options = ExtractOptions::new()
///     .with_convert("magick")
///     .with_order(OutputOrder::Inventory)
///     .quiet();
/// let report = extract_images_with_options("document.pdf", options).unwrap();
/// ```
pub fn extract_images_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ExtractionReport> {
    Extractor::new(options).run(path)
}

/// Parse the stdout of `pdfimages -list` into correlated objects.
///
/// # Example
///
/// ```
/// let listing = "page num type width height color comp bpc enc interp object ID x-ppi y-ppi size ratio\n\
///                ---------------------------------------------------------------------------------\n\
///                1 0 image 64 64 rgb 3 8 image no 7 0 72 72 1K 10%\n\
///                1 1 smask 64 64 gray 1 8 image no 7 0 72 72 1K 10%\n";
/// let group = pdf2image::parse_listing(listing).unwrap();
/// let entry = group.get(7).unwrap();
/// assert!(entry.image().is_some() && entry.smask().is_some());
/// ```
pub fn parse_listing(listing: &str) -> Result<ObjectGroup> {
    ObjectGroup::from_listing(listing)
}
