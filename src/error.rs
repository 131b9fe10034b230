//! Error types for pdf2image library.

use std::io;
use thiserror::Error;

/// Result type alias for pdf2image operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting and reconstructing images.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An external tool ran but exited with a non-zero status.
    #[error("command failed ({}): {command}", status_label(.status))]
    ExternalProcess {
        /// The command line as it was run
        command: String,
        /// Exit code, `None` if the process was killed by a signal
        status: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// An external tool could not be started at all.
    #[error("could not run '{program}': {source}")]
    ToolUnavailable {
        /// Program that was looked up
        program: String,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },

    /// An inventory line could not be parsed.
    #[error("malformed image listing line (bad {field}): {line:?}")]
    MetadataFormat {
        /// Name of the field that failed
        field: &'static str,
        /// The offending line
        line: String,
    },

    /// The listing references an asset that extraction did not produce.
    #[error("no extracted asset with sequence number {sequence} (object {object})")]
    MissingAsset {
        /// Extraction sequence number that was looked up
        sequence: u32,
        /// PDF object the record belongs to
        object: u32,
    },

    /// The input path cannot be processed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn status_label(status: &Option<i32>) -> String {
    match *status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}
