//! External tool boundary.
//!
//! Every program this crate depends on (the image lister/extractor and the
//! compositor) is reached through [`ToolRunner`]. The default
//! [`SystemRunner`] spawns real processes; tests substitute their own runner
//! to simulate the tools without installing them.

mod system;

pub use system::SystemRunner;

use crate::error::Result;
use crate::options::{ComposeMode, ToolPaths};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolInvocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Program to execute.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments in order.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for ToolInvocation {
    /// Shell-like rendering used in diagnostics. Flags stay bare, anything
    /// else is double quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.starts_with('-') || arg.chars().all(|c| c.is_ascii_alphanumeric()) {
                write!(f, " {}", arg)?;
            } else {
                write!(f, " \"{}\"", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured output of a successful tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Standard output, decoded lossily as UTF-8
    pub stdout: String,
    /// Standard error, decoded lossily as UTF-8
    pub stderr: String,
}

impl ToolOutput {
    /// Output with only stdout set.
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Runs external commands to completion.
///
/// Implementations block until the command exits. A non-zero exit must be
/// reported as [`crate::Error::ExternalProcess`].
pub trait ToolRunner {
    /// Run the invocation and return its captured output.
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        (**self).run(invocation)
    }
}

impl ToolPaths {
    /// `pdfimages -list <pdf>`: print the image inventory.
    pub fn list_invocation(&self, pdf: &Path) -> ToolInvocation {
        ToolInvocation::new(&self.pdfimages).arg("-list").arg(pdf)
    }

    /// `pdfimages -png <pdf> <root>`: write raw assets as `<root>-NNN.png`.
    pub fn extract_invocation(&self, pdf: &Path, root: &Path) -> ToolInvocation {
        ToolInvocation::new(&self.pdfimages)
            .arg("-png")
            .arg(pdf)
            .arg(root)
    }

    /// `convert <image> <mask> -compose <mode> -composite <out>`.
    pub fn composite_invocation(
        &self,
        image: &Path,
        mask: &Path,
        mode: ComposeMode,
        out: &Path,
    ) -> ToolInvocation {
        ToolInvocation::new(&self.convert)
            .arg(image)
            .arg(mask)
            .arg("-compose")
            .arg(mode.as_str())
            .arg("-composite")
            .arg(out)
    }
}
