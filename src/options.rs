//! Extraction options and configuration.

use std::path::PathBuf;

/// Default program used for listing and extracting images.
pub const DEFAULT_PDFIMAGES: &str = "pdfimages";

/// Default program used for alpha compositing.
pub const DEFAULT_CONVERT: &str = "convert";

/// File name prefix the extraction tool gives raw assets.
pub const DEFAULT_ASSET_PREFIX: &str = "image";

/// Options controlling a single extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// External programs to invoke
    pub tools: ToolPaths,

    /// How image and soft mask are combined
    pub compose_mode: ComposeMode,

    /// Order in which objects are numbered in the output
    pub order: OutputOrder,

    /// Prefix of raw assets written by the extraction tool
    pub asset_prefix: String,

    /// Suppress progress messages
    pub quiet: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tool paths.
    pub fn with_tools(mut self, tools: ToolPaths) -> Self {
        self.tools = tools;
        self
    }

    /// Set the program used for `-list` and `-png`.
    pub fn with_pdfimages(mut self, program: impl Into<PathBuf>) -> Self {
        self.tools.pdfimages = program.into();
        self
    }

    /// Set the program used for compositing.
    pub fn with_convert(mut self, program: impl Into<PathBuf>) -> Self {
        self.tools.convert = program.into();
        self
    }

    /// Set the compose mode.
    pub fn with_compose_mode(mut self, mode: ComposeMode) -> Self {
        self.compose_mode = mode;
        self
    }

    /// Set output ordering.
    pub fn with_order(mut self, order: OutputOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the raw asset prefix.
    pub fn with_asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = prefix.into();
        self
    }

    /// Suppress progress messages.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Enable or disable progress messages.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            compose_mode: ComposeMode::default(),
            order: OutputOrder::default(),
            asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
            quiet: false,
        }
    }
}

/// Locations of the external programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Image listing and extraction tool (poppler `pdfimages`)
    pub pdfimages: PathBuf,

    /// Compositing tool (ImageMagick `convert`)
    pub convert: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pdfimages: PathBuf::from(DEFAULT_PDFIMAGES),
            convert: PathBuf::from(DEFAULT_CONVERT),
        }
    }
}

/// Compositing operator passed to the compositing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// The mask's luminance becomes the image's alpha channel
    #[default]
    CopyOpacity,
}

impl ComposeMode {
    /// Operator name as understood by the compositing tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeMode::CopyOpacity => "CopyOpacity",
        }
    }
}

impl std::fmt::Display for ComposeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order in which correlated objects receive output numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputOrder {
    /// Ascending PDF object number
    #[default]
    ObjectNumber,
    /// Order in which objects first appear in the listing
    Inventory,
}
