//! Turning correlated objects into final PNG files.
//!
//! Each object with both an image and a soft mask is alpha-composited; an
//! object with only an image is copied through; a lone soft mask produces
//! nothing. Output numbers are assigned only to objects that produce a file.

use crate::assets::AssetPathIndex;
use crate::error::{Error, Result};
use crate::inventory::{ImageMetadataRecord, ObjectEntry, ObjectGroup};
use crate::options::{ComposeMode, OutputOrder, ToolPaths};
use crate::tools::ToolRunner;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with one correlated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Merge the mask into the image's alpha channel
    Composite {
        image: &'a ImageMetadataRecord,
        smask: &'a ImageMetadataRecord,
    },
    /// Copy the image asset unchanged
    Copy { image: &'a ImageMetadataRecord },
    /// Nothing renderable
    Skip,
}

impl<'a> Action<'a> {
    /// Decide the action for an object entry.
    pub fn for_entry(entry: &'a ObjectEntry) -> Self {
        match (entry.image(), entry.smask()) {
            (Some(image), Some(smask)) => Action::Composite { image, smask },
            (Some(image), None) => Action::Copy { image },
            (None, _) => Action::Skip,
        }
    }
}

/// Outcome of a reconstruction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionSummary {
    /// Files written, in output order
    pub written: Vec<PathBuf>,
    /// Objects produced by compositing
    pub merged_count: usize,
    /// Objects produced by copying
    pub copied_count: usize,
    /// Objects that had only a soft mask
    pub skipped_objects: Vec<u32>,
}

/// Name of the `index`-th output file: `<base>-NNN.png`.
pub fn output_file_name(base: &str, index: usize) -> String {
    format!("{}-{:03}.png", base, index)
}

/// Writes one PNG per renderable object.
pub struct Reconstructor<'a, R: ToolRunner> {
    tools: &'a ToolPaths,
    runner: &'a R,
    compose_mode: ComposeMode,
    order: OutputOrder,
}

impl<'a, R: ToolRunner> Reconstructor<'a, R> {
    /// Create a reconstructor using `tools` run through `runner`.
    pub fn new(tools: &'a ToolPaths, runner: &'a R) -> Self {
        Self {
            tools,
            runner,
            compose_mode: ComposeMode::default(),
            order: OutputOrder::default(),
        }
    }

    /// Set the compose mode.
    pub fn with_compose_mode(mut self, mode: ComposeMode) -> Self {
        self.compose_mode = mode;
        self
    }

    /// Set the object order.
    pub fn with_order(mut self, order: OutputOrder) -> Self {
        self.order = order;
        self
    }

    /// Produce output files for every object in `group` under `output_dir`.
    ///
    /// Output numbers count written files, not objects: an object that only
    /// has a soft mask is skipped without consuming a number, so the files
    /// are always numbered `001..=N` with no gaps.
    ///
    /// A failure part way through leaves the files already written in place.
    pub fn reconstruct(
        &self,
        group: &ObjectGroup,
        assets: &AssetPathIndex,
        output_dir: &Path,
    ) -> Result<ReconstructionSummary> {
        let base = output_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "output directory has no usable name: {}",
                    output_dir.display()
                ))
            })?;

        let mut summary = ReconstructionSummary::default();
        for (object, entry) in group.ordered(self.order) {
            let index = summary.written.len() + 1;
            let target = output_dir.join(output_file_name(base, index));

            match Action::for_entry(entry) {
                Action::Skip => {
                    log::debug!("Object {}: soft mask without image, skipped", object);
                    summary.skipped_objects.push(object);
                    continue;
                }
                Action::Composite { image, smask } => {
                    let image_path = resolve(assets, image)?;
                    let mask_path = resolve(assets, smask)?;
                    log::debug!(
                        "Object {}: compositing #{} with mask #{} -> {}",
                        object,
                        image.sequence_number,
                        smask.sequence_number,
                        target.display()
                    );
                    let invocation = self.tools.composite_invocation(
                        image_path,
                        mask_path,
                        self.compose_mode,
                        &target,
                    );
                    self.runner.run(&invocation)?;
                    summary.merged_count += 1;
                }
                Action::Copy { image } => {
                    let source = resolve(assets, image)?;
                    log::debug!(
                        "Object {}: copying #{} -> {}",
                        object,
                        image.sequence_number,
                        target.display()
                    );
                    fs::copy(source, &target)?;
                    summary.copied_count += 1;
                }
            }
            summary.written.push(target);
        }

        Ok(summary)
    }
}

fn resolve<'p>(assets: &'p AssetPathIndex, record: &ImageMetadataRecord) -> Result<&'p Path> {
    assets
        .get(record.sequence_number)
        .ok_or(Error::MissingAsset {
            sequence: record.sequence_number,
            object: record.object_number,
        })
}
