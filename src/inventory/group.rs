//! Grouping of inventory records by PDF object.

use super::ImageMetadataRecord;
use crate::error::Result;
use crate::options::{OutputOrder, ToolPaths};
use crate::tools::ToolRunner;
use std::collections::BTreeMap;
use std::path::Path;

/// Listing lines before the first record (column titles and a rule).
const HEADER_LINES: usize = 2;

/// Lines this short are blank or separators.
const MIN_RECORD_LEN: usize = 3;

/// Record type key for base images.
pub const IMAGE_TYPE: &str = "image";

/// Record type key for soft masks.
pub const SMASK_TYPE: &str = "smask";

/// Records known for one PDF object, keyed by record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectEntry {
    records: BTreeMap<String, ImageMetadataRecord>,
}

impl ObjectEntry {
    /// The base image record, if any.
    pub fn image(&self) -> Option<&ImageMetadataRecord> {
        self.records.get(IMAGE_TYPE)
    }

    /// The soft mask record, if any.
    pub fn smask(&self) -> Option<&ImageMetadataRecord> {
        self.records.get(SMASK_TYPE)
    }

    /// Record of an arbitrary type.
    pub fn get(&self, image_type: &str) -> Option<&ImageMetadataRecord> {
        self.records.get(image_type)
    }

    /// All records of this object, by type.
    pub fn records(&self) -> impl Iterator<Item = &ImageMetadataRecord> {
        self.records.values()
    }

    /// Number of distinct record types.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Image and soft-mask records correlated by PDF object number.
///
/// Only `image`/`smask` entries are admitted. A later record with the same
/// object and type replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectGroup {
    objects: BTreeMap<u32, ObjectEntry>,
    first_seen: Vec<u32>,
}

impl ObjectGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from the full stdout of `pdfimages -list`.
    pub fn from_listing(listing: &str) -> Result<Self> {
        let mut group = Self::new();
        for line in listing.lines().skip(HEADER_LINES) {
            if line.len() < MIN_RECORD_LEN {
                continue;
            }
            let record = ImageMetadataRecord::parse(line)?;
            group.insert(record);
        }
        Ok(group)
    }

    /// Insert a record, returning `false` if its type is not relevant.
    pub fn insert(&mut self, record: ImageMetadataRecord) -> bool {
        if !record.is_image() && !record.is_smask() {
            log::trace!(
                "Ignoring {} entry for object {}",
                record.image_type,
                record.object_number
            );
            return false;
        }

        let object = record.object_number;
        if !self.objects.contains_key(&object) {
            self.first_seen.push(object);
        }
        let entry = self.objects.entry(object).or_default();
        if let Some(previous) = entry.records.insert(record.image_type.clone(), record) {
            log::debug!(
                "Object {}: {} entry #{} superseded",
                object,
                previous.image_type,
                previous.sequence_number
            );
        }
        true
    }

    /// Look up an object.
    pub fn get(&self, object_number: u32) -> Option<&ObjectEntry> {
        self.objects.get(&object_number)
    }

    /// Number of correlated objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object has been recorded.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in ascending object number.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &ObjectEntry)> {
        self.objects.iter().map(|(k, v)| (*k, v))
    }

    /// Objects in the requested order.
    pub fn ordered(&self, order: OutputOrder) -> Vec<(u32, &ObjectEntry)> {
        match order {
            OutputOrder::ObjectNumber => self.iter().collect(),
            OutputOrder::Inventory => self
                .first_seen
                .iter()
                .filter_map(|object| self.objects.get(object).map(|entry| (*object, entry)))
                .collect(),
        }
    }
}

/// Run the listing tool on `pdf` and correlate its output.
pub fn correlate<R: ToolRunner>(pdf: &Path, tools: &ToolPaths, runner: &R) -> Result<ObjectGroup> {
    let output = runner.run(&tools.list_invocation(pdf))?;
    let group = ObjectGroup::from_listing(&output.stdout)?;
    log::debug!("Correlated {} image objects", group.len());
    Ok(group)
}
