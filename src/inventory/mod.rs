//! Image inventory: parsing `pdfimages -list` and correlating its entries.

mod group;
mod record;

pub use group::{correlate, ObjectEntry, ObjectGroup, IMAGE_TYPE, SMASK_TYPE};
pub use record::ImageMetadataRecord;
