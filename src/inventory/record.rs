//! Single line of `pdfimages -list` output.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One image entry from the inventory listing.
///
/// Columns are positional:
///
/// ```text
/// page num type width height color comp bpc enc interp object ID x-ppi y-ppi size ratio
/// ```
///
/// Everything except `num` and `object` is kept verbatim. Columns after
/// `object` may be missing on short lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadataRecord {
    pub page: String,
    /// Extraction tool's asset number (`num` column)
    pub sequence_number: u32,
    /// Entry type, e.g. `image` or `smask`
    pub image_type: String,
    pub width: String,
    pub height: String,
    pub color_space: String,
    pub composition: String,
    pub bits_per_component: String,
    pub encoding: String,
    pub interpolation: String,
    /// PDF object number of the image XObject
    pub object_number: u32,
    pub object_id: Option<String>,
    pub x_ppi: Option<String>,
    pub y_ppi: Option<String>,
    pub byte_size: Option<String>,
    pub compression_ratio: Option<String>,
}

impl ImageMetadataRecord {
    /// Parse one listing line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = Fields::new(line);
        if fields.is_empty() {
            return Err(fields.error("page"));
        }

        Ok(Self {
            page: fields.required("page")?,
            sequence_number: fields.integer("num")?,
            image_type: fields.required("type")?,
            width: fields.required("width")?,
            height: fields.required("height")?,
            color_space: fields.required("color")?,
            composition: fields.required("comp")?,
            bits_per_component: fields.required("bpc")?,
            encoding: fields.required("enc")?,
            interpolation: fields.required("interp")?,
            object_number: fields.integer("object")?,
            object_id: fields.optional(),
            x_ppi: fields.optional(),
            y_ppi: fields.optional(),
            byte_size: fields.optional(),
            compression_ratio: fields.optional(),
        })
    }

    /// Whether this entry is a base image.
    pub fn is_image(&self) -> bool {
        self.image_type.contains("image")
    }

    /// Whether this entry is a soft mask.
    pub fn is_smask(&self) -> bool {
        self.image_type.contains("smask")
    }
}

impl FromStr for ImageMetadataRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Left-to-right token cursor over a listing line.
struct Fields<'a> {
    line: &'a str,
    tokens: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            tokens: line.split_whitespace().peekable(),
        }
    }

    fn is_empty(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    fn required(&mut self, field: &'static str) -> Result<String> {
        self.tokens
            .next()
            .map(str::to_string)
            .ok_or_else(|| self.error(field))
    }

    fn integer(&mut self, field: &'static str) -> Result<u32> {
        let token = self.tokens.next().ok_or_else(|| self.error(field))?;
        token.parse().map_err(|_| self.error(field))
    }

    fn optional(&mut self) -> Option<String> {
        self.tokens.next().map(str::to_string)
    }

    fn error(&self, field: &'static str) -> Error {
        Error::MetadataFormat {
            field,
            line: self.line.to_string(),
        }
    }
}
