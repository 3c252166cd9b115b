use anyhow::{Context, Result};
use nom_exif::{EntryValue, Exif, ExifIter, ExifTag, GPSInfo, LatLng, MediaParser, MediaSource};

use super::tags::ExifTagId;
use crate::content::ContentStream;

/// Attribute lookup over an image's EXIF block.
pub trait ExifAttributes {
    /// The attribute's value, or `None` when the image does not carry it.
    fn attribute(&self, tag: ExifTagId) -> Result<Option<String>>;
}

/// EXIF reader backed by `nom-exif`.
///
/// The stream is consumed (and closed) while the reader is being built.
pub struct NomExifReader {
    exif: Option<Exif>,
    gps: Option<GPSInfo>,
}

impl NomExifReader {
    pub fn open(stream: Box<dyn ContentStream>) -> Result<Self> {
        let ms = match MediaSource::seekable(stream) {
            Ok(ms) => ms,
            Err(e) => {
                log::debug!("Unrecognized image container: {e}");
                return Ok(Self::empty());
            }
        };

        if !ms.has_exif() {
            log::debug!("Image container carries no EXIF");
            return Ok(Self::empty());
        }

        let mut parser = MediaParser::new();
        let iter: ExifIter = parser.parse(ms).context("Failed to parse EXIF")?;

        // GPS must be read before the iterator is converted. A broken GPS IFD
        // only hides the coordinates.
        let gps = iter.parse_gps_info().unwrap_or_else(|e| {
            log::debug!("Ignoring unreadable GPS info: {e}");
            None
        });
        let exif: Exif = iter.into();

        Ok(Self {
            exif: Some(exif),
            gps,
        })
    }

    fn empty() -> Self {
        Self {
            exif: None,
            gps: None,
        }
    }
}

impl ExifAttributes for NomExifReader {
    fn attribute(&self, tag: ExifTagId) -> Result<Option<String>> {
        let value = match tag {
            ExifTagId::GpsLatitude => self.gps.as_ref().map(|g| format_latlng(&g.latitude)),
            ExifTagId::GpsLongitude => self.gps.as_ref().map(|g| format_latlng(&g.longitude)),
            ExifTagId::DateTime => self.entry(ExifTag::ModifyDate),
            ExifTagId::Make => self.entry(ExifTag::Make),
            ExifTagId::Model => self.entry(ExifTag::Model),
            ExifTagId::Orientation => self.entry(ExifTag::Orientation),
        };
        Ok(value)
    }
}

impl NomExifReader {
    fn entry(&self, tag: ExifTag) -> Option<String> {
        self.exif.as_ref()?.get(tag).and_then(entry_to_string)
    }
}

/// EXIF's own timestamp layout, e.g. `2024:05:01 10:00:00`.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Convert an EntryValue to an Option<String>.
///
/// Timestamps are rendered back in EXIF layout rather than the decoder's.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = match val {
        EntryValue::Time(t) => t.format(EXIF_DATETIME_FORMAT).to_string(),
        EntryValue::NaiveDateTime(t) => t.format(EXIF_DATETIME_FORMAT).to_string(),
        _ => val.to_string(),
    };
    let s = s.trim().trim_matches('"').trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Render a coordinate as its rational triple, e.g. `41/1,24/1,3514/100`.
fn format_latlng(latlng: &LatLng) -> String {
    format!(
        "{}/{},{}/{},{}/{}",
        latlng.0.0, latlng.0.1, latlng.1.0, latlng.1.1, latlng.2.0, latlng.2.1
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn non_image_bytes_yield_no_attributes() {
        let stream = Box::new(Cursor::new(b"definitely not an image".to_vec()));
        let reader = NomExifReader::open(stream).unwrap();
        for (tag, _) in crate::metadata::EXIF_TAGS {
            assert_eq!(reader.attribute(tag).unwrap(), None);
        }
    }

    #[test]
    fn empty_stream_yields_no_attributes() {
        let stream = Box::new(Cursor::new(Vec::new()));
        let reader = NomExifReader::open(stream).unwrap();
        assert_eq!(reader.attribute(ExifTagId::Make).unwrap(), None);
    }

    #[test]
    fn latlng_renders_as_rationals() {
        let latlng: LatLng = [(41, 1), (24, 1), (3514, 100)].into();
        assert_eq!(format_latlng(&latlng), "41/1,24/1,3514/100");
    }

    #[test]
    fn entry_text_is_trimmed() {
        let val = EntryValue::Text("  Canon  ".to_string());
        assert_eq!(entry_to_string(&val).as_deref(), Some("Canon"));
    }

    #[test]
    fn blank_entry_is_absent() {
        let val = EntryValue::Text("   ".to_string());
        assert_eq!(entry_to_string(&val), None);
    }
}
