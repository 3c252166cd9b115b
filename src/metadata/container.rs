use anyhow::{Context, Result, anyhow};
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey};
use nom_exif::{EntryValue, MediaParser, MediaSource, TrackInfo, TrackInfoTag};
use std::collections::HashMap;

use super::tags::MetadataKey;
use crate::content::{ContentRef, ContentResolver, ContentStream};

/// Key lookup over an audio/video container's metadata.
pub trait ContainerMetadata {
    /// The value for `key`, or `None` when the container does not carry it.
    fn extract(&self, key: MetadataKey) -> Result<Option<String>>;
}

/// Container reader bound to one content reference.
///
/// Tags and audio properties come from `lofty`; track info (duration,
/// dimensions, creation date) comes from `nom-exif`. Both streams are closed
/// before [`open`](Self::open) returns.
#[derive(Debug, Default)]
pub struct NativeContainerReader {
    values: HashMap<MetadataKey, String>,
}

impl NativeContainerReader {
    pub fn open(resolver: &dyn ContentResolver, uri: &ContentRef) -> Result<Self> {
        let tagged = match resolver.open_stream(uri).and_then(read_tagged_file) {
            Ok(file) => Some(file),
            Err(e) => {
                log::debug!("No tag data in {uri}: {e:#}");
                None
            }
        };

        let track = match resolver.open_stream(uri).and_then(read_track_info) {
            Ok(info) => info,
            Err(e) => {
                log::debug!("No track info in {uri}: {e:#}");
                None
            }
        };

        if tagged.is_none() && track.is_none() {
            return Err(anyhow!("Unrecognized media container"));
        }

        let mut reader = Self::default();
        if let Some(ref file) = tagged {
            reader.collect_tags(file);
        }
        if let Some(ref info) = track {
            reader.collect_track(info);
        }
        Ok(reader)
    }

    fn collect_tags(&mut self, file: &TaggedFile) {
        if let Some(tag) = file.primary_tag().or_else(|| file.first_tag()) {
            self.set(MetadataKey::Album, tag.album().map(|s| s.into_owned()));
            self.set(MetadataKey::Artist, tag.artist().map(|s| s.into_owned()));
            self.set(MetadataKey::Genre, tag.genre().map(|s| s.into_owned()));
            self.set(MetadataKey::Title, tag.title().map(|s| s.into_owned()));
            let date = tag
                .get_string(&ItemKey::RecordingDate)
                .or_else(|| tag.get_string(&ItemKey::Year))
                .map(str::to_string);
            self.set(MetadataKey::Date, date);
        }

        let millis = file.properties().duration().as_millis();
        if millis > 0 {
            self.set(MetadataKey::Duration, Some(millis.to_string()));
        }
    }

    /// Track info only fills keys the tags left empty, except for duration,
    /// where the container's own figure wins over the audio stream's.
    fn collect_track(&mut self, info: &TrackInfo) {
        if let Some(ms) = track_entry(info, TrackInfoTag::DurationMs) {
            self.values.insert(MetadataKey::Duration, ms);
        }
        self.set_missing(MetadataKey::VideoWidth, track_entry(info, TrackInfoTag::ImageWidth));
        self.set_missing(MetadataKey::VideoHeight, track_entry(info, TrackInfoTag::ImageHeight));
        self.set_missing(MetadataKey::Date, track_entry(info, TrackInfoTag::CreateDate));
        self.set_missing(MetadataKey::Artist, track_entry(info, TrackInfoTag::Author));
    }

    fn set(&mut self, key: MetadataKey, value: Option<String>) {
        if let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.values.insert(key, value);
        }
    }

    fn set_missing(&mut self, key: MetadataKey, value: Option<String>) {
        if !self.values.contains_key(&key) {
            self.set(key, value);
        }
    }
}

impl ContainerMetadata for NativeContainerReader {
    fn extract(&self, key: MetadataKey) -> Result<Option<String>> {
        Ok(self.values.get(&key).cloned())
    }
}

fn read_tagged_file(stream: Box<dyn ContentStream>) -> Result<TaggedFile> {
    Probe::new(stream)
        .guess_file_type()
        .context("Failed to probe file type")?
        .read()
        .context("Failed to read tags")
}

fn read_track_info(stream: Box<dyn ContentStream>) -> Result<Option<TrackInfo>> {
    let ms = MediaSource::seekable(stream).context("Failed to open media source")?;
    if !ms.has_track() {
        return Ok(None);
    }
    let mut parser = MediaParser::new();
    let info: TrackInfo = parser.parse(ms).context("Failed to parse track info")?;
    Ok(Some(info))
}

fn track_entry(info: &TrackInfo, tag: TrackInfoTag) -> Option<String> {
    info.get(tag).map(EntryValue::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LocalContentResolver;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn unrecognized_bytes_fail_to_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.mp3");
        fs::write(&path, b"this is not an audio file at all").unwrap();

        let mut resolver = LocalContentResolver::new();
        let uri = resolver.grant(&path).unwrap();
        assert!(NativeContainerReader::open(&resolver, &uri).is_err());
    }

    #[test]
    fn unknown_reference_fails_to_open() {
        let resolver = LocalContentResolver::new();
        let uri = ContentRef::parse("content://exif-viewer.documents/document/99");
        assert!(NativeContainerReader::open(&resolver, &uri).is_err());
    }

    #[test]
    fn set_ignores_blank_values() {
        let mut reader = NativeContainerReader::default();
        reader.set(MetadataKey::Title, Some("  ".into()));
        reader.set(MetadataKey::Album, None);
        assert_eq!(reader.extract(MetadataKey::Title).unwrap(), None);
        assert_eq!(reader.extract(MetadataKey::Album).unwrap(), None);
    }

    #[test]
    fn set_missing_keeps_existing_value() {
        let mut reader = NativeContainerReader::default();
        reader.set(MetadataKey::Artist, Some("Tag Artist".into()));
        reader.set_missing(MetadataKey::Artist, Some("Track Author".into()));
        reader.set_missing(MetadataKey::VideoWidth, Some("1920".into()));
        assert_eq!(reader.extract(MetadataKey::Artist).unwrap().as_deref(), Some("Tag Artist"));
        assert_eq!(reader.extract(MetadataKey::VideoWidth).unwrap().as_deref(), Some("1920"));
    }
}
