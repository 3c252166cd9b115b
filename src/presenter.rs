use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::content::{ContentRef, ContentResolver};
use crate::metadata::{CONTAINER_KEYS, EXIF_TAGS, MetadataBackend};

/// MIME type shown when the resolver cannot determine one.
pub const UNKNOWN_MIME: &str = "unknown";

/// Shown for content that is neither image, audio nor video.
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Unsupported file type for metadata extraction.";

/// Broad media category, decided by MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Audio,
    Video,
    Other,
}

impl MediaCategory {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image") {
            Self::Image
        } else if mime.starts_with("audio") {
            Self::Audio
        } else if mime.starts_with("video") {
            Self::Video
        } else {
            Self::Other
        }
    }
}

/// One line of rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Line {
    /// The detected MIME type; always the first line of a successful dispatch.
    Mime { mime_type: String },
    /// A present metadata value.
    Tag { label: String, value: String },
    /// Unsupported input, a failure, or a status message.
    Notice { text: String },
}

impl Line {
    pub fn mime(mime_type: impl Into<String>) -> Self {
        Self::Mime {
            mime_type: mime_type.into(),
        }
    }

    pub fn tag(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Tag {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::Notice { text: text.into() }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mime { mime_type } => write!(f, "MIME type: {mime_type}"),
            Self::Tag { label, value } => write!(f, "{label}: {value}"),
            Self::Notice { text } => f.write_str(text),
        }
    }
}

/// The text shown on screen. Cleared at the start of every display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    lines: Vec<Line>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Replace the whole buffer with a single notice.
    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.clear();
        self.push(Line::notice(text));
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render as plain text, one line each, with a blank line after the MIME header.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.to_string());
            text.push('\n');
            if let Line::Mime { .. } = line {
                text.push('\n');
            }
        }
        text
    }
}

/// Routes a content reference to the right metadata reader and renders the result.
///
/// # Example
///
/// ```rust,no_run
/// use exif_viewer::content::LocalContentResolver;
/// use exif_viewer::metadata::NativeBackend;
/// use exif_viewer::presenter::{MetadataPresenter, OutputBuffer};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let mut resolver = LocalContentResolver::new();
/// let uri = resolver.grant(Path::new("photo.jpg"))?;
///
/// let mut out = OutputBuffer::new();
/// MetadataPresenter::new(&resolver, &NativeBackend).display(&uri, &mut out);
/// print!("{}", out.text());
/// # Ok(())
/// # }
/// ```
pub struct MetadataPresenter<'a> {
    resolver: &'a dyn ContentResolver,
    backend: &'a dyn MetadataBackend,
}

impl<'a> MetadataPresenter<'a> {
    pub fn new(resolver: &'a dyn ContentResolver, backend: &'a dyn MetadataBackend) -> Self {
        Self { resolver, backend }
    }

    /// Clear `out`, then fill it with the metadata of `uri`.
    ///
    /// Failures never propagate: they become a single trailing line, and
    /// lines appended before the failure are kept.
    pub fn display(&self, uri: &ContentRef, out: &mut OutputBuffer) {
        out.clear();

        if !uri.is_content() {
            log::debug!("Rejecting {uri}: unsupported scheme");
            out.push(Line::notice(format!("Unsupported URI scheme: {}", uri.scheme())));
            return;
        }

        let mime = self
            .resolver
            .mime_type(uri)
            .unwrap_or_else(|| UNKNOWN_MIME.to_string());
        out.push(Line::mime(mime.as_str()));

        let category = MediaCategory::from_mime(&mime);
        log::debug!("Dispatching {uri} ({mime}) as {category:?}");

        match category {
            MediaCategory::Image => {
                if let Err(e) = self.append_exif(uri, out) {
                    log::warn!("Failed to read EXIF from {uri}: {e:#}");
                    out.push(Line::notice(format!("Failed to read EXIF: {e:#}")));
                }
            }
            MediaCategory::Audio | MediaCategory::Video => {
                if let Err(e) = self.append_container(uri, out) {
                    log::warn!("Failed to read metadata from {uri}: {e:#}");
                    out.push(Line::notice(format!("Failed to read metadata: {e:#}")));
                }
            }
            MediaCategory::Other => out.push(Line::notice(UNSUPPORTED_TYPE_MESSAGE)),
        }
    }

    fn append_exif(&self, uri: &ContentRef, out: &mut OutputBuffer) -> Result<()> {
        let stream = self.resolver.open_stream(uri)?;
        let exif = self.backend.exif_reader(stream)?;
        for (tag, label) in EXIF_TAGS {
            if let Some(value) = exif.attribute(tag)? {
                out.push(Line::tag(label, value));
            }
        }
        Ok(())
    }

    fn append_container(&self, uri: &ContentRef, out: &mut OutputBuffer) -> Result<()> {
        // Dropped on every exit path, including `?`
        let reader = self.backend.container_reader(self.resolver, uri)?;
        for (key, label) in CONTAINER_KEYS {
            match reader.extract(key)? {
                Some(value) if !value.is_empty() => out.push(Line::tag(label, value)),
                _ => {}
            }
        }
        Ok(())
    }
}
