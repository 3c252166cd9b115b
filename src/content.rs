use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Scheme of references issued by a content resolver.
pub const CONTENT_SCHEME: &str = "content";

/// Authority used in references issued by [`LocalContentResolver`].
pub const LOCAL_AUTHORITY: &str = "exif-viewer.documents";

/// An opaque locator for user-selected content (`scheme:rest`).
///
/// References are not filesystem paths. Only a [`ContentResolver`] knows how
/// to turn one into a MIME type or a byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRef {
    uri: String,
    scheme_len: Option<usize>,
}

impl ContentRef {
    pub fn parse(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            scheme_len: scheme_end(uri),
        }
    }

    /// The addressing scheme, or an empty string if the reference has none.
    pub fn scheme(&self) -> &str {
        match self.scheme_len {
            Some(len) => &self.uri[..len],
            None => "",
        }
    }

    pub fn is_content(&self) -> bool {
        self.scheme().eq_ignore_ascii_case(CONTENT_SCHEME)
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) followed by ':'.
fn scheme_end(uri: &str) -> Option<usize> {
    let colon = uri.find(':')?;
    let scheme = &uri[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(colon)
    } else {
        None
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl FromStr for ContentRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// A readable, seekable byte stream over resolved content.
pub trait ContentStream: Read + Seek {}

impl<T: Read + Seek> ContentStream for T {}

/// Maps content references to MIME types and byte streams.
pub trait ContentResolver {
    /// The MIME type of the referenced content, if it can be determined.
    fn mime_type(&self, uri: &ContentRef) -> Option<String>;

    /// Open a fresh stream over the referenced content.
    fn open_stream(&self, uri: &ContentRef) -> Result<Box<dyn ContentStream>>;
}

/// Resolver for files picked on the local machine.
///
/// Each picked file is registered with [`grant`](Self::grant) and receives a
/// `content://` reference valid for the lifetime of the resolver.
#[derive(Debug, Default)]
pub struct LocalContentResolver {
    documents: HashMap<u64, PathBuf>,
    next_id: u64,
}

impl LocalContentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing file and issue a content reference for it.
    pub fn grant(&mut self, path: &Path) -> Result<ContentRef> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        if !path.is_file() {
            bail!("Not a file: {}", path.display());
        }

        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Granted document {id}: {}", path.display());
        self.documents.insert(id, path);

        Ok(ContentRef::parse(&format!(
            "{CONTENT_SCHEME}://{LOCAL_AUTHORITY}/document/{id}"
        )))
    }

    fn lookup(&self, uri: &ContentRef) -> Option<&Path> {
        if !uri.is_content() {
            return None;
        }
        let rest = uri.as_str()[uri.scheme().len()..].strip_prefix("://")?;
        let id = rest
            .strip_prefix(LOCAL_AUTHORITY)?
            .strip_prefix("/document/")?
            .parse::<u64>()
            .ok()?;
        self.documents.get(&id).map(PathBuf::as_path)
    }
}

impl ContentResolver for LocalContentResolver {
    fn mime_type(&self, uri: &ContentRef) -> Option<String> {
        let path = self.lookup(uri)?;
        mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
    }

    fn open_stream(&self, uri: &ContentRef) -> Result<Box<dyn ContentStream>> {
        let path = self
            .lookup(uri)
            .with_context(|| format!("No content registered for {uri}"))?;
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ── ContentRef ───────────────────────────────────────────────────

    #[test]
    fn scheme_of_content_uri() {
        let uri = ContentRef::parse("content://media/external/images/42");
        assert_eq!(uri.scheme(), "content");
        assert!(uri.is_content());
    }

    #[test]
    fn scheme_of_other_uris() {
        assert_eq!(ContentRef::parse("file:///tmp/a.jpg").scheme(), "file");
        assert_eq!(ContentRef::parse("https://example.com/a.jpg").scheme(), "https");
        assert!(!ContentRef::parse("file:///tmp/a.jpg").is_content());
    }

    #[test]
    fn scheme_is_case_insensitive_for_content() {
        assert!(ContentRef::parse("CONTENT://x/1").is_content());
    }

    #[test]
    fn no_scheme() {
        assert_eq!(ContentRef::parse("/tmp/a.jpg").scheme(), "");
        assert_eq!(ContentRef::parse("relative/a.jpg").scheme(), "");
        assert_eq!(ContentRef::parse("1abc:rest").scheme(), "");
        assert_eq!(ContentRef::parse("").scheme(), "");
    }

    #[test]
    fn display_round_trips_text() {
        let text = "content://a/b";
        assert_eq!(ContentRef::parse(text).to_string(), text);
        assert_eq!(text.parse::<ContentRef>().unwrap().as_str(), text);
    }

    // ── LocalContentResolver ─────────────────────────────────────────

    #[test]
    fn grant_issues_content_reference() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("photo.jpg");
        fs::write(&jpg, b"fake").unwrap();

        let mut resolver = LocalContentResolver::new();
        let uri = resolver.grant(&jpg).unwrap();
        assert!(uri.is_content());
        assert!(uri.as_str().starts_with("content://exif-viewer.documents/document/"));
    }

    #[test]
    fn grants_are_distinct() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("photo.jpg");
        fs::write(&jpg, b"fake").unwrap();

        let mut resolver = LocalContentResolver::new();
        let a = resolver.grant(&jpg).unwrap();
        let b = resolver.grant(&jpg).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn grant_missing_file_fails() {
        let mut resolver = LocalContentResolver::new();
        assert!(resolver.grant(Path::new("/nonexistent/photo.jpg")).is_err());
    }

    #[test]
    fn grant_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut resolver = LocalContentResolver::new();
        assert!(resolver.grant(dir.path()).is_err());
    }

    #[test]
    fn mime_type_from_extension() {
        let dir = TempDir::new().unwrap();
        let mut resolver = LocalContentResolver::new();

        for (name, mime) in [
            ("a.jpg", "image/jpeg"),
            ("b.mp3", "audio/mpeg"),
            ("c.mp4", "video/mp4"),
            ("d.txt", "text/plain"),
        ] {
            let path = dir.path().join(name);
            fs::write(&path, b"x").unwrap();
            let uri = resolver.grant(&path).unwrap();
            assert_eq!(resolver.mime_type(&uri).as_deref(), Some(mime), "{name}");
        }
    }

    #[test]
    fn mime_type_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.zzzunknown");
        fs::write(&path, b"x").unwrap();

        let mut resolver = LocalContentResolver::new();
        let uri = resolver.grant(&path).unwrap();
        assert_eq!(resolver.mime_type(&uri), None);
    }

    #[test]
    fn open_stream_reads_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, b"hello").unwrap();

        let mut resolver = LocalContentResolver::new();
        let uri = resolver.grant(&path).unwrap();
        let mut stream = resolver.open_stream(&uri).unwrap();
        let mut buf = String::new();
        stream.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello");
    }

    #[test]
    fn unknown_reference_fails_cleanly() {
        let resolver = LocalContentResolver::new();
        let uri = ContentRef::parse("content://exif-viewer.documents/document/7");
        assert_eq!(resolver.mime_type(&uri), None);
        assert!(resolver.open_stream(&uri).is_err());

        let foreign = ContentRef::parse("content://media/external/images/1");
        assert!(resolver.open_stream(&foreign).is_err());
    }
}
