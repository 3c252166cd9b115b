//! Metadata readers for picked content.
//!
//! - [`ExifAttributes`] — attribute lookup over an image's EXIF block
//! - [`ContainerMetadata`] — key lookup over an audio/video container
//!
//! The fixed lists of what the viewer asks for live in [`EXIF_TAGS`] and
//! [`CONTAINER_KEYS`]. A [`MetadataBackend`] builds both readers;
//! [`NativeBackend`] uses `nom-exif` and `lofty`.

mod container;
mod exif;
#[cfg(test)]
pub(crate) mod fixtures;
mod tags;

pub use container::{ContainerMetadata, NativeContainerReader};
pub use exif::{ExifAttributes, NomExifReader};
pub use tags::{CONTAINER_KEYS, EXIF_TAGS, ExifTagId, MetadataKey};

use anyhow::Result;

use crate::content::{ContentRef, ContentResolver, ContentStream};

/// Builds metadata readers. Readers release their resources when dropped.
pub trait MetadataBackend {
    /// Build an EXIF reader over an image stream.
    fn exif_reader(&self, stream: Box<dyn ContentStream>) -> Result<Box<dyn ExifAttributes>>;

    /// Build a container reader bound to a content reference.
    fn container_reader(
        &self,
        resolver: &dyn ContentResolver,
        uri: &ContentRef,
    ) -> Result<Box<dyn ContainerMetadata>>;
}

/// Production backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl MetadataBackend for NativeBackend {
    fn exif_reader(&self, stream: Box<dyn ContentStream>) -> Result<Box<dyn ExifAttributes>> {
        Ok(Box::new(NomExifReader::open(stream)?))
    }

    fn container_reader(
        &self,
        resolver: &dyn ContentResolver,
        uri: &ContentRef,
    ) -> Result<Box<dyn ContainerMetadata>> {
        Ok(Box::new(NativeContainerReader::open(resolver, uri)?))
    }
}
