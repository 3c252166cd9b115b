/// EXIF attributes the viewer asks an image for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExifTagId {
    DateTime,
    Make,
    Model,
    Orientation,
    GpsLatitude,
    GpsLongitude,
}

/// Container metadata keys the viewer asks audio/video for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    Album,
    Artist,
    Duration,
    Genre,
    Title,
    Date,
    VideoWidth,
    VideoHeight,
}

/// Image tags in display order, paired with their labels.
pub const EXIF_TAGS: [(ExifTagId, &str); 6] = [
    (ExifTagId::DateTime, "DateTime"),
    (ExifTagId::Make, "Make"),
    (ExifTagId::Model, "Model"),
    (ExifTagId::Orientation, "Orientation"),
    (ExifTagId::GpsLatitude, "GPSLatitude"),
    (ExifTagId::GpsLongitude, "GPSLongitude"),
];

/// Audio/video keys in display order, paired with their labels.
pub const CONTAINER_KEYS: [(MetadataKey, &str); 8] = [
    (MetadataKey::Album, "Album"),
    (MetadataKey::Artist, "Artist"),
    (MetadataKey::Duration, "Duration"),
    (MetadataKey::Genre, "Genre"),
    (MetadataKey::Title, "Title"),
    (MetadataKey::Date, "Date"),
    (MetadataKey::VideoWidth, "VideoWidth"),
    (MetadataKey::VideoHeight, "VideoHeight"),
];
