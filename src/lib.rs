//! # exif-viewer
//!
//! Pick a media file and view its embedded metadata — EXIF tags for images,
//! container metadata for audio and video.
//!
//! ## Quick Start
//!
//! [`Viewer`](viewer::Viewer) holds the state of the single screen: it runs the
//! permission check, starts the foreground service, and renders the metadata
//! of each picked file into an output buffer.
//!
//! ```rust,no_run
//! use exif_viewer::permissions::{GateAction, PlatformVersion};
//! use exif_viewer::viewer::Viewer;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut viewer = Viewer::new(PlatformVersion::detect(None));
//!
//!     // Ask for whatever is missing, then deliver the user's answers
//!     if let GateAction::Request(missing) = viewer.start()? {
//!         let answers: Vec<_> = missing.iter().map(|p| (*p, true)).collect();
//!         viewer.answer_permissions(&answers)?;
//!     }
//!
//!     let uri = viewer.grant(Path::new("photo.jpg"))?;
//!     viewer.show(&uri);
//!     print!("{}", viewer.output().text());
//!     Ok(())
//! }
//! ```
//!
//! ## What is shown
//!
//! | Content | Source | Fields |
//! |---------|--------|--------|
//! | `image/*` | EXIF (`nom-exif`) | DateTime, Make, Model, Orientation, GPSLatitude, GPSLongitude |
//! | `audio/*`, `video/*` | Tags (`lofty`) + track info (`nom-exif`) | Album, Artist, Duration, Genre, Title, Date, VideoWidth, VideoHeight |
//! | anything else | — | "Unsupported file type" |
//!
//! ## Modules
//!
//! - [`config`] — Configuration types and loading/saving
//! - [`content`] — Content references and the content resolver
//! - [`metadata`] — Tag lists and EXIF/container readers
//! - [`permissions`] — Permission sets and the permission gate
//! - [`picker`] — Document picker abstraction
//! - [`presenter`] — Output buffer and metadata dispatch
//! - [`service`] — Foreground service
//! - [`viewer`] — Screen state tying it all together

pub mod config;
pub mod content;
pub mod metadata;
pub mod permissions;
pub mod picker;
pub mod presenter;
pub mod service;
pub mod viewer;
