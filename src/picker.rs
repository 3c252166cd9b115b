use anyhow::Result;
use std::path::PathBuf;

use crate::content::{ContentRef, LocalContentResolver};

/// A document picker that accepts any kind of file.
///
/// Returns `None` when the user cancels.
pub trait DocumentPicker {
    fn pick_document(&mut self) -> Option<PathBuf>;
}

/// Let the user pick a document and issue a content reference for it.
///
/// Cancellation yields `Ok(None)`; the caller should leave its display as is.
pub fn select_content(
    picker: &mut dyn DocumentPicker,
    resolver: &mut LocalContentResolver,
) -> Result<Option<ContentRef>> {
    match picker.pick_document() {
        Some(path) => {
            log::debug!("Picked {}", path.display());
            resolver.grant(&path).map(Some)
        }
        None => {
            log::debug!("Pick cancelled");
            Ok(None)
        }
    }
}

/// Native file dialog with no type filter.
#[cfg(feature = "gui")]
#[derive(Debug, Default)]
pub struct DialogPicker {
    start_dir: Option<PathBuf>,
}

#[cfg(feature = "gui")]
impl DialogPicker {
    pub fn new(start_dir: Option<PathBuf>) -> Self {
        Self { start_dir }
    }
}

#[cfg(feature = "gui")]
impl DocumentPicker for DialogPicker {
    fn pick_document(&mut self) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title("Pick Media File");
        if let Some(ref dir) = self.start_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }
}
