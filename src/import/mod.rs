use std::path::Path;
use tracing::info;

use crate::error::ImportError;
use crate::track::Trackpoint;

pub mod gpx;

/// Trait for reading trackpoints from different file formats
pub trait TrackImporter {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Read the file's trackpoints in recorded order
    fn import_file(&self, file_path: &Path) -> Result<Vec<Trackpoint>, ImportError>;

    /// Get the format name for this importer
    fn format_name(&self) -> &'static str;
}

/// Manager for coordinating different import formats
pub struct ImportManager {
    importers: Vec<Box<dyn TrackImporter>>,
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        let importers: Vec<Box<dyn TrackImporter>> = vec![Box::new(gpx::GpxImporter::new())];

        Self { importers }
    }

    /// Import a single file, picking the importer by file extension
    pub fn import_file(&self, file_path: &Path) -> Result<Vec<Trackpoint>, ImportError> {
        let importer = self
            .importers
            .iter()
            .find(|importer| importer.can_import(file_path))
            .ok_or_else(|| ImportError::UnsupportedFormat {
                path: file_path.to_path_buf(),
            })?;

        info!(
            file = %file_path.display(),
            format = importer.format_name(),
            "Importing track"
        );
        importer.import_file(file_path)
    }

    /// Check if this manager can import a given file
    pub fn can_import_file(&self, file_path: &Path) -> bool {
        self.importers.iter().any(|importer| importer.can_import(file_path))
    }
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}
