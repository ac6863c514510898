//! Master list, per-building peer lists, and the bundle of all peer lists.
//!
//! Artifacts are a pure function of the active building set: no timestamps,
//! ascending building-number order, atomic overwrite on every call.

use crate::bundle::{BundleMember, write_bundle};
use crate::error::ExportError;
use crate::format::ExportFormat;
use std::path::{Path, PathBuf};
use tsirouters_registry::{Building, Registry, write_bytes_atomically};

pub const MASTER_FILE_NAME: &str = "TSIRouters.ini";
pub const BUNDLE_FILE_NAME: &str = "all_configs.zip";

/// File name of one building's peer list (also its bundle member name).
pub fn peer_file_name(building_number: i64) -> String {
    format!("TSIRouters_{building_number}.ini")
}

/// Render the master list body from an ascending active set.
pub fn master_list(active: &[Building], format: ExportFormat) -> String {
    format.render(active)
}

/// Render the peer list of `building_number`: every other active building.
///
/// `None` when `building_number` is not in the active set.
pub fn peer_list(
    active: &[Building],
    building_number: i64,
    format: ExportFormat,
) -> Option<String> {
    if !active.iter().any(|b| b.building_number == building_number) {
        return None;
    }
    Some(format.render(active.iter().filter(|b| b.building_number != building_number)))
}

/// Handle to a written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Buildings listed (plain lists) or members packed (bundle).
    pub entries: usize,
}

/// Writes artifacts for one registry into one export directory.
#[derive(Debug, Clone)]
pub struct Exporter<'a> {
    registry: &'a Registry,
    export_dir: PathBuf,
    format: ExportFormat,
}

impl<'a> Exporter<'a> {
    pub fn new(registry: &'a Registry, export_dir: impl AsRef<Path>) -> Self {
        Self {
            registry,
            export_dir: export_dir.as_ref().to_path_buf(),
            format: ExportFormat::default(),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Every active building in one artifact.
    pub fn generate_master_list(&self) -> Result<Artifact, ExportError> {
        let active = self.registry.list_active()?;
        let body = master_list(&active, self.format);
        self.write_artifact(MASTER_FILE_NAME, body.as_bytes(), active.len())
    }

    /// Peer list for one building; `Ok(None)` if it is not active.
    pub fn generate_peer_list(
        &self,
        building_number: i64,
    ) -> Result<Option<Artifact>, ExportError> {
        let active = self.registry.list_active()?;
        Ok(self
            .write_peer_list(&active, building_number)?
            .map(|(artifact, _)| artifact))
    }

    /// Write every active building's peer list and pack them into one bundle.
    pub fn generate_bundle(&self) -> Result<Artifact, ExportError> {
        let active = self.registry.list_active()?;

        let mut members = Vec::with_capacity(active.len());
        for building in &active {
            let written = self.write_peer_list(&active, building.building_number)?;
            if let Some((artifact, body)) = written {
                members.push(BundleMember::new(artifact.name, body));
            }
        }

        let bytes = write_bundle(&members)?;
        self.write_artifact(BUNDLE_FILE_NAME, &bytes, members.len())
    }

    fn write_peer_list(
        &self,
        active: &[Building],
        building_number: i64,
    ) -> Result<Option<(Artifact, String)>, ExportError> {
        let Some(body) = peer_list(active, building_number, self.format) else {
            tracing::debug!(
                building = building_number,
                "peer list requested for inactive building"
            );
            return Ok(None);
        };
        let artifact = self.write_artifact(
            &peer_file_name(building_number),
            body.as_bytes(),
            active.len() - 1,
        )?;
        Ok(Some((artifact, body)))
    }

    fn write_artifact(
        &self,
        name: &str,
        bytes: &[u8],
        entries: usize,
    ) -> Result<Artifact, ExportError> {
        let path = self.export_dir.join(name);
        write_bytes_atomically(&path, bytes)?;
        tracing::info!(
            artifact = name,
            path = %path.display(),
            bytes = bytes.len(),
            entries,
            format = %self.format,
            "wrote export artifact"
        );
        Ok(Artifact {
            name: name.to_string(),
            path,
            size_bytes: bytes.len() as u64,
            entries,
        })
    }
}
