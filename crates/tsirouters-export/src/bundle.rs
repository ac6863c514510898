//! Peer-list bundle: a zip archive of per-building artifacts.
//!
//! Output is reproducible: members are stored uncompressed in the order
//! given, every entry carries the zip epoch (1980-01-01 00:00:00) as its
//! modification time and the same unix mode.

use crate::error::ExportError;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

const MEMBER_MODE: u32 = 0o644;

/// One archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMember {
    pub name: String,
    pub data: Vec<u8>,
}

impl BundleMember {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

fn member_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
        .unix_permissions(MEMBER_MODE)
}

/// Pack members into zip archive bytes.
pub fn write_bundle(members: &[BundleMember]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for member in members {
        writer
            .start_file(member.name.as_str(), member_options())
            .map_err(|e| ExportError::archive(format!("start '{}': {e}", member.name)))?;
        writer
            .write_all(&member.data)
            .map_err(|e| ExportError::archive(format!("write '{}': {e}", member.name)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ExportError::archive(format!("zip finish: {e}")))?;
    Ok(cursor.into_inner())
}

/// Unpack archive bytes into members, in archive order.
pub fn read_bundle(bytes: &[u8]) -> Result<Vec<BundleMember>, ExportError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExportError::archive(format!("open archive: {e}")))?;

    let mut members = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| ExportError::archive(format!("read entry {index}: {e}")))?;
        let name = file.name().to_string();
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| ExportError::archive(format!("read '{name}': {e}")))?;
        members.push(BundleMember { name, data });
    }
    Ok(members)
}
