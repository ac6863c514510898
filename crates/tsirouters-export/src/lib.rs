//! # tsirouters-export
//!
//! Renders the active building set into peer-list artifacts for the
//! monitoring tool:
//!
//! - `TSIRouters.ini`: master list, every active building
//! - `TSIRouters_{n}.ini`: peer list for building `n` (everyone but `n`)
//! - `all_configs.zip`: every peer list, one member per building
//!
//! Reads from `tsirouters-registry`; never mutates it.

pub mod bundle;
pub mod error;
pub mod format;
pub mod generator;

pub use bundle::{BundleMember, read_bundle, write_bundle};
pub use error::ExportError;
pub use format::ExportFormat;
pub use generator::{
    Artifact, BUNDLE_FILE_NAME, Exporter, MASTER_FILE_NAME, master_list, peer_file_name,
    peer_list,
};
