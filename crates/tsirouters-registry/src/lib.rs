//! # tsirouters-registry
//!
//! Registry of building controllers and their audit trail.
//!
//! This crate provides:
//! - `Building` and `LogEntry` rows (the two relations)
//! - JSONL read/write with atomic replacement
//! - `RegistryStore` (in-memory projection with the uniqueness constraint)
//! - `Registry` (lifecycle rules: add, remove, reactivate)
//!
//! It does not render export artifacts; that is `tsirouters-export`.
//!
//! ## Data model
//!
//! ```text
//! registry.jsonl (on disk, one tagged line per building or log row)
//!     ↕  load / save under registry.lock
//! RegistryStore (deterministic in-memory projection)
//! ```

pub mod atomic_store;
pub mod building;
pub mod jsonl;
pub mod notice;
pub mod registry;
pub mod store;

pub use atomic_store::mutate_store;
pub use building::{Action, Building, LogEntry, Status};
pub use jsonl::{JsonlError, write_bytes_atomically};
pub use notice::{InputContext, Notice, NoticeKind, Severity, parse_building_number};
pub use registry::{DEFAULT_BUILDINGS, InitOutcome, Registry};
pub use store::{LOCK_FILE, RELATIONS_FILE, RegistryError, RegistryPaths, RegistryStore};
