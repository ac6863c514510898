//! Building lifecycle: add, soft-delete, reactivate, with an audit trail.
//!
//! ```text
//! absent  --add-->    active   (log: added)
//! active  --remove--> removed  (log: removed)
//! removed --add-->    active   (log: reactivated, ip overwritten)
//! active  --add-->    active   (conflict notice, no log)
//! ```
//!
//! Every call reopens the relation files; nothing is cached between calls.

use crate::atomic_store::mutate_store;
use crate::building::{Action, Building, LogEntry, Status};
use crate::notice::Notice;
use crate::store::{RegistryError, RegistryPaths, RegistryStore};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Controllers seeded into a brand-new registry.
pub const DEFAULT_BUILDINGS: [(i64, &str); 6] = [
    (1, "130.113.195.52"),
    (2, "130.113.171.68"),
    (3, "130.113.171.96"),
    (4, "130.113.171.99"),
    (5, "130.113.40.190"),
    (6, "130.113.171.98"),
];

/// What `Registry::init` found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub created_relations: bool,
    pub seeded: usize,
}

/// Handle to one registry data directory.
#[derive(Debug, Clone)]
pub struct Registry {
    paths: RegistryPaths,
}

impl Registry {
    /// Open a registry, bootstrapping it if needed.
    ///
    /// An already seeded registry is opened without taking the lock, so
    /// reads keep working while a writer holds it.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let paths = RegistryPaths::new(dir);
        if paths.relations_exist() && !RegistryStore::load(&paths)?.has_no_buildings() {
            return Ok(Self { paths });
        }
        Self::init(&paths.dir).map(|(registry, _)| registry)
    }

    /// Create missing relation files and seed `DEFAULT_BUILDINGS` if the
    /// buildings relation is empty. Seeding writes no log entries.
    pub fn init(dir: impl AsRef<Path>) -> Result<(Self, InitOutcome), RegistryError> {
        let paths = RegistryPaths::new(dir);
        let outcome = mutate_store(&paths, |store| {
            let created_relations = !paths.relations_exist();
            let mut seeded = 0;
            if store.has_no_buildings() {
                let now = Utc::now();
                for (number, ip) in DEFAULT_BUILDINGS {
                    store.insert_building(number, ip, now)?;
                    seeded += 1;
                }
            }
            let changed = created_relations || seeded > 0;
            Ok((
                InitOutcome {
                    created_relations,
                    seeded,
                },
                changed,
            ))
        })?;

        if outcome.seeded > 0 {
            tracing::info!(
                dir = %paths.dir.display(),
                seeded = outcome.seeded,
                "seeded default buildings"
            );
        }
        Ok((Self { paths }, outcome))
    }

    pub fn paths(&self) -> &RegistryPaths {
        &self.paths
    }

    /// Register a building, or reactivate a removed one with a new ip.
    pub fn add(&self, number: i64, ip: &str) -> Result<Notice, RegistryError> {
        let ip = ip.trim();
        if number <= 0 || ip.is_empty() {
            return Ok(Notice::invalid_add_input());
        }

        mutate_store(&self.paths, |store| {
            let now = Utc::now();
            let status = store.building(number).map(|b| b.status);
            match status {
                None => {
                    store.insert_building(number, ip, now)?;
                    store.append_log(number, Action::Added, now);
                    tracing::info!(building = number, ip, "added building");
                    Ok((Notice::added(number, ip), true))
                }
                Some(Status::Removed) => {
                    store.update_building(number, Status::Active, Some(ip), now);
                    store.append_log(number, Action::Reactivated, now);
                    tracing::info!(building = number, ip, "reactivated building");
                    Ok((Notice::reactivated(number, ip), true))
                }
                Some(Status::Active) => {
                    tracing::debug!(building = number, "add rejected: already active");
                    Ok((Notice::already_exists(number), false))
                }
            }
        })
    }

    /// Soft-delete a building.
    ///
    /// A `removed` entry is logged even when nothing was active under that
    /// number.
    pub fn remove(&self, number: i64) -> Result<Notice, RegistryError> {
        if number <= 0 {
            return Ok(Notice::invalid_remove_input());
        }

        mutate_store(&self.paths, |store| {
            let now = Utc::now();
            let was_active = store.building(number).is_some_and(Building::is_active);
            let matched = store.update_building(number, Status::Removed, None, now);
            store.append_log(number, Action::Removed, now);
            if was_active {
                tracing::info!(building = number, "removed building");
            } else {
                tracing::warn!(
                    building = number,
                    row_exists = matched,
                    "logged removal of a building that was not active"
                );
            }
            Ok((Notice::removed(number), true))
        })
    }

    /// Active buildings with positive numbers, ascending by number.
    pub fn list_active(&self) -> Result<Vec<Building>, RegistryError> {
        let store = self.load()?;
        Ok(store.active_buildings().cloned().collect())
    }

    /// Timestamp of the most recent log entry.
    pub fn last_activity_timestamp(&self) -> Result<Option<DateTime<Utc>>, RegistryError> {
        Ok(self.load()?.last_log_timestamp())
    }

    /// One building by number, regardless of status.
    pub fn building(&self, number: i64) -> Result<Option<Building>, RegistryError> {
        Ok(self.load()?.building(number).cloned())
    }

    /// Every building row, ascending by number.
    pub fn buildings(&self) -> Result<Vec<Building>, RegistryError> {
        Ok(self.load()?.buildings().cloned().collect())
    }

    /// The audit trail in insertion order.
    pub fn log_entries(&self) -> Result<Vec<LogEntry>, RegistryError> {
        Ok(self.load()?.log_entries().to_vec())
    }

    fn load(&self) -> Result<RegistryStore, RegistryError> {
        RegistryStore::load(&self.paths)
    }
}
