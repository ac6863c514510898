//! In-memory projection of the two relations.
//!
//! This is the persistent-store boundary:
//! - load/save both relations from one file
//! - enforce `building_number` uniqueness
//! - assign surrogate ids
//!
//! Both relations share `registry.jsonl`, each line tagged with its
//! relation, so one atomic replace commits a building change together with
//! its log entry. Lifecycle rules live in `registry`, not here.

use crate::building::{Action, Building, LogEntry, Status};
use crate::jsonl::{JsonlError, read_rows_from_path, write_rows_to_path};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const RELATIONS_FILE: &str = "registry.jsonl";
pub const LOCK_FILE: &str = "registry.lock";

/// One line of the relations file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "relation", rename_all = "snake_case")]
enum Row {
    Building(Building),
    Log(LogEntry),
}

/// Errors raised by the persistent store.
///
/// Business-rule outcomes never show up here; they are `Notice`s.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("duplicate building number {0} in buildings relation")]
    DuplicateBuilding(i64),

    #[error("registry lock busy: {lock_path}")]
    LockBusy { lock_path: String },

    #[error("failed to acquire registry lock {lock_path}: {message}")]
    LockIo { lock_path: String, message: String },

    #[error("{path}: {message}")]
    Io { path: String, message: String },
}

/// File locations for one registry data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPaths {
    pub dir: PathBuf,
    pub relations: PathBuf,
    pub lock: PathBuf,
}

impl RegistryPaths {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            relations: dir.join(RELATIONS_FILE),
            lock: dir.join(LOCK_FILE),
            dir,
        }
    }

    /// Whether the relations file exists on disk.
    pub fn relations_exist(&self) -> bool {
        self.relations.is_file()
    }
}

/// Both relations, keyed and ordered deterministically.
#[derive(Debug, Clone, Default)]
pub struct RegistryStore {
    buildings: BTreeMap<i64, Building>,
    logs: Vec<LogEntry>,
}

impl RegistryStore {
    /// Build a store from materialized rows.
    ///
    /// Unlike an append overlay, a repeated `building_number` is a hard error:
    /// the relation carries a uniqueness constraint.
    pub fn from_rows(
        buildings: Vec<Building>,
        logs: Vec<LogEntry>,
    ) -> Result<Self, RegistryError> {
        let mut index = BTreeMap::new();
        for building in buildings {
            let number = building.building_number;
            if index.insert(number, building).is_some() {
                return Err(RegistryError::DuplicateBuilding(number));
            }
        }
        Ok(Self {
            buildings: index,
            logs,
        })
    }

    /// Load both relations. A missing file is two empty relations.
    pub fn load(paths: &RegistryPaths) -> Result<Self, RegistryError> {
        let mut buildings = Vec::new();
        let mut logs = Vec::new();
        for row in read_rows_from_path::<Row>(&paths.relations)? {
            match row {
                Row::Building(building) => buildings.push(building),
                Row::Log(entry) => logs.push(entry),
            }
        }
        tracing::debug!(
            dir = %paths.dir.display(),
            buildings = buildings.len(),
            logs = logs.len(),
            "loaded registry relations"
        );
        Self::from_rows(buildings, logs)
    }

    /// Persist both relations in a single atomic replace.
    ///
    /// Building rows come first (ascending number), then log rows in
    /// insertion order.
    pub fn save(&self, paths: &RegistryPaths) -> Result<(), RegistryError> {
        let rows: Vec<Row> = self
            .buildings
            .values()
            .cloned()
            .map(Row::Building)
            .chain(self.logs.iter().cloned().map(Row::Log))
            .collect();
        write_rows_to_path(&paths.relations, &rows)?;
        Ok(())
    }

    pub fn has_no_buildings(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Lookup one building by number, any status.
    pub fn building(&self, number: i64) -> Option<&Building> {
        self.buildings.get(&number)
    }

    /// Every building row in ascending number order.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    /// Listed buildings (active, positive number) in ascending number order.
    pub fn active_buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values().filter(|b| b.is_listed())
    }

    /// Audit trail in insertion order.
    pub fn log_entries(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Latest log timestamp, if any entry exists.
    pub fn last_log_timestamp(&self) -> Option<DateTime<Utc>> {
        self.logs.iter().map(|entry| entry.timestamp).max()
    }

    /// Insert a fresh active row.
    pub fn insert_building(
        &mut self,
        number: i64,
        ip_address: &str,
        now: DateTime<Utc>,
    ) -> Result<&Building, RegistryError> {
        if self.buildings.contains_key(&number) {
            return Err(RegistryError::DuplicateBuilding(number));
        }
        let building = Building {
            id: self.next_building_id(),
            building_number: number,
            ip_address: ip_address.to_string(),
            status: Status::Active,
            last_updated: now,
        };
        Ok(self.buildings.entry(number).or_insert(building))
    }

    /// Set status/ip on an existing row. Returns `false` if no row matched.
    pub fn update_building(
        &mut self,
        number: i64,
        status: Status,
        ip_address: Option<&str>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(building) = self.buildings.get_mut(&number) else {
            return false;
        };
        if let Some(ip) = ip_address {
            building.ip_address = ip.to_string();
        }
        building.status = status;
        building.last_updated = now;
        true
    }

    /// Append one audit record.
    pub fn append_log(&mut self, number: i64, action: Action, now: DateTime<Utc>) -> &LogEntry {
        let entry = LogEntry {
            id: self.next_log_id(),
            building_number: number,
            action,
            timestamp: now,
        };
        self.logs.push(entry);
        &self.logs[self.logs.len() - 1]
    }

    fn next_building_id(&self) -> u64 {
        self.buildings.values().map(|b| b.id).max().unwrap_or(0) + 1
    }

    fn next_log_id(&self) -> u64 {
        self.logs.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().expect("timestamp")
    }

    fn building(id: u64, number: i64, status: Status) -> Building {
        Building {
            id,
            building_number: number,
            ip_address: format!("10.0.0.{number}"),
            status,
            last_updated: at("2024-05-01T12:00:00Z"),
        }
    }

    #[test]
    fn duplicate_building_numbers_are_rejected_on_load() {
        let err = RegistryStore::from_rows(
            vec![
                building(1, 4, Status::Active),
                building(2, 4, Status::Removed),
            ],
            Vec::new(),
        )
        .expect_err("duplicate numbers must error");
        assert!(matches!(err, RegistryError::DuplicateBuilding(4)));
    }

    #[test]
    fn active_buildings_filter_and_order() {
        let store = RegistryStore::from_rows(
            vec![
                building(1, 9, Status::Active),
                building(2, -1, Status::Active),
                building(3, 2, Status::Removed),
                building(4, 0, Status::Active),
                building(5, 3, Status::Active),
            ],
            Vec::new(),
        )
        .expect("store should build");

        let numbers: Vec<i64> = store.active_buildings().map(|b| b.building_number).collect();
        assert_eq!(numbers, vec![3, 9]);
    }

    #[test]
    fn insert_assigns_increasing_ids_and_enforces_uniqueness() {
        let mut store = RegistryStore::from_rows(vec![building(7, 1, Status::Active)], Vec::new())
            .expect("store should build");

        let id = store
            .insert_building(2, "10.1.1.1", at("2024-05-02T00:00:00Z"))
            .expect("fresh number inserts")
            .id;
        assert_eq!(id, 8);

        let err = store
            .insert_building(1, "10.1.1.2", at("2024-05-02T00:00:00Z"))
            .expect_err("existing number must conflict");
        assert!(matches!(err, RegistryError::DuplicateBuilding(1)));
        assert_eq!(store.buildings().count(), 2);
    }

    #[test]
    fn update_reports_whether_a_row_matched() {
        let mut store = RegistryStore::from_rows(vec![building(1, 5, Status::Active)], Vec::new())
            .expect("store should build");
        let now = at("2024-06-01T00:00:00Z");

        assert!(store.update_building(5, Status::Removed, None, now));
        assert!(!store.update_building(6, Status::Removed, None, now));

        let row = store.building(5).expect("row exists");
        assert_eq!(row.status, Status::Removed);
        assert_eq!(row.ip_address, "10.0.0.5");
        assert_eq!(row.last_updated, now);
    }

    #[test]
    fn last_log_timestamp_is_the_maximum() {
        let mut store = RegistryStore::default();
        assert_eq!(store.last_log_timestamp(), None);

        store.append_log(1, Action::Added, at("2024-05-03T00:00:00Z"));
        store.append_log(2, Action::Added, at("2024-05-05T00:00:00Z"));
        store.append_log(1, Action::Removed, at("2024-05-04T00:00:00Z"));

        assert_eq!(store.last_log_timestamp(), Some(at("2024-05-05T00:00:00Z")));
        let ids: Vec<u64> = store.log_entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn save_then_load_preserves_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = RegistryPaths::new(dir.path());
        let mut store = RegistryStore::default();
        store
            .insert_building(3, "10.3.3.3", at("2024-05-01T00:00:00Z"))
            .expect("insert");
        store.append_log(3, Action::Added, at("2024-05-01T00:00:00Z"));
        store.save(&paths).expect("save");

        assert!(paths.relations_exist());
        let loaded = RegistryStore::load(&paths).expect("load");
        assert_eq!(loaded.building(3), store.building(3));
        assert_eq!(loaded.log_entries(), store.log_entries());
    }

    #[test]
    fn both_relations_share_one_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = RegistryPaths::new(dir.path());
        let mut store = RegistryStore::default();
        store
            .insert_building(42, "10.4.2.1", at("2024-05-01T00:00:00Z"))
            .expect("insert");
        store.append_log(42, Action::Added, at("2024-05-01T00:00:00Z"));
        store.save(&paths).expect("save");

        let text = std::fs::read_to_string(&paths.relations).expect("relations file");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"relation":"building","id":1,"building_number":42"#));
        assert!(lines[1].starts_with(r#"{"relation":"log","id":1,"building_number":42"#));
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .expect("list dir")
            .map(|entry| entry.expect("dir entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(RELATIONS_FILE)]);
    }

    #[test]
    fn failed_save_commits_neither_relation() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = RegistryPaths::new(dir.path().join("data"));
        let mut store = RegistryStore::default();
        store
            .insert_building(1, "10.0.0.1", at("2024-05-01T00:00:00Z"))
            .expect("insert");
        store.save(&paths).expect("initial save");
        let before = std::fs::read(&paths.relations).expect("relations bytes");

        let mut changed = RegistryStore::load(&paths).expect("load");
        changed
            .insert_building(42, "10.4.2.1", at("2024-05-02T00:00:00Z"))
            .expect("insert");
        changed.append_log(42, Action::Added, at("2024-05-02T00:00:00Z"));

        let mut blocked = paths.clone();
        let not_a_dir = dir.path().join("not-a-dir");
        std::fs::write(&not_a_dir, b"").expect("blocker file");
        blocked.relations = not_a_dir.join(RELATIONS_FILE);
        assert!(changed.save(&blocked).is_err());

        assert_eq!(std::fs::read(&paths.relations).expect("relations bytes"), before);
        let reloaded = RegistryStore::load(&paths).expect("reload");
        assert_eq!(reloaded.building(42), None);
        assert!(reloaded.log_entries().is_empty());
    }
}
