//! Lock-scoped atomic mutation of the registry relations.

use crate::store::{RegistryError, RegistryPaths, RegistryStore};
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Execute one lock-scoped load → mutate → persist cycle.
///
/// The mutator returns `(value, changed)`; `changed=true` persists both
/// relations in one replace before the lock is released. A lock that is already held fails
/// fast with `RegistryError::LockBusy`.
pub fn mutate_store<T, F>(paths: &RegistryPaths, mutator: F) -> Result<T, RegistryError>
where
    F: FnOnce(&mut RegistryStore) -> Result<(T, bool), RegistryError>,
{
    let _guard = RegistryLockGuard::acquire(&paths.lock)?;

    let mut store = RegistryStore::load(paths)?;
    let (value, changed) = mutator(&mut store)?;
    if changed {
        store.save(paths)?;
    }
    Ok(value)
}

struct RegistryLockGuard {
    lock_path: PathBuf,
    _file: File,
}

impl RegistryLockGuard {
    fn acquire(lock_path: &Path) -> Result<Self, RegistryError> {
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| lock_io(lock_path, e.to_string()))?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock_path)
        {
            Ok(mut file) => {
                let _ = writeln!(
                    file,
                    "pid={}\nutc={}",
                    std::process::id(),
                    Utc::now().to_rfc3339()
                );
                Ok(Self {
                    lock_path: lock_path.to_path_buf(),
                    _file: file,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(RegistryError::LockBusy {
                    lock_path: lock_path.display().to_string(),
                })
            }
            Err(err) => Err(lock_io(lock_path, err.to_string())),
        }
    }
}

impl Drop for RegistryLockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_io(lock_path: &Path, message: String) -> RegistryError {
    RegistryError::LockIo {
        lock_path: lock_path.display().to_string(),
        message,
    }
}
