// src/cache/snapshot.rs
//
// The snapshot is a plain file with no locking. One process is expected to own it;
// two writers at once would race.

use crate::cache::Clock;
use chrono::{DateTime, Duration, Utc};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// The last raw upstream payload and when it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub payload: String,
    pub written_at: DateTime<Utc>,
}

pub trait SnapshotStore: Send + Sync {
    fn read(&self) -> Option<Snapshot>;
    fn write(&self, payload: &str, at: DateTime<Utc>) -> io::Result<()>;
}

/// Snapshot on disk. The file's modification time is the write stamp.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> Option<Snapshot> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        let payload = fs::read_to_string(&self.path).ok()?;
        Some(Snapshot {
            payload,
            written_at: DateTime::<Utc>::from(modified),
        })
    }

    fn write(&self, payload: &str, at: DateTime<Utc>) -> io::Result<()> {
        fs::write(&self.path, payload)?;
        File::options()
            .write(true)
            .open(&self.path)?
            .set_modified(SystemTime::from(at))
    }
}

/// Snapshot kept in process memory, for when no snapshot file is configured.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<Snapshot>>,
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self) -> Option<Snapshot> {
        self.slot.lock().ok()?.clone()
    }

    fn write(&self, payload: &str, at: DateTime<Utc>) -> io::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "snapshot lock poisoned"))?;
        *slot = Some(Snapshot {
            payload: payload.to_string(),
            written_at: at,
        });
        Ok(())
    }
}

/// Time-boxed reuse of the last payload. Content changes upstream do not invalidate it;
/// only age does.
pub struct SnapshotCache {
    store: Box<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    max_age: Duration,
}

impl SnapshotCache {
    pub fn new(store: Box<dyn SnapshotStore>, clock: Arc<dyn Clock>, max_age: Duration) -> Self {
        Self {
            store,
            clock,
            max_age,
        }
    }

    /// The stored payload if it is younger than the freshness window.
    pub fn fresh_payload(&self) -> Option<String> {
        let snapshot = self.store.read()?;
        let age = self.clock.now() - snapshot.written_at;
        // a stamp ahead of the clock is never fresh
        if age >= Duration::zero() && age < self.max_age {
            tracing::info!(age_minutes = age.num_minutes(), "using listings snapshot");
            Some(snapshot.payload)
        } else {
            tracing::info!(age_minutes = age.num_minutes(), "listings snapshot is stale");
            None
        }
    }

    /// Persist a payload stamped with the current time. Failure only costs a refetch later.
    pub fn store(&self, payload: &str) {
        if let Err(e) = self.store.write(payload, self.clock.now()) {
            tracing::warn!(error = %e, "could not write listings snapshot");
        }
    }
}
