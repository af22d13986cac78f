mod clock;
mod snapshot;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotCache, SnapshotStore};
