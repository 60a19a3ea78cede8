//! Port contracts for tracker persistence.
//!
//! Services depend only on [`TrackerStore`]; adapters provide in-memory and
//! `PostgreSQL` implementations.

mod query;
mod store;

pub use query::{Page, PageRequest, ProjectQuery, TaskQuery};
#[cfg(test)]
pub use store::MockTrackerStore;
pub use store::{
    Change, ChangeSet, RecordKind, TrackerStore, TrackerStoreError, TrackerStoreResult,
};
