//! Taskmaster: collaborative project and task tracking.
//!
//! The crate implements the core of a task tracker: team membership,
//! access control, the task status lifecycle and an append-only activity
//! log, with in-memory and `PostgreSQL` persistence.
//!
//! # Architecture
//!
//! Taskmaster follows hexagonal architecture principles:
//!
//! - **Domain**: aggregates, permission rules and the status state machine,
//!   free of I/O
//! - **Ports**: the [`tracker::ports::TrackerStore`] persistence contract
//! - **Adapters**: in-memory and diesel-backed store implementations
//! - **Services**: [`tracker::services::TrackerService`], which orchestrates
//!   every read and mutation
//!
//! # Modules
//!
//! - [`tracker`]: the tracking bounded context
//! - [`config`]: environment-driven configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
pub mod telemetry;
pub mod tracker;
