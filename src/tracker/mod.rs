//! Project and task tracking bounded context.
//!
//! Users collaborate in projects; projects hold tasks that move through a
//! fixed status lifecycle; tasks collect comments. Every mutation goes
//! through [`services::TrackerService`], which checks permissions, validates
//! the change and commits it together with the activity entries describing
//! it.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
