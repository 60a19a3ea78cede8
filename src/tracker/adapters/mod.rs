//! Adapter implementations of the tracker store port.

pub mod memory;
pub mod postgres;
