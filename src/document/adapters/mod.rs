//! Adapter implementations for document persistence.

pub mod memory;
pub mod postgres;
