//! Step definitions for document persistence scenarios.

pub mod world;
mod then;
