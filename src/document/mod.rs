//! Configuration documents for Deckhand.
//!
//! A document is one row of the `document` table: an identifier, the
//! revision it belongs to, a schema tag, a unique instance key, and two JSON
//! payloads stored as text through the [`crate::column`] adapter. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
