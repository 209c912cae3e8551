//! Deckhand document store: persistence for configuration documents.
//!
//! This crate maps Deckhand's configuration documents onto a single
//! relational table and provides the column adapter that stores structured
//! JSON payloads as plain text.
//!
//! # Architecture
//!
//! The document store follows hexagonal architecture principles:
//!
//! - **Domain**: Validated document types with no infrastructure dependencies
//! - **Ports**: Abstract repository contract for document persistence
//! - **Adapters**: `PostgreSQL` (Diesel) and in-memory implementations
//!
//! # Modules
//!
//! - [`column`]: JSON text column adapter registered with Diesel
//! - [`config`]: Connection pool configuration
//! - [`document`]: Document entity, repository port, and service
//! - [`timestamps`]: Creation and update timestamps shared by entities

pub mod column;
pub mod config;
pub mod document;
pub mod timestamps;
