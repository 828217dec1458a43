//! # Shopkeep Architecture
//!
//! Shopkeep is a small-shop **inventory library** with a CLI client on top. The
//! library never prints, never exits, and never assumes a terminal.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, validates raw input, prints results    │
//! │  - Decides when to save and how to report failures          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (service.rs)                                 │
//! │  - Facade over commands, generic over the repository        │
//! │  - Notifies observers after each change                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business rules: stock guard, partial updates, stats      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Repository trait, ProductRepository over a backend       │
//! │  - CsvBackend (production), MemBackend (testing)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifiers
//!
//! Product ids are free-form strings. When the caller does not supply one, the
//! repository derives the next id from the largest numeric id currently held,
//! so deleting the highest-numbered product frees its number again.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** carry most of the unit tests, run against [`store::mem_backend::MemBackend`].
//! 2. **Service** tests check dispatch and notifications.
//! 3. **CLI** tests in `tests/` drive the binary against a temporary shop home.
//!
//! ## Module Overview
//!
//! - [`service`]: The facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Repository contract, CSV codec and backends
//! - [`model`]: The `Product` entity and partial updates
//! - [`validation`]: Raw-input checks for the boundary layer
//! - [`events`]: Change events and observers
//! - [`config`]: Configuration management
//! - [`logging`]: Subscriber setup for the binary
//! - [`error`]: Error types

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;
