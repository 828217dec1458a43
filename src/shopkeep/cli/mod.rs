//! # CLI Layer
//!
//! One client for the shopkeep library. This is the only place that:
//! - Knows about stdout, stderr and exit codes
//! - Parses arguments
//! - Decides when the catalog is saved
//!
//! Raw text for ids, names, prices and quantities is run through
//! [`shopkeep::validation`] before the service is called, so bad input is
//! reported with the same messages the entity uses.
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: context setup and per-command handlers
//! - `print`: terminal output

mod commands;
mod print;
mod setup;

pub use commands::run;
