//! CLI command handlers

pub mod commands;

pub use commands::{list, show, simulate, validate};
