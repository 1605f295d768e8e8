//! # bedrock-core
//!
//! Core types for the Bedrock server bridge.
//!
//! This crate provides the pieces shared by every consumer of the bridge:
//! - Console event model and log-line parser
//! - Chunk-level line reassembly for the server's output stream
//! - `server.properties` key schema and typed values
//! - Error types

pub mod console;
pub mod error;
pub mod property;

pub use console::{ConsoleEvent, LineAssembler, parse_console, LINE_TERMINATOR};
pub use error::{BridgeError, Result};
pub use property::{PropertyEntry, PropertyValue, ServerProperty};
