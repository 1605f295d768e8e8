//! # bedrock-bridge
//!
//! Process adapter for the Minecraft Bedrock dedicated server.
//!
//! This crate provides:
//! - [`BedrockServer`]: spawns the server with piped stdio and a
//!   working directory derived from the executable path
//! - Line reassembly and console parsing of the server's output stream
//! - A broadcast event bus carrying lifecycle and console events to any
//!   number of subscribers
//! - [`ServerProperties`]: typed access to the sibling
//!   `server.properties` file

pub mod properties;
pub mod server;

pub use properties::ServerProperties;
pub use server::{BedrockServer, ServerEvent};
