//! Domain objects and tool integrations
//!
//! Provides the radio/podcast search tool exposed over the MCP protocol and the text
//! rendering of its results

pub mod format;
pub mod tools;
pub mod utils;
