//! HTTP transport layer for the Model Context Protocol
//!
//! Provides the external API routing: health probe, discovery descriptor, and the `/mcp` listener.

pub mod handlers;
