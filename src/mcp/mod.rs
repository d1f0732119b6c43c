//! Model Context Protocol (MCP) server for the PCB calculators.
//!
//! Each calculator is exposed as an MCP tool. The server communicates over
//! stdio using newline-delimited JSON-RPC 2.0 messages.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        MCP Server                        │
//! │                                                          │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐  │
//! │   │  Transport  │───▶│   Server    │───▶│ Calculators │  │
//! │   │   (stdio)   │    │ (lifecycle) │    │   (tools)   │  │
//! │   └─────────────┘    └─────────────┘    └─────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::StdioTransport;
