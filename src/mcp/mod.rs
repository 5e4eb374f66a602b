//! MCP (Model Context Protocol) front end for the Ekilex dictionary.
//!
//! JSON-RPC 2.0 dispatch shared by two transport shells: newline-delimited
//! stdio and HTTP with server-sent events.

/// HTTP/SSE transport shell.
pub mod http;

/// `ekilex://` resource routing and reads.
pub mod resources;

/// Request dispatch and the stdio loop.
pub mod server;

/// JSON-RPC 2.0 transport types.
pub mod transport;

pub use resources::{read_resource, ResourceContents, ResourceError, ResourceRoute};
pub use server::McpServer;
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
