pub mod api;
pub mod config;
pub mod errors;
pub mod logging;
pub mod mcp;
pub mod tools;
pub mod types;
