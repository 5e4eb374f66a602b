//! Client for the Ekilex REST API.
//!
//! Every public client method issues exactly one GET request, decodes the
//! `{success, message, data}` envelope and translates transport and HTTP
//! failures into [`EkilexError`](crate::errors::EkilexError). Nothing is
//! retried or cached.

/// The API client.
pub mod client;

/// Path construction for each remote operation.
pub mod routes;

/// Pluggable HTTP transport.
pub mod transport;

pub use client::{ClientOptions, EkilexClient, API_KEY_HEADER};
pub use routes::{encode_segment, Route};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, TransportError, UreqTransport};
