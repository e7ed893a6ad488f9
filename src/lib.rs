//! RPC-over-HTTP request adapter.
//!
//! Lets a framework-agnostic RPC handler run under a host framework's event
//! convention: the routing parameter is read from the event context, the
//! url and query are normalized onto the native request, and the pair is
//! handed to the generic handler.

pub mod adapter;
pub mod config;
pub mod handler;
pub mod host;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use adapter::{HandlerOptions, HostEvent, RequestAdapter};
pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
