//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, adapter mount)
//!     → request.rs (assign and propagate request ID)
//!     → host::axum (build AxumEvent)
//!     → adapter (delegate or synthesize error)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
