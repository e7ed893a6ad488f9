//! Framework request adapter subsystem.
//!
//! # Data Flow
//! ```text
//! Host framework event (context map, query, native req/res)
//!     → event.rs (HostEvent capability trait)
//!     → dispatch.rs (read routing parameter)
//!         ├─ missing → error.rs (RpcError → ErrorBody JSON, on_error callback)
//!         └─ present → query.rs (parse query) + path.rs (normalize url)
//!                    → handler.rs (GenericHandler, built once by HandlerFactory)
//! ```
//!
//! # Design Decisions
//! - Exactly one response per invocation: synthesized error or delegation
//! - The adapter never inspects what the generic handler does
//! - Handler errors propagate to the host untouched

pub mod dispatch;
pub mod error;
pub mod event;
pub mod handler;
pub mod path;
pub mod query;

pub use dispatch::{Outcome, RequestAdapter, DEFAULT_ROUTE_KEY};
pub use error::{AdapterError, ErrorBody, ErrorCode, ErrorEvent, ErrorKind, RpcError};
pub use event::{ContextEvent, HostEvent, NativeRequest, NativeResponse, RouteParam};
pub use handler::{GenericHandler, HandlerFactory, HandlerOptions, OnErrorFn};
pub use path::normalize_path;
pub use query::{parse_query, QueryMap, QueryValue};
