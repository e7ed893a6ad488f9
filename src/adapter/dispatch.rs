//! The request adapter.
//!
//! # Responsibilities
//! - Read the routing parameter from the host event
//! - Answer a missing parameter with a JSON 500 and report it via `on_error`
//! - Attach the parsed query and normalized url to the native request
//! - Delegate to the generic handler and propagate its failures

use std::sync::Arc;
use std::time::Instant;

use axum::http::{header, HeaderValue};
use tracing::{debug, warn};

use crate::adapter::error::{AdapterError, ErrorCode, ErrorEvent, ErrorKind, RpcError};
use crate::adapter::event::HostEvent;
use crate::adapter::handler::{GenericHandler, HandlerFactory, HandlerOptions};
use crate::adapter::path::normalize_path;
use crate::observability::metrics;

/// Context key the routing parameter is read from unless configured otherwise.
pub const DEFAULT_ROUTE_KEY: &str = "trpc";

/// What the adapter did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The generic handler ran to completion.
    Delegated,
    /// The routing parameter was missing; an error response was written.
    RouteMissing,
    /// The generic handler failed. Only recorded in metrics; `handle`
    /// returns the error instead.
    HandlerError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Delegated => "delegated",
            Outcome::RouteMissing => "route_missing",
            Outcome::HandlerError => "handler_error",
        }
    }
}

/// Adapts host events to a generic handler.
///
/// The handler is built once at construction and shared by every call.
pub struct RequestAdapter {
    route_key: String,
    options: HandlerOptions,
    handler: Arc<dyn GenericHandler>,
}

impl RequestAdapter {
    /// Build the generic handler from `options` and wrap it.
    pub fn new<F>(factory: &F, options: HandlerOptions) -> Self
    where
        F: HandlerFactory + ?Sized,
    {
        let handler = factory.create(&options);
        Self {
            route_key: DEFAULT_ROUTE_KEY.to_string(),
            options,
            handler,
        }
    }

    /// Read the routing parameter from `key` instead of [`DEFAULT_ROUTE_KEY`].
    pub fn with_route_key(mut self, key: impl Into<String>) -> Self {
        self.route_key = key.into();
        self
    }

    pub fn route_key(&self) -> &str {
        &self.route_key
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    /// Process one event, producing exactly one response.
    pub async fn handle<E>(&self, event: &mut E) -> Result<Outcome, AdapterError>
    where
        E: HostEvent + ?Sized,
    {
        let start = Instant::now();

        let Some(param) = event.routing_param(&self.route_key) else {
            self.reject_missing_route(event)?;
            metrics::record_outcome(Outcome::RouteMissing, start);
            return Ok(Outcome::RouteMissing);
        };

        let query = event.query();
        let url = normalize_path(&param.joined());
        debug!(route_key = %self.route_key, url = %url, "Delegating to generic handler");

        let (req, res) = event.native_parts_mut();
        req.query = Some(query);
        req.url = url;

        match self.handler.handle(req, res).await {
            Ok(()) => {
                metrics::record_outcome(Outcome::Delegated, start);
                Ok(Outcome::Delegated)
            }
            Err(e) => {
                metrics::record_outcome(Outcome::HandlerError, start);
                Err(AdapterError::Handler(e))
            }
        }
    }

    fn reject_missing_route<E>(&self, event: &mut E) -> Result<(), AdapterError>
    where
        E: HostEvent + ?Sized,
    {
        let error = RpcError::new(
            ErrorCode::InternalServerError,
            missing_route_message(&self.route_key),
        );
        warn!(route_key = %self.route_key, "Routing parameter not found");

        self.options.report(&ErrorEvent {
            error: &error,
            kind: ErrorKind::Unknown,
            path: None,
            input: None,
            ctx: None,
            req: event.native_request_mut(),
        });

        let body = serde_json::to_vec(&error.to_body())?;
        let res = event.native_response_mut();
        res.set_status(error.code.http_status());
        res.set_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res.end(body);
        Ok(())
    }
}

fn missing_route_message(key: &str) -> String {
    format!("Query \"{key}\" not found - is the `trpc-openapi` file named `[...{key}].ts`?")
}
