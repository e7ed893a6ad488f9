//! Host framework event abstraction.
//!
//! # Responsibilities
//! - Describe the capabilities the adapter needs from a host event
//! - Model the native request/response pair the generic handler works on
//! - Provide a plain in-memory event for hosts without their own type
//!
//! # Design Decisions
//! - Events are passed explicitly; there is no ambient per-call context
//! - Native objects are mutated in place, never copied back

use std::borrow::Cow;
use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

use crate::adapter::query::{parse_query, QueryMap};

/// Routing parameter naming the target procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteParam {
    /// The whole remaining path as one string.
    Path(String),
    /// Catch-all hosts that split the path into segments.
    Segments(Vec<String>),
}

impl RouteParam {
    /// The parameter as a single slash-separated path.
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            RouteParam::Path(path) => Cow::Borrowed(path),
            RouteParam::Segments(segments) => Cow::Owned(segments.join("/")),
        }
    }
}

impl From<&str> for RouteParam {
    fn from(path: &str) -> Self {
        RouteParam::Path(path.to_string())
    }
}

impl From<String> for RouteParam {
    fn from(path: String) -> Self {
        RouteParam::Path(path)
    }
}

impl From<Vec<String>> for RouteParam {
    fn from(segments: Vec<String>) -> Self {
        RouteParam::Segments(segments)
    }
}

/// The host's request object as seen by the generic handler.
#[derive(Debug, Clone, Default)]
pub struct NativeRequest {
    pub method: Method,
    /// Request target. Overwritten with the normalized procedure path.
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Parsed query, attached by the adapter before delegation.
    pub query: Option<QueryMap>,
}

impl NativeRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// The host's response object. Status defaults to 200.
#[derive(Debug, Clone, Default)]
pub struct NativeResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    ended: bool,
}

impl NativeResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Set a header, replacing any previous value.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Write the body and finish the response.
    pub fn end(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
        self.ended = true;
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}

/// Capabilities the adapter needs from a host framework's event.
pub trait HostEvent: Send {
    /// Read the routing parameter stored under `key` in the event context.
    ///
    /// `None` covers both an explicit null and an absent key.
    fn routing_param(&self, key: &str) -> Option<RouteParam>;

    /// The event's query parameters.
    fn query(&self) -> QueryMap;

    /// Borrow the native request and response together.
    fn native_parts_mut(&mut self) -> (&mut NativeRequest, &mut NativeResponse);

    fn native_request_mut(&mut self) -> &mut NativeRequest {
        self.native_parts_mut().0
    }

    fn native_response_mut(&mut self) -> &mut NativeResponse {
        self.native_parts_mut().1
    }
}

/// Event backed by an explicit context map.
#[derive(Debug, Default)]
pub struct ContextEvent {
    params: HashMap<String, Option<RouteParam>>,
    raw_query: Option<String>,
    request: NativeRequest,
    response: NativeResponse,
}

impl ContextEvent {
    pub fn new(request: NativeRequest) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, param: impl Into<RouteParam>) -> Self {
        self.params.insert(key.into(), Some(param.into()));
        self
    }

    /// Store an explicit null under `key`.
    pub fn with_null_param(mut self, key: impl Into<String>) -> Self {
        self.params.insert(key.into(), None);
        self
    }

    pub fn with_query(mut self, raw: impl Into<String>) -> Self {
        self.raw_query = Some(raw.into());
        self
    }

    pub fn request(&self) -> &NativeRequest {
        &self.request
    }

    pub fn response(&self) -> &NativeResponse {
        &self.response
    }

    pub fn into_parts(self) -> (NativeRequest, NativeResponse) {
        (self.request, self.response)
    }
}

impl HostEvent for ContextEvent {
    fn routing_param(&self, key: &str) -> Option<RouteParam> {
        self.params.get(key).cloned().flatten()
    }

    fn query(&self) -> QueryMap {
        parse_query(self.raw_query.as_deref())
    }

    fn native_parts_mut(&mut self) -> (&mut NativeRequest, &mut NativeResponse) {
        (&mut self.request, &mut self.response)
    }
}
