//! Axum host binding.
//!
//! # Responsibilities
//! - Buffer the axum request into a [`NativeRequest`]
//! - Expose matched path parameters as the event context
//! - Turn the finished [`NativeResponse`] into an axum response
//! - Decide what the client sees when the adapter itself fails

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use tracing::{error, Instrument};

use crate::adapter::{
    parse_query, ErrorCode, HostEvent, NativeRequest, NativeResponse, QueryMap, RequestAdapter,
    RouteParam, RpcError,
};
use crate::http::request::RequestIdExt;

/// Shared state for the adapter routes.
#[derive(Clone)]
pub struct AdapterState {
    pub adapter: Arc<RequestAdapter>,
    pub max_body_bytes: usize,
}

/// An axum request seen through the [`HostEvent`] interface.
#[derive(Debug)]
pub struct AxumEvent {
    params: HashMap<String, String>,
    raw_query: Option<String>,
    request: NativeRequest,
    response: NativeResponse,
}

impl AxumEvent {
    /// Buffer `request` (up to `max_body_bytes`) into an event.
    pub async fn from_request(
        params: HashMap<String, String>,
        request: Request<Body>,
        max_body_bytes: usize,
    ) -> Result<Self, RpcError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, max_body_bytes)
            .await
            .map_err(|e| body_error(&e, max_body_bytes))?;

        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        Ok(Self {
            params,
            raw_query: parts.uri.query().map(str::to_string),
            request: NativeRequest::new(parts.method, url)
                .with_headers(parts.headers)
                .with_body(body),
            response: NativeResponse::new(),
        })
    }
}

/// Bodies over the limit are 413 whether or not a length was declared.
fn body_error(err: &axum::Error, max_body_bytes: usize) -> RpcError {
    if is_length_limit(err) {
        RpcError::new(
            ErrorCode::PayloadTooLarge,
            format!("request body exceeds {max_body_bytes} bytes"),
        )
    } else {
        RpcError::new(ErrorCode::BadRequest, format!("failed to read request body: {err}"))
    }
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

impl HostEvent for AxumEvent {
    fn routing_param(&self, key: &str) -> Option<RouteParam> {
        self.params.get(key).cloned().map(RouteParam::Path)
    }

    fn query(&self) -> QueryMap {
        parse_query(self.raw_query.as_deref())
    }

    fn native_parts_mut(&mut self) -> (&mut NativeRequest, &mut NativeResponse) {
        (&mut self.request, &mut self.response)
    }
}

impl IntoResponse for AxumEvent {
    fn into_response(self) -> Response {
        self.response.into_response()
    }
}

impl IntoResponse for NativeResponse {
    fn into_response(self) -> Response {
        let (status, headers, body) = self.into_parts();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self.to_body())).into_response()
    }
}

/// Route handler for paths carrying the catch-all routing parameter.
pub async fn routed_handler(
    State(state): State<AdapterState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request<Body>,
) -> Response {
    dispatch(state, params, request).await
}

/// Route handler for the bare mount prefix. No routing parameter is ever
/// present here, so the adapter answers with its misconfiguration error.
pub async fn unrouted_handler(
    State(state): State<AdapterState>,
    request: Request<Body>,
) -> Response {
    dispatch(state, HashMap::new(), request).await
}

async fn dispatch(
    state: AdapterState,
    params: HashMap<String, String>,
    request: Request<Body>,
) -> Response {
    let request_id = request.request_id().to_string();
    let span = tracing::info_span!("adapter", request_id = %request_id);

    async move {
        let mut event = match AxumEvent::from_request(params, request, state.max_body_bytes).await {
            Ok(event) => event,
            Err(e) => return e.into_response(),
        };

        match state.adapter.handle(&mut event).await {
            Ok(_) => event.into_response(),
            Err(e) => {
                error!(error = %e, "Adapter request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{GenericHandler, HandlerOptions};
    use async_trait::async_trait;
    use axum::http::{header, Method};
    use tower::BoxError;

    struct EchoUrl;

    #[async_trait]
    impl GenericHandler for EchoUrl {
        async fn handle(
            &self,
            req: &mut NativeRequest,
            res: &mut NativeResponse,
        ) -> Result<(), BoxError> {
            res.set_status(StatusCode::ACCEPTED);
            res.end(req.url.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_event_from_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/users/create?dry=1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();
        let mut params = HashMap::new();
        params.insert("trpc".to_string(), "users/create".to_string());

        let mut event = AxumEvent::from_request(params, request, 1024).await.unwrap();
        assert_eq!(event.routing_param("trpc"), Some(RouteParam::from("users/create")));
        assert_eq!(event.routing_param("other"), None);
        assert_eq!(event.query()["dry"].as_str(), Some("1"));

        let req = event.native_request_mut();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "/api/users/create?dry=1");
        assert_eq!(req.headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(req.body.as_ref(), br#"{"name":"x"}"#);
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let request = Request::builder()
            .uri("/api/x")
            .body(Body::from(vec![0u8; 64]))
            .unwrap();
        let err = AxumEvent::from_request(HashMap::new(), request, 16).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PayloadTooLarge);
        assert_eq!(err.message, "request body exceeds 16 bytes");
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_native_response_conversion() {
        let mut res = NativeResponse::new();
        res.set_status(StatusCode::CREATED);
        res.set_header(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        res.end("made");

        let response = res.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"made");
    }

    #[tokio::test]
    async fn test_dispatch_uses_adapter() {
        let factory = |_: &HandlerOptions| Arc::new(EchoUrl) as Arc<dyn GenericHandler>;
        let state = AdapterState {
            adapter: Arc::new(RequestAdapter::new(&factory, HandlerOptions::new())),
            max_body_bytes: 1024,
        };
        let mut params = HashMap::new();
        params.insert("trpc".to_string(), "/a//b/".to_string());
        let request = Request::builder().uri("/api/a//b/").body(Body::empty()).unwrap();

        let response = dispatch(state, params, request).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"/a/b");
    }
}
