//! Echo handler: answers every call with what it was asked.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use serde::Serialize;
use tower::BoxError;

use crate::adapter::{
    ErrorCode, ErrorEvent, ErrorKind, GenericHandler, HandlerFactory, HandlerOptions,
    NativeRequest, NativeResponse, QueryMap, RpcError,
};

/// Procedure path that makes the echo handler fail.
pub const FAIL_PATH: &str = "/__fail";

#[derive(Serialize)]
struct Echo<'a> {
    method: &'a str,
    path: &'a str,
    query: &'a QueryMap,
}

/// Responds `200 application/json` with `{ method, path, query }`.
#[derive(Debug, Clone)]
pub struct EchoHandler {
    options: HandlerOptions,
}

impl EchoHandler {
    pub fn new(options: HandlerOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl GenericHandler for EchoHandler {
    async fn handle(&self, req: &mut NativeRequest, res: &mut NativeResponse) -> Result<(), BoxError> {
        if req.url == FAIL_PATH {
            let error = RpcError::new(ErrorCode::InternalServerError, "echo handler asked to fail");
            self.options.report(&ErrorEvent {
                error: &error,
                kind: ErrorKind::Unknown,
                path: Some(&req.url),
                input: None,
                ctx: None,
                req,
            });
            return Err(error.into());
        }

        let empty = QueryMap::new();
        let body = serde_json::to_vec(&Echo {
            method: req.method.as_str(),
            path: &req.url,
            query: req.query.as_ref().unwrap_or(&empty),
        })?;

        res.set_status(StatusCode::OK);
        res.set_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res.end(body);
        Ok(())
    }
}

/// Builds [`EchoHandler`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoFactory;

impl HandlerFactory for EchoFactory {
    fn create(&self, options: &HandlerOptions) -> Arc<dyn GenericHandler> {
        Arc::new(EchoHandler::new(options.clone()))
    }
}
