//! The generic HTTP handler seam.
//!
//! The generic handler performs the actual RPC dispatch and is supplied from
//! outside. The adapter only knows how to build one from [`HandlerOptions`]
//! and call it with a native request/response pair.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tower::BoxError;

use crate::adapter::error::ErrorEvent;
use crate::adapter::event::{NativeRequest, NativeResponse};

/// Side-channel error reporter.
pub type OnErrorFn = Arc<dyn Fn(&ErrorEvent<'_>) + Send + Sync>;

/// Framework-agnostic request processor.
#[async_trait]
pub trait GenericHandler: Send + Sync {
    async fn handle(&self, req: &mut NativeRequest, res: &mut NativeResponse)
        -> Result<(), BoxError>;
}

/// Builds a generic handler from the caller's options.
pub trait HandlerFactory: Send + Sync {
    fn create(&self, options: &HandlerOptions) -> Arc<dyn GenericHandler>;
}

impl<F> HandlerFactory for F
where
    F: Fn(&HandlerOptions) -> Arc<dyn GenericHandler> + Send + Sync,
{
    fn create(&self, options: &HandlerOptions) -> Arc<dyn GenericHandler> {
        self(options)
    }
}

/// Options shared by the adapter and the handler it delegates to.
#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// Called for errors the adapter or handler recovers from.
    pub on_error: Option<OnErrorFn>,
    /// Handler-specific settings the adapter passes through untouched.
    pub extra: serde_json::Value,
}

impl HandlerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = extra;
        self
    }

    /// Invoke `on_error` if one is configured.
    pub fn report(&self, event: &ErrorEvent<'_>) {
        if let Some(on_error) = &self.on_error {
            on_error(event);
        }
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("on_error", &self.on_error.is_some())
            .field("extra", &self.extra)
            .finish()
    }
}
