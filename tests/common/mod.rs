//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rpc_adapter::adapter::{
    GenericHandler, HandlerFactory, HandlerOptions, NativeRequest, NativeResponse,
};
use rpc_adapter::{HttpServer, ServiceConfig, Shutdown};
use tokio::net::TcpListener;
use tower::BoxError;

/// Generic handler that records what it was given and answers 200 "ok".
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingHandler {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<NativeRequest>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenericHandler for RecordingHandler {
    async fn handle(&self, req: &mut NativeRequest, res: &mut NativeResponse) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req.clone());
        res.end("ok");
        Ok(())
    }
}

/// Factory handing out one shared [`RecordingHandler`].
#[allow(dead_code)]
pub struct RecordingFactory(pub Arc<RecordingHandler>);

impl HandlerFactory for RecordingFactory {
    fn create(&self, _options: &HandlerOptions) -> Arc<dyn GenericHandler> {
        self.0.clone()
    }
}

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start `factory` behind the adapter with `config`.
#[allow(dead_code)]
pub async fn start_server<F>(config: ServiceConfig, factory: &F, options: HandlerOptions) -> TestServer
where
    F: HandlerFactory + ?Sized,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, factory, options);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // The listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, shutdown }
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
