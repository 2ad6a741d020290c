//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use verbroute::config::AppConfig;
use verbroute::lifecycle::{build_dispatcher, Shutdown};
use verbroute::{HandlerContext, HandlerError, HandlerResult, HttpServer, ServiceCatalog, ServiceType};

/// A running server and the handles to steer it.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<AppConfig>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Services used across the integration tests.
pub fn test_catalog() -> ServiceCatalog {
    ServiceCatalog::new()
        .with(
            ServiceType::new("app::ProfileService")
                .operation("getUser", |ctx: &HandlerContext| -> HandlerResult {
                    let mut user = serde_json::Map::new();
                    user.insert("name".into(), "John Doe".into());
                    user.insert("id".into(), 9.into());
                    user.insert("context".into(), serde_json::to_value(ctx)?);
                    Ok(user.into())
                })
                .operation("postUser", |ctx: &HandlerContext| -> HandlerResult {
                    ctx.set_status(201u16)?;
                    ctx.add_header("Location", "/profile/user/9");
                    Ok(json!({ "params": ctx.request, "args": ctx.args }))
                })
                .operation("getMissing", |ctx: &HandlerContext| -> HandlerResult {
                    ctx.set_status(404u16)?;
                    Ok(json!("never encoded"))
                }),
        )
        .with(
            ServiceType::new("app::ReportService")
                .operation("getLarge", |_: &HandlerContext| -> HandlerResult {
                    Ok(json!("verbroute ".repeat(400)))
                })
                .operation("getSmall", |_: &HandlerContext| -> HandlerResult {
                    Ok(json!("tiny"))
                })
                .operation("getSlow", |_: &HandlerContext| -> HandlerResult {
                    std::thread::sleep(Duration::from_millis(2500));
                    Ok(json!("late"))
                }),
        )
        .with(
            ServiceType::new("app::FailingService")
                .operation("getBoom", |_: &HandlerContext| -> HandlerResult {
                    Err(HandlerError::new("boom"))
                })
                .operation("getPanic", |_: &HandlerContext| -> HandlerResult {
                    panic!("handler exploded")
                }),
        )
}

/// Start a server on an ephemeral port.
pub async fn start_server(mut config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let dispatcher = Arc::new(build_dispatcher(test_catalog(), &config).unwrap());
    let shutdown = Shutdown::new();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config, dispatcher);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, update_rx, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        shutdown,
        config_updates: update_tx,
    }
}

/// Non-pooled client without proxy or transparent decompression.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
