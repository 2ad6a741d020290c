//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the axum `Router` that sends every path to the dispatcher
//! - Wire up middleware (tracing, request ID, timeout, body limit, compression)
//! - Apply reloaded configuration to the live dispatcher
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    compression::CompressionLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::http::request::{read_request, UuidRequestId, X_REQUEST_ID};
use crate::http::response::{into_response, CompressEligible};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP host for a `Dispatcher`.
pub struct HttpServer {
    router: Router,
    dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    pub fn new(config: AppConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState {
            dispatcher: dispatcher.clone(),
        };
        let router = Self::build_router(&config, state);
        Self { router, dispatcher }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let request_id = axum::http::HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(CompressionLayer::new().compress_when(CompressEligible))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, UuidRequestId))
    }

    /// Run the server on `listener` until `shutdown` fires.
    ///
    /// Configurations arriving on `config_updates` replace the dispatcher settings.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reload = tokio::spawn(apply_config_updates(
            self.dispatcher.clone(),
            config_updates,
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reload.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn apply_config_updates(
    dispatcher: Arc<Dispatcher>,
    mut updates: mpsc::UnboundedReceiver<AppConfig>,
) {
    while let Some(config) = updates.recv().await {
        match dispatcher.apply_settings(config.dispatch_settings()) {
            Ok(()) => tracing::info!(
                mount_point = %config.dispatch.mount_point,
                compression = config.compression.enabled,
                "Dispatch settings reloaded"
            ),
            Err(e) => tracing::error!(error = %e, "Reloaded settings rejected"),
        }
    }
}

/// Every request lands here; the dispatcher does the routing.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let context = match read_request(request).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(error = %e, "Request body rejected");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let dispatcher = state.dispatcher.clone();
    match tokio::task::spawn_blocking(move || dispatcher.dispatch(&context)).await {
        Ok(dispatched) => into_response(dispatched),
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
