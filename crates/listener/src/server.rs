//! Socket binding and the serve loop.

use std::future::Future;
use std::sync::Arc;

use nodes::PipelineExecutor;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::ListenerError;
use crate::routes::create_app;

/// Binds a TCP listener on `addr` (e.g. `127.0.0.1:8000`).
pub async fn bind(addr: &str) -> Result<TcpListener, ListenerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serves the API on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after the shutdown signal.
pub async fn serve<F>(
    listener: TcpListener,
    executor: Arc<PipelineExecutor>,
    shutdown: F,
) -> Result<(), ListenerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|source| ListenerError::LocalAddr { source })?;
    info!(%addr, "listening");

    axum::serve(listener, create_app(executor))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| ListenerError::Serve { addr, source })?;

    info!(%addr, "server stopped");
    Ok(())
}
