//! HTTP serving with a bounded shutdown.
//!
//! After the shutdown signal, in-flight requests get `grace` to finish. A
//! request still running after that (a Slither run never returns on its own)
//! is abandoned, and the upload area is swept either way.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::routes;
use crate::AppState;

/// Serve until `signal` resolves, then sweep uploads. Returns the number of files swept.
pub async fn serve_until<F>(
    listener: TcpListener,
    state: AppState,
    signal: F,
    grace: Duration,
) -> std::io::Result<usize>
where
    F: Future<Output = ()> + Send + 'static,
{
    let uploads = state.uploads.clone();

    let signalled = Arc::new(Notify::new());
    let notify = Arc::clone(&signalled);
    let server = axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(async move {
            signal.await;
            notify.notify_one();
        })
        .into_future();

    let grace_expired = async {
        signalled.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result?;
            tracing::info!("All connections closed");
        }
        () = grace_expired => {
            tracing::warn!(grace_secs = grace.as_secs(), "Abandoning in-flight requests after shutdown grace period");
        }
    }

    let removed = uploads.sweep().await;
    tracing::info!(removed, "Upload directory swept");
    Ok(removed)
}
