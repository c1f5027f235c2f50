//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, index setup, per-connection timeouts and
//! graceful shutdown.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Request};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::Service;
use tracing::{debug, error, info, warn};

use crate::application::services::ShortenerService;
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::UrlStore;
use crate::infrastructure::persistence::{MemoryUrlStore, PgUrlStore};
use crate::routes::{REQUEST_READ_TIMEOUT, app_router};
use crate::state::AppState;

/// How long in-flight requests may run after a shutdown signal.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// How long a keep-alive connection may wait for its next request.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(120);

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the store selected by the `MONGO_URI` scheme
/// - store indexes
/// - Axum HTTP server
///
/// The PostgreSQL pool is closed after the server stops, on success and on
/// every error path that follows a successful connect.
///
/// # Errors
///
/// Returns an error if:
/// - Store connection or index setup fails
/// - Server bind fails
pub async fn run(config: Config) -> Result<()> {
    match config.store_backend()? {
        StoreBackend::Memory => {
            warn!("Using in-memory store, records are lost on exit");
            serve(Arc::new(MemoryUrlStore::new()), &config).await
        }
        StoreBackend::Postgres => {
            let store = PgUrlStore::connect(&config.pg_store_settings())
                .await
                .context("Failed to connect to the store")?;
            let store = Arc::new(store);
            info!("Connected to database '{}'", config.db_name);

            let result = serve(store.clone(), &config).await;

            store.close().await;
            info!("Disconnected from database");
            result
        }
    }
}

async fn serve(store: Arc<dyn UrlStore>, config: &Config) -> Result<()> {
    store
        .ensure_indexes()
        .await
        .context("Failed to ensure store indexes")?;

    let cors_allowed_origin = HeaderValue::from_str(&config.cors_allowed_origin)
        .context("Invalid CORS_ALLOWED_ORIGIN")?;

    let shortener = Arc::new(ShortenerService::new(store));
    let state = AppState::new(shortener, cors_allowed_origin, config.behind_proxy);
    let app = app_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    serve_until(listener, app, shutdown_signal(), ConnectionTimeouts::default()).await;
    Ok(())
}

/// Connection-level limits applied by [`serve_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionTimeouts {
    /// Time allowed to receive a complete request head.
    pub header_read: Duration,
    /// Time a connection may sit without a request in flight.
    pub idle: Duration,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace: Duration,
}

impl Default for ConnectionTimeouts {
    fn default() -> Self {
        Self {
            header_read: REQUEST_READ_TIMEOUT,
            idle: IDLE_TIMEOUT,
            shutdown_grace: SHUTDOWN_GRACE_PERIOD,
        }
    }
}

/// Serves `app` until `signal` resolves, then drains in-flight requests.
///
/// Each accepted connection is driven by hyper with a header read deadline
/// and closed once it has been idle for [`ConnectionTimeouts::idle`].
/// New connections stop being accepted as soon as `signal` fires. Requests
/// still running after the grace period are abandoned.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    timeouts: ConnectionTimeouts,
) where
    F: Future<Output = ()>,
{
    let mut builder = Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.header_read);

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let mut connections = JoinSet::new();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!(%peer, "Accepted connection");
                    connections.spawn(serve_connection(
                        builder.clone(),
                        stream,
                        app.clone(),
                        shutdown_rx.clone(),
                        timeouts.idle,
                    ));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {e}");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = &mut signal => break,
        }
    }

    drop(listener);
    info!(
        "Shutting down, waiting up to {:?} for in-flight requests",
        timeouts.shutdown_grace
    );
    let _ = shutdown_tx.send(());

    let drained = tokio::time::timeout(timeouts.shutdown_grace, async {
        while connections.join_next().await.is_some() {}
    })
    .await
    .is_ok();

    if drained {
        info!("HTTP server shutdown complete");
    } else {
        connections.abort_all();
        warn!("Grace period elapsed, abandoning in-flight requests");
    }
}

/// Drives one connection until it closes, goes idle, or shutdown begins.
async fn serve_connection(
    builder: Builder<TokioExecutor>,
    stream: TcpStream,
    app: Router,
    mut shutdown_rx: watch::Receiver<()>,
    idle_timeout: Duration,
) {
    let activity = ConnectionActivity::new();

    let tracked = activity.clone();
    let service = service_fn(move |request: Request<Incoming>| {
        let guard = tracked.begin_request();
        let mut router = app.clone();
        async move {
            let response = router.call(request).await;
            drop(guard);
            response
        }
    });

    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
    tokio::pin!(conn);
    let mut closing = false;

    loop {
        let check_in = activity
            .idle_for()
            .map_or(idle_timeout, |idle| idle_timeout.saturating_sub(idle));

        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    debug!("Connection closed with error: {e}");
                }
                break;
            }
            _ = tokio::time::sleep(check_in), if !closing => {
                if activity.idle_for().is_some_and(|idle| idle >= idle_timeout) {
                    debug!("Closing idle connection");
                    conn.as_mut().graceful_shutdown();
                    closing = true;
                }
            }
            _ = shutdown_rx.changed(), if !closing => {
                conn.as_mut().graceful_shutdown();
                closing = true;
            }
        }
    }
}

/// Request bookkeeping for one connection.
///
/// A connection is idle while no request is in flight; idle time counts from
/// the end of the last request, or from accept if none arrived yet.
struct ConnectionActivity {
    opened: Instant,
    in_flight: AtomicUsize,
    last_active_ms: AtomicU64,
}

impl ConnectionActivity {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            opened: Instant::now(),
            in_flight: AtomicUsize::new(0),
            last_active_ms: AtomicU64::new(0),
        })
    }

    fn begin_request(self: &Arc<Self>) -> RequestGuard {
        self.touch();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        RequestGuard {
            activity: self.clone(),
        }
    }

    /// Time since the connection last had a request in flight, `None` while
    /// one is running.
    fn idle_for(&self) -> Option<Duration> {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            return None;
        }
        let last_active = Duration::from_millis(self.last_active_ms.load(Ordering::SeqCst));
        Some(self.opened.elapsed().saturating_sub(last_active))
    }

    fn touch(&self) {
        let elapsed = u64::try_from(self.opened.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_active_ms.store(elapsed, Ordering::SeqCst);
    }
}

/// Marks a request as finished when dropped, including when the handler
/// future is cancelled.
struct RequestGuard {
    activity: Arc<ConnectionActivity>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.activity.touch();
        self.activity.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
