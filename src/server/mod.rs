/// Server configuration.
pub mod config;
/// User registry.
pub mod registry;
/// Per-connection protocol state machine.
pub mod session;

use std::future::{self, Future};
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn, Instrument};

pub use config::{ServerConfig, SessionSettings};
pub use registry::{InMemoryRegistry, Registry, UserRecord};
pub use session::{validate_user_id, Session, SessionOutcome};

use crate::network::Connection;
use crate::{GroupParameters, Result, SecureRng};

/// Authentication server: accepts connections and runs one session each.
pub struct Server {
    config: ServerConfig,
    params: Arc<GroupParameters>,
    registry: Arc<dyn Registry>,
}

impl Server {
    /// Creates a server over the RFC 5114 group with an in-memory registry.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            params: Arc::new(GroupParameters::rfc5114().clone()),
            registry: Arc::new(InMemoryRegistry::new()),
        }
    }

    /// Replaces the group parameters.
    pub fn with_params(mut self, params: GroupParameters) -> Self {
        self.params = Arc::new(params);
        self
    }

    /// Replaces the registry.
    pub fn with_registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.addr()?;
        Ok(TcpListener::bind(addr).await?)
    }

    /// Serves connections until the listener fails.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_with_shutdown(listener, future::pending()).await
    }

    /// Serves connections until `shutdown` resolves.
    ///
    /// Sessions already running finish in their own tasks.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(addr = %listener.local_addr()?, "listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutting down, no longer accepting connections");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!("accept failed: {e}");
                            continue;
                        }
                    };
                    self.spawn_session(stream, peer);
                }
            }
        }
    }

    fn spawn_session<S>(&self, stream: S, peer: SocketAddr)
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        let params = Arc::clone(&self.params);
        let settings = self.config.session.clone();

        let span = tracing::info_span!("session", %peer);
        tokio::spawn(
            async move {
                debug!("accepted connection");
                match serve_connection(stream, registry.as_ref(), &params, &settings).await {
                    Ok(outcome) => info!(%outcome, "session closed"),
                    Err(e) => error!("session failed: {e}"),
                }
            }
            .instrument(span),
        );
    }
}

/// Runs one session over `stream` with fresh OS randomness.
pub async fn serve_connection<S, G>(
    stream: S,
    registry: &G,
    params: &GroupParameters,
    settings: &SessionSettings,
) -> Result<SessionOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
    G: Registry + ?Sized,
{
    let connection = Connection::new(stream)
        .with_read_timeout(settings.read_timeout())
        .with_max_frame_size(settings.max_frame_size);
    Session::new(connection, registry, params, SecureRng::new())
        .run()
        .await
}
