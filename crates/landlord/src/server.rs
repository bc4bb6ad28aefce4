//! `LandlordServer` builder and server loop.
//!
//! This is the entry point for running a Landlord game server. It ties
//! together the layers: transport → protocol → room → game.

use std::sync::Arc;

use landlord_room::{RoomConfig, RoomRegistry};
use landlord_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{LandlordError, ServerConfig};

/// Builder for configuring and starting a Landlord server.
///
/// # Example
///
/// ```rust,no_run
/// use landlord::prelude::*;
///
/// # async fn run() -> Result<(), LandlordError> {
/// let server = LandlordServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct LandlordServerBuilder {
    config: ServerConfig,
}

impl LandlordServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces all settings at once, e.g. with [`ServerConfig::from_env`].
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every room starts with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    /// Binds the listener.
    pub async fn build(self) -> Result<LandlordServer, LandlordError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let registry = Arc::new(RoomRegistry::new(self.config.room));
        Ok(LandlordServer { transport, registry })
    }
}

impl Default for LandlordServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Landlord game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct LandlordServer {
    transport: WebSocketTransport,
    registry: Arc<RoomRegistry>,
}

impl LandlordServer {
    /// Creates a new builder.
    pub fn builder() -> LandlordServerBuilder {
        LandlordServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The room registry shared by every connection.
    pub fn registry(&self) -> Arc<RoomRegistry> {
        Arc::clone(&self.registry)
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), LandlordError> {
        tracing::info!(addr = ?self.local_addr().ok(), "Landlord server running");

        loop {
            match self.transport.accept().await {
                Ok(incoming) => {
                    let registry = Arc::clone(&self.registry);
                    // The handshake runs on the connection's own task.
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(incoming, registry).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
