use std::{net::SocketAddr, sync::Arc};

use {
    axum::Router,
    tokio::net::TcpListener,
    tracing::{debug, info},
};

use crate::{util::http::serve_http, util::Config, Error};

pub struct Server {
    pub router: Router,
    pub config: Arc<Config>,
}

impl Server {
    /// Binds the configured address and serves in a background task.
    /// Returns the bound address, which differs from the configured one when
    /// port 0 was requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(self) -> Result<SocketAddr, Error> {
        debug!("Starting server with configuration: {:?}", self.config);

        let addr = SocketAddr::from((
            self.config.website.bind_address,
            self.config.website.bind_port,
        ));
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        info!("http server listening on {}", local_addr);
        tokio::spawn(serve_http(listener, self.router));

        Ok(local_addr)
    }
}
