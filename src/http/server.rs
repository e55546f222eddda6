use crate::config::Config;
use crate::http::router;
use crate::{config, handler};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

pub struct Server {
    router: Router,
    pub listener: TcpListener,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("set up listening socket: {0}")]
    BindAddress(std::io::Error),
    #[error("describe socket local address: {0}")]
    LocalAddress(std::io::Error),
    #[error("{0}")]
    InitHandler(handler::InitError),
    #[error("invalid configuration: {0}")]
    Configuration(config::Error),
}

impl Server {
    pub async fn new_from_env() -> Result<Self, Error> {
        let cfg = Config::new_from_env().map_err(Error::Configuration)?;
        Self::new_from_config(cfg).await
    }

    pub async fn new_from_config(cfg: Config) -> Result<Self, Error> {
        let bind_address = cfg.bind_address.clone();
        let listener = TcpListener::bind(bind_address).await.map_err(Error::BindAddress)?;
        let api_address = listener.local_addr().map_err(Error::LocalAddress)?;
        log::info!("Serving API on http://{api_address:?}");
        log::info!(
            "Swagger API documentation: http://{:?}/swagger-ui",
            api_address
        );

        let state = handler::State::from_config(cfg).await.map_err(Error::InitHandler)?;

        Ok(Self {
            router: router::app(state),
            listener,
        })
    }

    pub async fn run(self) {
        serve(self.listener, self.router).await;
        log::debug!("Faktura shut down gracefully");
    }
}

async fn serve(listener: TcpListener, router: Router) {
    // from axum::serve:
    // > Although this future resolves to io::Result<()>,
    // > it will never actually complete or return an error.
    // > Errors on the TCP socket will be handled by sleeping for a short while (currently, one second).
    //
    // from axum::serve::with_graceful_shutdown:
    // > Similarly to serve, although this future resolves to io::Result<()>, it will never error.
    // > It returns Ok(()) only after the signal future completes.
    //
    // Therefore, we can safely unwrap the result of the await.
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("axum::serve::with_graceful_shutdown() should not error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log::debug!{"Received Ctrl+C / SIGINT"},
        () = terminate => log::debug!{"Received SIGTERM"},
    }
}
