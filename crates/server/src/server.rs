use axum::{Router, routing::get};

use crate::{numbers, rates};

/// The HTTP services this crate can serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    /// Mock exchange-rate API consumed by the telegram bot.
    Rates,
    /// Random-arithmetic demo API.
    Numbers,
}

impl Service {
    fn name(self) -> &'static str {
        match self {
            Service::Rates => "rate service",
            Service::Numbers => "number service",
        }
    }
}

pub fn router(service: Service) -> Router {
    match service {
        Service::Rates => Router::new().route("/rate", get(rates::get)),
        Service::Numbers => {
            let number = get(numbers::get)
                .post(numbers::post)
                .delete(numbers::delete);
            Router::new()
                .route("/number/", number.clone())
                .route("/number", number)
        }
    }
}

pub async fn run_with_listener(
    service: Service,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("{} listening on {}", service.name(), addr);

    axum::serve(listener, router(service)).await
}

pub fn spawn_with_listener(
    service: Service,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(service, listener).await {
            tracing::error!("{} failed: {err}", service.name());
        }
    });

    Ok(addr)
}
