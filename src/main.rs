mod application;
mod config;
mod domain;
mod infrastructure;
mod persistence;

use crate::application::handlers::ledger_handler::{self, AppState};
use crate::application::services::ledger_service::LedgerService;
use crate::infrastructure::quote_board::QuoteBoard;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = crate::config::LedgerConfig::from_env();
    info!("Folio paper-trading ledger starting...");
    info!(
        "Default initial deposit: {}",
        config.default_initial_deposit
    );

    let pool = persistence::init_database(&config.database.url).await?;

    let state = AppState {
        ledger: Arc::new(LedgerService::new(pool)),
        quotes: Arc::new(QuoteBoard::new()),
        default_initial_deposit: config.default_initial_deposit,
    };

    let app = Router::new()
        .route("/", get(|| async { "Folio paper-trading ledger is running!" }))
        .route("/health", get(ledger_handler::health_check))
        .route("/accounts/:id", post(ledger_handler::create_account))
        .route("/accounts/:id/enable", post(ledger_handler::enable_paper_trading))
        .route("/accounts/:id/status", get(ledger_handler::get_status))
        .route("/accounts/:id/cash", post(ledger_handler::manage_cash))
        .route("/accounts/:id/cash-history", get(ledger_handler::cash_history))
        .route(
            "/accounts/:id/trades",
            post(ledger_handler::record_trade).get(ledger_handler::trade_history),
        )
        .route("/accounts/:id/positions", get(ledger_handler::get_positions))
        .route("/accounts/:id/profit-loss", get(ledger_handler::get_profit_loss))
        .route("/accounts/:id/reset", post(ledger_handler::reset_account))
        .route("/prices/:ticker", put(ledger_handler::publish_quote))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    let server = axum::serve(listener, app);

    // Graceful shutdown on Ctrl+C or SIGTERM
    let shutdown_signal = async move {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal"),
                Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("Received SIGTERM signal");
                }
                Err(e) => error!("Failed to install SIGTERM handler: {}", e),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    };

    info!("Server started successfully. Press Ctrl+C to stop.");
    server.with_graceful_shutdown(shutdown_signal).await?;

    info!("Shutdown complete");
    Ok(())
}
