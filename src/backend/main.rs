/**
 * InstaSpace Server Binary
 *
 * Loads `.env`, initialises tracing from `RUST_LOG` (default `info`), reads
 * `AppConfig` from the environment and serves until ctrl-c. On shutdown the
 * realtime hub closes every websocket session before axum finishes draining
 * HTTP requests.
 */

use instaspace::backend::server::init::create_app;
use instaspace::shared::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env()?;
    let port = config.port;

    let (app, state) = create_app(config).await;
    let hub = state.hub.clone();

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
            hub.shutdown();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
