use mock_server::{AppState, Catalog};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let catalog = match std::env::var("JSERVICE_CATALOG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let catalog = Catalog::from_json(&raw).map_err(std::io::Error::other)?;
            tracing::info!(%path, categories = catalog.categories.len(), "loaded catalog");
            catalog
        }
        Err(_) => Catalog::sample(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    mock_server::run_with_state(listener, AppState::new(catalog)).await
}
