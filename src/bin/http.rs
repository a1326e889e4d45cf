#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use timetable_tool::{StateRepository, StorageConfig, Timetable, http_api, logging};

    logging::init_tracing("info");

    let addr: SocketAddr = std::env::var("TIMETABLE_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let storage = StorageConfig::from_env();
    let repository = StateRepository::from_config(&storage);
    let timetable = repository
        .load()
        .map(Timetable::from_state)
        .unwrap_or_default();

    tracing::info!(%addr, key = %storage.key, "timetable HTTP API listening");
    http_api::serve(addr, http_api::AppState::new(timetable, repository)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
