use log::info;
use spycat_core::{init_logging, open_db, seed_demo_data, CachedBreedCatalog};
use spycat_server::{router, AppState, Config, TheCatApiSource};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_logging(&config.log_level, &config.log_dir.to_string_lossy(), true)?;

    let mut conn = open_db(&config.db_path)?;
    if config.seed_demo_data {
        let summary = seed_demo_data(&mut conn)?;
        info!(
            "event=server_seed module=server status=ok cats={} missions={} targets={}",
            summary.cats, summary.missions, summary.targets
        );
    }

    let catalog = CachedBreedCatalog::with_ttl(
        TheCatApiSource::new(config.breeds_url.clone()),
        config.breed_cache_ttl,
    );
    let state = Arc::new(AppState::new(conn, Arc::new(catalog)));
    let app = router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "event=server_start module=server status=ok addr={} db_path={}",
        listener.local_addr()?,
        config.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=server_signal module=server status=error error={err}");
    }
}
