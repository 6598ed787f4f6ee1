//! Baby Match backend entrypoint wiring REST, SSE and the storage backend.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use baby_match_back::{
    build_router,
    config::AppConfig,
    dao::game_store::memory::InMemoryGameStore,
    services::sse_events,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config.catalog.clone());
    sse_events::spawn_degraded_notifier(app_state.clone());

    install_store(&app_state, &config).await;

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the storage backend: MongoDB when configured, the in-memory store otherwise.
async fn install_store(state: &SharedState, config: &AppConfig) {
    match config.mongo_uri.clone() {
        #[cfg(feature = "mongo-store")]
        Some(uri) => {
            use baby_match_back::dao::{
                game_store::{
                    GameStore,
                    mongodb::{MongoConfig, MongoGameStore},
                },
                storage::StorageError,
            };
            use baby_match_back::services::storage_supervisor;

            info!("MONGO_URI set; supervising MongoDB connection");
            let db = config.mongo_db.clone();
            tokio::spawn(storage_supervisor::run(state.clone(), move || {
                let uri = uri.clone();
                let db = db.clone();
                async move {
                    let mongo_config = MongoConfig::from_uri(&uri, db.as_deref()).await?;
                    let store = MongoGameStore::connect(mongo_config).await?;
                    Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameStore>)
                }
            }));
        }
        #[cfg(not(feature = "mongo-store"))]
        Some(_) => {
            warn!("MONGO_URI set but the mongo-store feature is disabled; using in-memory store");
            state.set_game_store(Arc::new(InMemoryGameStore::new())).await;
        }
        None => {
            warn!("MONGO_URI not set; rooms are kept in memory and lost on restart");
            state.set_game_store(Arc::new(InMemoryGameStore::new())).await;
        }
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
