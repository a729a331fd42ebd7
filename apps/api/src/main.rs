mod config;
mod errors;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::{Recommender, RecommenderOptions, SharedRecommender};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Internmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the catalog and fit the feature space once. A missing or broken
    // catalog leaves the service up and answering with empty results.
    let options = RecommenderOptions {
        top_k: config.top_k,
        skill_gap_limit: config.skill_gap_limit,
    };
    let catalog_path = config.catalog_path.clone();
    let recommender =
        tokio::task::spawn_blocking(move || Recommender::from_path_or_empty(&catalog_path, options))
            .await?;
    info!(
        "Recommender ready: {} postings, {} terms (top_k={}, skill_gap_limit={})",
        recommender.posting_count(),
        recommender.vocabulary_size(),
        options.top_k,
        options.skill_gap_limit
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        recommender: SharedRecommender::new(recommender),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
