//! Axum route handlers for the recommendation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::{Filters, RecommendationResponse, Recommender, RecommenderOptions};
use crate::models::profile::StudentProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub profile: StudentProfile,
    #[serde(default)]
    pub filters: Filters,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub postings: usize,
    pub vocabulary_size: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations
///
/// Ranks the catalog against the supplied profile, applies filters and
/// returns the top postings with a skill gap report. Filters that exclude
/// everything produce an empty result, not an error.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let recommender = state.recommender.current().await;
    Ok(Json(recommender.recommend(&request.profile, &request.filters)))
}

/// POST /api/v1/catalog/reload
///
/// Rebuilds the engine from the configured catalog and swaps it in. On
/// failure the running engine is left untouched.
pub async fn handle_reload(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let path = state.config.catalog_path.clone();
    let options = RecommenderOptions {
        top_k: state.config.top_k,
        skill_gap_limit: state.config.skill_gap_limit,
    };

    // Fitting is CPU-bound; keep it off the async workers.
    let built = tokio::task::spawn_blocking(move || Recommender::from_path(&path, options))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("catalog rebuild task failed: {e}")))??;

    let response = ReloadResponse {
        postings: built.posting_count(),
        vocabulary_size: built.vocabulary_size(),
    };
    state.recommender.replace(built).await;
    info!(
        "Catalog reloaded: {} postings, {} terms",
        response.postings, response.vocabulary_size
    );

    Ok(Json(response))
}
