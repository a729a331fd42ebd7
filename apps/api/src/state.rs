use crate::config::Config;
use crate::matching::SharedRecommender;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Current matching engine. Swapped wholesale on catalog reload.
    pub recommender: SharedRecommender,
}
