// Matching engine: catalog corpus, TF-IDF feature space, cosine ranking,
// structured filters and skill gap analysis.
// Everything in here is synchronous and does no I/O per request.

pub mod corpus;
pub mod engine;
pub mod feature_space;
pub mod filters;
pub mod handlers;
pub mod ranker;
pub mod skill_gap;
pub mod stopwords;

pub use engine::{RecommendationResponse, Recommender, RecommenderOptions, SharedRecommender};
pub use filters::Filters;
