//! Recommender: owns the catalog, the fitted feature space and the cached
//! posting vectors, and runs the per-request pipeline:
//! vectorize → rank → filter → top-K → skill gaps.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::errors::MatchError;
use crate::matching::corpus::{load_catalog, Catalog};
use crate::matching::feature_space::{FeatureSpace, SparseVector};
use crate::matching::filters::{apply_filters, Filters};
use crate::matching::ranker::{rank, ScoredPosting};
use crate::matching::skill_gap::{analyze_skill_gaps, SkillGapEntry, DEFAULT_SKILL_GAP_LIMIT};
use crate::models::profile::StudentProfile;

pub const DEFAULT_TOP_K: usize = 5;
pub const NO_DATA_MESSAGE: &str = "No internship data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommenderOptions {
    pub top_k: usize,
    pub skill_gap_limit: usize,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            skill_gap_limit: DEFAULT_SKILL_GAP_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<ScoredPosting>,
    pub skill_gaps: Vec<SkillGapEntry>,
    pub total_found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecommendationResponse {
    /// The explicit "no data" result served when the catalog is unavailable.
    pub fn no_data() -> Self {
        Self {
            recommendations: Vec::new(),
            skill_gaps: Vec::new(),
            total_found: 0,
            message: Some(NO_DATA_MESSAGE.to_string()),
        }
    }
}

/// Immutable matching engine. Built once per catalog load.
#[derive(Debug)]
pub struct Recommender {
    catalog: Catalog,
    space: Option<FeatureSpace>,
    posting_vectors: Vec<SparseVector>,
    options: RecommenderOptions,
}

impl Recommender {
    /// Fits the feature space on the catalog and caches every posting vector.
    pub fn build(catalog: Catalog, options: RecommenderOptions) -> Result<Self, MatchError> {
        let corpus = catalog.corpus();
        let space = FeatureSpace::fit(&corpus)?;
        let posting_vectors = space.transform_all(&corpus);

        info!(
            "Feature space fit: {} postings, {} terms",
            space.n_documents(),
            space.vocabulary_size()
        );

        Ok(Self {
            catalog,
            space: Some(space),
            posting_vectors,
            options,
        })
    }

    /// A recommender with no data. Every request gets the "no data" result.
    pub fn empty(options: RecommenderOptions) -> Self {
        Self {
            catalog: Catalog::default(),
            space: None,
            posting_vectors: Vec::new(),
            options,
        }
    }

    /// Loads the catalog from `path` and builds a recommender from it.
    pub fn from_path(path: &Path, options: RecommenderOptions) -> Result<Self, MatchError> {
        let catalog = load_catalog(path)?;
        Self::build(catalog, options)
    }

    /// Like `from_path`, but degrades to an empty recommender on failure.
    pub fn from_path_or_empty(path: &Path, options: RecommenderOptions) -> Self {
        match Self::from_path(path, options) {
            Ok(recommender) => recommender,
            Err(e) => {
                error!("Serving without internship data: {e}");
                Self::empty(options)
            }
        }
    }

    pub fn posting_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.space.as_ref().map_or(0, FeatureSpace::vocabulary_size)
    }

    pub fn is_empty(&self) -> bool {
        self.space.is_none() || self.catalog.is_empty()
    }

    /// Ranks, filters and analyzes skill gaps for one student. Never fails:
    /// missing data yields the "no data" result.
    pub fn recommend(&self, profile: &StudentProfile, filters: &Filters) -> RecommendationResponse {
        let Some(space) = self.space.as_ref().filter(|_| !self.catalog.is_empty()) else {
            return RecommendationResponse::no_data();
        };

        if let Err(e) = profile.validate() {
            warn!("{e}; scoring with empty text");
        }

        let student_vector = space.transform(&profile.composite_text());
        let ranked = rank(
            &student_vector,
            self.catalog.postings(),
            &self.posting_vectors,
        );
        let mut filtered = apply_filters(ranked, filters, self.catalog.schema(), &profile.state);
        filtered.truncate(self.options.top_k);

        let skill_gaps = analyze_skill_gaps(
            profile.flattened_skills().as_slice(),
            &filtered,
            self.options.skill_gap_limit,
        );

        debug!(
            "Recommended {} postings with {} skill gaps",
            filtered.len(),
            skill_gaps.len()
        );

        RecommendationResponse {
            total_found: filtered.len(),
            recommendations: filtered,
            skill_gaps,
            message: None,
        }
    }
}

/// Swappable handle to the current recommender.
///
/// Readers clone the inner `Arc` and drop the lock immediately, so a reload
/// never blocks in-flight requests and never exposes a half-built engine.
#[derive(Debug, Clone)]
pub struct SharedRecommender {
    inner: Arc<RwLock<Arc<Recommender>>>,
}

impl SharedRecommender {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(recommender))),
        }
    }

    pub async fn current(&self) -> Arc<Recommender> {
        self.inner.read().await.clone()
    }

    /// Installs a fully built recommender and returns the previous one.
    pub async fn replace(&self, recommender: Recommender) -> Arc<Recommender> {
        let next = Arc::new(recommender);
        let mut guard = self.inner.write().await;
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::internship::{CatalogSchema, InternshipPosting};
    use std::collections::BTreeMap;

    fn posting(skills: &str, location: &str, duration: f64, stipend: f64) -> InternshipPosting {
        InternshipPosting {
            skills_required: skills.to_string(),
            interest_area: "Technology".to_string(),
            location: location.to_string(),
            education_level: "B.Tech".to_string(),
            duration_months: Some(duration),
            stipend_inr: Some(stipend),
            ..Default::default()
        }
    }

    fn three_posting_catalog() -> Catalog {
        Catalog::from_postings(
            vec![
                posting("Python, SQL", "Bengaluru, Karnataka", 3.0, 10_000.0),
                posting("Java, SQL", "Mumbai, Maharashtra", 6.0, 12_000.0),
                posting("Python, Java, SQL", "Mysuru, Karnataka", 4.0, 0.0),
            ],
            CatalogSchema::full(),
        )
    }

    fn profile(skills: &[&str], state: &str) -> StudentProfile {
        let mut map = BTreeMap::new();
        map.insert(
            "programming".to_string(),
            skills.iter().map(|s| s.to_string()).collect(),
        );
        StudentProfile {
            name: "Test".to_string(),
            skills: map,
            interests: vec![],
            education: "B.Tech".to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn test_python_student_gap_report() {
        let rec = Recommender::build(three_posting_catalog(), RecommenderOptions::default())
            .unwrap();
        let resp = rec.recommend(&profile(&["Python"], ""), &Filters::default());

        assert_eq!(resp.total_found, 3);
        assert_eq!(resp.recommendations.len(), 3);
        let skills: Vec<&str> = resp.skill_gaps.iter().map(|g| g.skill.as_str()).collect();
        assert!(skills.contains(&"java"));
        assert!(skills.contains(&"sql"));
        assert!(!skills.contains(&"python"));
        // sql appears in all three recommended postings, java in two
        assert_eq!(resp.skill_gaps[0].skill, "sql");
        assert_eq!(resp.skill_gaps[0].frequency, 3);
        assert_eq!(resp.skill_gaps[1].frequency, 2);
    }

    #[test]
    fn test_python_student_ranks_python_postings_first() {
        let rec = Recommender::build(three_posting_catalog(), RecommenderOptions::default())
            .unwrap();
        let resp = rec.recommend(&profile(&["Python"], ""), &Filters::default());
        assert_ne!(resp.recommendations[0].posting.index, 1);
        assert_eq!(resp.recommendations[2].posting.index, 1);
        assert_eq!(resp.recommendations[2].match_score, 0.0);
    }

    #[test]
    fn test_empty_recommender_returns_no_data() {
        let rec = Recommender::empty(RecommenderOptions::default());
        let resp = rec.recommend(&profile(&["Python"], ""), &Filters::default());
        assert!(resp.recommendations.is_empty());
        assert!(resp.skill_gaps.is_empty());
        assert_eq!(resp.total_found, 0);
        assert_eq!(resp.message.as_deref(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_build_on_empty_catalog_fails_with_empty_corpus() {
        let err = Recommender::build(Catalog::default(), RecommenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, MatchError::EmptyCorpus));
    }

    #[test]
    fn test_missing_catalog_file_degrades_to_empty() {
        let rec = Recommender::from_path_or_empty(
            Path::new("/no/such/catalog.csv"),
            RecommenderOptions::default(),
        );
        assert!(rec.is_empty());
        let resp = rec.recommend(&StudentProfile::default(), &Filters::default());
        assert_eq!(resp, RecommendationResponse::no_data());
    }

    #[test]
    fn test_same_state_filter_through_pipeline() {
        let rec = Recommender::build(three_posting_catalog(), RecommenderOptions::default())
            .unwrap();
        let filters = Filters {
            preferred_location: "Same State".to_string(),
            ..Default::default()
        };
        let resp = rec.recommend(&profile(&["Java"], "Karnataka"), &filters);
        assert_eq!(resp.total_found, 2);
        assert!(resp
            .recommendations
            .iter()
            .all(|r| r.posting.location.to_lowercase().contains("karnataka")));
    }

    #[test]
    fn test_top_k_caps_recommendations() {
        let rows: Vec<InternshipPosting> = (0..8)
            .map(|i| posting("Rust, Tokio", &format!("City{i}, Goa"), 3.0, 1000.0))
            .collect();
        let catalog = Catalog::from_postings(rows, CatalogSchema::full());
        let rec = Recommender::build(catalog, RecommenderOptions::default()).unwrap();
        let resp = rec.recommend(&profile(&["Rust"], ""), &Filters::default());
        assert_eq!(resp.total_found, DEFAULT_TOP_K);
        let order: Vec<usize> = resp.recommendations.iter().map(|r| r.posting.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_filtering_everything_is_empty_not_error() {
        let rec = Recommender::build(three_posting_catalog(), RecommenderOptions::default())
            .unwrap();
        let filters = Filters {
            min_stipend: 50_000.0,
            ..Default::default()
        };
        let resp = rec.recommend(&profile(&["Python"], ""), &filters);
        assert!(resp.recommendations.is_empty());
        assert!(resp.skill_gaps.is_empty());
        assert_eq!(resp.total_found, 0);
        assert!(resp.message.is_none());
    }

    #[test]
    fn test_empty_profile_still_returns_ranked_postings() {
        let rec = Recommender::build(three_posting_catalog(), RecommenderOptions::default())
            .unwrap();
        let resp = rec.recommend(&StudentProfile::default(), &Filters::default());
        assert_eq!(resp.total_found, 3);
        assert!(resp.recommendations.iter().all(|r| r.match_score == 0.0));
    }

    #[tokio::test]
    async fn test_shared_recommender_swaps_atomically() {
        let shared = SharedRecommender::new(Recommender::empty(RecommenderOptions::default()));
        let before = shared.current().await;
        assert!(before.is_empty());

        let built = Recommender::build(three_posting_catalog(), RecommenderOptions::default())
            .unwrap();
        let old = shared.replace(built).await;
        assert!(old.is_empty());

        let after = shared.current().await;
        assert_eq!(after.posting_count(), 3);
        // A reader holding the old Arc keeps a consistent engine.
        assert!(before.is_empty());
    }
}
