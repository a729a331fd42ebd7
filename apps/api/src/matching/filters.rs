//! Filter Stage: hard constraints applied to the ranked list.
//!
//! Every constraint keeps the relative order of the surviving postings, and
//! applying the same filters twice gives the same result as applying once.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::ranker::ScoredPosting;
use crate::models::internship::CatalogSchema;

/// Request-level filter settings. JSON keys are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub min_duration: f64,
    pub max_duration: f64,
    pub min_stipend: f64,
    pub max_stipend: f64,
    /// Accepted for compatibility; not used for filtering.
    pub work_preference: String,
    pub preferred_location: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            min_duration: 0.0,
            max_duration: 12.0,
            min_stipend: 0.0,
            max_stipend: 100_000.0,
            work_preference: String::new(),
            preferred_location: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPreference {
    SameState,
    /// Recognized, but the catalog has no district data. Passes everything.
    SameDistrict,
    Any,
}

impl LocationPreference {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("same state") {
            LocationPreference::SameState
        } else if raw.eq_ignore_ascii_case("same district") {
            LocationPreference::SameDistrict
        } else {
            LocationPreference::Any
        }
    }
}

/// Applies duration, stipend and location constraints.
///
/// Duration and stipend checks only run when the catalog carries the column.
/// Within a present duration column a missing cell fails the range check;
/// a missing stipend counts as 0.
pub fn apply_filters(
    ranked: Vec<ScoredPosting>,
    filters: &Filters,
    schema: CatalogSchema,
    student_state: &str,
) -> Vec<ScoredPosting> {
    let before = ranked.len();

    let location_pref = if filters.preferred_location.trim().is_empty() || !schema.has_location {
        LocationPreference::Any
    } else {
        LocationPreference::parse(&filters.preferred_location)
    };
    if location_pref == LocationPreference::SameDistrict {
        debug!("'Same District' preference requested; no district data, passing through");
    }

    let state = student_state.trim().to_lowercase();

    let filtered: Vec<ScoredPosting> = ranked
        .into_iter()
        .filter(|sp| {
            !schema.has_duration
                || sp.posting.duration_months.is_some_and(|d| {
                    d >= filters.min_duration && d <= filters.max_duration
                })
        })
        .filter(|sp| {
            if !schema.has_stipend {
                return true;
            }
            let stipend = sp.posting.stipend_inr.unwrap_or(0.0);
            stipend >= filters.min_stipend && stipend <= filters.max_stipend
        })
        .filter(|sp| match location_pref {
            LocationPreference::SameState if !state.is_empty() => {
                sp.posting.location.to_lowercase().contains(&state)
            }
            _ => true,
        })
        .collect();

    debug!(
        "Filter stage kept {} of {} ranked postings",
        filtered.len(),
        before
    );
    filtered
}
