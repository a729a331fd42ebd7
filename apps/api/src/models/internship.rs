#![allow(dead_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single catalog row. Immutable once loaded.
///
/// Text fields are never null: a missing cell is stored as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InternshipPosting {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub skills_required: String,
    pub interest_area: String,
    pub location: String,
    pub education_level: String,
    pub duration_months: Option<f64>,
    pub stipend_inr: Option<f64>,
    /// Catalog columns with no dedicated field (e.g. `Application_URL`),
    /// keyed by their original header and passed through to callers.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl InternshipPosting {
    /// Text the feature space is fit on: skills, interest area, location and
    /// education level joined by single spaces.
    pub fn composite_text(&self) -> String {
        [
            self.skills_required.as_str(),
            self.interest_area.as_str(),
            self.location.as_str(),
            self.education_level.as_str(),
        ]
        .join(" ")
    }

    /// Comma-separated required skills, trimmed and lower-cased.
    /// Empty tokens are kept so callers can count them consistently.
    pub fn required_skill_tokens(&self) -> Vec<String> {
        if self.skills_required.is_empty() {
            return Vec::new();
        }
        self.skills_required
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect()
    }
}

/// Which optional columns the catalog schema carries.
///
/// Filters are applied per column: a filter whose column is absent from the
/// whole catalog is skipped, while a missing cell in a present column is
/// evaluated as a failed comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSchema {
    pub has_duration: bool,
    pub has_stipend: bool,
    pub has_location: bool,
}

impl CatalogSchema {
    pub fn full() -> Self {
        Self {
            has_duration: true,
            has_stipend: true,
            has_location: true,
        }
    }
}
