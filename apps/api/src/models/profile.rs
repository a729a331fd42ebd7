#![allow(dead_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::MatchError;

/// A student's profile for a single recommendation request.
///
/// Every field tolerates being absent or `null`; missing text is treated as
/// the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Skill tokens grouped by category (e.g. "programming", "soft").
    #[serde(deserialize_with = "null_as_default")]
    pub skills: BTreeMap<String, Vec<String>>,
    #[serde(deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
    #[serde(alias = "education_level", deserialize_with = "null_as_default")]
    pub education: String,
    #[serde(alias = "location", deserialize_with = "null_as_default")]
    pub state: String,
}

impl StudentProfile {
    /// All skill tokens across categories, category order then token order.
    pub fn flattened_skills(&self) -> Vec<&str> {
        self.skills
            .values()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect()
    }

    /// Flattened skills followed by interests, space separated.
    pub fn composite_text(&self) -> String {
        format!(
            "{} {}",
            self.flattened_skills().join(" "),
            self.interests.join(" ")
        )
    }

    /// Reports a profile that carries nothing to match on. Never fatal.
    pub fn validate(&self) -> Result<(), MatchError> {
        let has_skills = self
            .flattened_skills()
            .iter()
            .any(|s| !s.trim().is_empty());
        let has_interests = self.interests.iter().any(|s| !s.trim().is_empty());

        if !has_skills && !has_interests {
            return Err(MatchError::InvalidProfile(
                "profile has neither skills nor interests".to_string(),
            ));
        }
        Ok(())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
