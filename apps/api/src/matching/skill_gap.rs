//! Skill Gap Analyzer: required skills from the recommended postings that
//! the student does not list, ranked by how often they recur.
//!
//! Matching is a loose bidirectional substring check: a required skill is
//! covered when it contains a user skill or is contained by one. This catches
//! "python" vs "python3" but also treats "c" as covering "c++". That is a
//! known limitation of the heuristic and is kept as-is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::matching::ranker::ScoredPosting;

pub const DEFAULT_SKILL_GAP_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGapEntry {
    pub skill: String,
    pub frequency: u32,
}

fn is_covered(required: &str, user_skills: &[String]) -> bool {
    user_skills
        .iter()
        .any(|u| required.contains(u.as_str()) || u.contains(required))
}

/// Missing skills across `recommendations`, most frequent first, at most
/// `limit` entries. Ties keep the order in which skills were first seen.
pub fn analyze_skill_gaps<S: AsRef<str>>(
    user_skills: &[S],
    recommendations: &[ScoredPosting],
    limit: usize,
) -> Vec<SkillGapEntry> {
    if recommendations.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for rec in recommendations {
        for skill in rec.posting.required_skill_tokens() {
            let count = counts.entry(skill.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(skill);
            }
            *count += 1;
        }
    }

    // An empty user token would be a substring of every skill.
    let user_normalized: Vec<String> = user_skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut missing: Vec<SkillGapEntry> = first_seen
        .into_iter()
        .filter(|skill| !skill.is_empty() && !is_covered(skill, &user_normalized))
        .map(|skill| {
            let frequency = counts[&skill];
            SkillGapEntry { skill, frequency }
        })
        .collect();

    missing.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    missing.truncate(limit);
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::internship::InternshipPosting;

    fn rec(skills: &str) -> ScoredPosting {
        ScoredPosting {
            posting: InternshipPosting {
                skills_required: skills.to_string(),
                ..Default::default()
            },
            match_score: 0.0,
            match_percentage: 0.0,
        }
    }

    #[test]
    fn test_python_student_is_missing_java_and_sql() {
        let recs = vec![rec("Python, SQL"), rec("Java, SQL"), rec("Python, Java, SQL")];
        let gaps = analyze_skill_gaps(&["Python"], &recs, DEFAULT_SKILL_GAP_LIMIT);

        assert_eq!(
            gaps,
            vec![
                SkillGapEntry {
                    skill: "sql".to_string(),
                    frequency: 3
                },
                SkillGapEntry {
                    skill: "java".to_string(),
                    frequency: 2
                },
            ]
        );
        assert!(gaps.iter().all(|g| g.skill != "python"));
    }

    #[test]
    fn test_empty_recommendations_give_no_gaps() {
        let gaps = analyze_skill_gaps(&["Rust"], &[], DEFAULT_SKILL_GAP_LIMIT);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_fuzzy_match_is_bidirectional() {
        let recs = vec![rec("Python3, Machine Learning, Excel")];
        // "python" ⊂ "python3"; "advanced excel" ⊃ "excel"
        let gaps = analyze_skill_gaps(&["python", "Advanced Excel"], &recs, 10);
        let skills: Vec<&str> = gaps.iter().map(|g| g.skill.as_str()).collect();
        assert_eq!(skills, vec!["machine learning"]);
    }

    #[test]
    fn test_loose_match_single_letter_covers_cpp() {
        let recs = vec![rec("C++")];
        let gaps = analyze_skill_gaps(&["C"], &recs, 10);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_blank_user_skills_do_not_cover_everything() {
        let recs = vec![rec("Docker")];
        let gaps = analyze_skill_gaps(&["", "  "], &recs, 10);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].skill, "docker");
    }

    #[test]
    fn test_empty_tokens_never_reported() {
        let recs = vec![rec("Go,, Kafka,"), rec("")];
        let gaps = analyze_skill_gaps::<&str>(&[], &recs, 10);
        let skills: Vec<&str> = gaps.iter().map(|g| g.skill.as_str()).collect();
        assert_eq!(skills, vec!["go", "kafka"]);
    }

    #[test]
    fn test_gaps_capped_and_sorted_non_increasing() {
        let many: Vec<String> = (0..15).map(|i| format!("skill{i}")).collect();
        let recs = vec![rec(&many.join(", ")), rec("skill14, skill7")];
        let gaps = analyze_skill_gaps::<&str>(&[], &recs, DEFAULT_SKILL_GAP_LIMIT);

        assert_eq!(gaps.len(), 10);
        assert!(gaps.iter().all(|g| g.frequency >= 1));
        for pair in gaps.windows(2) {
            assert!(pair[0].frequency >= pair[1].frequency);
        }
        assert_eq!(gaps[0].skill, "skill7");
        assert_eq!(gaps[1].skill, "skill14");
        assert_eq!(gaps[2].skill, "skill0");
    }
}
