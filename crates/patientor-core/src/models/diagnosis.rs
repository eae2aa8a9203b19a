//! Diagnosis reference data, lookup and picker search.
//!
//! The diagnosis list is small and static per session, so lookup is a linear
//! scan. Search scoring:
//! - Exact code or name substring match: 1.0
//! - Otherwise the best fuzzy similarity over code and name

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum score to be included in search results.
const MIN_SEARCH_SCORE: f64 = 0.55;

/// A diagnosis code with its display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnosis {
    /// ICD-10 style code, unique key
    pub code: String,
    /// Display name
    pub name: String,
    /// Latin name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

impl Diagnosis {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            latin: None,
        }
    }

    /// Label used by the picker: `"{code} {name}"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

/// A search hit with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDiagnosis {
    pub diagnosis: Diagnosis,
    /// Relevance (0.0 - 1.0)
    pub score: f64,
}

/// Find a diagnosis by exact code.
pub fn find_diagnosis<'a>(code: &str, diagnoses: &'a [Diagnosis]) -> Option<&'a Diagnosis> {
    diagnoses.iter().find(|d| d.code == code)
}

/// Resolve codes for display, skipping codes missing from the list.
pub fn diagnoses_for_codes<'a>(codes: &[String], diagnoses: &'a [Diagnosis]) -> Vec<&'a Diagnosis> {
    codes
        .iter()
        .filter_map(|code| find_diagnosis(code, diagnoses))
        .collect()
}

/// Rank diagnoses against a free-text query.
///
/// An empty query returns the first `limit` diagnoses in list order.
pub fn search_diagnoses(query: &str, diagnoses: &[Diagnosis], limit: usize) -> Vec<ScoredDiagnosis> {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return diagnoses
            .iter()
            .take(limit)
            .map(|d| ScoredDiagnosis {
                diagnosis: d.clone(),
                score: 1.0,
            })
            .collect();
    }

    let mut scored: Vec<ScoredDiagnosis> = diagnoses
        .iter()
        .map(|d| ScoredDiagnosis {
            diagnosis: d.clone(),
            score: score_diagnosis(d, &query),
        })
        .filter(|s| s.score >= MIN_SEARCH_SCORE)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.diagnosis.code.cmp(&b.diagnosis.code))
    });
    scored.truncate(limit);
    scored
}

fn score_diagnosis(diagnosis: &Diagnosis, query: &str) -> f64 {
    let code = diagnosis.code.to_lowercase();
    let name = diagnosis.name.to_lowercase();

    if code == query || name.contains(query) {
        return 1.0;
    }

    let code_score = fuzzy_match(query, &code);
    let name_score = name
        .split_whitespace()
        .map(|word| fuzzy_match(query, word))
        .fold(fuzzy_match(query, &name), f64::max);

    code_score.max(name_score)
}

/// Blend Jaro-Winkler (typos, prefixes) with normalized Levenshtein.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}
