//! Word-set similarity for the plagiarism checker
//!
//! Jaccard index over lowercase word sets. Anything other than ASCII letters,
//! digits, underscore and whitespace separates words.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityBand {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl SimilarityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            SimilarityBand::VeryHigh
        } else if score >= 0.6 {
            SimilarityBand::High
        } else if score >= 0.4 {
            SimilarityBand::Moderate
        } else if score >= 0.2 {
            SimilarityBand::Low
        } else {
            SimilarityBand::VeryLow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimilarityBand::VeryHigh => "Very High Similarity",
            SimilarityBand::High => "High Similarity",
            SimilarityBand::Moderate => "Moderate Similarity",
            SimilarityBand::Low => "Low Similarity",
            SimilarityBand::VeryLow => "Very Low Similarity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    /// 0.0 (disjoint) to 1.0 (same word set)
    pub score: f64,
    /// Score as a whole percentage
    pub percent: u32,
    pub band: SimilarityBand,
}

impl SimilarityReport {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            percent: (score * 100.0).round() as u32,
            band: SimilarityBand::from_score(score),
        }
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Jaccard similarity; either text blank gives 0
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }

    let left = tokenize(a);
    let right = tokenize(b);

    // Punctuation-only on both sides
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
