//! Local text tools that need no upstream service

pub mod similarity;
pub mod citation;

pub use similarity::{calculate_similarity, SimilarityBand, SimilarityReport};
pub use citation::{generate_citation, CitationData, CitationStyle, SourceType};
