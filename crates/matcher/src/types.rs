use rfqmatch_common::normalize;
use rfqmatch_vector::CatalogEntry;
use serde::Serialize;

use crate::quantity::extract_quantity;

/// One parsed RFQ line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfqLine {
    /// Line as split from the request, before quantity stripping
    pub original_text: String,

    /// Normalized description without the trailing quantity
    pub description: String,

    /// Requested monthly quantity
    pub quantity: u64,
}

impl RfqLine {
    pub fn parse(line: &str) -> Self {
        let (description, quantity) = extract_quantity(line);
        Self {
            original_text: line.to_string(),
            description: normalize(&description),
            quantity,
        }
    }
}

/// One ranked catalog candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// 1-based rank, 1 = nearest
    pub rank: usize,

    pub product_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub brand: String,

    pub product_name: String,

    /// Quantity requested on the RFQ line
    pub quantity: u64,

    /// Squared Euclidean distance to the line's embedding
    #[serde(skip_serializing)]
    pub distance: f32,
}

impl MatchResult {
    pub fn new(rank: usize, entry: &CatalogEntry, quantity: u64, distance: f32) -> Self {
        Self {
            rank,
            product_id: entry.sku.clone(),
            brand: entry.brand.clone(),
            product_name: entry.description.clone(),
            quantity,
            distance,
        }
    }
}

/// Matches for one RFQ line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfqMatchReport {
    pub original_string: String,

    /// Rank-1 match, absent when nothing matched
    pub best_match: Option<MatchResult>,

    /// Up to five matches, nearest first
    #[serde(rename = "top_5_matches")]
    pub top_matches: Vec<MatchResult>,
}
