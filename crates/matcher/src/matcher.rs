use regex::Regex;
use rfqmatch_common::{normalize, Result};
use rfqmatch_embedding::Embedder;
use rfqmatch_vector::CatalogIndex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};

use crate::types::{MatchResult, RfqLine, RfqMatchReport};

/// Candidates returned per RFQ line
pub const TOP_K: usize = 5;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*[,\n]\s*").expect("separator pattern is valid"))
}

/// Split a raw RFQ block into non-blank line items
///
/// Commas and newlines are both line boundaries.
pub fn split_rfq(rfq: &str) -> Vec<String> {
    let cleaned = normalize(rfq);
    separator_pattern()
        .split(&cleaned)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Matches RFQ line items against the catalog index
pub struct RfqMatcher {
    index: Arc<CatalogIndex>,
    embedder: Arc<dyn Embedder>,
}

impl RfqMatcher {
    pub fn new(index: Arc<CatalogIndex>, embedder: Arc<dyn Embedder>) -> Self {
        Self { index, embedder }
    }

    /// Catalog index this matcher reads from
    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Match every line of an RFQ block, in input order
    ///
    /// Lines whose embedding or index lookup fails produce no report.
    pub async fn match_rfq(&self, rfq: &str) -> Vec<RfqMatchReport> {
        let lines = split_rfq(rfq);
        info!("Matching RFQ - {} line items", lines.len());

        let mut reports = Vec::with_capacity(lines.len());
        for raw in &lines {
            let line = RfqLine::parse(raw);
            match self.match_line(&line).await {
                Ok(report) => reports.push(report),
                Err(e) if e.is_embedding_failure() => {
                    warn!("Skipping RFQ line {:?}: {}", line.original_text, e)
                }
                Err(e) => error!("Failed to match RFQ line {:?}: {}", line.original_text, e),
            }
        }

        info!("RFQ matched - {}/{} lines reported", reports.len(), lines.len());
        reports
    }

    /// Match a single parsed line
    pub async fn match_line(&self, line: &RfqLine) -> Result<RfqMatchReport> {
        let embedding = self.embedder.embed(&line.description).await?;
        let neighbors = self.index.search(&embedding, TOP_K)?;

        let top_matches: Vec<MatchResult> = neighbors
            .iter()
            .filter_map(|n| self.index.entry(n.slot).map(|entry| (n, entry)))
            .enumerate()
            .map(|(i, (n, entry))| MatchResult::new(i + 1, entry, line.quantity, n.distance))
            .collect();

        debug!(
            "Line {:?} (qty={}) -> {} matches",
            line.description,
            line.quantity,
            top_matches.len()
        );

        Ok(RfqMatchReport {
            original_string: line.original_text.clone(),
            best_match: top_matches.first().cloned(),
            top_matches,
        })
    }
}
