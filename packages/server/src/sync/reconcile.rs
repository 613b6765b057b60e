use std::collections::HashMap;

use crate::leetcode::fetch::AcceptedSubmission;
use crate::models::shared::{Difficulty, SyncStats};
use crate::store::CatalogEntry;

/// Result of matching fetched records against the platform catalog.
///
/// Unmatched records are surfaced explicitly rather than silently dropped;
/// the pipeline logs them but they never reach persistence or the stats.
pub struct Reconciliation {
    pub matched: Vec<AcceptedSubmission>,
    pub unmatched: Vec<AcceptedSubmission>,
    pub stats: SyncStats,
}

/// Match deduplicated records against the catalog by problem title and
/// tally per-difficulty counts for the matched ones.
pub fn reconcile(records: Vec<AcceptedSubmission>, catalog: &[CatalogEntry]) -> Reconciliation {
    let by_title: HashMap<&str, Difficulty> = catalog
        .iter()
        .map(|entry| (entry.title.as_str(), entry.difficulty))
        .collect();

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    let mut stats = SyncStats::default();

    for record in records {
        match by_title.get(record.name.as_str()) {
            Some(difficulty) => {
                match difficulty {
                    Difficulty::Easy => stats.easy_solved += 1,
                    Difficulty::Medium => stats.medium_solved += 1,
                    Difficulty::Hard => stats.hard_solved += 1,
                }
                matched.push(record);
            }
            None => unmatched.push(record),
        }
    }

    stats.total_solved = matched.len() as i32;

    Reconciliation {
        matched,
        unmatched,
        stats,
    }
}
