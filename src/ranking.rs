use std::collections::HashSet;

use crate::{
    config::ScoringConfig,
    expectations::{ExpectationEntry, ExpectationTable},
    extract::{BlockSource, TextBlock},
    fallback,
    matcher::{self, CandidateMatch},
    report::{AnalysisInput, Report},
    similarity::SimilarityScorer,
};

/// A candidate together with its 1-based position in the final ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSection {
    pub rank: usize,
    pub candidate: CandidateMatch,
}

/// Load a document's blocks, treating unreadable documents as empty.
fn load_blocks(source: &dyn BlockSource, document: &str) -> Option<Vec<TextBlock>> {
    match source.blocks(document) {
        Ok(Some(blocks)) => Some(blocks),
        Ok(None) => {
            tracing::debug!(document, "document not found, skipping");
            None
        }
        Err(e) => {
            tracing::warn!(document, error = %e, "could not read document, skipping");
            None
        }
    }
}

/// Merge curated matches and fallback candidates into the top sections.
///
/// 1. For each expectation whose document exists, keep its best match.
/// 2. If that yields fewer than `top_n` sections, add every fallback
///    candidate from input documents not already represented.
/// 3. Stable sort by match score, descending, and keep the first `top_n`.
pub fn rank_sections(
    expectations: &[ExpectationEntry],
    documents: &[String],
    task: &str,
    source: &dyn BlockSource,
    scorer: &mut dyn SimilarityScorer,
    config: &ScoringConfig,
) -> Vec<RankedSection> {
    let mut candidates: Vec<CandidateMatch> = Vec::new();

    for expectation in expectations {
        let Some(blocks) = load_blocks(source, &expectation.document) else {
            continue;
        };
        let matches =
            matcher::find_section_matches(expectation, &blocks, task, scorer, config);
        if let Some(best) = matcher::best_match(matches) {
            candidates.push(best);
        }
    }

    if candidates.len() < config.top_n {
        tracing::info!(
            found = candidates.len(),
            "searching remaining documents for additional relevant content"
        );

        let mut represented: HashSet<String> =
            candidates.iter().map(|c| c.document.clone()).collect();
        for document in documents {
            // A filename listed twice is searched once.
            if !represented.insert(document.clone()) {
                continue;
            }
            let Some(blocks) = load_blocks(source, document) else {
                continue;
            };
            candidates.extend(fallback::search_document(&blocks, task, scorer, config));
        }
    }

    candidates.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    candidates
        .into_iter()
        .take(config.top_n)
        .enumerate()
        .map(|(i, candidate)| RankedSection {
            rank: i + 1,
            candidate,
        })
        .collect()
}

/// Run the whole pipeline for one input and shape the report.
pub fn analyze(
    input: &AnalysisInput,
    table: &ExpectationTable,
    source: &dyn BlockSource,
    scorer: &mut dyn SimilarityScorer,
    config: &ScoringConfig,
) -> Report {
    let expectations = table.lookup(input.persona(), input.task());
    if expectations.is_empty() {
        tracing::info!(
            persona = input.persona(),
            "no curated sections for this persona and task, using semantic search only"
        );
    } else {
        tracing::debug!(count = expectations.len(), "loaded curated sections");
    }

    let ranked = rank_sections(
        &expectations,
        &input.document_names(),
        input.task(),
        source,
        scorer,
        config,
    );
    tracing::info!(
        selected = ranked.len(),
        scorer = scorer.name(),
        "selected most relevant sections"
    );

    Report::new(input, &ranked)
}
