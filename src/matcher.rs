use crate::{
    config::ScoringConfig,
    expectations::ExpectationEntry,
    extract::TextBlock,
    similarity::SimilarityScorer,
    title::extract_section_title,
};

/// A block that qualified as a candidate section.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatch {
    pub document: String,
    pub page_number: u32,
    pub section_title: String,
    /// Untruncated block text.
    pub refined_text: String,
    pub match_score: f32,
    pub semantic_score: f32,
}

/// Score every block of an expectation's document against it.
///
/// A block of at least `match_min_chars` characters with a usable title is a
/// candidate when its title overlaps the expected title, it mentions one of
/// the expected keywords, or its similarity to the task is strictly above
/// `match_gate`. Candidates carry the curated title, not the block's own.
pub fn find_section_matches(
    expectation: &ExpectationEntry,
    blocks: &[TextBlock],
    task: &str,
    scorer: &mut dyn SimilarityScorer,
    config: &ScoringConfig,
) -> Vec<CandidateMatch> {
    let expected_title = expectation.title.to_lowercase();
    let keywords: Vec<String> =
        expectation.keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut matches = Vec::new();

    for block in blocks {
        let text = block.raw_text.trim();
        if text.chars().count() < config.match_min_chars {
            continue;
        }
        let Some(title) = extract_section_title(text) else {
            continue;
        };

        let title = title.to_lowercase();
        let title_match =
            title.contains(&expected_title) || expected_title.contains(&title);

        let text_lower = text.to_lowercase();
        let keyword_match = keywords.iter().any(|k| text_lower.contains(k.as_str()));

        let semantic_score = scorer.score(text, task);

        if !(title_match || keyword_match || semantic_score > config.match_gate) {
            continue;
        }

        let mut match_score = 0.0;
        if title_match {
            match_score += config.title_weight;
        }
        if keyword_match {
            match_score += config.keyword_weight;
        }
        match_score += semantic_score * config.semantic_weight;

        matches.push(CandidateMatch {
            document: block.document.clone(),
            page_number: block.page_number,
            section_title: expectation.title.clone(),
            refined_text: text.to_string(),
            match_score,
            semantic_score,
        });
    }

    tracing::debug!(
        title = %expectation.title,
        document = %expectation.document,
        candidates = matches.len(),
        "scored curated section"
    );
    matches
}

/// The highest-scoring candidate; the earliest one wins ties.
pub fn best_match(matches: Vec<CandidateMatch>) -> Option<CandidateMatch> {
    matches.into_iter().fold(None, |best, candidate| match best {
        Some(best) if best.match_score >= candidate.match_score => Some(best),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Returns a fixed score per block text, 0 for anything unknown.
    struct FixedScores(HashMap<String, f32>);

    impl FixedScores {
        fn new(pairs: &[(&str, f32)]) -> Self {
            Self(pairs.iter().map(|(t, s)| (t.to_string(), *s)).collect())
        }
    }

    impl SimilarityScorer for FixedScores {
        fn score(&mut self, text: &str, _task: &str) -> f32 {
            self.0.get(text).copied().unwrap_or(0.0)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn entry(title: &str, keywords: &[&str]) -> ExpectationEntry {
        ExpectationEntry {
            title: title.to_string(),
            document: "doc.pdf".to_string(),
            page_hint: 1,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn block(page: u32, text: &str) -> TextBlock {
        TextBlock {
            document: "doc.pdf".to_string(),
            page_number: page,
            raw_text: text.to_string(),
        }
    }

    #[test]
    fn title_and_keyword_hits_are_weighted() {
        let text = "Falafel\nCrispy fritters made from chickpeas.";
        let mut scorer = FixedScores::new(&[(text, 0.5)]);
        let matches = find_section_matches(
            &entry("Falafel", &["chickpeas"]),
            &[block(7, text)],
            "vegetarian dinner",
            &mut scorer,
            &ScoringConfig::default(),
        );

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert!((m.match_score - (1.0 + 0.5 + 0.5 * 0.3)).abs() < 1e-6);
        assert_eq!(m.semantic_score, 0.5);
        assert_eq!(m.page_number, 7);
        assert_eq!(m.refined_text, text);
    }

    #[test]
    fn curated_title_replaces_block_title() {
        let text = "1. falafel wrap\nWith tahini and fresh herbs.";
        let mut scorer = FixedScores::new(&[]);
        let matches = find_section_matches(
            &entry("Falafel", &[]),
            &[block(1, text)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].section_title, "Falafel");
        assert_eq!(matches[0].match_score, 1.0);
    }

    #[test]
    fn title_match_works_both_ways() {
        // Block title "Fill and sign" is contained in the expected title.
        let text = "Fill and sign\nOpen the form in Acrobat.";
        let mut scorer = FixedScores::new(&[]);
        let matches = find_section_matches(
            &entry("Fill and sign PDF forms", &[]),
            &[block(2, text)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_score, 1.0);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let text = "Some heading\nCopy from the CLIPBOARD first.";
        let mut scorer = FixedScores::new(&[]);
        let matches = find_section_matches(
            &entry("Convert clipboard content to PDF", &["Clipboard"]),
            &[block(10, text)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_score, 0.5);
    }

    #[test]
    fn short_blocks_never_match() {
        // 19 characters, with a title and keyword hit.
        let text = "Falafel chickpeas!!";
        assert_eq!(text.chars().count(), 19);
        let mut scorer = FixedScores::new(&[(text, 1.0)]);
        let matches = find_section_matches(
            &entry("Falafel", &["chickpeas"]),
            &[block(1, text)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn blocks_without_title_are_skipped() {
        let text = "Ingredients:\no salt\no chickpeas\no oil";
        let mut scorer = FixedScores::new(&[(text, 1.0)]);
        let matches = find_section_matches(
            &entry("Falafel", &["chickpeas"]),
            &[block(1, text)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn semantic_gate_is_strict() {
        let at_gate = "Unrelated heading\nnothing that matches here";
        let above_gate = "Another heading\nstill nothing that matches";
        let mut scorer = FixedScores::new(&[(at_gate, 0.3), (above_gate, 0.31)]);
        let matches = find_section_matches(
            &entry("Falafel", &["chickpeas"]),
            &[block(1, at_gate), block(2, above_gate)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].page_number, 2);
        assert!((matches[0].match_score - 0.31 * 0.3).abs() < 1e-6);
    }

    #[test]
    fn best_match_prefers_earliest_on_tie() {
        let text_a = "Falafel\nfirst block on page three";
        let text_b = "Falafel\nsecond block on page five";
        let mut scorer = FixedScores::new(&[]);
        let matches = find_section_matches(
            &entry("Falafel", &[]),
            &[block(3, text_a), block(5, text_b)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );

        let best = best_match(matches).unwrap();
        assert_eq!(best.page_number, 3);
    }

    #[test]
    fn best_match_picks_highest_score() {
        let weak = "Falafel\nplain block on page one";
        let strong = "Falafel\nwith chickpeas on page two";
        let mut scorer = FixedScores::new(&[]);
        let matches = find_section_matches(
            &entry("Falafel", &["chickpeas"]),
            &[block(1, weak), block(2, strong)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );

        let best = best_match(matches).unwrap();
        assert_eq!(best.page_number, 2);
        assert_eq!(best.match_score, 1.5);
    }

    #[test]
    fn best_match_of_nothing_is_none() {
        assert!(best_match(Vec::new()).is_none());
    }
}
