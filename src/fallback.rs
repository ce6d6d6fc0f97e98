use crate::{
    config::ScoringConfig,
    extract::TextBlock,
    matcher::CandidateMatch,
    similarity::SimilarityScorer,
    title::extract_section_title,
};

/// Find sections of one document by similarity to the task alone.
///
/// Only blocks of at least `fallback_min_chars` characters with a usable
/// title are scored, and only scores strictly above `fallback_gate` are kept.
/// With no curated anchor, a candidate's match score is its similarity and its
/// title is the block's own.
pub fn search_document(
    blocks: &[TextBlock],
    task: &str,
    scorer: &mut dyn SimilarityScorer,
    config: &ScoringConfig,
) -> Vec<CandidateMatch> {
    blocks
        .iter()
        .filter_map(|block| {
            let text = block.raw_text.trim();
            if text.chars().count() < config.fallback_min_chars {
                return None;
            }
            let title = extract_section_title(text)?;

            let semantic_score = scorer.score(text, task);
            (semantic_score > config.fallback_gate).then(|| CandidateMatch {
                document: block.document.clone(),
                page_number: block.page_number,
                section_title: title,
                refined_text: text.to_string(),
                match_score: semantic_score,
                semantic_score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::KeywordOverlap;

    fn block(page: u32, text: &str) -> TextBlock {
        TextBlock {
            document: "Lunch Ideas.pdf".to_string(),
            page_number: page,
            raw_text: text.to_string(),
        }
    }

    struct Constant(f32);

    impl SimilarityScorer for Constant {
        fn score(&mut self, _text: &str, _task: &str) -> f32 {
            self.0
        }

        fn name(&self) -> &'static str {
            "constant"
        }
    }

    const LONG_TEXT: &str =
        "Veggie Sushi Rolls\nRoll seasoned rice with cucumber and avocado.";

    #[test]
    fn keeps_block_title_and_score() {
        let mut scorer = Constant(0.6);
        let found = search_document(
            &[block(11, LONG_TEXT)],
            "vegetarian lunch",
            &mut scorer,
            &ScoringConfig::default(),
        );

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].section_title, "Veggie Sushi Rolls");
        assert_eq!(found[0].match_score, 0.6);
        assert_eq!(found[0].semantic_score, 0.6);
        assert_eq!(found[0].page_number, 11);
        assert_eq!(found[0].refined_text, LONG_TEXT);
    }

    #[test]
    fn blocks_under_fifty_chars_are_ignored() {
        let text = "Veggie Sushi Rolls\nRice, nori and cucumber!!!!!!";
        assert!(text.chars().count() < 50);
        let mut scorer = Constant(1.0);
        let found = search_document(
            &[block(1, text)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn gate_is_strict() {
        let mut at_gate = Constant(0.2);
        assert!(
            search_document(
                &[block(1, LONG_TEXT)],
                "task",
                &mut at_gate,
                &ScoringConfig::default()
            )
            .is_empty()
        );

        let mut above_gate = Constant(0.21);
        assert_eq!(
            search_document(
                &[block(1, LONG_TEXT)],
                "task",
                &mut above_gate,
                &ScoringConfig::default()
            )
            .len(),
            1
        );
    }

    #[test]
    fn untitled_blocks_are_skipped() {
        let text = "Instructions:\no rinse the rice\no cut the vegetables\no roll";
        assert!(text.chars().count() >= 50);
        let mut scorer = Constant(1.0);
        let found = search_document(
            &[block(1, text)],
            "task",
            &mut scorer,
            &ScoringConfig::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn keyword_scorer_selects_relevant_blocks() {
        let relevant = "Vegetarian Chili\nA hearty vegetarian dish for a crowd at dinner.";
        let unrelated = "Beef Brisket\nSlow smoked for twelve hours over oak wood chips.";
        let mut scorer = KeywordOverlap;
        let found = search_document(
            &[block(1, relevant), block(2, unrelated)],
            "vegetarian dinner",
            &mut scorer,
            &ScoringConfig::default(),
        );

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].section_title, "Vegetarian Chili");
        assert_eq!(found[0].match_score, 1.0);
    }
}
