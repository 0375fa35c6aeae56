use crate::core::features::stats::Histogram;
use crate::core::models::record::ParsedHeader;
use crate::core::models::result::Category;

/// Catalytic and enzymatic terms searched for in KEYWDS and TITLE text.
pub const DEFAULT_VOCABULARY: [&str; 10] = [
    "ENZYME",
    "OXIDOREDUCTASE",
    "TRANSFERASE",
    "HYDROLASE",
    "LYASE",
    "ISOMERASE",
    "LIGASE",
    "CATALYTIC",
    "REDOX",
    "OXIDATION",
];
pub const DEFAULT_DOMINANT_TERM: &str = "ENZYME";
pub const DEFAULT_CARBON_RATIO_THRESHOLD: f64 = 0.3;
pub const CARBON_TYPE_CODE: &str = "C";

// Empirical constants without a stated derivation.
pub const MIN_TERMS_FOR_POSITIVE: usize = 2;
pub const BASE_CONFIDENCE: f64 = 40.0;
pub const CONFIDENCE_PER_TERM: f64 = 15.0;
pub const MAX_KEYWORD_CONFIDENCE: f64 = 95.0;
pub const NO_MATCH_CONFIDENCE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordConfig {
    pub vocabulary: Vec<String>,
    pub dominant_term: String,
    pub carbon_ratio_threshold: f64,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            dominant_term: DEFAULT_DOMINANT_TERM.to_string(),
            carbon_ratio_threshold: DEFAULT_CARBON_RATIO_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordVerdict {
    pub category: Category,
    pub confidence: f64,
    /// Vocabulary terms found, in vocabulary order.
    pub matched_terms: Vec<String>,
    pub carbon_ratio: f64,
}

/// Scores header text against a controlled vocabulary. Total: every input
/// produces a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordHeuristic {
    vocabulary: Vec<String>,
    dominant_term: String,
    carbon_ratio_threshold: f64,
}

impl Default for KeywordHeuristic {
    fn default() -> Self {
        Self::new(KeywordConfig::default())
    }
}

impl KeywordHeuristic {
    pub fn new(config: KeywordConfig) -> Self {
        let mut vocabulary: Vec<String> = Vec::with_capacity(config.vocabulary.len());
        for term in config.vocabulary {
            let term = term.trim().to_uppercase();
            if !term.is_empty() && !vocabulary.contains(&term) {
                vocabulary.push(term);
            }
        }
        Self {
            vocabulary,
            dominant_term: config.dominant_term.trim().to_uppercase(),
            carbon_ratio_threshold: config.carbon_ratio_threshold,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn evaluate(&self, header: &ParsedHeader, atom_types: &Histogram) -> KeywordVerdict {
        self.evaluate_text(&header.keyword_text(), atom_types.fraction(CARBON_TYPE_CODE))
    }

    /// Scores `text`, which must already be uppercased with Unicode rules,
    /// as [`ParsedHeader::keyword_text`] does.
    pub fn evaluate_text(&self, text: &str, carbon_ratio: f64) -> KeywordVerdict {
        let matched_terms: Vec<String> = self
            .vocabulary
            .iter()
            .filter(|term| text.contains(term.as_str()))
            .cloned()
            .collect();
        let count = matched_terms.len();

        let dominant = !self.dominant_term.is_empty() && text.contains(&self.dominant_term);
        let positive = count >= MIN_TERMS_FOR_POSITIVE
            || (count >= 1 && dominant && carbon_ratio > self.carbon_ratio_threshold);

        KeywordVerdict {
            category: if positive {
                Category::Murzyme
            } else {
                Category::NonMurzyme
            },
            confidence: keyword_confidence(count),
            matched_terms,
            carbon_ratio,
        }
    }
}

/// Confidence for `matched` vocabulary terms: 15 points per term on a base
/// of 40, capped at 95. Rises with every match, except that a single match
/// (55) scores below the no-match floor of 60; the empirical values are
/// kept as they are.
pub fn keyword_confidence(matched: usize) -> f64 {
    if matched == 0 {
        NO_MATCH_CONFIDENCE
    } else {
        (matched as f64 * CONFIDENCE_PER_TERM + BASE_CONFIDENCE).min(MAX_KEYWORD_CONFIDENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(title: &str, keywords: &str) -> ParsedHeader {
        ParsedHeader {
            title: title.into(),
            keywords: keywords.into(),
            ..Default::default()
        }
    }

    fn carbon_heavy() -> Histogram {
        ["C", "C", "N", "C"].into_iter().collect()
    }

    #[test]
    fn two_terms_are_positive() {
        let verdict = KeywordHeuristic::default().evaluate(
            &header("Catalytic domain of an oxidoreductase", ""),
            &Histogram::new(),
        );
        assert_eq!(verdict.category, Category::Murzyme);
        assert_eq!(verdict.confidence, 70.0);
        assert_eq!(verdict.matched_terms, vec!["OXIDOREDUCTASE", "CATALYTIC"]);
    }

    #[test]
    fn dominant_term_needs_carbon_rich_composition() {
        let heuristic = KeywordHeuristic::default();
        let text = header("", "enzyme");

        let rich = heuristic.evaluate(&text, &carbon_heavy());
        assert_eq!(rich.category, Category::Murzyme);
        assert_eq!(rich.confidence, 55.0);
        assert_eq!(rich.carbon_ratio, 0.75);

        let poor: Histogram = ["N", "O", "C", "S"].into_iter().collect();
        let verdict = heuristic.evaluate(&text, &poor);
        assert_eq!(verdict.category, Category::NonMurzyme);
    }

    #[test]
    fn single_non_dominant_term_is_negative() {
        let verdict =
            KeywordHeuristic::default().evaluate(&header("", "HYDROLASE"), &carbon_heavy());
        assert_eq!(verdict.category, Category::NonMurzyme);
        assert_eq!(verdict.confidence, 55.0);
    }

    #[test]
    fn no_terms_fall_back_to_floor_confidence() {
        let verdict = KeywordHeuristic::default().evaluate(&ParsedHeader::default(), &Histogram::new());
        assert_eq!(verdict.category, Category::NonMurzyme);
        assert_eq!(verdict.confidence, NO_MATCH_CONFIDENCE);
        assert!(verdict.matched_terms.is_empty());
        assert_eq!(verdict.carbon_ratio, 0.0);
    }

    #[test]
    fn confidence_grows_with_matches_and_is_capped() {
        assert_eq!(keyword_confidence(1), 55.0);
        assert_eq!(keyword_confidence(2), 70.0);
        assert_eq!(keyword_confidence(3), 85.0);
        assert_eq!(keyword_confidence(4), 95.0);
        assert_eq!(keyword_confidence(10), 95.0);
    }

    #[test]
    fn terms_match_as_substrings() {
        // "OXIDOREDUCTASE" inside a longer word and "LYASE" inside "CATALYASE".
        let verdict = KeywordHeuristic::default().evaluate_text("NADPH-OXIDOREDUCTASES CATALYASE", 0.0);
        assert_eq!(verdict.matched_terms, vec!["OXIDOREDUCTASE", "LYASE"]);
    }

    #[test]
    fn non_ascii_terms_match_header_text() {
        let heuristic = KeywordHeuristic::new(KeywordConfig {
            vocabulary: vec!["hémoprotéine".into(), "catalytique".into()],
            dominant_term: "hémoprotéine".into(),
            carbon_ratio_threshold: 0.3,
        });
        let verdict = heuristic.evaluate(&header("Une hémoprotéine catalytique", ""), &Histogram::new());
        assert_eq!(verdict.matched_terms, vec!["HÉMOPROTÉINE", "CATALYTIQUE"]);
        assert_eq!(verdict.category, Category::Murzyme);
    }

    #[test]
    fn custom_vocabulary_is_normalized() {
        let heuristic = KeywordHeuristic::new(KeywordConfig {
            vocabulary: vec!["peroxidase".into(), " PEROXIDASE ".into(), "".into()],
            dominant_term: "peroxidase".into(),
            carbon_ratio_threshold: 0.5,
        });
        assert_eq!(heuristic.vocabulary(), &["PEROXIDASE"]);
        let verdict = heuristic.evaluate(&header("Heme peroxidase", ""), &carbon_heavy());
        assert_eq!(verdict.category, Category::Murzyme);
    }
}
