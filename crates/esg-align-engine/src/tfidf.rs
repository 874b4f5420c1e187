//! TF-IDF vectoriser with a vocabulary built fresh for every fit.
//!
//! Weighting follows the conventional defaults:
//!
//! - text lowercased, tokens are runs of two or more word characters, where
//!   subscript and superscript digits (`CO₂`, `m³`) count as word characters
//! - English stop words dropped before n-grams are assembled
//! - raw counts as term frequency
//! - smoothed idf: `ln((1 + n) / (1 + df)) + 1`
//! - every row L2-normalised
//!
//! Vocabulary indices are assigned in sorted term order, so a fit over the
//! same texts always yields identical vectors.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::stop_words::is_stop_word;

// Maximal runs, so no `\b` anchors: `\b` is defined on `\w` alone and
// would reject a token ending in `₂`.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w\p{No}]{2,}").expect("token pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TfidfError {
    #[error("empty vocabulary; texts contain only stop words or no tokens")]
    EmptyVocabulary,
}

/// Sparse row vector: `(term index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Result of a fit: one row per input text plus the learned vocabulary.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    rows: Vec<SparseVector>,
    vocabulary: Vec<String>,
}

impl TfidfMatrix {
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Split rows at `mid`: the first `mid` rows and the rest.
    pub fn split_at(&self, mid: usize) -> (&[SparseVector], &[SparseVector]) {
        self.rows.split_at(mid.min(self.rows.len()))
    }
}

/// Vectoriser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TfidfVectorizer {
    /// Smallest and largest n-gram length, inclusive.
    pub ngram_range: (usize, usize),
    pub remove_stop_words: bool,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            remove_stop_words: true,
        }
    }
}

impl TfidfVectorizer {
    /// Terms of one text: filtered unigrams, then n-grams up to the range maximum.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !(self.remove_stop_words && is_stop_word(t)))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let min_n = min_n.max(1);
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Learn the vocabulary and idf weights from `texts` and return their vectors.
    pub fn fit_transform<S: AsRef<str>>(&self, texts: &[S]) -> Result<TfidfMatrix, TfidfError> {
        let analyzed: Vec<Vec<String>> = texts.iter().map(|t| self.analyze(t.as_ref())).collect();

        // term → document frequency
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &analyzed {
            let mut seen: Vec<&str> = terms.iter().map(|t| t.as_str()).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        if df.is_empty() {
            return Err(TfidfError::EmptyVocabulary);
        }

        let n = texts.len() as f64;
        let index: BTreeMap<&str, usize> = df.keys().enumerate().map(|(i, &t)| (t, i)).collect();
        let idf: Vec<f64> = df
            .values()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows = analyzed
            .iter()
            .map(|terms| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for term in terms {
                    *counts.entry(index[term.as_str()]).or_insert(0.0) += 1.0;
                }
                let mut entries: Vec<(usize, f64)> =
                    counts.into_iter().map(|(i, tf)| (i, tf * idf[i])).collect();
                let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut entries {
                        *w /= norm;
                    }
                }
                SparseVector { entries }
            })
            .collect();

        let vocabulary = index.into_keys().map(str::to_string).collect();
        Ok(TfidfMatrix { rows, vocabulary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_drops_stop_words_and_short_tokens() {
        let v = TfidfVectorizer::default();
        let terms = v.analyze("Describe the board's oversight of climate risk");
        assert_eq!(
            terms,
            vec![
                "board",
                "oversight",
                "climate",
                "risk",
                "board oversight",
                "oversight climate",
                "climate risk",
            ]
        );
    }

    #[test]
    fn analyze_lowercases() {
        let v = TfidfVectorizer {
            ngram_range: (1, 1),
            remove_stop_words: true,
        };
        assert_eq!(v.analyze("GHG Emissions"), vec!["ghg", "emissions"]);
    }

    #[test]
    fn analyze_keeps_stop_words_when_disabled() {
        let v = TfidfVectorizer {
            ngram_range: (1, 1),
            remove_stop_words: false,
        };
        assert_eq!(v.analyze("the board"), vec!["the", "board"]);
    }

    #[test]
    fn analyze_keeps_subscript_and_superscript_digits() {
        let v = TfidfVectorizer::default();
        let terms = v.analyze("tCO₂e CO₂ emissions m²");
        assert_eq!(
            terms,
            vec![
                "tco₂e",
                "co₂",
                "emissions",
                "m²",
                "tco₂e co₂",
                "co₂ emissions",
                "emissions m²",
            ]
        );
    }

    #[test]
    fn analyze_splits_on_punctuation_and_drops_single_chars() {
        let v = TfidfVectorizer {
            ngram_range: (1, 1),
            remove_stop_words: false,
        };
        assert_eq!(v.analyze("scope-3 a/b board's"), vec!["scope", "board"]);
    }

    #[test]
    fn single_token_text_has_no_bigrams() {
        let v = TfidfVectorizer::default();
        assert_eq!(v.analyze("emissions"), vec!["emissions"]);
    }

    #[test]
    fn vocabulary_is_sorted_and_shared() {
        let v = TfidfVectorizer::default();
        let m = v.fit_transform(&["carbon emissions", "emissions targets"]).unwrap();
        assert_eq!(
            m.vocabulary(),
            &[
                "carbon",
                "carbon emissions",
                "emissions",
                "emissions targets",
                "targets"
            ]
        );
        assert_eq!(m.rows().len(), 2);
    }

    #[test]
    fn rows_are_unit_length() {
        let v = TfidfVectorizer::default();
        let m = v
            .fit_transform(&["board oversight climate", "climate scenario analysis"])
            .unwrap();
        for row in m.rows() {
            assert!((row.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn smoothed_idf_weights_rare_terms_higher() {
        let v = TfidfVectorizer {
            ngram_range: (1, 1),
            remove_stop_words: true,
        };
        // "climate" appears in both texts, "board" only in the first.
        let m = v.fit_transform(&["climate board", "climate"]).unwrap();
        let row = &m.rows()[0];
        let board = m.vocabulary().iter().position(|t| t == "board").unwrap();
        let climate = m.vocabulary().iter().position(|t| t == "climate").unwrap();
        let weight = |i: usize| row.entries().iter().find(|e| e.0 == i).unwrap().1;
        assert!(weight(board) > weight(climate));

        // idf(board) = ln(3/2) + 1, idf(climate) = 1
        let ratio = weight(board) / weight(climate);
        assert!((ratio - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn stop_word_only_texts_fail() {
        let v = TfidfVectorizer::default();
        assert_eq!(
            v.fit_transform(&["the and of", "a"]).unwrap_err(),
            TfidfError::EmptyVocabulary
        );
    }

    #[test]
    fn text_without_tokens_gets_zero_row() {
        let v = TfidfVectorizer::default();
        let m = v.fit_transform(&["climate risk", "the"]).unwrap();
        assert!(m.rows()[1].is_zero());
        assert_eq!(m.rows()[1].norm(), 0.0);
    }

    #[test]
    fn split_at_partitions_rows() {
        let v = TfidfVectorizer::default();
        let m = v.fit_transform(&["a1 b1", "c1 d1", "e1 f1"]).unwrap();
        let (left, right) = m.split_at(1);
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 2);
    }

    #[test]
    fn sparse_dot_merges_indices() {
        let a = SparseVector {
            entries: vec![(0, 1.0), (2, 2.0), (5, 1.0)],
        };
        let b = SparseVector {
            entries: vec![(2, 3.0), (4, 1.0), (5, 2.0)],
        };
        assert_eq!(a.dot(&b), 8.0);
    }
}
