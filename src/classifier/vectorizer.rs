use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sparse feature row: `(term index, weight)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Term-frequency / inverse-document-frequency weighting over a fitted vocabulary.
///
/// Tokens are lowercase runs of two or more word characters. Document
/// frequencies are smoothed (`ln((1 + n) / (1 + df)) + 1`) and every row is
/// scaled to unit length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let mut terms = tokenize(doc.as_ref());
            terms.sort();
            terms.dedup();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (index, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }
        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    /// Weights for `document`; terms outside the vocabulary are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in row.iter_mut() {
                *weight /= norm;
            }
        }
        row
    }
}

/// Splits `text` into lowercase word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_short_tokens_and_punctuation() {
        assert_eq!(
            tokenize("Uber ride to office, 2x a day!"),
            vec!["uber", "ride", "to", "office", "2x", "day"]
        );
    }

    #[test]
    fn rows_are_unit_length() {
        let vectorizer = TfidfVectorizer::fit(&["paid electricity bill", "paid rent"]);
        let row = vectorizer.transform("Paid the electricity bill");
        let norm: f64 = row.iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-9);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let vectorizer = TfidfVectorizer::fit(&["paid electricity bill", "paid rent"]);
        let row = vectorizer.transform("paid electricity");
        let paid = row.iter().find(|(i, _)| vectorizer.vocabulary["paid"] == *i).unwrap().1;
        let electricity = row
            .iter()
            .find(|(i, _)| vectorizer.vocabulary["electricity"] == *i)
            .unwrap()
            .1;
        assert!(electricity > paid);
    }

    #[test]
    fn unknown_words_produce_empty_row() {
        let vectorizer = TfidfVectorizer::fit(&["pizza"]);
        assert!(vectorizer.transform("zebra crossing").is_empty());
    }
}
