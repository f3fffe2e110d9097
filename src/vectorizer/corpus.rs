use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, vectorizer::{token::TokenFrequency, vocab::Vocabulary, Collection}};

/// Which requirements document frequencies are counted over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfScope {
    /// Each side is weighted with statistics of its own collection only
    #[default]
    Collection,
    /// Both sides share statistics over the combined requirements
    Corpus,
}

impl fmt::Display for IdfScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdfScope::Collection => f.write_str("collection"),
            IdfScope::Corpus => f.write_str("corpus"),
        }
    }
}

impl FromStr for IdfScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collection" => Ok(IdfScope::Collection),
            "corpus" => Ok(IdfScope::Corpus),
            other => Err(ConfigError::ValidationFailed {
                field: "idf_scope".to_string(),
                message: format!("unknown scope {other:?}, expected collection or corpus"),
            }),
        }
    }
}

/// Document count and per-term document frequency for one scope.
/// `term_counts` is aligned with the vocabulary the corpus was built against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    pub doc_num: u64,
    /// documents containing each term at least once
    pub term_counts: Vec<u64>,
}

impl Corpus {
    pub fn new(vocab_size: usize) -> Self {
        Self {
            doc_num: 0,
            term_counts: vec![0; vocab_size],
        }
    }

    /// Count every requirement of `collection`
    pub fn from_collection(vocab: &Vocabulary, collection: &Collection) -> Self {
        let mut corpus = Self::new(vocab.len());
        for (_, freq) in collection.iter() {
            corpus.add_doc(vocab, freq);
        }
        corpus
    }

    /// Add one document. Each distinct token counts once.
    /// Tokens outside the vocabulary are ignored.
    pub fn add_doc(&mut self, vocab: &Vocabulary, doc: &TokenFrequency) {
        self.doc_num += 1;
        for (token, _) in doc.iter() {
            if let Some(idx) = vocab.index_of(token) {
                self.term_counts[idx] += 1;
            }
        }
    }

    /// Merge another corpus built against the same vocabulary into self
    pub fn merge_corpus(&mut self, other: &Corpus) {
        debug_assert_eq!(self.term_counts.len(), other.term_counts.len());
        self.doc_num += other.doc_num;
        for (count, other_count) in self.term_counts.iter_mut().zip(&other.term_counts) {
            *count += other_count;
        }
    }

    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Document frequency of the term at `idx`, 0 when out of range
    #[inline]
    pub fn get_term_count(&self, idx: usize) -> u64 {
        self.term_counts.get(idx).copied().unwrap_or(0)
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::Side;

    #[test]
    fn document_frequency_counts_documents_not_occurrences() {
        let low = Collection::from_requirements(
            Side::Low,
            [("L1", vec!["a", "a", "b"]), ("L2", vec!["a"]), ("L3", vec!["c"])],
        )
        .unwrap();
        let vocab = Vocabulary::from_tokens(["a", "b", "c", "d"]);
        let corpus = Corpus::from_collection(&vocab, &low);

        assert_eq!(corpus.get_doc_num(), 3);
        assert_eq!(corpus.term_counts, vec![2, 1, 1, 0]);
        assert_eq!(corpus.get_term_count(99), 0);
    }

    #[test]
    fn merge_adds_documents_and_counts() {
        let vocab = Vocabulary::from_tokens(["a", "b"]);
        let mut left = Corpus::new(vocab.len());
        left.add_doc(&vocab, &["a"].into_iter().collect());
        let mut right = Corpus::new(vocab.len());
        right.add_doc(&vocab, &["a", "b"].into_iter().collect());

        left.merge_corpus(&right);
        assert_eq!(left.get_doc_num(), 2);
        assert_eq!(left.term_counts, vec![2, 1]);
    }

    #[test]
    fn idf_scope_parses_case_insensitively() {
        assert_eq!("Corpus".parse::<IdfScope>().unwrap(), IdfScope::Corpus);
        assert_eq!(" collection ".parse::<IdfScope>().unwrap(), IdfScope::Collection);
        assert!("global".parse::<IdfScope>().is_err());
    }
}
