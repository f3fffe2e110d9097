use crate::vectorizer::{corpus::Corpus, token::TokenFrequency, vocab::Vocabulary};

/// TF-IDF weighting engine.
///
/// Splits weighting into a raw term-frequency vector, an IDF vector and their
/// combination, so a different scheme can be plugged into `TFIDFVectorizer<E>`.
pub trait TFIDFEngine {
    /// Build the IDF vector
    /// # Arguments
    /// * `corpus` - document frequencies of the weighting scope
    /// # Returns
    /// * `Vec<f64>` - one IDF value per vocabulary term
    fn idf_vec(corpus: &Corpus) -> Vec<f64>;

    /// Raw term counts of `freq` aligned to `vocab`
    fn tf_vec(freq: &TokenFrequency, vocab: &Vocabulary) -> Vec<f64> {
        let mut tf_vec = vec![0.0; vocab.len()];
        for (token, count) in freq.iter() {
            if let Some(idx) = vocab.index_of(token) {
                tf_vec[idx] = count as f64;
            }
        }
        tf_vec
    }

    /// Combine TF and IDF. A zero count always yields a zero weight.
    fn tfidf_vec(tf_vec: &[f64], idf_vec: &[f64]) -> Vec<f64> {
        debug_assert_eq!(tf_vec.len(), idf_vec.len());
        tf_vec
            .iter()
            .zip(idf_vec)
            .map(|(&tf, &idf)| if tf > 0.0 { tf * idf } else { 0.0 })
            .collect()
    }
}

/// Default engine
/// weight = raw count × log2(N / df)
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        DefaultTFIDFEngine
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus) -> Vec<f64> {
        let doc_num = corpus.get_doc_num() as f64;
        corpus
            .term_counts
            .iter()
            .map(|&doc_freq| {
                // df == 0 only for terms the scope never saw, whose tf is 0 anyway
                if doc_freq == 0 {
                    0.0
                } else {
                    (doc_num / doc_freq as f64).log2()
                }
            })
            .collect()
    }
}
