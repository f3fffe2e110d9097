use indexmap::IndexSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Result, TraceError},
    vectorizer::{
        compare::{Compare, DefaultCompare},
        DocumentVectors, TFIDFVector,
    },
};

/// Dense cosine similarity of every (high, low) pair.
///
/// Rows follow the order of the high-level vectors, and each row holds one
/// score per low-level id in the order of `low_ids`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    high_ids: IndexSet<Box<str>>,
    low_ids: IndexSet<Box<str>>,
    scores: Vec<Vec<f64>>,
}

/// One high-level requirement's scores against every low-level requirement
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRow<'a> {
    pub high: &'a str,
    pub low_ids: &'a IndexSet<Box<str>>,
    pub scores: &'a [f64],
}

impl<'a> SimilarityRow<'a> {
    pub fn iter(self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.low_ids.iter().map(|id| id.as_ref()).zip(self.scores.iter().copied())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl SimilarityMatrix {
    /// Compute the matrix with the default cosine kernel
    pub fn compute(high: &DocumentVectors, low: &DocumentVectors, parallel: bool) -> Self {
        Self::compute_with::<DefaultCompare>(high, low, parallel)
    }

    /// Compute the matrix with kernel `C`.
    /// With `parallel` the rows are computed on the rayon pool; the vectors are
    /// only read, so rows do not share any mutable state.
    pub fn compute_with<C>(high: &DocumentVectors, low: &DocumentVectors, parallel: bool) -> Self
    where
        C: Compare<f64>,
    {
        let high_entries: Vec<(&str, &TFIDFVector)> = high.iter().collect();
        let low_entries: Vec<(&str, &TFIDFVector)> = low.iter().collect();

        let row = |h: &TFIDFVector| -> Vec<f64> {
            low_entries
                .iter()
                .map(|(_, l)| C::cosine_with_norms(&h.weights, h.norm, &l.weights, l.norm))
                .collect()
        };

        let scores: Vec<Vec<f64>> = if parallel {
            high_entries.par_iter().map(|&(_, h)| row(h)).collect()
        } else {
            high_entries.iter().map(|&(_, h)| row(h)).collect()
        };
        debug!(rows = high_entries.len(), cols = low_entries.len(), parallel, "similarity matrix computed");

        Self {
            high_ids: high_entries.iter().map(|(id, _)| Box::<str>::from(*id)).collect(),
            low_ids: low_entries.iter().map(|(id, _)| Box::<str>::from(*id)).collect(),
            scores,
        }
    }

    /// Build a matrix from precomputed scores, row by row.
    ///
    /// # Errors
    /// `DuplicateId` for a repeated high or low id, `RowLength` for a row
    /// whose length differs from the number of low ids.
    pub fn from_rows<H, L, S>(low_ids: L, rows: H) -> Result<Self>
    where
        H: IntoIterator<Item = (S, Vec<f64>)>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut low_index = IndexSet::new();
        for id in low_ids {
            let id: Box<str> = id.as_ref().into();
            if low_index.contains(&id) {
                return Err(TraceError::DuplicateId { collection: "low".to_string(), id: id.into() });
            }
            low_index.insert(id);
        }
        let mut high_index = IndexSet::new();
        let mut scores = Vec::new();
        for (id, row) in rows {
            let id = id.as_ref();
            if row.len() != low_index.len() {
                return Err(TraceError::RowLength {
                    id: id.to_string(),
                    expected: low_index.len(),
                    found: row.len(),
                });
            }
            if !high_index.insert(Box::<str>::from(id)) {
                return Err(TraceError::DuplicateId { collection: "high".to_string(), id: id.to_string() });
            }
            scores.push(row);
        }
        Ok(Self { high_ids: high_index, low_ids: low_index, scores })
    }

    /// Number of high-level rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.high_ids.len()
    }

    /// Number of low-level columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.low_ids.len()
    }

    /// Candidate pair count, |high| × |low|
    #[inline]
    pub fn total_pairs(&self) -> u64 {
        self.rows() as u64 * self.cols() as u64
    }

    pub fn high_ids(&self) -> impl Iterator<Item = &str> {
        self.high_ids.iter().map(|id| id.as_ref())
    }

    pub fn low_ids(&self) -> impl Iterator<Item = &str> {
        self.low_ids.iter().map(|id| id.as_ref())
    }

    pub fn row(&self, high: &str) -> Option<SimilarityRow<'_>> {
        let idx = self.high_ids.get_index_of(high)?;
        Some(self.row_at(idx))
    }

    fn row_at(&self, idx: usize) -> SimilarityRow<'_> {
        SimilarityRow {
            high: self.high_ids[idx].as_ref(),
            low_ids: &self.low_ids,
            scores: &self.scores[idx],
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = SimilarityRow<'_>> {
        (0..self.rows()).map(move |idx| self.row_at(idx))
    }

    /// Score of one pair
    pub fn get(&self, high: &str, low: &str) -> Option<f64> {
        let row = self.high_ids.get_index_of(high)?;
        let col = self.low_ids.get_index_of(low)?;
        self.scores[row].get(col).copied()
    }
}
