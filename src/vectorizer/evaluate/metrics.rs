use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{info, warn};

use crate::vectorizer::evaluate::classify::LinkSet;

/// Reference links curated by hand: high-level id → linked low-level ids.
/// Read-only input of the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruth {
    links: IndexMap<Box<str>, IndexSet<Box<str>>>,
}

impl GroundTruth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse (id, "L1,L2,...") cells.
    /// Pieces are trimmed and empty pieces dropped, so an empty cell means
    /// "no gold links" for that requirement.
    pub fn from_cells<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut truth = Self::new();
        for (high, cell) in cells {
            let entry = truth.links.entry(high.as_ref().into()).or_default();
            entry.extend(
                cell.as_ref()
                    .split(',')
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(Box::<str>::from),
            );
        }
        truth
    }

    pub fn get(&self, high: &str) -> Option<&IndexSet<Box<str>>> {
        self.links.get(high)
    }

    pub fn contains(&self, high: &str, low: &str) -> bool {
        self.links.get(high).is_some_and(|lows| lows.contains(low))
    }

    /// Number of high-level rows, empty rows included
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Total number of gold links
    pub fn link_count(&self) -> usize {
        self.links.values().map(|v| v.len()).sum()
    }

    pub fn high_ids(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(|k| k.as_ref())
    }

    /// Every gold (high, low) link in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links
            .iter()
            .flat_map(|(high, lows)| lows.iter().map(move |low| (high.as_ref(), low.as_ref())))
    }
}

/// Confusion counts over all candidate pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub true_positive: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    /// derived: total pairs minus the other three, floored at 0
    pub true_negative: u64,
}

/// A (high, low) pair reported by the evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPair {
    pub high: String,
    pub low: String,
}

/// Result of comparing recovered links with the ground truth.
/// Metrics whose denominator is zero are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub confusion: Confusion,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f_measure: Option<f64>,
    /// predicted but not in the ground truth
    pub misclassified: Vec<LinkPair>,
    /// in the ground truth but not predicted
    pub missed: Vec<LinkPair>,
}

#[inline]
fn ratio(num: u64, denom: u64) -> Option<f64> {
    (denom != 0).then(|| num as f64 / denom as f64)
}

impl Evaluation {
    /// Score `links` against `truth`.
    /// `total_pairs` is |high| × |low| of the run.
    pub fn evaluate(links: &LinkSet, truth: &GroundTruth, total_pairs: u64) -> Self {
        let mut confusion = Confusion::default();
        let mut misclassified = Vec::new();
        let mut missed = Vec::new();

        for (high, low) in links.pairs() {
            if truth.contains(high, low) {
                confusion.true_positive += 1;
            } else {
                confusion.false_positive += 1;
                info!(high, low, "misclassification");
                misclassified.push(LinkPair { high: high.to_string(), low: low.to_string() });
            }
        }
        for (high, low) in truth.pairs() {
            if !links.contains(high, low) {
                confusion.false_negative += 1;
                info!(high, low, "missed link");
                missed.push(LinkPair { high: high.to_string(), low: low.to_string() });
            }
        }

        let counted = confusion.true_positive + confusion.false_positive + confusion.false_negative;
        if counted > total_pairs {
            warn!(counted, total_pairs, "ground truth references pairs outside the candidate set");
        }
        confusion.true_negative = total_pairs.saturating_sub(counted);

        let precision = ratio(confusion.true_positive, confusion.true_positive + confusion.false_positive);
        let recall = ratio(confusion.true_positive, confusion.true_positive + confusion.false_negative);
        let f_measure = match (precision, recall) {
            (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
            _ => None,
        };
        if precision.is_none() {
            warn!("precision undefined: no links predicted");
        }
        if recall.is_none() {
            warn!("recall undefined: ground truth has no links");
        }

        Self {
            confusion,
            precision,
            recall,
            f_measure,
            misclassified,
            missed,
        }
    }
}

struct Metric(Option<f64>);

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.3}"),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.confusion;
        writeln!(
            f,
            "tp: {} fp: {} fn: {} tn: {}",
            c.true_positive, c.false_positive, c.false_negative, c.true_negative
        )?;
        write!(
            f,
            "precision: {} recall: {} f-measure: {}",
            Metric(self.precision),
            Metric(self.recall),
            Metric(self.f_measure)
        )
    }
}
