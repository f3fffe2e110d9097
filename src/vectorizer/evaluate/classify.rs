use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::ConfigError,
    utils::stats::RowStats,
    vectorizer::matrix::{SimilarityMatrix, SimilarityRow},
};

/// Link selection policy, applied to each high-level row independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// 0: every candidate with a score strictly above 0
    Existence,
    /// 1: every candidate scoring at least `Thresholds::fixed`
    FixedThreshold,
    /// 2: every candidate scoring at least `Thresholds::relative` × row max
    RelativeThreshold,
    /// 3: every candidate scoring at least
    /// `adaptive_mean`×mean + `adaptive_max`×max + `adaptive_std`×sample std.
    /// Rows with a single candidate fall back to `FixedThreshold`.
    Adaptive,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Existence,
        Strategy::FixedThreshold,
        Strategy::RelativeThreshold,
        Strategy::Adaptive,
    ];

    /// Numeric selector of the strategy
    pub fn id(self) -> u8 {
        match self {
            Strategy::Existence => 0,
            Strategy::FixedThreshold => 1,
            Strategy::RelativeThreshold => 2,
            Strategy::Adaptive => 3,
        }
    }

    /// Score cutoff for one row, `None` for an empty row.
    /// A pair scoring 0 is never linked, so row-derived cutoffs of an all-zero
    /// row degrade to `Above(0.0)`.
    pub fn cutoff(self, row: &SimilarityRow<'_>, thresholds: &Thresholds) -> Option<Cutoff> {
        let stats = RowStats::from_slice(row.scores)?;
        let cutoff = match self {
            Strategy::RelativeThreshold | Strategy::Adaptive if stats.max <= 0.0 => Cutoff::Above(0.0),
            Strategy::Existence => Cutoff::Above(0.0),
            Strategy::FixedThreshold => Cutoff::AtLeast(thresholds.fixed),
            Strategy::RelativeThreshold => Cutoff::AtLeast(thresholds.relative * stats.max),
            Strategy::Adaptive => match stats.sample_std {
                Some(std) => Cutoff::AtLeast(
                    thresholds.adaptive_mean * stats.mean
                        + thresholds.adaptive_max * stats.max
                        + thresholds.adaptive_std * std,
                ),
                None => {
                    warn!(high = row.high, "single candidate row, falling back to fixed threshold");
                    Cutoff::AtLeast(thresholds.fixed)
                }
            },
        };
        Some(cutoff)
    }

    /// Low-level ids of `row` selected by this strategy, in row order
    pub fn select<'a>(self, row: &SimilarityRow<'a>, thresholds: &Thresholds) -> Vec<&'a str> {
        match self.cutoff(row, thresholds) {
            Some(cutoff) => row
                .iter()
                .filter(|&(_, score)| cutoff.admits(score))
                .map(|(low, _)| low)
                .collect(),
            None => Vec::new(),
        }
    }
}

impl TryFrom<i64> for Strategy {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Strategy::Existence),
            1 => Ok(Strategy::FixedThreshold),
            2 => Ok(Strategy::RelativeThreshold),
            3 => Ok(Strategy::Adaptive),
            other => Err(ConfigError::InvalidStrategy(other)),
        }
    }
}

impl From<Strategy> for i64 {
    fn from(strategy: Strategy) -> Self {
        strategy.id() as i64
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Existence => "existence",
            Strategy::FixedThreshold => "fixed-threshold",
            Strategy::RelativeThreshold => "relative-threshold",
            Strategy::Adaptive => "adaptive",
        };
        write!(f, "{} ({})", self.id(), name)
    }
}

/// Score bound a candidate has to meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    Above(f64),
    AtLeast(f64),
}

impl Cutoff {
    #[inline]
    pub fn admits(self, score: f64) -> bool {
        match self {
            Cutoff::Above(bound) => score > bound,
            Cutoff::AtLeast(bound) => score >= bound,
        }
    }
}

/// Constants of the threshold strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub fixed: f64,
    pub relative: f64,
    pub adaptive_mean: f64,
    pub adaptive_max: f64,
    pub adaptive_std: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fixed: 0.25,
            relative: 0.67,
            adaptive_mean: 1.1,
            adaptive_max: 0.2,
            adaptive_std: 1.9,
        }
    }
}

/// Recovered links: high-level id → linked low-level ids.
/// Every row of the classified matrix has an entry, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSet {
    links: IndexMap<Box<str>, Vec<Box<str>>>,
}

/// Output record of one high-level requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    /// comma separated low-level ids
    pub links: String,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `strategy` to every row of `matrix`
    pub fn classify(matrix: &SimilarityMatrix, strategy: Strategy, thresholds: &Thresholds) -> Self {
        let links = matrix
            .iter_rows()
            .map(|row| {
                let selected: Vec<Box<str>> = strategy
                    .select(&row, thresholds)
                    .into_iter()
                    .map(Box::<str>::from)
                    .collect();
                (Box::<str>::from(row.high), selected)
            })
            .collect();
        Self { links }
    }

    /// Build a link set from explicit pairs, keeping first-seen order
    pub fn from_pairs<I, H, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (H, L)>,
        H: AsRef<str>,
        L: AsRef<str>,
    {
        let mut set = Self::new();
        for (high, low) in pairs {
            set.insert(high.as_ref(), low.as_ref());
        }
        set
    }

    /// Add one link, ignored when already present
    pub fn insert(&mut self, high: &str, low: &str) {
        let lows = self.links.entry(high.into()).or_default();
        if !lows.iter().any(|l| l.as_ref() == low) {
            lows.push(low.into());
        }
    }

    pub fn get(&self, high: &str) -> Option<&[Box<str>]> {
        self.links.get(high).map(|v| v.as_slice())
    }

    pub fn contains(&self, high: &str, low: &str) -> bool {
        self.links
            .get(high)
            .is_some_and(|lows| lows.iter().any(|l| l.as_ref() == low))
    }

    /// Number of high-level entries
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Total number of (high, low) links
    pub fn link_count(&self) -> usize {
        self.links.values().map(|v| v.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Box<str>])> {
        self.links.iter().map(|(k, v)| (k.as_ref(), v.as_slice()))
    }

    /// Every (high, low) link in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(high, lows)| lows.iter().map(move |low| (high, low.as_ref())))
    }

    pub fn records(&self) -> Vec<LinkRecord> {
        self.iter()
            .map(|(high, lows)| LinkRecord {
                id: high.to_string(),
                links: lows.join(","),
            })
            .collect()
    }
}
