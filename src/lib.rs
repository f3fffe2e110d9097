//! This crate recovers traceability links between two sets of requirements
//! (high-level and low-level) using TF-IDF vectors and cosine similarity.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod utils;
pub mod vectorizer;

/// Trace Linker
/// The top-level entry point of this crate.
/// It validates a `TraceConfig` once and then runs the whole recovery for a
/// pair of collections:
/// - builds the shared vocabulary
/// - encodes both collections into TF-IDF vectors
/// - computes the dense cosine similarity matrix
/// - classifies the matrix into a link set with the configured strategy
///
/// `TraceLinker<E>` is generic over the weighting engine `E`
/// (`DefaultTFIDFEngine` by default).
/// A run can optionally be scored against a `GroundTruth`.
pub use pipeline::{TraceLinker, TraceRun};

/// Run configuration
/// Strategy selector, IDF scope, parallelism and strategy thresholds.
/// Can be loaded from TOML.
pub use config::TraceConfig;

/// Error types
/// `ConfigError` is raised before any computation, `TraceError` covers
/// invalid input collections and I/O of the command line tool.
pub use error::{ConfigError, TraceError};

/// Requirement collections
/// `Collection` holds the normalized tokens of one side, keyed by identifier.
/// Identifiers are checked for uniqueness and well-formedness on insertion.
pub use vectorizer::{Collection, Requirement, Side};

/// TF-IDF Vectorizer
/// Builds the vocabulary of a run and turns collections into
/// `DocumentVectors` aligned with it.
pub use vectorizer::{DocumentVectors, TFIDFVector, TFIDFVectorizer};

/// Vocabulary
/// Deduplicated, lexically ordered terms of both collections.
pub use vectorizer::vocab::Vocabulary;

/// Token Frequency structure
/// Raw token counts of one requirement.
pub use vectorizer::token::TokenFrequency;

/// Corpus
/// Document count and per-term document frequency of one weighting scope.
/// `IdfScope` selects whether each side is weighted with its own statistics
/// (the default) or with statistics over both sides.
pub use vectorizer::corpus::{Corpus, IdfScope};

/// TF IDF Calculation Engine Trait
/// By implementing this trait, a different weighting scheme can be plugged
/// into `TFIDFVectorizer<E>` and `TraceLinker<E>`.
/// `DefaultTFIDFEngine` weights a term with raw count × log2(N / df).
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Vector comparison
/// Cosine similarity kernel; similarity against a zero vector is 0.
pub use vectorizer::compare::{Compare, DefaultCompare};

/// Similarity Matrix
/// Cosine similarity of every (high, low) pair.
pub use vectorizer::matrix::{SimilarityMatrix, SimilarityRow};

/// Link classification
/// `Strategy` selects one of the four threshold policies,
/// `LinkSet` holds the recovered links.
pub use vectorizer::evaluate::classify::{Cutoff, LinkRecord, LinkSet, Strategy, Thresholds};

/// Evaluation
/// Precision, recall and F-measure of a link set against a ground truth.
pub use vectorizer::evaluate::metrics::{Confusion, Evaluation, GroundTruth, LinkPair};
