pub mod compare;
pub mod corpus;
pub mod evaluate;
pub mod matrix;
pub mod tfidf;
pub mod token;
pub mod vocab;

use std::{fmt, marker::PhantomData};

use indexmap::{map::Entry, IndexMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{Result, TraceError},
    vectorizer::{
        compare::{Compare, DefaultCompare},
        corpus::{Corpus, IdfScope},
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        token::TokenFrequency,
        vocab::Vocabulary,
    },
};

/// Which requirement set a collection holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    High,
    Low,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::High => f.write_str("high"),
            Side::Low => f.write_str("low"),
        }
    }
}

/// A requirement as handed over by the preprocessing step:
/// identifier plus normalized tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub tokens: Vec<String>,
}

/// Requirements of one side, keyed by identifier in input order.
///
/// Identifiers are validated on insertion: they must be non-blank, must not
/// contain `,` (the link list separator) and must be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    side: Side,
    documents: IndexMap<Box<str>, TokenFrequency>,
}

impl Collection {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            documents: IndexMap::new(),
        }
    }

    pub fn from_requirements<I, K, T, S>(side: Side, reqs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collection = Self::new(side);
        for (id, tokens) in reqs {
            collection.add_requirement(id.as_ref(), tokens)?;
        }
        Ok(collection)
    }

    /// Add a requirement
    ///
    /// # Errors
    /// `MalformedId` for a blank id or one containing `,`,
    /// `DuplicateId` when the id is already present.
    pub fn add_requirement<T, S>(&mut self, id: &str, tokens: T) -> Result<()>
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if id.trim().is_empty() || id.contains(',') {
            return Err(TraceError::MalformedId {
                collection: self.side.to_string(),
                id: id.to_string(),
            });
        }
        match self.documents.entry(id.into()) {
            Entry::Occupied(_) => Err(TraceError::DuplicateId {
                collection: self.side.to_string(),
                id: id.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(tokens.into_iter().collect());
                Ok(())
            }
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&TokenFrequency> {
        self.documents.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(|k| k.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenFrequency)> {
        self.documents.iter().map(|(k, v)| (k.as_ref(), v))
    }
}

impl TryFrom<(Side, Vec<Requirement>)> for Collection {
    type Error = TraceError;

    fn try_from((side, reqs): (Side, Vec<Requirement>)) -> Result<Self> {
        Self::from_requirements(side, reqs.into_iter().map(|r| (r.id, r.tokens)))
    }
}

/// Weighted vector of one requirement, aligned with the run's vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TFIDFVector {
    pub weights: Vec<f64>,
    /// euclidean norm of `weights`
    pub norm: f64,
}

impl TFIDFVector {
    pub fn new(weights: Vec<f64>) -> Self {
        let norm = <DefaultCompare as Compare<f64>>::norm(&weights);
        Self { weights, norm }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }
}

/// Document vectors of one collection, in collection order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVectors {
    pub side: Side,
    pub vectors: IndexMap<Box<str>, TFIDFVector>,
}

impl DocumentVectors {
    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&TFIDFVector> {
        self.vectors.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TFIDFVector)> {
        self.vectors.iter().map(|(k, v)| (k.as_ref(), v))
    }
}

/// TF-IDF Vectorizer
/// Owns the vocabulary of a run and encodes collections against it.
///
/// `E` is the weighting engine, `DefaultTFIDFEngine` by default.
/// With `IdfScope::Collection` every encoded collection is weighted with
/// document frequencies counted over that collection alone; with
/// `IdfScope::Corpus` both sides share frequencies counted over the union.
#[derive(Debug, Clone)]
pub struct TFIDFVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    pub vocab: Vocabulary,
    pub idf_scope: IdfScope,
    /// combined statistics, only built for `IdfScope::Corpus`
    corpus: Option<Corpus>,
    _marker: PhantomData<E>,
}

impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    /// Build the vocabulary of both collections
    pub fn new(high: &Collection, low: &Collection, idf_scope: IdfScope) -> Self {
        let vocab = Vocabulary::build(high, low);
        debug!(terms = vocab.len(), "vocabulary built");
        let corpus = match idf_scope {
            IdfScope::Collection => None,
            IdfScope::Corpus => {
                let mut corpus = Corpus::from_collection(&vocab, high);
                corpus.merge_corpus(&Corpus::from_collection(&vocab, low));
                Some(corpus)
            }
        };
        Self {
            vocab,
            idf_scope,
            corpus,
            _marker: PhantomData,
        }
    }

    /// Encode every requirement of `collection` into a TF-IDF vector
    pub fn encode(&self, collection: &Collection) -> DocumentVectors {
        let idf = match &self.corpus {
            Some(corpus) => E::idf_vec(corpus),
            None => {
                let local = Corpus::from_collection(&self.vocab, collection);
                debug!(
                    side = %collection.side(),
                    docs = local.get_doc_num(),
                    "document frequencies counted"
                );
                E::idf_vec(&local)
            }
        };

        let vectors = collection
            .iter()
            .map(|(id, freq)| {
                let tf = E::tf_vec(freq, &self.vocab);
                let vector = TFIDFVector::new(E::tfidf_vec(&tf, &idf));
                if vector.is_zero() {
                    warn!(side = %collection.side(), id, "requirement has a zero weight vector");
                }
                (Box::<str>::from(id), vector)
            })
            .collect();

        DocumentVectors {
            side: collection.side(),
            vectors,
        }
    }
}
