//! One batch run: tokens → vocabulary → vectors → similarity matrix → links.

use std::marker::PhantomData;

use tracing::{info, warn};

use crate::{
    config::TraceConfig,
    error::ConfigError,
    vectorizer::{
        evaluate::{
            classify::{LinkSet, Strategy},
            metrics::{Evaluation, GroundTruth},
        },
        matrix::SimilarityMatrix,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        vocab::Vocabulary,
        Collection, DocumentVectors, TFIDFVectorizer,
    },
};

/// Everything computed by one run. Nothing here is mutated afterwards.
#[derive(Debug, Clone)]
pub struct TraceRun {
    pub vocabulary: Vocabulary,
    pub high_vectors: DocumentVectors,
    pub low_vectors: DocumentVectors,
    pub matrix: SimilarityMatrix,
    pub links: LinkSet,
}

impl TraceRun {
    /// |high| × |low|
    #[inline]
    pub fn total_pairs(&self) -> u64 {
        self.matrix.total_pairs()
    }
}

/// Validated configuration plus the weighting engine `E`.
#[derive(Debug, Clone)]
pub struct TraceLinker<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    config: TraceConfig,
    strategy: Strategy,
    _marker: PhantomData<E>,
}

impl<E> TraceLinker<E>
where
    E: TFIDFEngine,
{
    /// Validate `config`. Nothing is computed when this fails.
    pub fn new(config: TraceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let strategy = config.strategy()?;
        Ok(Self {
            config,
            strategy,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Recover links from scratch for the two collections
    pub fn run(&self, high: &Collection, low: &Collection) -> TraceRun {
        info!(
            strategy = %self.strategy,
            idf_scope = %self.config.idf_scope,
            high = high.len(),
            low = low.len(),
            "trace link run started"
        );

        let vectorizer: TFIDFVectorizer<E> = TFIDFVectorizer::new(high, low, self.config.idf_scope);
        let high_vectors = vectorizer.encode(high);
        let low_vectors = vectorizer.encode(low);
        let matrix = SimilarityMatrix::compute(&high_vectors, &low_vectors, self.config.parallel);
        let links = LinkSet::classify(&matrix, self.strategy, &self.config.thresholds);

        info!(links = links.link_count(), "trace link run finished");
        TraceRun {
            vocabulary: vectorizer.vocab,
            high_vectors,
            low_vectors,
            matrix,
            links,
        }
    }

    /// Score a finished run against the ground truth
    pub fn evaluate(&self, run: &TraceRun, truth: &GroundTruth) -> Evaluation {
        for high in truth.high_ids() {
            if run.matrix.row(high).is_none() {
                warn!(high, "ground truth row for unknown high-level requirement");
            }
        }
        let evaluation = Evaluation::evaluate(&run.links, truth, run.total_pairs());
        info!(
            precision = ?evaluation.precision,
            recall = ?evaluation.recall,
            f_measure = ?evaluation.f_measure,
            "evaluation finished"
        );
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{corpus::IdfScope, Side};

    fn collections() -> (Collection, Collection) {
        let high = Collection::from_requirements(
            Side::High,
            [("H1", vec!["user", "login"]), ("H2", vec!["system", "shutdown", "power"])],
        )
        .unwrap();
        let low = Collection::from_requirements(
            Side::Low,
            [("L1", vec!["user", "login", "form"]), ("L2", vec!["system", "shutdown"]), ("L3", vec!["form"])],
        )
        .unwrap();
        (high, low)
    }

    #[test]
    fn invalid_strategy_fails_before_running() {
        let config = TraceConfig { strategy: 4, ..TraceConfig::default() };
        assert!(matches!(TraceLinker::<DefaultTFIDFEngine>::new(config), Err(ConfigError::InvalidStrategy(4))));
    }

    #[test]
    fn run_links_matching_requirements() {
        let (high, low) = collections();
        let linker: TraceLinker = TraceLinker::new(TraceConfig { strategy: 2, ..TraceConfig::default() }).unwrap();
        let run = linker.run(&high, &low);

        assert_eq!(run.total_pairs(), 6);
        assert_eq!(run.links.len(), 2);
        assert!(run.links.contains("H1", "L1"));
        assert!(run.links.contains("H2", "L2"));
        assert!(!run.links.contains("H1", "L2"));
    }

    #[test]
    fn evaluate_against_ground_truth() {
        let (high, low) = collections();
        let linker: TraceLinker = TraceLinker::new(TraceConfig { strategy: 0, ..TraceConfig::default() }).unwrap();
        let run = linker.run(&high, &low);
        let truth = GroundTruth::from_cells([("H1", "L1"), ("H2", "L2")]);
        let eval = linker.evaluate(&run, &truth);

        assert_eq!(eval.confusion.true_positive, 2);
        assert_eq!(eval.recall, Some(1.0));
    }

    #[test]
    fn empty_run_completes() {
        let linker: TraceLinker = TraceLinker::new(TraceConfig {
            idf_scope: IdfScope::Corpus,
            ..TraceConfig::default()
        })
        .unwrap();
        let run = linker.run(&Collection::new(Side::High), &Collection::new(Side::Low));
        assert!(run.vocabulary.is_empty());
        assert!(run.links.is_empty());
        assert_eq!(run.total_pairs(), 0);

        let eval = linker.evaluate(&run, &GroundTruth::new());
        assert_eq!(eval.precision, None);
        assert_eq!(eval.recall, None);
    }
}
