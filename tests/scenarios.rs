use tracelink_vectorizer::{
    Collection, Evaluation, GroundTruth, IdfScope, LinkSet, Side, Strategy, TraceConfig, TraceError,
    TraceLinker,
};

fn login_collections() -> (Collection, Collection) {
    let high = Collection::from_requirements(Side::High, [("H1", vec!["user", "login"])]).unwrap();
    let low = Collection::from_requirements(
        Side::Low,
        [("L1", vec!["user", "login"]), ("L2", vec!["system", "shutdown"])],
    )
    .unwrap();
    (high, low)
}

fn linker(strategy: Strategy, idf_scope: IdfScope) -> TraceLinker {
    TraceLinker::new(TraceConfig {
        strategy: strategy.id() as i64,
        idf_scope,
        ..TraceConfig::default()
    })
    .unwrap()
}

fn linked(links: &LinkSet, high: &str) -> Vec<String> {
    links.get(high).unwrap().iter().map(|s| s.to_string()).collect()
}

#[test]
fn login_scenario_with_shared_statistics() {
    let (high, low) = login_collections();
    for strategy in [Strategy::Existence, Strategy::FixedThreshold, Strategy::RelativeThreshold] {
        let run = linker(strategy, IdfScope::Corpus).run(&high, &low);

        assert_eq!(
            run.vocabulary.iter().collect::<Vec<_>>(),
            vec!["login", "shutdown", "system", "user"]
        );
        assert!((run.matrix.get("H1", "L1").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(run.matrix.get("H1", "L2"), Some(0.0));
        assert_eq!(linked(&run.links, "H1"), vec!["L1"], "strategy {strategy}");
    }
}

#[test]
fn login_scenario_with_collection_local_statistics() {
    // a one-requirement high side has df == N for all of its terms,
    // so its vector is all zero and nothing is linked
    let (high, low) = login_collections();
    let run = linker(Strategy::Existence, IdfScope::Collection).run(&high, &low);

    assert!(run.high_vectors.get("H1").unwrap().is_zero());
    assert_eq!(run.matrix.get("H1", "L1"), Some(0.0));
    assert!(run.links.get("H1").unwrap().is_empty());
}

#[test]
fn evaluator_scenario() {
    let links = LinkSet::from_pairs([("H1", "L1")]);
    let truth = GroundTruth::from_cells([("H1", "L1,L3")]);
    let eval = Evaluation::evaluate(&links, &truth, 2);

    assert_eq!(eval.confusion.true_positive, 1);
    assert_eq!(eval.confusion.false_negative, 1);
    assert_eq!(eval.confusion.false_positive, 0);
    assert_eq!(eval.confusion.true_negative, 0);
    assert_eq!(eval.precision, Some(1.0));
    assert_eq!(eval.recall, Some(0.5));
    assert!((eval.f_measure.unwrap() - 0.667).abs() < 1e-3);
}

#[test]
fn full_run_with_evaluation() {
    let high = Collection::from_requirements(
        Side::High,
        [
            ("H1", vec!["user", "login", "password"]),
            ("H2", vec!["report", "export", "pdf"]),
            ("H3", vec!["alarm", "sensor", "threshold"]),
        ],
    )
    .unwrap();
    let low = Collection::from_requirements(
        Side::Low,
        [
            ("L1", vec!["login", "form", "password", "hash"]),
            ("L2", vec!["pdf", "render", "export"]),
            ("L3", vec!["sensor", "poll", "alarm"]),
            ("L4", vec!["form", "render"]),
        ],
    )
    .unwrap();
    let truth = GroundTruth::from_cells([("H1", "L1"), ("H2", "L2"), ("H3", "L3")]);

    let linker = linker(Strategy::RelativeThreshold, IdfScope::Collection);
    let run = linker.run(&high, &low);
    let eval = linker.evaluate(&run, &truth);

    assert_eq!(run.total_pairs(), 12);
    assert_eq!(eval.confusion.true_positive, 3);
    assert_eq!(eval.confusion.false_positive, 0);
    assert_eq!(eval.confusion.true_negative, 9);
    assert_eq!(eval.f_measure, Some(1.0));
}

#[test]
fn adaptive_strategy_runs_on_single_candidate_rows() {
    let high = Collection::from_requirements(
        Side::High,
        [("H1", vec!["user", "login"]), ("H2", vec!["power"])],
    )
    .unwrap();
    let low = Collection::from_requirements(Side::Low, [("L1", vec!["user", "login"])]).unwrap();

    let run = linker(Strategy::Adaptive, IdfScope::Corpus).run(&high, &low);
    assert_eq!(linked(&run.links, "H1"), vec!["L1"]);
    assert!(run.links.get("H2").unwrap().is_empty());
}

#[test]
fn duplicate_identifiers_are_rejected_before_running() {
    let err = Collection::from_requirements(Side::High, [("H1", vec!["a"]), ("H1", vec!["b"])]).unwrap_err();
    assert!(matches!(err, TraceError::DuplicateId { .. }));
}
