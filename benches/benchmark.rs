use criterion::{criterion_group, criterion_main, Criterion};
use tracelink_vectorizer::{
    Collection, IdfScope, LinkSet, Side, SimilarityMatrix, Strategy, TFIDFVectorizer, Thresholds,
};

/// Deterministic synthetic requirements over a small vocabulary
fn synthetic_collection(side: Side, prefix: &str, docs: usize, seed: u32) -> Collection {
    // tiny deterministic PRNG (xorshift32)
    let mut state = seed;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    let reqs: Vec<(String, Vec<String>)> = (0..docs)
        .map(|i| {
            let len = 5 + (next() % 20) as usize;
            let tokens = (0..len).map(|_| format!("term{}", next() % 2_000)).collect();
            (format!("{prefix}{i}"), tokens)
        })
        .collect();
    Collection::from_requirements(side, reqs).expect("synthetic ids are unique")
}

fn trace_link_benchmark(c: &mut Criterion) {
    let high = synthetic_collection(Side::High, "H", 300, 0x1234_5678);
    let low = synthetic_collection(Side::Low, "L", 1_500, 0x9E37_79B9);

    c.bench_function("encode", |b| {
        b.iter(|| {
            let vectorizer: TFIDFVectorizer = TFIDFVectorizer::new(&high, &low, IdfScope::Collection);
            (vectorizer.encode(&high), vectorizer.encode(&low))
        });
    });

    let vectorizer: TFIDFVectorizer = TFIDFVectorizer::new(&high, &low, IdfScope::Collection);
    let high_vectors = vectorizer.encode(&high);
    let low_vectors = vectorizer.encode(&low);

    c.bench_function("similarity_matrix_sequential", |b| {
        b.iter(|| SimilarityMatrix::compute(&high_vectors, &low_vectors, false));
    });
    c.bench_function("similarity_matrix_parallel", |b| {
        b.iter(|| SimilarityMatrix::compute(&high_vectors, &low_vectors, true));
    });

    let matrix = SimilarityMatrix::compute(&high_vectors, &low_vectors, true);
    c.bench_function("classify_adaptive", |b| {
        b.iter(|| LinkSet::classify(&matrix, Strategy::Adaptive, &Thresholds::default()));
    });
}

criterion_group!(benches, trace_link_benchmark);
criterion_main!(benches);
