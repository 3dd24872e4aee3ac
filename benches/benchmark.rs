use criterion::{Criterion, criterion_group, criterion_main};
use msg2user::{CountVectorizer, InferencePipeline, TextNormalizer, UsernameClassifierParams};

const CORPUS: &[(&str, &str)] = &[
    ("hey what's up", "alice"),
    ("hey alice how are you", "alice"),
    ("lunch later maybe", "alice"),
    ("coffee sounds great", "alice"),
    ("meeting at noon", "bob"),
    ("the quarterly report is ready", "bob"),
    ("please review the budget", "bob"),
    ("server deploy tonight", "bob"),
];

fn fitted_pipeline() -> InferencePipeline {
    let normalizer = TextNormalizer::new();
    let documents: Vec<String> = CORPUS
        .iter()
        .map(|(text, _)| normalizer.normalize(text).unwrap())
        .collect();
    let labels: Vec<String> = CORPUS.iter().map(|(_, user)| user.to_string()).collect();

    let mut vectorizer = CountVectorizer::new();
    let features = vectorizer.fit(&documents).unwrap();
    let classifier = UsernameClassifierParams::new()
        .with_trees(25)
        .fit(&features, &labels)
        .unwrap()
        .with_vocabulary_fingerprint(vectorizer.fingerprint());

    InferencePipeline::from_parts(normalizer, vectorizer, classifier).unwrap()
}

fn bench_predict_single(c: &mut Criterion) {
    let pipeline = fitted_pipeline();

    c.bench_function("predict single message", |b| {
        b.iter(|| {
            let _ = pipeline.predict_one("hey, are we still meeting at noon?");
        })
    });
}

fn bench_bulk_prediction(c: &mut Criterion) {
    let pipeline = fitted_pipeline();
    let messages: Vec<String> = (0..1_000)
        .map(|i| format!("message number {i} about the budget meeting"))
        .collect();

    c.bench_function("bulk predict 1k messages", |b| {
        b.iter(|| {
            for message in &messages {
                let _ = pipeline.predict_one(message);
            }
        });
    });
}

criterion_group!(benches, bench_predict_single, bench_bulk_prediction);
criterion_main!(benches);
