//! Criterion benchmarks for Tridex.
//!
//! Covers trigram extraction, indexing throughput and query execution
//! over a collection of generated profiles.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use tridex::analysis::trigrams;
use tridex::prelude::*;

const FIRST_NAMES: [&str; 5] = ["Mike", "John", "David", "Rob", "Ed"];
const LAST_NAMES: [&str; 5] = ["Doe", "Timber", "Smith", "Gates", "Jobs"];

/// Generate profile documents for benchmarking.
fn generate_profiles(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            // Pseudo-random distribution
            let first = FIRST_NAMES[(i * 7) % FIRST_NAMES.len()];
            let last = LAST_NAMES[(i * 13 + i / 5) % LAST_NAMES.len()];
            Document::builder()
                .add_integer("user_id", i as i64)
                .add_text("name", format!("{first} {last}"))
                .add_integer("age", 18 + (i % 48) as i64)
                .build()
        })
        .collect()
}

fn profile_engine(docs: &[Document]) -> Engine {
    let mut engine = Engine::memory();
    engine
        .create_schema(
            "Profile",
            vec![
                ("user_id", Field::int()),
                ("name", Field::text()),
                ("age", Field::int().indexed(true)),
            ],
        )
        .unwrap();
    for (id, doc) in docs.iter().enumerate() {
        engine.add("Profile", doc.clone(), Some(id as DocId)).unwrap();
    }
    engine
}

/// Benchmark trigram extraction.
fn bench_trigrams(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigrams");
    let ascii = "the quick brown fox jumps over the lazy dog ".repeat(20);
    let unicode = "größere übung für café olé ".repeat(20);

    group.throughput(Throughput::Bytes(ascii.len() as u64));
    group.bench_function("ascii", |b| b.iter(|| black_box(trigrams(black_box(&ascii)))));

    group.throughput(Throughput::Bytes(unicode.len() as u64));
    group.bench_function("unicode", |b| {
        b.iter(|| black_box(trigrams(black_box(&unicode))))
    });

    group.finish();
}

/// Benchmark indexing throughput.
fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    group.sample_size(20);

    let docs = generate_profiles(1000);
    group.throughput(Throughput::Elements(docs.len() as u64));
    group.bench_function("add_1000_profiles", |b| {
        b.iter(|| black_box(profile_engine(black_box(&docs))))
    });

    let mut engine = profile_engine(&docs);
    group.bench_function("readd_existing_profile", |b| {
        b.iter(|| {
            engine
                .add("Profile", black_box(docs[1].clone()), Some(0))
                .unwrap()
        })
    });

    group.finish();
}

/// Benchmark query execution.
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let engine = profile_engine(&generate_profiles(1000));

    let queries = [
        ("term", Query::term("name", "ohn")),
        ("long_term", Query::term("name", "john timber")),
        ("scalar", Query::term("age", 30)),
        (
            "and",
            Query::and([Query::term("name", "ohn"), Query::term("name", "mbe")]),
        ),
        (
            "or",
            Query::or([Query::term("name", "ohn"), Query::term("name", "obs")]),
        ),
        (
            "xor_nested",
            Query::xor([
                Query::term("name", "ith"),
                Query::and([Query::term("age", 30), Query::term("name", "ed ")]),
                Query::term("name", "gat"),
            ]),
        ),
        (
            "and_short_circuit",
            Query::and([Query::term("name", "zzz"), Query::term("name", "ohn")]),
        ),
    ];

    for (name, query) in &queries {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(engine.search("Profile", black_box(query)).unwrap()))
        });
    }

    group.bench_function("search_documents", |b| {
        let query = Query::term("name", "smith");
        b.iter(|| {
            let hits = engine.search_documents("Profile", &query).unwrap();
            black_box(hits.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_trigrams, bench_indexing, bench_queries);
criterion_main!(benches);
