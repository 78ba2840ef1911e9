//! Criterion benchmarks for quote location and segment rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pairwise_highlight::color::{color_for, ColorPolicy};
use pairwise_highlight::highlight::generate_highlights;
use pairwise_highlight::locate::locate_quote;
use pairwise_highlight::models::{OverlapPolicy, Quote};
use pairwise_highlight::render::render_segments;

/// Build an answer of roughly `words` words with distinct sentences.
fn make_answer(words: usize) -> String {
    (0..words)
        .map(|i| {
            if i % 12 == 11 {
                format!("word{}.", i)
            } else {
                format!("word{}", i)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn make_quotes(count: usize, words: usize) -> Vec<Quote> {
    let step = (words / count.max(1)).max(4);
    (0..count)
        .map(|i| {
            let w = (i * step) % words.saturating_sub(3).max(1);
            Quote::new(format!("\"word{} word{} word{}\"", w, w + 1, w + 2))
        })
        .collect()
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");

    for words in [200, 2000, 20000] {
        let answer = make_answer(words);
        let near = format!("\"word{} word{}\"", 5, 6);
        let far = format!("\"word{} word{}\"", words - 2, words - 1);

        group.bench_with_input(BenchmarkId::new("near", words), &words, |b, _| {
            b.iter(|| locate_quote(black_box(&answer), black_box(&near)))
        });

        group.bench_with_input(BenchmarkId::new("far", words), &words, |b, _| {
            b.iter(|| locate_quote(black_box(&answer), black_box(&far)))
        });

        group.bench_with_input(BenchmarkId::new("missing", words), &words, |b, _| {
            b.iter(|| locate_quote(black_box(&answer), black_box("\"not present\"")))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for quotes in [5, 50, 500] {
        let words = 5000;
        let answer = make_answer(words);
        let highlights = generate_highlights(
            &make_quotes(quotes, words),
            &answer,
            "Accuracy",
            ColorPolicy::Keyed,
        );

        group.bench_with_input(BenchmarkId::new("passthrough", quotes), &quotes, |b, _| {
            b.iter(|| {
                render_segments(
                    black_box(&answer),
                    black_box(&highlights),
                    OverlapPolicy::Passthrough,
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("clip", quotes), &quotes, |b, _| {
            b.iter(|| render_segments(black_box(&answer), black_box(&highlights), OverlapPolicy::Clip))
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let words = 5000;
    let answer = make_answer(words);
    let quotes = make_quotes(50, words);

    c.bench_function("generate_highlights_50", |b| {
        b.iter(|| generate_highlights(black_box(&quotes), black_box(&answer), "Clarity", ColorPolicy::ByIndex))
    });

    c.bench_function("color_for", |b| {
        b.iter(|| color_for(black_box("Relevance to the question")))
    });
}

criterion_group!(benches, bench_locate, bench_render, bench_generate);
criterion_main!(benches);
