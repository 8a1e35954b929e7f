//! Criterion benchmarks for key resolution.
//!
//! Text typing resolves every grapheme on the hot path, so these lookups
//! should stay in the tens-of-nanoseconds range.
//!
//! Run with:
//! ```bash
//! cargo bench --package pilot-core --bench keysym_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pilot_core::keysym::{resolve_char, resolve_combo, resolve_name, resolve_text};

const BENCH_NAMES: &[&str] = &[
    "ctrl", "shift", "cmd", "option", "return", "Escape", "f5", "pagedown", "a", "Z", "!",
    "unknown",
];

const BENCH_CHARS: &[char] = &['a', 'Z', '7', '!', ' ', '\n', 'é', '日', '\u{7}'];

fn bench_resolve_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_name");
    for name in BENCH_NAMES {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| resolve_name(black_box(name)))
        });
    }
    group.finish();
}

fn bench_resolve_char(c: &mut Criterion) {
    c.bench_function("resolve_char/mixed", |b| {
        b.iter(|| {
            for ch in BENCH_CHARS {
                black_box(resolve_char(black_box(*ch)));
            }
        })
    });
}

fn bench_resolve_combo(c: &mut Criterion) {
    c.bench_function("resolve_combo/ctrl+shift+a", |b| {
        b.iter(|| resolve_combo(black_box("ctrl+shift+a")))
    });
}

fn bench_resolve_text(c: &mut Criterion) {
    let sentence = "The quick brown fox jumps over the lazy dog! Ünïcödé 👍🏽\n";
    c.bench_function("resolve_text/sentence", |b| {
        b.iter(|| resolve_text(black_box(sentence)))
    });
}

criterion_group!(
    benches,
    bench_resolve_name,
    bench_resolve_char,
    bench_resolve_combo,
    bench_resolve_text
);
criterion_main!(benches);
