//! Mask resolution and literal normalization benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;
use tempfile::TempDir;
use wndflag::*;

fn window_table() -> FlagTable {
    let mut table = FlagTable::new();
    let merger = DefaultsMerger::default();
    let mut stats = MergeStats::default();
    merger.merge_table(&mut table, Namespace::WindowFlag, None, &mut stats);
    table
}

fn bench_normalize_literals(c: &mut Criterion) {
    let normalizer = LiteralNormalizer::new();
    let literals = [
        "0x02000000L",
        "(1 << 17)",
        "0x0001 | 0x0002 | 0x0800",
        "0x100 + 4",
        "4096",
        "SOME_MACRO",
    ];

    c.bench_function("normalize_literals", |b| {
        b.iter(|| {
            for literal in &literals {
                black_box(normalizer.normalize(black_box(literal)));
            }
        })
    });
}

fn bench_resolve_window_masks(c: &mut Criterion) {
    let table = window_table();
    let resolver = BitmaskResolver::new();
    let masks: Vec<u32> = (0..1024u32).map(|i| i.wrapping_mul(0x0101_0203)).collect();

    c.bench_function("resolve_window_masks", |b| {
        b.iter(|| {
            for &mask in &masks {
                black_box(resolver.resolve_value(OwnerKind::Window, black_box(mask), &table));
            }
        })
    });
}

fn bench_generation_pass(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("include");
    fs::create_dir_all(&source).unwrap();

    let mut content = String::new();
    for i in 0..16 {
        content.push_str(&format!("#define WBS_GENERATED{} (1 << {})\n", i, i + 16));
        content.push_str(&format!("#define BS_GENERATED{} 0x{:04X}\n", i, 1u32 << i));
    }
    fs::write(source.join("generated.h"), content).unwrap();

    let options = EngineOptions {
        config_dir: temp_dir.path().join("config"),
        write_outputs: false,
        ..Default::default()
    };

    c.bench_function("generation_pass", |b| {
        b.iter(|| black_box(generate_flags(black_box(&source), options.clone())))
    });
}

criterion_group!(
    benches,
    bench_normalize_literals,
    bench_resolve_window_masks,
    bench_generation_pass
);
criterion_main!(benches);
