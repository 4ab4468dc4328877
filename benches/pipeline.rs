//! Benchmarks for the resimg pipeline.

use std::fs;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use resimg::{
    canonicalize, generate, parse_declaration, rename_layer, scan_candidates, scan_layers,
    GenerateOptions, LayerDocument, RenameOptions, ScanOptions,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> LayerDocument {
    let content = fs::read_to_string(fixtures_dir().join(name)).unwrap();
    LayerDocument::parse_yaml(&content).unwrap()
}

/// `count` layer names spread across every breakpoint and three densities.
fn synthetic_names(count: usize) -> Vec<String> {
    const BREAKPOINTS: [&str; 5] = ["xs", "small", "med", "large", "xl"];
    (0..count)
        .map(|i| {
            format!(
                "asset{}-{}-@{}x.png",
                i / 15,
                BREAKPOINTS[i % 5],
                i % 3 + 1
            )
        })
        .collect()
}

// -- Parsing benchmarks --

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.bench_function("parse_simple", |b| {
        b.iter(|| parse_declaration(black_box("hero.png")).unwrap())
    });

    group.bench_function("parse_full", |b| {
        b.iter(|| parse_declaration(black_box("640x480 Mona Lisa-large-@2x.jpeg80")).unwrap())
    });

    let decl = parse_declaration("Mona Lisa-SML-@2x.JPEG").unwrap();
    group.bench_function("canonicalize", |b| b.iter(|| canonicalize(black_box(&decl))));

    let options = RenameOptions {
        compress: true,
        base_name: None,
    };
    group.bench_function("rename_layer", |b| {
        b.iter(|| rename_layer(black_box("hero-Large-@2.JPEG, notes, hero-sml.png"), &options))
    });

    group.finish();
}

// -- Scanning benchmarks --

fn bench_scanning(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanning");
    let options = ScanOptions::default();

    let poster = load_fixture("poster.layers.yaml");
    group.bench_function("scan_fixture", |b| {
        b.iter(|| scan_layers(black_box(&poster), &options))
    });

    let names = synthetic_names(300);
    group.bench_function("scan_300_names", |b| {
        b.iter(|| scan_candidates(black_box(&names), &options))
    });

    group.finish();
}

// -- Generation benchmarks --

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let options = GenerateOptions::default();

    let poster = load_fixture("poster.layers.yaml");
    let scan = scan_layers(&poster, &ScanOptions::default());
    group.bench_function("generate_fixture", |b| {
        b.iter(|| generate(black_box(&scan.assets), &options).unwrap())
    });

    let single = scan_candidates(["hero.png", "hero-@2x.png"], &ScanOptions::default());
    group.bench_function("generate_img", |b| {
        b.iter(|| generate(black_box(&single.assets), &options).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_scanning, bench_generation);
criterion_main!(benches);
