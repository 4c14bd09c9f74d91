//! Performance benchmarks for the transfer benchmark harness
//!
//! The harness sits between the clock and the transfer tool, so the work it
//! does per iteration (tokens, manifests, statistics) should stay negligible
//! next to an upload.

use clap::Parser;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::{fs, time::Duration};
use tempfile::TempDir;
use transfer_bench::{
    build_manifest,
    cli::Cli,
    config::parser::ConfigParser,
    generate_token,
    output::{OutputFormatterFactory, ReportFormatter},
    summarize,
    types::{DestinationPair, Variant},
    DurationSeries, ExperimentStatistics, FixedDestination, IterationRecord, RandomPairedDestination,
    SeededRandom,
};

/// Payload tree with `count` files spread over a few subdirectories
fn create_payload(count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..count {
        let sub = dir.path().join(format!("part{}", i % 4));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("file{:05}.bin", i)), b"payload").unwrap();
    }
    dir
}

/// Deterministic duration series for statistics benchmarks
fn create_series(name: &str, count: usize) -> DurationSeries {
    DurationSeries::with_samples(
        name,
        (0..count)
            .map(|i| Duration::from_millis(900 + (i as u64 * 37) % 400))
            .collect(),
    )
}

fn create_pairs() -> Vec<DestinationPair> {
    vec![
        DestinationPair::new("s3://bucket-faru-1", "us-east-1"),
        DestinationPair::new("s3://bucket-faru-2", "us-east-2"),
    ]
}

/// Benchmark random prefix generation
fn benchmark_tokens(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokens");

    for length in [8usize, 32, 64] {
        group.bench_with_input(BenchmarkId::new("generate_token", length), &length, |b, &length| {
            let mut rng = SeededRandom::from_seed(7);
            b.iter(|| black_box(generate_token(&mut rng, black_box(length))));
        });
    }

    group.finish();
}

/// Benchmark manifest generation for both destination strategies
fn benchmark_manifests(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifests");
    let out = TempDir::new().unwrap();

    for count in [10usize, 100, 1000] {
        let payload = create_payload(count);
        let manifest = out.path().join(format!("commands-{}.txt", count));

        group.bench_with_input(BenchmarkId::new("fixed_destination", count), &count, |b, _| {
            let template = FixedDestination::new("s3://bucket-faru-1", "run/tok");
            let mut rng = SeededRandom::from_seed(1);
            b.iter(|| {
                let summary = build_manifest(&manifest, payload.path(), &template, &mut rng).unwrap();
                black_box(summary);
            });
        });

        group.bench_with_input(BenchmarkId::new("random_paired_destination", count), &count, |b, _| {
            let template = RandomPairedDestination::new(create_pairs(), "run/tok");
            let mut rng = SeededRandom::from_seed(1);
            b.iter(|| {
                let summary = build_manifest(&manifest, payload.path(), &template, &mut rng).unwrap();
                black_box(summary);
            });
        });
    }

    group.finish();
}

/// Benchmark statistics over series of growing length
fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for count in [3usize, 100, 10_000] {
        let baseline = create_series("baseline", count);
        let candidate = create_series("candidate", count);

        group.bench_with_input(BenchmarkId::new("summarize", count), &baseline, |b, series| {
            b.iter(|| black_box(summarize(black_box(series)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("compare", count), &count, |b, _| {
            b.iter(|| black_box(ExperimentStatistics::from_series(&baseline, &candidate).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark configuration parsing without touching the process environment
fn benchmark_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");
    let args = [
        "tbench",
        "--source", "./blob",
        "-n", "5",
        "--buckets", "s3://a,s3://b,s3://c",
        "--regions", "eu-west-1,eu-west-2,eu-west-3",
        "--cleanup", "warn",
    ];

    group.bench_function("parse_cli_args", |b| {
        b.iter(|| black_box(Cli::try_parse_from(black_box(&args)).unwrap()));
    });

    group.bench_function("build_config", |b| {
        let cli = Cli::try_parse_from(&args).unwrap();
        b.iter(|| black_box(ConfigParser::without_environment(cli.clone()).parse().unwrap()));
    });

    group.finish();
}

/// Benchmark rendering of the iteration table
fn benchmark_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    let records: Vec<IterationRecord> = (0..50)
        .map(|i| {
            let mut record = IterationRecord::new(i, format!("run/b{:04}", i), format!("run/c{:04}", i));
            record.record(Variant::Baseline, Duration::from_millis(1200), 100);
            record.record(Variant::Candidate, Duration::from_millis(900), 100);
            record
        })
        .collect();

    group.bench_function("iteration_table", |b| {
        let formatter = OutputFormatterFactory::create_plain_formatter();
        b.iter(|| black_box(formatter.format_iteration_table(black_box(&records)).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tokens,
    benchmark_manifests,
    benchmark_statistics,
    benchmark_config_parsing,
    benchmark_formatting
);
criterion_main!(benches);
