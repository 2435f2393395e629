//! パフォーマンスベンチマーク
//!
//! このモジュールは、txt2xlsxクレートのパフォーマンスを測定するためのベンチマークを提供します。
//! 抽出APIの呼び出しは`StaticBackend`で置き換え、応答の解析・プレビュー・書き出しのみを測定します。
//!
//! 実装するベンチマーク:
//! - 応答の解析（1,000行）
//! - プレビューの生成（Markdown / HTML）
//! - ワークブックの生成（1,000行 / 10,000行）

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use txt2xlsx::{Extractor, ExtractorBuilder, PreviewFormat, StaticBackend, Theme};

/// `rows`行×5列の応答を生成
fn generate_reply(rows: usize) -> String {
    let body: Vec<String> = (0..rows)
        .map(|i| {
            format!(
                r#"["Item {i}", {}, "Category {}", "2025-01-{:02}", {}]"#,
                i * 10,
                i % 7,
                i % 28 + 1,
                i % 2 == 0
            )
        })
        .collect();
    format!(
        r#"{{"filename":"bench","columns":["Name","Amount","Category","Date","Active"],"rows":[{}],"summary":"Benchmark data."}}"#,
        body.join(",")
    )
}

fn extractor_for(rows: usize) -> Extractor {
    ExtractorBuilder::new()
        .with_backend(StaticBackend::new(generate_reply(rows)))
        .with_preview_limit(rows)
        .build()
        .expect("extractor should build with a static backend")
}

/// 応答の解析
fn benchmark_extract(c: &mut Criterion) {
    let reply_len = generate_reply(1_000).len();
    let extractor = extractor_for(1_000);

    let mut group = c.benchmark_group("extract");
    group.throughput(Throughput::Bytes(reply_len as u64));
    group.bench_function("parse_1000_rows", |b| {
        b.iter(|| {
            let table = extractor.extract(black_box("benchmark input")).unwrap();
            black_box(table);
        });
    });
    group.finish();
}

/// プレビューの生成
fn benchmark_preview(c: &mut Criterion) {
    let extractor = extractor_for(1_000);
    let table = extractor.extract("benchmark input").unwrap();

    let mut group = c.benchmark_group("preview");
    for (name, format) in [
        ("markdown", PreviewFormat::Markdown),
        ("html", PreviewFormat::Html),
    ] {
        group.bench_with_input(BenchmarkId::new(name, 1_000), &format, |b, &format| {
            b.iter(|| {
                let mut output = Vec::new();
                extractor
                    .preview(black_box(&table), format, Theme::Light, &mut output)
                    .unwrap();
                black_box(output);
            });
        });
    }
    group.finish();
}

/// ワークブックの生成
fn benchmark_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    group.sample_size(10); // 大きなワークブックは時間がかかるため、10回のサンプル

    for rows in [1_000, 10_000] {
        let extractor = extractor_for(rows);
        let table = extractor.extract("benchmark input").unwrap();

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("workbook", rows), &table, |b, table| {
            b.iter(|| {
                let buffer = extractor.export_to_buffer(black_box(table)).unwrap();
                black_box(buffer);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_extract, benchmark_preview, benchmark_export);
criterion_main!(benches);
