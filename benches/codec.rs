//! Benchmarks for the student data file codec.
//!
//! Benchmark targets:
//! - Scores-blob encode/decode
//! - Full import from an in-memory CSV of N students
//! - Full export of N students to an in-memory buffer

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;
use std::io::Cursor;
use std::time::Duration;

use roster::Student;
use roster::io::{ExportService, ImportService, decode_scores, encode_scores};

const SUBJECTS: [&str; 6] = ["数学", "语文", "英语", "物理", "化学", "生物"];

fn students(count: usize) -> Vec<Student> {
    (0..count)
        .map(|i| {
            let mut student = Student::new(
                format!("2023{i:06}"),
                format!("学生{i}"),
                if i % 2 == 0 { "男" } else { "女" },
                "101",
                "13812345678",
                "",
            )
            .unwrap();
            for (offset, subject) in SUBJECTS.iter().enumerate() {
                let score = f64::from(u32::try_from((i + offset * 7) % 101).unwrap());
                student.set_score(*subject, score).unwrap();
            }
            student
        })
        .collect()
}

fn encoded(students: &[Student]) -> Vec<u8> {
    let mut output = Vec::new();
    ExportService::default()
        .export_to_writer(&mut output, students)
        .unwrap();
    output
}

fn bench_scores_blob(c: &mut Criterion) {
    let mut group = c.benchmark_group("scores_blob");

    let scores: BTreeMap<String, f64> = SUBJECTS
        .iter()
        .zip([92.5, 88.0, 79.25, 100.0, 61.0, 85.333_333])
        .map(|(subject, score)| ((*subject).to_string(), score))
        .collect();
    let blob = encode_scores(&scores);

    group.bench_function("encode", |b| {
        b.iter(|| encode_scores(black_box(&scores)));
    });
    group.bench_function("decode", |b| {
        b.iter(|| decode_scores(black_box(&blob)));
    });

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");
    group.measurement_time(Duration::from_secs(5));

    for count in [10usize, 100, 1_000] {
        let data = encoded(&students(count));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("students", count), &data, |b, data| {
            b.iter(|| {
                ImportService::default()
                    .import_from_reader(Cursor::new(black_box(data)), "bench")
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for count in [10usize, 100, 1_000] {
        let roster = students(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("students", count), &roster, |b, roster| {
            b.iter(|| encoded(black_box(roster)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scores_blob, bench_import, bench_export);

criterion_main!(benches);
