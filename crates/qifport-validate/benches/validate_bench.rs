//! Validation tracker benchmarks.
//!
//! Run with: cargo bench -p qifport-validate

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use qifport_core::{MappingKind, MappingTable, Mappings, Observer, TransactionRecord};
use qifport_validate::ValidationTracker;
use rust_decimal::Decimal;

/// Generate N records spread over a year with a handful of repeating payees.
fn generate_records(num_records: usize) -> Vec<TransactionRecord> {
    let payees = ["Store A", "Store B", "Cafe", "", "Gas Station"];
    let categories = ["Food", "Coffee", "", "Transport"];

    (0..num_records)
        .map(|i| {
            let day = (i % 365) as u32;
            let date = NaiveDate::from_yo_opt(2024, day + 1).unwrap();
            let merchant = payees[i % payees.len()].to_string();
            TransactionRecord {
                date,
                original_statement: merchant.clone(),
                merchant,
                category: categories[i % categories.len()].to_string(),
                account: "Checking".to_string(),
                notes: String::new(),
                amount: Decimal::new(-((i % 50) as i64) * 100, 2),
                tags: String::new(),
            }
        })
        .collect()
}

fn bench_track(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_admitted");

    for size in [100, 1000, 10_000] {
        let records = generate_records(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let tracker = ValidationTracker::new();
                for record in records {
                    tracker.transaction_admitted(black_box(record));
                }
                tracker
            });
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let records = generate_records(10_000);
    let mut mappings = Mappings::default();
    mappings.set(
        MappingKind::Payee,
        MappingTable::from_pairs((0..200).map(|i| (format!("Payee {i}"), format!("Mapped {i}")))),
    );

    let tracker = ValidationTracker::new();
    for record in &records {
        tracker.transaction_admitted(record);
        mappings.apply(MappingKind::Payee, &record.merchant, &tracker);
    }

    c.bench_function("report_10000", |b| {
        b.iter(|| tracker.report(black_box(&mappings)));
    });
}

criterion_group!(benches, bench_track, bench_report);
criterion_main!(benches);
