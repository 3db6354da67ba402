//! Benchmarks for the equipment table transforms
//!
//! Run with: cargo bench

use chemviz::model::{EquipmentRecord, Measure};
use chemviz::view::table::{filter_records, sort_records, Column, SortDirection, SortState, TableQuery};
use chemviz::view::ChartSet;
use chemviz::DatasetDetail;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const TYPES: [&str; 5] = ["Pump", "Valve", "Reactor", "HeatExchanger", "Compressor"];

fn create_test_records(count: usize) -> Vec<EquipmentRecord> {
    (0..count)
        .map(|i| EquipmentRecord {
            id: Some(i as i64),
            equipment_name: format!("{}-{}", TYPES[i % TYPES.len()], i),
            equipment_type: TYPES[i % TYPES.len()].to_string(),
            // Every 50th reading is unparseable to exercise the text fallback
            flowrate: if i % 50 == 0 {
                Measure::from("n/a")
            } else {
                Measure::from(format!("{:.2}", (i * 37 % 1000) as f64 / 3.0).as_str())
            },
            pressure: Measure::Number((i % 17) as f64 * 0.5),
            temperature: Measure::Number(100.0 + (i % 90) as f64),
            row_number: Some(i as u32 + 1),
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [100, 1000, 10000] {
        let records = create_test_records(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("substring_{}", size), |b| {
            b.iter(|| filter_records(black_box(&records), black_box("valve")))
        });
    }

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in [100, 1000, 10000] {
        let records = create_test_records(size);
        group.throughput(Throughput::Elements(size as u64));

        for column in [Column::Name, Column::Flowrate] {
            let sort = SortState {
                column,
                direction: SortDirection::Descending,
            };
            group.bench_function(format!("{}_{}", column.key(), size), |b| {
                b.iter(|| sort_records(black_box(records.iter().collect()), sort))
            });
        }
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let records = create_test_records(5000);
    let mut query = TableQuery::new();
    query.set_filter("p");
    query.toggle_sort(Column::Pressure);

    c.bench_function("query_apply_5000", |b| {
        b.iter(|| query.apply(black_box(&records)).len())
    });
}

fn bench_charts(c: &mut Criterion) {
    let detail = DatasetDetail {
        equipment_list: create_test_records(5000),
        ..Default::default()
    };

    c.bench_function("charts_from_detail_5000", |b| {
        b.iter(|| ChartSet::from_detail(black_box(&detail)))
    });
}

criterion_group!(benches, bench_filter, bench_sort, bench_query, bench_charts);
criterion_main!(benches);
