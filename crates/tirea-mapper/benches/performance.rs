//! Performance benchmarks for tirea-mapper operations.
//!
//! Run with: cargo bench --package tirea-mapper

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use tirea_mapper::{
    combine_mappers, mapper_fn, rename_paths, scope_builder, shared, Mapper, RenameTable,
};

/// Generate a flat document with N fields
fn generate_flat_doc(num_fields: usize) -> Value {
    let mut obj = serde_json::Map::new();
    for i in 0..num_fields {
        obj.insert(format!("field_{}", i), json!({"value": i}));
    }
    Value::Object(obj)
}

/// Generate a table renaming `field_i.value` to `renamed_i.v`
fn generate_table(num_entries: usize) -> RenameTable {
    RenameTable::try_from_pairs(
        (0..num_entries).map(|i| (format!("field_{}.value", i), format!("renamed_{}.v", i))),
    )
    .expect("generated paths are valid")
}

fn bench_rename_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("rename_paths");

    for size in [10, 100, 1000].iter() {
        let doc = generate_flat_doc(*size);
        let table = generate_table(*size);

        group.bench_with_input(BenchmarkId::new("entries", size), size, |b, _| {
            b.iter(|| rename_paths(black_box(&table), black_box(&doc)).into_owned())
        });
    }

    let doc = generate_flat_doc(1000);
    let empty = RenameTable::new();
    group.bench_function("empty_table", |b| {
        b.iter(|| rename_paths(black_box(&empty), black_box(&doc)))
    });

    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_mappers");

    for count in [1, 10, 50].iter() {
        let combined = combine_mappers((0..*count).map(|i| {
            shared(mapper_fn(move |state, props| {
                let prev = props.as_object().map_or(0, |o| o.len()) as u64;
                let mut out = serde_json::Map::new();
                out.insert(
                    format!("k{}", i),
                    json!(state["field_0"]["value"].as_u64().unwrap_or(0) + prev),
                );
                Value::Object(out)
            }))
        }));
        let state = generate_flat_doc(10);

        group.bench_with_input(BenchmarkId::new("mappers", count), count, |b, _| {
            b.iter(|| combined.map(black_box(&state), black_box(&Value::Null)))
        });
    }

    group.finish();
}

fn bench_scoped(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoped_mapper");

    for count in [0, 5, 20].iter() {
        let intermediates = (0..*count)
            .map(|i| shared(mapper_fn(move |scoped, _| scoped[format!("field_{}", i)].clone())))
            .collect::<Vec<_>>();
        let mapper = scope_builder("branch").build(intermediates, |args| json!(args.len()));
        let state = json!({"branch": generate_flat_doc(50)});

        group.bench_with_input(BenchmarkId::new("intermediates", count), count, |b, _| {
            b.iter(|| mapper.map(black_box(&state), black_box(&Value::Null)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rename_paths, bench_combine, bench_scoped);
criterion_main!(benches);
