//! Performance benchmarks for FamilyTree core operations
//!
//! Run with: `cargo bench -p familytree-core`
//!
//! These benchmarks measure the work redone after every edit:
//! - Layout of balanced trees of growing size
//! - Statistics aggregation over the same trees
//! - Whole-forest serialization (one persist call)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use familytree_core::services::transfer::serialize_forest;
use familytree_core::{Gender, LayoutEngine, Person, SpacingProfile, Statistics};

/// Balanced tree with `fan_out` children per person, `depth` generations deep
fn balanced_tree(fan_out: usize, depth: usize) -> Person {
    fn grow(person: &mut Person, fan_out: usize, depth: usize) {
        if depth == 0 {
            return;
        }
        for i in 0..fan_out {
            let mut child = Person::new(format!("{} {}", person.name, i + 1));
            if i % 2 == 1 {
                child.gender = Gender::Female;
            }
            if depth > 2 {
                child.death = "1900".to_string();
            }
            grow(&mut child, fan_out, depth - 1);
            person.children.push(child);
        }
    }

    let mut root = Person::new("Gen");
    grow(&mut root, fan_out, depth);
    root
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let engine = LayoutEngine::new(SpacingProfile::Normal);

    for (fan_out, depth) in [(3, 4), (4, 5), (5, 5)] {
        let forest = vec![balanced_tree(fan_out, depth)];
        let size = forest[0].subtree_size();

        group.bench_with_input(BenchmarkId::from_parameter(size), &forest, |b, forest| {
            b.iter(|| black_box(engine.layout(forest)))
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let forest = vec![balanced_tree(5, 5)];

    c.bench_function("statistics_3906_people", |b| {
        b.iter(|| black_box(Statistics::compute(&forest)))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let forest = vec![balanced_tree(5, 5)];

    c.bench_function("serialize_3906_people", |b| {
        b.iter(|| black_box(serialize_forest(&forest).unwrap()))
    });
}

criterion_group!(benches, bench_layout, bench_statistics, bench_serialize);
criterion_main!(benches);
