use core_types::{InstanceId, Seq};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use navstack::Entry;
use navstack::scope::scoped;
use platform::ViewArena;
use router_api::{DEFAULT_OUTLET, MatchedRecord, Query, Route};

const SHALLOW_ENTRIES: usize = 32;
const DEEP_ENTRIES: usize = 5_000;

fn record(path: String) -> MatchedRecord {
    let view = path.clone();
    MatchedRecord::new(path).with_component(DEFAULT_OUTLET, view)
}

/// Alternating visits to two tab sections, each three levels deep.
fn make_entries(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| {
            let section = if (i / 8) % 2 == 0 { "/s1" } else { "/s2" };
            let matched = vec![
                record(section.to_string()),
                record(format!("{section}/tab{}", i % 4)),
                record(format!("{section}/tab{}/item{i}", i % 4)),
            ];
            let path = matched[2].path.clone();
            Entry {
                route: Route::new(path, Query::new(), "", matched),
                seq: Seq::from_raw(i as u64 + 1),
                depth: Some(i as u32),
            }
        })
        .collect()
}

fn mount_latest(entries: &[Entry]) -> (ViewArena, InstanceId) {
    let mut arena = ViewArena::new();
    let root = arena.spawn(None);
    let route = entries.last().map(|e| e.route.clone()).unwrap_or_else(Route::start);
    let ids = arena.mount_route(&route, root);
    let section = ids.first().copied().unwrap_or(root);
    (arena, section)
}

fn bench_scoped_shallow(c: &mut Criterion) {
    let entries = make_entries(SHALLOW_ENTRIES);
    let (arena, instance) = mount_latest(&entries);
    c.bench_function("bench_scoped_shallow", |b| {
        b.iter(|| {
            let out = scoped(black_box(&entries), instance, &arena);
            black_box(out.len());
        });
    });
}

fn bench_scoped_deep(c: &mut Criterion) {
    let entries = make_entries(DEEP_ENTRIES);
    let (arena, instance) = mount_latest(&entries);
    c.bench_function("bench_scoped_deep", |b| {
        b.iter(|| {
            let out = scoped(black_box(&entries), instance, &arena);
            black_box(out.len());
        });
    });
}

fn bench_scoped_miss(c: &mut Criterion) {
    let entries = make_entries(DEEP_ENTRIES);
    let mut arena = ViewArena::new();
    let stray = arena.spawn(None);
    c.bench_function("bench_scoped_miss", |b| {
        b.iter(|| {
            let out = scoped(black_box(&entries), stray, &arena);
            black_box(out.len());
        });
    });
}

criterion_group!(
    benches,
    bench_scoped_shallow,
    bench_scoped_deep,
    bench_scoped_miss
);
criterion_main!(benches);
