//! Criterion benches for complete small searches (group "search").
//!
//! Sizes are chosen so one iteration stays well under a second.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use capsearch::{find_maximum_caps, AffineSpace, SearchCfg};

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for (d, q, n) in [(1usize, 3u32, 3usize), (1, 5, 2), (2, 3, 4)] {
        let space = AffineSpace::new(q, n).unwrap();
        let label = format!("d{d}_q{q}_n{n}");
        group.bench_with_input(BenchmarkId::new("find_maximum_caps", label), &space, |b, s| {
            b.iter(|| find_maximum_caps(*s, d, SearchCfg::default()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
