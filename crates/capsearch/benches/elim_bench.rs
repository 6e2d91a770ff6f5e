//! Criterion microbenches for elimination waves (group "elim").
//!
//! - Full recompute from the affine basis of F_3^4 (d = 2).
//! - One incremental wave after appending a valid point.
//! - Pooled vs inline dispatch of the same wave.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use capsearch::{generate_coefficients, AffineSpace, Eliminator, ValiditySet};
use rayon::ThreadPoolBuilder;

fn bench_waves(c: &mut Criterion) {
    let mut group = c.benchmark_group("elim");
    let space = AffineSpace::new(3, 4).unwrap();
    let coeffs = generate_coefficients(2, 3);
    let pool = ThreadPoolBuilder::new().build().unwrap();
    let basis = space.affine_basis();
    let all = ValiditySet::all_valid(space.size());

    let pooled = Eliminator::new(&space, &coeffs, &pool, 0);
    let inline = Eliminator::new(&space, &coeffs, &pool, usize::MAX);
    group.bench_function("complete_pooled", |b| {
        b.iter(|| pooled.update_complete(&basis, &all).unwrap())
    });
    group.bench_function("complete_inline", |b| {
        b.iter(|| inline.update_complete(&basis, &all).unwrap())
    });

    let seeded = inline.update_complete(&basis, &all).unwrap();
    let first = seeded.valid_from(0).next().expect("basis leaves candidates");
    let mut cap = basis.clone();
    cap.push(space.index_to_point(first));
    group.bench_function("incremental_inline", |b| {
        b.iter_batched(
            || seeded.clone(),
            |parent| inline.update_incremental(&cap, &parent).unwrap(),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_waves);
criterion_main!(benches);
