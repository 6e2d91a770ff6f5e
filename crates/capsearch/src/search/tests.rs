//! End-to-end checks of the cap search on small spaces with known answers.

use super::*;
use crate::space::AffineSpace;
use crate::validity::ValiditySet;
use nalgebra::dvector;

fn solve(d: usize, q: u32, n: usize) -> SearchOutcome {
    let space = AffineSpace::new(q, n).unwrap();
    find_maximum_caps(space, d, SearchCfg::default()).unwrap()
}

fn assert_all_caps(out: &SearchOutcome, d: usize, q: u32, n: usize) {
    let space = AffineSpace::new(q, n).unwrap();
    assert_eq!(out.best, out.maximal[0]);
    for cap in &out.maximal {
        assert_eq!(cap.len(), out.best.len());
        assert_eq!(cap.forbidden_flat(&space, d), None, "{cap:?}");
        assert_eq!(&cap.points()[..n + 1], &space.affine_basis()[..]);
    }
}

#[test]
fn set_plane_has_three_caps_of_four() {
    let out = solve(1, 3, 2);
    assert_eq!(out.best.len(), 4);
    assert_eq!(out.maximal.len(), 3);
    assert_all_caps(&out, 1, 3, 2);
    let space = AffineSpace::new(3, 2).unwrap();
    let fourth: Vec<usize> = out
        .maximal
        .iter()
        .map(|c| space.point_to_index(&c.points()[3]))
        .collect();
    assert_eq!(fourth, vec![4, 5, 7]);
}

#[test]
fn d_at_least_n_returns_the_basis() {
    let out = solve(2, 3, 2);
    assert_eq!(out.best.len(), 3);
    assert_eq!(out.maximal.len(), 1);
    assert_eq!(out.stats, SearchStats::default());
    // d > n is clamped rather than rejected.
    assert_eq!(solve(5, 3, 2).best, out.best);
}

#[test]
fn zero_dimensional_space_is_one_point() {
    let out = solve(1, 3, 0);
    assert_eq!(out.best.len(), 1);
    assert_eq!(out.best.points()[0].len(), 0);
}

#[test]
fn binary_lines_never_bind() {
    // Lines over F_2 have two points, so the whole space is a 1-cap.
    let out = solve(1, 2, 3);
    assert_eq!(out.best.len(), 8);
    assert_eq!(out.maximal.len(), 1);
    assert_all_caps(&out, 1, 2, 3);
}

#[test]
fn set_space_cap_of_nine() {
    // Maximum cap in AG(3, 3).
    let out = solve(1, 3, 3);
    assert_eq!(out.best.len(), 9);
    assert_eq!(out.maximal.len(), 18);
    assert_all_caps(&out, 1, 3, 3);
    assert_eq!(out.stats.nodes, 736);
    assert!(out.stats.nodes > out.stats.leaves);
    assert!(out.stats.waves >= out.stats.nodes - 1);
}

#[test]
fn oval_in_f5_plane() {
    // Arcs in AG(2, q), q odd, have at most q + 1 points.
    let out = solve(1, 5, 2);
    assert_eq!(out.best.len(), 6);
    assert_eq!(out.maximal.len(), 10);
    assert_all_caps(&out, 1, 5, 2);
}

#[test]
fn plane_caps_in_f3_4() {
    let out = solve(2, 3, 4);
    assert_eq!(out.best.len(), 9);
    assert_eq!(out.maximal.len(), 90);
    assert_all_caps(&out, 2, 3, 4);
}

#[test]
fn thread_count_does_not_change_results() {
    let space = AffineSpace::new(3, 3).unwrap();
    let serial = find_maximum_caps(
        space,
        1,
        SearchCfg {
            threads: 1,
            inline_below: usize::MAX,
        },
    )
    .unwrap();
    let parallel = find_maximum_caps(
        space,
        1,
        SearchCfg {
            threads: 4,
            inline_below: 0,
        },
    )
    .unwrap();
    assert_eq!(serial.maximal, parallel.maximal);
}

#[test]
fn search_from_explicit_prefix() {
    let space = AffineSpace::new(3, 2).unwrap();
    let ctx = SearchContext::new(space, 1, SearchCfg::default()).unwrap();
    let mut cap = space.affine_basis();
    cap.push(dvector![1, 1]);
    let elim = ctx.eliminator();
    let valid = elim
        .update_complete(&cap, &ValiditySet::all_valid(space.size()))
        .unwrap();
    assert_eq!(valid.count_valid(), 0);
    // Nothing extends the prefix, so it is the only result.
    let out = search(&ctx, cap.clone(), 0, &valid).unwrap();
    assert_eq!(out.maximal.len(), 1);
    assert_eq!(out.best.points(), &cap[..]);
    assert_eq!(out.stats.nodes, 1);
}

#[test]
fn max_caps_resets_on_larger() {
    let a = dvector![0u32];
    let b = dvector![1u32];
    let c = dvector![2u32];
    let mut acc = MaxCaps::default();
    assert_eq!(acc.offer(&[a.clone()]), Offer::Larger);
    assert_eq!(acc.offer(&[b.clone()]), Offer::Tie);
    assert_eq!(acc.len(), 2);
    assert_eq!(acc.offer(&[a.clone(), b.clone()]), Offer::Larger);
    assert_eq!(acc.len(), 1);
    assert_eq!(acc.offer(&[c]), Offer::Smaller);
    assert_eq!(acc.best_len(), Some(2));
}
