//! Elimination primitive and the incremental / full-recompute waves.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use nalgebra::DMatrix;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::trace;

use crate::coeffs::CoefficientSet;
use crate::error::CapError;
use crate::space::{AffineSpace, Point};
use crate::util::combinations;

use super::types::ValiditySet;

/// Indices of every point Σ wᵢ·pᵢ for the weight tuples in `coeffs`.
///
/// `flat` holds at most d+1 points; a shorter flat is padded with its last
/// point, which spans the same affine hull.
pub fn eliminate(space: &AffineSpace, coeffs: &CoefficientSet, flat: &[&Point]) -> Vec<usize> {
    let gens = generator_matrix(space, coeffs.arity(), flat);
    space.combine_columns(&gens, coeffs.matrix())
}

fn generator_matrix(space: &AffineSpace, arity: usize, flat: &[&Point]) -> DMatrix<u64> {
    debug_assert!(!flat.is_empty() && flat.len() <= arity);
    let last = flat.len() - 1;
    DMatrix::from_fn(space.n(), arity, |r, c| flat[c.min(last)][r] as u64)
}

/// Counters over all waves an `Eliminator` has run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveStats {
    pub waves: usize,
    pub tasks: usize,
}

/// Runs elimination waves for one (space, d) on a shared worker pool.
pub struct Eliminator<'a> {
    space: &'a AffineSpace,
    coeffs: &'a CoefficientSet,
    pool: &'a ThreadPool,
    inline_below: usize,
    waves: AtomicUsize,
    tasks: AtomicUsize,
}

impl<'a> Eliminator<'a> {
    /// Waves with fewer than `inline_below` tasks run on the calling thread.
    pub fn new(
        space: &'a AffineSpace,
        coeffs: &'a CoefficientSet,
        pool: &'a ThreadPool,
        inline_below: usize,
    ) -> Self {
        Self {
            space,
            coeffs,
            pool,
            inline_below,
            waves: AtomicUsize::new(0),
            tasks: AtomicUsize::new(0),
        }
    }

    pub fn stats(&self) -> WaveStats {
        WaveStats {
            waves: self.waves.load(Ordering::Relaxed),
            tasks: self.tasks.load(Ordering::Relaxed),
        }
    }

    /// Update for a cap whose last point is new.
    ///
    /// Pre: `parent` is correct for `cap[..len-1]`. Only flats through the last
    /// point are eliminated: each d-subset of the earlier points plus the last.
    pub fn update_incremental(
        &self,
        cap: &[Point],
        parent: &ValiditySet,
    ) -> Result<ValiditySet, CapError> {
        let Some(last) = cap.len().checked_sub(1) else {
            return Ok(parent.clone());
        };
        let flats: Vec<Vec<usize>> = combinations(last, self.coeffs.d())
            .into_iter()
            .map(|mut flat| {
                flat.push(last);
                flat
            })
            .collect();
        self.run_wave(cap, &flats, parent)
    }

    /// Update from scratch: the span of every subset of up to d+1 cap points.
    pub fn update_complete(
        &self,
        cap: &[Point],
        parent: &ValiditySet,
    ) -> Result<ValiditySet, CapError> {
        let top = cap.len().min(self.coeffs.arity());
        let flats: Vec<Vec<usize>> = (1..=top)
            .flat_map(|k| combinations(cap.len(), k))
            .collect();
        self.run_wave(cap, &flats, parent)
    }

    fn run_wave(
        &self,
        cap: &[Point],
        flats: &[Vec<usize>],
        parent: &ValiditySet,
    ) -> Result<ValiditySet, CapError> {
        if parent.len() != self.space.size() {
            return Err(CapError::DimensionMismatch {
                expected: self.space.size(),
                got: parent.len(),
            });
        }
        let mask = parent.to_shared();
        let mark = |flat: &Vec<usize>| -> Result<usize, CapError> {
            let points: Vec<&Point> = flat.iter().map(|&i| &cap[i]).collect();
            mark_flat(&mask, self.space, self.coeffs, &points)
        };
        let marked = if flats.len() < self.inline_below {
            flats.iter().map(&mark).sum::<Result<usize, CapError>>()?
        } else {
            self.pool
                .install(|| flats.par_iter().map(&mark).try_reduce(|| 0, |a, b| Ok(a + b)))?
        };
        // Each task marks exactly |coeffs| indices; a shortfall means a task was lost.
        let expected = flats.len() * self.coeffs.len();
        if marked != expected {
            return Err(CapError::IncompleteWave { expected, marked });
        }
        self.waves.fetch_add(1, Ordering::Relaxed);
        self.tasks.fetch_add(flats.len(), Ordering::Relaxed);
        trace!(cap = cap.len(), tasks = flats.len(), "wave");
        Ok(ValiditySet::from_shared(mask))
    }
}

/// One task: store `false` for every point of the flat's span.
///
/// Fails on an index outside `mask` instead of dropping it.
pub(super) fn mark_flat(
    mask: &[AtomicBool],
    space: &AffineSpace,
    coeffs: &CoefficientSet,
    flat: &[&Point],
) -> Result<usize, CapError> {
    let mut marked = 0;
    for index in eliminate(space, coeffs, flat) {
        let slot = mask.get(index).ok_or(CapError::IndexOutOfRange {
            index,
            size: mask.len(),
        })?;
        slot.store(false, Ordering::Relaxed);
        marked += 1;
    }
    Ok(marked)
}
