//! The affine space F_q^n: points, the index bijection, and affine combinations.
//!
//! Purpose
//! - Give every point a stable index in `[0, q^n)` so validity sets and state
//!   strings can be plain arrays.
//! - Keep the two readings of "affine combination" apart: `weight_sum` is the
//!   scalar check on a weight tuple, `combine`/`combine_columns` produce points.
//!
//! Index convention
//! - Base-q digits with coordinate 0 least significant. Appending a zero
//!   coordinate (`embed_lower`) therefore keeps a point's index unchanged.

use nalgebra::{DMatrix, DVector};

use crate::error::CapError;
use crate::util::is_prime;

/// A point of F_q^n; every coordinate is reduced into `0..q`.
pub type Point = DVector<u32>;

/// Sum of the weights mod q (scalar form of an affine combination).
#[inline]
pub fn weight_sum(q: u32, weights: &[u32]) -> u32 {
    (weights.iter().map(|&w| w as u64).sum::<u64>() % q as u64) as u32
}

/// F_q^n with q prime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AffineSpace {
    q: u32,
    n: usize,
    size: usize,
}

impl AffineSpace {
    pub fn new(q: u32, n: usize) -> Result<Self, CapError> {
        if !is_prime(q) {
            return Err(CapError::InvalidField { q });
        }
        let exp = u32::try_from(n).map_err(|_| CapError::SpaceTooLarge { q, n })?;
        let size = (q as usize)
            .checked_pow(exp)
            .ok_or(CapError::SpaceTooLarge { q, n })?;
        Ok(Self { q, n, size })
    }

    #[inline]
    pub fn q(&self) -> u32 {
        self.q
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of points, `q^n`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn index_to_point(&self, index: usize) -> Point {
        debug_assert!(index < self.size);
        let q = self.q as usize;
        let mut rest = index;
        DVector::from_fn(self.n, |_, _| {
            let digit = rest % q;
            rest /= q;
            digit as u32
        })
    }

    pub fn point_to_index(&self, p: &Point) -> usize {
        debug_assert_eq!(p.len(), self.n);
        self.index_of_coords(p.iter().map(|&c| c as u64))
    }

    /// Index of a coordinate sequence (coordinate 0 first), reducing mod q.
    pub fn index_of_coords(&self, coords: impl IntoIterator<Item = u64>) -> usize {
        let q = self.q as u64;
        let mut place = 1usize;
        let mut index = 0usize;
        for c in coords {
            index += (c % q) as usize * place;
            place = place.wrapping_mul(self.q as usize);
        }
        index
    }

    /// Check that `p` has n coordinates, all in `0..q`.
    pub fn contains(&self, p: &Point) -> Result<(), CapError> {
        if p.len() != self.n {
            return Err(CapError::DimensionMismatch {
                expected: self.n,
                got: p.len(),
            });
        }
        if let Some(&c) = p.iter().find(|&&c| c >= self.q) {
            return Err(CapError::CoordinateOutOfRange { coord: c, q: self.q });
        }
        Ok(())
    }

    #[inline]
    pub fn origin(&self) -> Point {
        DVector::zeros(self.n)
    }

    /// The i-th standard basis vector `e_i`.
    pub fn basis_point(&self, i: usize) -> Point {
        debug_assert!(i < self.n);
        let mut p = self.origin();
        p[i] = 1;
        p
    }

    /// Origin followed by `e_0..e_{n-1}`: n+1 affinely independent points.
    pub fn affine_basis(&self) -> Vec<Point> {
        std::iter::once(self.origin())
            .chain((0..self.n).map(|i| self.basis_point(i)))
            .collect()
    }

    /// Σ wᵢ·pᵢ, coordinate-wise mod q (vector form of an affine combination).
    pub fn combine(&self, weights: &[u32], points: &[&Point]) -> Point {
        debug_assert_eq!(weights.len(), points.len());
        let q = self.q as u64;
        let mut acc = DVector::<u64>::zeros(self.n);
        for (&w, p) in weights.iter().zip(points) {
            acc += p.map(|c| c as u64) * (w as u64);
        }
        acc.map(|c| (c % q) as u32)
    }

    /// Batched `combine`: generator points are the columns of `generators`
    /// (n × m), weight tuples the columns of `weights` (m × k). Returns the
    /// indices of the k combined points.
    pub fn combine_columns(&self, generators: &DMatrix<u64>, weights: &DMatrix<u64>) -> Vec<usize> {
        debug_assert_eq!(generators.nrows(), self.n);
        let image = generators * weights;
        image
            .column_iter()
            .map(|col| self.index_of_coords(col.iter().copied()))
            .collect()
    }

    /// Lift a point of F_q^(n-1) into this space by appending a zero coordinate.
    pub fn embed_lower(&self, p: &Point) -> Option<Point> {
        if self.n == 0 || p.len() + 1 != self.n {
            return None;
        }
        Some(DVector::from_iterator(
            self.n,
            p.iter().copied().chain(std::iter::once(0)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;
    use proptest::prelude::*;

    #[test]
    fn rejects_non_prime_orders() {
        assert!(matches!(
            AffineSpace::new(4, 2),
            Err(CapError::InvalidField { q: 4 })
        ));
        assert!(AffineSpace::new(1, 2).is_err());
        assert!(matches!(
            AffineSpace::new(3, 200),
            Err(CapError::SpaceTooLarge { .. })
        ));
        assert_eq!(AffineSpace::new(3, 0).unwrap().size(), 1);
    }

    #[test]
    fn index_is_little_endian_base_q() {
        let s = AffineSpace::new(3, 3).unwrap();
        assert_eq!(s.index_to_point(0), dvector![0, 0, 0]);
        assert_eq!(s.index_to_point(1), dvector![1, 0, 0]);
        assert_eq!(s.index_to_point(3), dvector![0, 1, 0]);
        assert_eq!(s.index_to_point(26), dvector![2, 2, 2]);
        assert_eq!(s.point_to_index(&s.basis_point(2)), 9);
    }

    #[test]
    fn affine_basis_has_n_plus_one_points() {
        let s = AffineSpace::new(5, 4).unwrap();
        let basis = s.affine_basis();
        assert_eq!(basis.len(), 5);
        assert_eq!(basis[0], s.origin());
        assert_eq!(basis[3], dvector![0, 0, 1, 0]);
    }

    #[test]
    fn weight_sum_and_combine_agree_mod_q() {
        assert_eq!(weight_sum(3, &[2, 2]), 1);
        assert_eq!(weight_sum(5, &[4, 3, 4]), 1);
        let s = AffineSpace::new(3, 2).unwrap();
        let a = dvector![1, 0];
        let b = dvector![0, 1];
        // 2a + 2b = (2, 2): third point on the line through a and b.
        assert_eq!(s.combine(&[2, 2], &[&a, &b]), dvector![2, 2]);
        let gens = DMatrix::from_fn(2, 2, |r, c| [&a, &b][c][r] as u64);
        let weights = DMatrix::from_column_slice(2, 3, &[1, 0, 0, 1, 2, 2]);
        assert_eq!(s.combine_columns(&gens, &weights), vec![1, 3, 8]);
    }

    #[test]
    fn embed_preserves_index() {
        let low = AffineSpace::new(3, 2).unwrap();
        let high = AffineSpace::new(3, 3).unwrap();
        for i in 0..low.size() {
            let p = high.embed_lower(&low.index_to_point(i)).unwrap();
            assert_eq!(high.point_to_index(&p), i);
        }
        assert!(high.embed_lower(&dvector![1]).is_none());
    }

    proptest! {
        #[test]
        fn index_round_trip(q in prop::sample::select(vec![2u32, 3, 5, 7]), n in 0usize..5, seed in any::<u64>()) {
            let s = AffineSpace::new(q, n).unwrap();
            let i = (seed % s.size() as u64) as usize;
            let p = s.index_to_point(i);
            prop_assert!(s.contains(&p).is_ok());
            prop_assert_eq!(s.point_to_index(&p), i);
        }
    }
}
