//! Affine weight tuples used to eliminate every point of a flat.
//!
//! Purpose
//! - For a (d+1)-point flat, every point of its affine span is Σ wᵢ·pᵢ for some
//!   tuple w with Σ wᵢ = 1 (mod q). The set of such tuples depends only on
//!   (d, q), so it is computed once and shared by the whole search.
//!
//! Why this shape
//! - Drawing ordered (d+1)-tuples from the multiset {0..q-1}, each value
//!   repeated d+1 times, reaches every tuple in `0..q`^(d+1). We walk that
//!   product directly and keep the tuples with weight sum 1; there are q^d.
//! - The tuples are also stored as the columns of a weight matrix so one
//!   matrix product yields all eliminated points of a flat.

use std::collections::BTreeSet;

use nalgebra::DMatrix;
use tracing::debug;

use crate::space::weight_sum;

/// All affine weight tuples of length d+1 over F_q.
#[derive(Clone, Debug)]
pub struct CoefficientSet {
    d: usize,
    q: u32,
    tuples: BTreeSet<Vec<u32>>,
    /// (d+1) × |tuples|, one tuple per column, in set order.
    matrix: DMatrix<u64>,
}

impl CoefficientSet {
    #[inline]
    pub fn d(&self) -> usize {
        self.d
    }

    #[inline]
    pub fn q(&self) -> u32 {
        self.q
    }

    /// Tuple length, d+1.
    #[inline]
    pub fn arity(&self) -> usize {
        self.d + 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.tuples.iter().map(Vec::as_slice)
    }

    pub fn contains(&self, tuple: &[u32]) -> bool {
        self.tuples.contains(tuple)
    }

    #[inline]
    pub fn matrix(&self) -> &DMatrix<u64> {
        &self.matrix
    }
}

/// Enumerate the affine weight tuples for d-flats over F_q.
pub fn generate_coefficients(d: usize, q: u32) -> CoefficientSet {
    let arity = d + 1;
    let mut tuples = BTreeSet::new();
    let mut tuple = vec![0u32; arity];
    loop {
        if weight_sum(q, &tuple) == 1 % q {
            tuples.insert(tuple.clone());
        }
        // Odometer step over 0..q in every slot.
        let Some(slot) = tuple.iter().rposition(|&w| w + 1 < q) else {
            break;
        };
        tuple[slot] += 1;
        for w in &mut tuple[slot + 1..] {
            *w = 0;
        }
    }
    debug!(d, q, tuples = tuples.len(), "generated affine coefficients");
    let columns: Vec<u64> = tuples
        .iter()
        .flat_map(|t| t.iter().map(|&w| w as u64))
        .collect();
    let matrix = DMatrix::from_column_slice(arity, tuples.len(), &columns);
    CoefficientSet {
        d,
        q,
        tuples,
        matrix,
    }
}
