//! Cap value type, the state-string encoding, and a brute-force verifier.
//!
//! The state string is the contract with visual front ends: one '0'/'1' per
//! point in index order, '1' for cap members.
//!
//! The verifier checks the cap property directly (rank of difference vectors
//! mod q), without the weight tuples the search eliminates with.

use crate::error::CapError;
use crate::space::{AffineSpace, Point};
use crate::util::{combinations, rank_mod};

/// An ordered set of points, in the order the search appended them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cap {
    points: Vec<Point>,
}

impl Cap {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Point indices in cap order.
    pub fn indices(&self, space: &AffineSpace) -> Vec<usize> {
        self.points.iter().map(|p| space.point_to_index(p)).collect()
    }

    /// '0'/'1' per point of `space`, in index order.
    pub fn to_state_string(&self, space: &AffineSpace) -> String {
        let mut bits = vec![b'0'; space.size()];
        for i in self.indices(space) {
            bits[i] = b'1';
        }
        bits.into_iter().map(char::from).collect()
    }

    /// Parse a state string; a short string is padded with '0'.
    pub fn from_state_string(space: &AffineSpace, state: &str) -> Result<Self, CapError> {
        if state.len() > space.size() {
            return Err(CapError::state(format!(
                "{} symbols for a space of {} points",
                state.len(),
                space.size()
            )));
        }
        let mut points = Vec::new();
        for (i, ch) in state.chars().enumerate() {
            match ch {
                '0' => {}
                '1' => points.push(space.index_to_point(i)),
                other => {
                    return Err(CapError::state(format!(
                        "unexpected symbol {other:?} at {i}"
                    )))
                }
            }
        }
        Ok(Self { points })
    }

    /// Lift a cap of F_q^(n-1) into `space` by appending a zero coordinate.
    pub fn embed_into(&self, space: &AffineSpace) -> Option<Self> {
        self.points
            .iter()
            .map(|p| space.embed_lower(p))
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    /// Positions of d+2 cap points lying on a common d-flat, if any.
    pub fn forbidden_flat(&self, space: &AffineSpace, d: usize) -> Option<Vec<usize>> {
        let q = space.q() as u64;
        combinations(self.len(), d + 2).into_iter().find(|subset| {
            let base = &self.points[subset[0]];
            let rows: Vec<Vec<u64>> = subset[1..]
                .iter()
                .map(|&i| {
                    self.points[i]
                        .iter()
                        .zip(base.iter())
                        .map(|(&a, &b)| (a as u64 + q - b as u64) % q)
                        .collect()
                })
                .collect();
            rank_mod(rows, q) <= d
        })
    }

    /// True when no d+2 points lie on a common d-flat.
    pub fn is_cap(&self, space: &AffineSpace, d: usize) -> bool {
        self.forbidden_flat(space, d).is_none()
    }
}
