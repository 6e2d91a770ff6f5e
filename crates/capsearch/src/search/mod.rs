//! Backtracking search for maximum caps with validity-set pruning.
//!
//! Purpose
//! - Enumerate extensions of the affine basis in ascending index order, so each
//!   point set is visited once, and keep every cap of the largest size found.
//!
//! Why this design
//! - The search itself is sequential depth-first recursion; all parallelism
//!   lives in the elimination waves (`validity`).
//! - `SearchContext` owns everything fixed for one (d, q, n): the coefficient
//!   set, the worker pool, and the configuration. The per-run `CapRunner` owns
//!   the mutable parts: the index→point cache and the `MaxCaps` accumulator.
//!
//! Code cross-refs: `validity::Eliminator`, `cap::Cap`, `store::Solver`.

mod dfs;
mod types;

pub use dfs::{find_maximum_caps, search};
pub use types::{MaxCaps, Offer, SearchCfg, SearchContext, SearchOutcome, SearchStats};

#[cfg(test)]
mod tests;
