//! Exact search for maximum d-caps in the affine space F_q^n.
//!
//! A d-cap is a point set with no d+2 points on a common d-flat. For d=1, q=3
//! this is the "no three collinear" rule of the card game SET.
//!
//! Layout (leaf-first)
//! - `space`: F_q^n points, the index bijection, affine combinations.
//! - `coeffs`: affine weight tuples, computed once per (d, q).
//! - `validity`: validity sets and the parallel elimination waves.
//! - `search`: backtracking over cap extensions with validity pruning.
//! - `cap`: the cap value type, state strings, and a brute-force verifier.
//! - `store`: persisted solutions and the resumable `Solver`.
//!
//! API Policy
//! - The workspace binary is the only consumer; breaking changes are fine when
//!   they make the search clearer.

pub mod cap;
pub mod coeffs;
mod error;
pub mod search;
pub mod space;
pub mod store;
mod util;
pub mod validity;

pub use cap::Cap;
pub use coeffs::{generate_coefficients, CoefficientSet};
pub use error::CapError;
pub use search::{find_maximum_caps, search, SearchCfg, SearchContext, SearchOutcome, SearchStats};
pub use space::{AffineSpace, Point};
pub use store::{SolutionSet, SolutionStore, SolveReport, Solver};
pub use validity::{eliminate, Eliminator, ValiditySet};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
