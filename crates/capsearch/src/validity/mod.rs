//! Validity sets and the elimination waves that maintain them.
//!
//! Purpose
//! - Track, for the current cap prefix, which points may still be appended.
//! - Each cap extension runs one wave: every flat-defining point tuple becomes an
//!   independent task that marks the points of its affine span invalid.
//!
//! Why this design
//! - Tasks only ever store `false` into a shared `AtomicBool` array, so racing
//!   writes converge and no lock is needed. A wave is checked after the join:
//!   the mark count must match `tasks × |coeffs|`.
//! - Waves run on a fixed rayon pool owned by the search context; small waves
//!   run inline since their dispatch cost exceeds the work.
//! - A child set is built from a copy of the parent, so unwinding a branch just
//!   drops the child.
//!
//! Code cross-refs: `space::AffineSpace::combine_columns`, `coeffs::CoefficientSet`.

mod elim;
mod types;

pub use elim::{eliminate, Eliminator, WaveStats};
pub use types::ValiditySet;
