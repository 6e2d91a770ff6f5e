//! Configuration, context, and result types for the cap search.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::cap::Cap;
use crate::coeffs::{generate_coefficients, CoefficientSet};
use crate::error::CapError;
use crate::space::{AffineSpace, Point};
use crate::validity::Eliminator;

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchCfg {
    /// Elimination worker threads; 0 lets rayon pick (one per core).
    pub threads: usize,
    /// Waves with fewer tasks than this run on the search thread.
    pub inline_below: usize,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            threads: 0,
            inline_below: 8,
        }
    }
}

/// Everything fixed for one (d, q, n) run.
pub struct SearchContext {
    space: AffineSpace,
    d: usize,
    coeffs: CoefficientSet,
    pool: ThreadPool,
    cfg: SearchCfg,
}

impl SearchContext {
    /// Build the context; `d > n` is clamped to `n`.
    pub fn new(space: AffineSpace, d: usize, cfg: SearchCfg) -> Result<Self, CapError> {
        let d = d.min(space.n());
        let coeffs = generate_coefficients(d, space.q());
        let pool = ThreadPoolBuilder::new()
            .num_threads(cfg.threads)
            .thread_name(|i| format!("elim-{i}"))
            .build()
            .map_err(|e| CapError::Pool {
                reason: e.to_string(),
            })?;
        debug!(
            d,
            q = space.q(),
            n = space.n(),
            threads = pool.current_num_threads(),
            "search context"
        );
        Ok(Self {
            space,
            d,
            coeffs,
            pool,
            cfg,
        })
    }

    #[inline]
    pub fn space(&self) -> &AffineSpace {
        &self.space
    }

    /// Flat dimension after clamping.
    #[inline]
    pub fn d(&self) -> usize {
        self.d
    }

    #[inline]
    pub fn coeffs(&self) -> &CoefficientSet {
        &self.coeffs
    }

    #[inline]
    pub fn cfg(&self) -> SearchCfg {
        self.cfg
    }

    pub fn eliminator(&self) -> Eliminator<'_> {
        Eliminator::new(&self.space, &self.coeffs, &self.pool, self.cfg.inline_below)
    }
}

/// Counters reported with every search result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Recursion nodes entered.
    pub nodes: usize,
    /// Nodes without any valid extension.
    pub leaves: usize,
    pub waves: usize,
    pub tasks: usize,
}

/// Result of a search: the first maximum cap found and all caps of that size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: Cap,
    pub maximal: Vec<Cap>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Outcome for a configuration that needs no search.
    pub fn single(cap: Cap) -> Self {
        Self {
            best: cap.clone(),
            maximal: vec![cap],
            stats: SearchStats::default(),
        }
    }
}

/// How an offered cap compared with the current maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    Larger,
    Tie,
    Smaller,
}

/// Accumulator of the largest caps seen so far.
///
/// A strictly larger cap resets the list; an equal one is appended.
#[derive(Clone, Debug, Default)]
pub struct MaxCaps {
    caps: Vec<Cap>,
}

impl MaxCaps {
    pub fn offer(&mut self, cap: &[Point]) -> Offer {
        let verdict = match self.best_len() {
            None => Offer::Larger,
            Some(best) if cap.len() > best => Offer::Larger,
            Some(best) if cap.len() == best => Offer::Tie,
            Some(_) => Offer::Smaller,
        };
        match verdict {
            Offer::Larger => {
                self.caps.clear();
                self.caps.push(Cap::new(cap.to_vec()));
            }
            Offer::Tie => self.caps.push(Cap::new(cap.to_vec())),
            Offer::Smaller => {}
        }
        verdict
    }

    pub fn best_len(&self) -> Option<usize> {
        self.caps.first().map(Cap::len)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.caps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }

    pub fn into_caps(self) -> Vec<Cap> {
        self.caps
    }
}
