//! Depth-first cap extension with incremental validity updates.

use tracing::{debug, info, trace};

use crate::cap::Cap;
use crate::error::CapError;
use crate::space::{AffineSpace, Point};
use crate::validity::{Eliminator, ValiditySet};

use super::types::{MaxCaps, Offer, SearchCfg, SearchContext, SearchOutcome, SearchStats};

/// Search all extensions of `cap` by indices `>= cursor`.
///
/// Pre: `cap` is a cap and `validity` is correct for it.
pub fn search(
    ctx: &SearchContext,
    cap: Vec<Point>,
    cursor: usize,
    validity: &ValiditySet,
) -> Result<SearchOutcome, CapError> {
    CapRunner::new(ctx).run(cap, cursor, validity)
}

/// Maximum caps of F_q^n containing the affine basis (origin + `e_i`).
///
/// `d >= n` returns the basis without searching.
pub fn find_maximum_caps(
    space: AffineSpace,
    d: usize,
    cfg: SearchCfg,
) -> Result<SearchOutcome, CapError> {
    let basis = space.affine_basis();
    if d >= space.n() {
        debug!(d, n = space.n(), "every {}-point set is a cap", space.n() + 1);
        return Ok(SearchOutcome::single(Cap::new(basis)));
    }
    let ctx = SearchContext::new(space, d, cfg)?;
    let runner = CapRunner::new(&ctx);
    let start = runner
        .elim
        .update_complete(&basis, &ValiditySet::all_valid(space.size()))?;
    info!(
        d,
        q = space.q(),
        n = space.n(),
        candidates = start.count_valid(),
        "starting search"
    );
    runner.run(basis, 0, &start)
}

/// DFS runner carrying the per-run cache and accumulators.
struct CapRunner<'a> {
    ctx: &'a SearchContext,
    elim: Eliminator<'a>,
    cache: Vec<Option<Point>>,
    best: MaxCaps,
    nodes: usize,
    leaves: usize,
}

impl<'a> CapRunner<'a> {
    fn new(ctx: &'a SearchContext) -> Self {
        Self {
            ctx,
            elim: ctx.eliminator(),
            cache: vec![None; ctx.space().size()],
            best: MaxCaps::default(),
            nodes: 0,
            leaves: 0,
        }
    }

    fn run(
        mut self,
        mut cap: Vec<Point>,
        cursor: usize,
        validity: &ValiditySet,
    ) -> Result<SearchOutcome, CapError> {
        for p in &cap {
            self.ctx.space().contains(p)?;
        }
        self.recur(&mut cap, cursor, validity)?;
        let wave = self.elim.stats();
        let stats = SearchStats {
            nodes: self.nodes,
            leaves: self.leaves,
            waves: wave.waves,
            tasks: wave.tasks,
        };
        let maximal = self.best.into_caps();
        // The root is a leaf when nothing extends it, so at least one cap exists.
        let best = maximal.first().cloned().unwrap_or_else(|| Cap::new(cap));
        debug!(
            size = best.len(),
            caps = maximal.len(),
            nodes = stats.nodes,
            waves = stats.waves,
            "search finished"
        );
        Ok(SearchOutcome {
            best,
            maximal,
            stats,
        })
    }

    fn point(&mut self, index: usize) -> Point {
        let ctx = self.ctx;
        let space = ctx.space();
        self.cache[index]
            .get_or_insert_with(|| space.index_to_point(index))
            .clone()
    }

    fn recur(
        &mut self,
        cap: &mut Vec<Point>,
        cursor: usize,
        validity: &ValiditySet,
    ) -> Result<(), CapError> {
        self.nodes += 1;
        let mut extended = false;
        for index in validity.valid_from(cursor) {
            extended = true;
            trace!(depth = cap.len(), index, "extend");
            let p = self.point(index);
            cap.push(p);
            let next = if cap.len() > self.ctx.d() {
                self.elim.update_incremental(cap, validity)?
            } else {
                self.elim.update_complete(cap, validity)?
            };
            self.recur(cap, index + 1, &next)?;
            cap.pop();
        }
        if !extended {
            self.leaves += 1;
            match self.best.offer(cap) {
                Offer::Larger => debug!(size = cap.len(), "new maximum"),
                Offer::Tie => trace!(size = cap.len(), ties = self.best.len(), "tie"),
                Offer::Smaller => {}
            }
        }
        Ok(())
    }
}
