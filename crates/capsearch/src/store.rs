//! Persisted solutions and the resumable solver.
//!
//! Purpose
//! - A completed (d, q, n) search is written once and loaded on later runs
//!   instead of searched again.
//! - A solved (d, q, n-1) cap, lifted by a zero coordinate, is a cap of
//!   F_q^n; its size is a lower bound the fresh search must reach.
//!
//! File layout (under the store root)
//! - `{d}_{q}_{n}.json`: the best cap.
//! - `{d}_{q}_{n}_all.json`: every cap of maximum size.
//!
//! Unreadable or inconsistent files count as "not solved"; the solver logs a
//! warning and searches again.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::cap::Cap;
use crate::error::CapError;
use crate::search::{find_maximum_caps, SearchCfg, SearchStats};
use crate::space::{AffineSpace, Point};

/// Best cap and all maximum caps for one (d, q, n).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionSet {
    pub d: usize,
    pub q: u32,
    pub n: usize,
    pub best: Cap,
    pub maximal: Vec<Cap>,
}

impl SolutionSet {
    /// Size of a maximum cap.
    #[inline]
    pub fn cap_size(&self) -> usize {
        self.best.len()
    }

    pub fn space(&self) -> Result<AffineSpace, CapError> {
        AffineSpace::new(self.q, self.n)
    }
}

#[derive(Serialize, Deserialize)]
struct BestFile {
    d: usize,
    q: u32,
    n: usize,
    cap: Vec<Vec<u32>>,
}

#[derive(Serialize, Deserialize)]
struct AllFile {
    d: usize,
    q: u32,
    n: usize,
    caps: Vec<Vec<Vec<u32>>>,
}

fn encode_cap(cap: &Cap) -> Vec<Vec<u32>> {
    cap.points().iter().map(|p| p.iter().copied().collect()).collect()
}

fn decode_cap(space: &AffineSpace, raw: Vec<Vec<u32>>) -> Result<Cap, CapError> {
    let points = raw
        .into_iter()
        .map(|coords| {
            let p = Point::from_vec(coords);
            space.contains(&p).map(|_| p)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Cap::new(points))
}

/// Directory of solution files.
#[derive(Clone, Debug)]
pub struct SolutionStore {
    root: PathBuf,
}

impl SolutionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn best_path(&self, d: usize, q: u32, n: usize) -> PathBuf {
        self.root.join(format!("{d}_{q}_{n}.json"))
    }

    pub fn all_path(&self, d: usize, q: u32, n: usize) -> PathBuf {
        self.root.join(format!("{d}_{q}_{n}_all.json"))
    }

    /// Load a complete solution; `None` when absent or unusable.
    pub fn load(&self, d: usize, q: u32, n: usize) -> Option<SolutionSet> {
        let all_path = self.all_path(d, q, n);
        if !all_path.exists() {
            return None;
        }
        match self.read_solution(d, q, n) {
            Ok(sol) => Some(sol),
            Err(err) => {
                warn!(path = %all_path.display(), %err, "ignoring unusable solution");
                None
            }
        }
    }

    /// Best cap of a solved (d, q, n), if its file is present and valid.
    pub fn load_best(&self, d: usize, q: u32, n: usize) -> Option<Cap> {
        let path = self.best_path(d, q, n);
        if !path.exists() {
            return None;
        }
        let read = || -> Result<Cap, CapError> {
            let space = AffineSpace::new(q, n)?;
            let file: BestFile = read_json(&path)?;
            check_header(&path, (file.d, file.q, file.n), (d, q, n))?;
            decode_cap(&space, file.cap)
        };
        match read() {
            Ok(cap) => Some(cap),
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unusable best cap");
                None
            }
        }
    }

    pub fn save(&self, sol: &SolutionSet) -> Result<(), CapError> {
        fs::create_dir_all(&self.root).map_err(|e| CapError::io(&self.root, e))?;
        let best = BestFile {
            d: sol.d,
            q: sol.q,
            n: sol.n,
            cap: encode_cap(&sol.best),
        };
        write_json(&self.best_path(sol.d, sol.q, sol.n), &best)?;
        let all = AllFile {
            d: sol.d,
            q: sol.q,
            n: sol.n,
            caps: sol.maximal.iter().map(encode_cap).collect(),
        };
        write_json(&self.all_path(sol.d, sol.q, sol.n), &all)
    }

    fn read_solution(&self, d: usize, q: u32, n: usize) -> Result<SolutionSet, CapError> {
        let space = AffineSpace::new(q, n)?;
        let all_path = self.all_path(d, q, n);
        let file: AllFile = read_json(&all_path)?;
        check_header(&all_path, (file.d, file.q, file.n), (d, q, n))?;
        let maximal = file
            .caps
            .into_iter()
            .map(|raw| decode_cap(&space, raw))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(size) = maximal.first().map(Cap::len) else {
            return Err(CapError::corrupt("solution lists no caps"));
        };
        if maximal.iter().any(|c| c.len() != size) {
            return Err(CapError::corrupt("maximal caps differ in size"));
        }
        let best = match self.load_best(d, q, n) {
            Some(best) if best.len() == size => best,
            _ => self.restore_best(d, q, n, &maximal[0]),
        };
        Ok(SolutionSet {
            d,
            q,
            n,
            best,
            maximal,
        })
    }

    /// Rewrite a missing or stale best-cap file from the maximal list.
    fn restore_best(&self, d: usize, q: u32, n: usize, best: &Cap) -> Cap {
        let path = self.best_path(d, q, n);
        warn!(path = %path.display(), "best cap missing or stale; restoring from maximal caps");
        let file = BestFile {
            d,
            q,
            n,
            cap: encode_cap(best),
        };
        if let Err(err) = write_json(&path, &file) {
            warn!(path = %path.display(), %err, "could not restore best cap");
        }
        best.clone()
    }
}

fn check_header(
    path: &Path,
    got: (usize, u32, usize),
    expected: (usize, u32, usize),
) -> Result<(), CapError> {
    if got != expected {
        return Err(CapError::corrupt(format!(
            "{} holds (d, q, n) = {got:?}, expected {expected:?}",
            path.display()
        )));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CapError> {
    let bytes = fs::read(path).map_err(|e| CapError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| CapError::Format {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CapError> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| CapError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|e| CapError::io(path, e))
}

/// Outcome of `Solver::solve`.
#[derive(Clone, Debug)]
pub struct SolveReport {
    pub solution: SolutionSet,
    /// Loaded from the store instead of searched.
    pub cached: bool,
    /// Size of the embedded (d, q, n-1) cap, when one was available.
    pub seed_size: Option<usize>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// Solves (d, q, n) triples against a `SolutionStore`.
#[derive(Clone, Debug)]
pub struct Solver {
    store: SolutionStore,
    cfg: SearchCfg,
    force: bool,
}

impl Solver {
    pub fn new(store: SolutionStore, cfg: SearchCfg) -> Self {
        Self {
            store,
            cfg,
            force: false,
        }
    }

    /// Search even when a stored solution exists.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[inline]
    pub fn store(&self) -> &SolutionStore {
        &self.store
    }

    #[inline]
    pub fn cfg(&self) -> SearchCfg {
        self.cfg
    }

    /// Solve (d, q, n); `d > n` is clamped to `n`.
    pub fn solve(&self, d: usize, q: u32, n: usize) -> Result<SolveReport, CapError> {
        let space = AffineSpace::new(q, n)?;
        let d = d.min(n);
        let _span = info_span!("solve", d, q, n).entered();
        let start = Instant::now();
        if !self.force {
            if let Some(solution) = self.store.load(d, q, n) {
                info!(d, q, n, size = solution.cap_size(), "solution previously found");
                return Ok(SolveReport {
                    solution,
                    cached: true,
                    seed_size: None,
                    stats: SearchStats::default(),
                    elapsed: start.elapsed(),
                });
            }
        }
        let seed_size = self.seed(&space, d).map(|seed| seed.len());
        info!(d, q, n, seed = ?seed_size, "searching for maximum caps");
        let out = find_maximum_caps(space, d, self.cfg)?;
        if let Some(lower) = seed_size {
            if out.best.len() < lower {
                warn!(
                    size = out.best.len(),
                    lower, "maximum cap smaller than the embedded lower-dimensional cap"
                );
            }
        }
        let solution = SolutionSet {
            d,
            q,
            n,
            best: out.best,
            maximal: out.maximal,
        };
        self.store.save(&solution)?;
        let elapsed = start.elapsed();
        info!(
            d,
            q,
            n,
            size = solution.cap_size(),
            caps = solution.maximal.len(),
            secs = elapsed.as_secs_f64(),
            "{} caps of size {} found",
            solution.maximal.len(),
            solution.cap_size()
        );
        Ok(SolveReport {
            solution,
            cached: false,
            seed_size,
            stats: out.stats,
            elapsed,
        })
    }

    /// The stored (d, q, n-1) best cap lifted into `space`, if it is a cap there.
    fn seed(&self, space: &AffineSpace, d: usize) -> Option<Cap> {
        let lower_n = space.n().checked_sub(1)?;
        if d >= space.n() {
            return None;
        }
        let lower = self.store.load_best(d, space.q(), lower_n)?;
        let seed = lower.embed_into(space)?;
        if !seed.is_cap(space, d) {
            warn!(n = lower_n, "stored lower-dimensional cap is not a cap; ignoring");
            return None;
        }
        debug!(size = seed.len(), "embedded lower-dimensional cap");
        Some(seed)
    }
}
