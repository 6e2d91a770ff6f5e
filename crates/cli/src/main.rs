use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use capsearch::{Cap, SearchCfg, SolutionSet, SolutionStore, SolveReport, Solver};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod summary;

use summary::SummaryRow;

#[derive(Parser)]
#[command(name = "capsearch")]
#[command(about = "Search for maximum d-caps in the affine space F_q^n")]
struct Cmd {
    /// Directory holding `{d}_{q}_{n}.json` solution files
    #[arg(long, global = true, default_value = "results")]
    results_dir: PathBuf,

    /// Elimination worker threads (0 = one per core)
    #[arg(long, global = true, default_value_t = 0)]
    threads: usize,

    /// Log search progress at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

/// A (d, q, n) configuration; d > n is clamped to n.
#[derive(Args, Clone, Copy, Debug)]
struct Triple {
    /// Flat dimension d (no d+2 points on a d-flat)
    #[arg(short, long, default_value_t = 1)]
    d: usize,
    /// Field order q (prime)
    #[arg(short, long, default_value_t = 3)]
    q: u32,
    /// Space dimension n
    #[arg(short, long, default_value_t = 2)]
    n: usize,
}

impl Triple {
    fn normalized(self) -> Result<Self> {
        ensure!(self.d >= 1, "d must be a positive integer");
        if self.d > self.n {
            tracing::info!(d = self.d, n = self.n, "clamping d to n");
        }
        Ok(Self {
            d: self.d.min(self.n),
            ..self
        })
    }
}

#[derive(Subcommand)]
enum Action {
    /// Find all maximum caps for one (d, q, n), reusing stored solutions
    Solve {
        #[command(flatten)]
        triple: Triple,
        /// Search again even if a solution is stored
        #[arg(long)]
        force: bool,
    },
    /// Solve every d from n down to 1; n = 0 sweeps n = 1, 2, ... without end
    Sweep {
        #[arg(short, long, default_value_t = 0)]
        n: usize,
        #[arg(short, long, default_value_t = 3)]
        q: u32,
        #[arg(long)]
        force: bool,
        /// Write a CSV summary of the sweep (rewritten after each n)
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Print the best cap as a '0'/'1' state string in point-index order
    State {
        #[command(flatten)]
        triple: Triple,
    },
    /// Brute-force check every stored maximum cap for forbidden flats
    Verify {
        #[command(flatten)]
        triple: Triple,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    let cfg = SearchCfg {
        threads: cmd.threads,
        ..SearchCfg::default()
    };
    let store = SolutionStore::new(&cmd.results_dir);
    match cmd.action {
        Action::Solve { triple, force } => {
            let solver = Solver::new(store, cfg).force(force);
            solve(&solver, triple.normalized()?).map(|_| ())
        }
        Action::Sweep {
            n,
            q,
            force,
            summary,
        } => sweep(&Solver::new(store, cfg).force(force), n, q, summary).map(|_| ()),
        Action::State { triple } => {
            println!("{}", state(&store, triple.normalized()?)?);
            Ok(())
        }
        Action::Verify { triple } => verify(&store, triple.normalized()?),
    }
}

fn solve(solver: &Solver, t: Triple) -> Result<SolveReport> {
    println!("---- Searching for {}-caps in F_{}^{} ----", t.d, t.q, t.n);
    let report = solver
        .solve(t.d, t.q, t.n)
        .with_context(|| format!("solving d={} q={} n={}", t.d, t.q, t.n))?;
    let sol = &report.solution;
    println!(
        "{} caps of size {} were found{}.",
        sol.maximal.len(),
        sol.cap_size(),
        if report.cached { " (stored)" } else { "" }
    );
    println!("Example cap: {}", format_cap(&sol.best));
    if !report.cached {
        let artifact = solver.store().all_path(t.d, t.q, t.n);
        provenance::write_sidecar(&artifact, &report, solver)?;
    }
    Ok(report)
}

fn sweep(
    solver: &Solver,
    n: usize,
    q: u32,
    summary: Option<PathBuf>,
) -> Result<Vec<SummaryRow>> {
    let dims: Box<dyn Iterator<Item = usize>> = if n == 0 {
        Box::new(1..)
    } else {
        Box::new(std::iter::once(n))
    };
    let mut rows = Vec::new();
    for n in dims {
        for d in (1..=n).rev() {
            let report = solve(solver, Triple { d, q, n })?;
            rows.push(SummaryRow::from(&report));
            println!();
        }
        if let Some(path) = &summary {
            summary::write_csv(path, &rows)?;
        }
    }
    Ok(rows)
}

fn stored(store: &SolutionStore, t: Triple) -> Result<SolutionSet> {
    let Some(sol) = store.load(t.d, t.q, t.n) else {
        bail!(
            "no stored solution for d={} q={} n={} under {} (run `solve` first)",
            t.d,
            t.q,
            t.n,
            store.root().display()
        );
    };
    Ok(sol)
}

fn state(store: &SolutionStore, t: Triple) -> Result<String> {
    let sol = stored(store, t)?;
    Ok(sol.best.to_state_string(&sol.space()?))
}

fn verify(store: &SolutionStore, t: Triple) -> Result<()> {
    let sol = stored(store, t)?;
    let space = sol.space()?;
    for (i, cap) in sol.maximal.iter().enumerate() {
        if let Some(flat) = cap.forbidden_flat(&space, t.d) {
            let idx = cap.indices(&space);
            let on_flat: Vec<usize> = flat.iter().map(|&k| idx[k]).collect();
            bail!("cap #{i} has points {on_flat:?} on a common {}-flat", t.d);
        }
    }
    println!(
        "All {} caps of size {} verified for d={}.",
        sol.maximal.len(),
        sol.cap_size(),
        t.d
    );
    Ok(())
}

fn format_cap(cap: &Cap) -> String {
    let pts: Vec<String> = cap
        .points()
        .iter()
        .map(|p| {
            let coords: Vec<String> = p.iter().map(u32::to_string).collect();
            format!("({})", coords.join(","))
        })
        .collect();
    pts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_consistent() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn solve_defaults_to_set_plane() {
        let cmd = Cmd::try_parse_from(["capsearch", "solve"]).unwrap();
        match cmd.action {
            Action::Solve { triple, force } => {
                assert_eq!((triple.d, triple.q, triple.n), (1, 3, 2));
                assert!(!force);
            }
            _ => panic!("expected solve"),
        }
        assert_eq!(cmd.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn triple_clamps_d_and_rejects_zero() {
        let t = Triple { d: 5, q: 3, n: 2 }.normalized().unwrap();
        assert_eq!(t.d, 2);
        assert!(Triple { d: 0, q: 3, n: 2 }.normalized().is_err());
    }

    #[test]
    fn solve_then_verify_round_trip() {
        let dir = tempdir().unwrap();
        let solver = Solver::new(SolutionStore::new(dir.path()), SearchCfg::default());
        let t = Triple { d: 1, q: 3, n: 2 };
        let report = solve(&solver, t).unwrap();
        assert_eq!(report.solution.cap_size(), 4);
        let sidecar = dir.path().join("1_3_2_all.provenance.json");
        assert!(sidecar.exists());
        verify(solver.store(), t).unwrap();
        assert!(verify(solver.store(), Triple { d: 1, q: 3, n: 3 }).is_err());
    }

    #[test]
    fn state_reads_the_stored_best_cap() {
        let dir = tempdir().unwrap();
        let solver = Solver::new(SolutionStore::new(dir.path()), SearchCfg::default());
        let t = Triple { d: 1, q: 3, n: 2 };
        assert!(state(solver.store(), t).is_err());
        assert!(!solver.store().all_path(1, 3, 2).exists());

        let report = solve(&solver, t).unwrap();
        let space = report.solution.space().unwrap();
        let line = state(solver.store(), t).unwrap();
        assert_eq!(line, report.solution.best.to_state_string(&space));
        assert_eq!(line.len(), 9);
        assert_eq!(line.matches('1').count(), 4);
    }

    #[test]
    fn sweep_solves_descending_d_and_writes_summary() {
        let dir = tempdir().unwrap();
        let solver = Solver::new(SolutionStore::new(dir.path()), SearchCfg::default());
        let csv = dir.path().join("summary.csv");
        let rows = sweep(&solver, 2, 3, Some(csv.clone())).unwrap();
        let shape: Vec<(usize, usize)> = rows.iter().map(|r| (r.d, r.cap_size)).collect();
        assert_eq!(shape, vec![(2, 3), (1, 4)]);
        assert!(rows.iter().all(|r| !r.cached && r.n == 2));
        // Header plus one line per solved triple.
        assert_eq!(std::fs::read_to_string(&csv).unwrap().lines().count(), 3);
        assert!(dir.path().join("2_3_2_all.provenance.json").exists());
    }

    #[test]
    fn format_cap_lists_coordinates() {
        let space = capsearch::AffineSpace::new(3, 2).unwrap();
        let cap = Cap::new(space.affine_basis());
        assert_eq!(format_cap(&cap), "(0,0) (1,0) (0,1)");
    }
}
