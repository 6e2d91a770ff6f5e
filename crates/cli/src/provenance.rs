use anyhow::{Context, Result};
use capsearch::{SolveReport, Solver};
use serde::Serialize;
use serde_json::json;
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Write `<artifact>.provenance.json` next to a freshly searched solution:
/// git revision, callsite, the (d, q, n) and pool settings, and search counters.
#[track_caller]
pub fn write_sidecar(artifact: &Path, report: &SolveReport, solver: &Solver) -> Result<PathBuf> {
    let sidecar = sidecar_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let sol = &report.solution;
    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "capsearch": capsearch::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": params(report, solver),
        "result": {
            "cap_size": sol.cap_size(),
            "caps": sol.maximal.len(),
            "seed_size": report.seed_size,
            "nodes": report.stats.nodes,
            "leaves": report.stats.leaves,
            "waves": report.stats.waves,
            "tasks": report.stats.tasks,
            "secs": report.elapsed.as_secs_f64()
        },
        "outputs": [
            solver.store().best_path(sol.d, sol.q, sol.n).to_string_lossy(),
            artifact.to_string_lossy()
        ]
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    tracing::debug!(path = %sidecar.display(), "provenance");
    Ok(sidecar)
}

/// Inputs that reproduce a search.
#[derive(Serialize)]
struct Params {
    d: usize,
    q: u32,
    n: usize,
    threads: usize,
    inline_below: usize,
}

fn params(report: &SolveReport, solver: &Solver) -> Params {
    let sol = &report.solution;
    let cfg = solver.cfg();
    Params {
        d: sol.d,
        q: sol.q,
        n: sol.n,
        threads: cfg.threads,
        inline_below: cfg.inline_below,
    }
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("solution"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use capsearch::{SearchCfg, SolutionStore};
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_replaces_extension() {
        let base = Path::new("/tmp/results/1_3_2_all.json");
        assert_eq!(
            sidecar_path(base),
            Path::new("/tmp/results/1_3_2_all.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_params_and_outputs() {
        let dir = tempdir().unwrap();
        let solver = Solver::new(SolutionStore::new(dir.path()), SearchCfg::default());
        let report = solver.solve(1, 3, 2).unwrap();
        let artifact = solver.store().all_path(1, 3, 2);
        let path = write_sidecar(&artifact, &report, &solver).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["params"]["q"], 3);
        assert_eq!(parsed["result"]["cap_size"], 4);
        assert_eq!(parsed["outputs"][1], artifact.to_string_lossy().as_ref());
    }
}
