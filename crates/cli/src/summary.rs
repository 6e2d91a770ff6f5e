//! Sweep summary table (one row per solved triple), written as CSV via polars.

use anyhow::{Context, Result};
use capsearch::SolveReport;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub d: usize,
    pub q: u32,
    pub n: usize,
    pub cap_size: usize,
    pub caps: usize,
    pub nodes: usize,
    pub secs: f64,
    pub cached: bool,
}

impl From<&SolveReport> for SummaryRow {
    fn from(r: &SolveReport) -> Self {
        Self {
            d: r.solution.d,
            q: r.solution.q,
            n: r.solution.n,
            cap_size: r.solution.cap_size(),
            caps: r.solution.maximal.len(),
            nodes: r.stats.nodes,
            secs: r.elapsed.as_secs_f64(),
            cached: r.cached,
        }
    }
}

pub fn to_frame(rows: &[SummaryRow]) -> PolarsResult<DataFrame> {
    let col = |f: fn(&SummaryRow) -> usize| rows.iter().map(|r| f(r) as u64).collect::<Vec<_>>();
    df!(
        "d" => col(|r| r.d),
        "q" => rows.iter().map(|r| r.q).collect::<Vec<_>>(),
        "n" => col(|r| r.n),
        "cap_size" => col(|r| r.cap_size),
        "caps" => col(|r| r.caps),
        "nodes" => col(|r| r.nodes),
        "secs" => rows.iter().map(|r| r.secs).collect::<Vec<_>>(),
        "cached" => rows.iter().map(|r| r.cached).collect::<Vec<_>>()
    )
}

pub fn write_csv(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut df = to_frame(rows)?;
    let mut file =
        File::create(path).with_context(|| format!("creating summary {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing summary {}", path.display()))?;
    tracing::info!(rows = df.height(), path = %path.display(), "sweep summary");
    Ok(())
}
