//! Per-instance solve records and an append-only text sink.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::graph::Distance;
use crate::pcenter::{PCenterInstance, PCenterResult, Vertex};

/// Summary of one solved instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveRecord {
    /// Seconds since the Unix epoch when the record was created.
    pub timestamp: u64,
    pub instance: String,
    pub n: usize,
    pub p: usize,
    pub objective: Distance,
    /// Best facility set, 0-indexed and sorted.
    pub facilities: Vec<Vertex>,
    pub iterations: usize,
    /// Wall-clock time including distance computation when measured by the
    /// batch driver. CPU time is not recorded.
    pub elapsed: Duration,
    /// The objective is the unreachable sentinel.
    pub degenerate: bool,
    /// Seed of the run.
    pub seed: u64,
    /// The facility set holds P distinct valid vertices.
    pub feasible: bool,
    /// Recomputing the objective from the facility set gives `objective`.
    pub objective_match: bool,
}

impl SolveRecord {
    pub fn new(
        instance: impl Into<String>,
        problem: &PCenterInstance,
        result: &PCenterResult,
        elapsed: Duration,
    ) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let instance = instance.into();
        let (feasible, objective_match) = match problem.evaluate(&result.facilities) {
            Ok(obj) if obj == result.objective => (true, true),
            Ok(obj) => {
                log::error!(
                    "{instance}: reported objective {} but the set evaluates to {obj}",
                    result.objective
                );
                (true, false)
            }
            Err(e) => {
                log::error!("{instance}: reported facility set is infeasible: {e}");
                (false, false)
            }
        };
        Self {
            timestamp,
            instance,
            n: problem.n(),
            p: problem.p(),
            objective: result.objective,
            facilities: result.facilities.clone(),
            iterations: result.iterations,
            elapsed,
            degenerate: result.degenerate,
            seed: result.seed,
            feasible,
            objective_match,
        }
    }

    /// Writes the record as one tab-separated line.
    ///
    /// Degenerate results are prefixed with `[DEGENERATE]` so they cannot be
    /// mistaken for a solution with a large radius.
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.degenerate {
            write!(out, "[DEGENERATE] ")?;
        }
        let facilities = self
            .facilities
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(
            out,
            "{}\t{}\tN={}\tP={}\tSc={}\titer={}\ttime={:.3}s\tseed={}\tfeasible={}\tmatch={}\tS=[{}]",
            self.timestamp,
            self.instance,
            self.n,
            self.p,
            self.objective,
            self.iterations,
            self.elapsed.as_secs_f64(),
            self.seed,
            u8::from(self.feasible),
            u8::from(self.objective_match),
            facilities
        )
    }

    /// Appends the record to a file, creating it when missing. Existing
    /// content is never truncated.
    pub fn append_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        self.write_line(&mut file)?;
        Ok(())
    }

    /// Writes the record as one JSON line.
    #[cfg(feature = "serde")]
    pub fn write_json_line<W: Write>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
