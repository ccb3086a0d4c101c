//! Solving many instances in one call.
//!
//! Every instance gets its own distance matrix, facility index and tabu
//! memory; nothing is shared between solves except the configuration. A
//! failure on one instance, including a panic inside the engine, is captured
//! in its [`BatchOutcome`] and does not stop the others. With the `parallel` feature, instances are solved
//! concurrently.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{PCenterError, Result};
use crate::graph::{Distance, DistanceOracle, RawInstance};
use crate::pcenter::{PCenterConfig, PCenterResult, PCenterRunner};
use crate::report::SolveRecord;

/// One named instance to solve.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub name: String,
    pub raw: RawInstance,
    /// Known optimal radius, used as the stopping target for this instance.
    pub target: Option<Distance>,
}

impl BatchItem {
    pub fn new(name: impl Into<String>, raw: RawInstance) -> Self {
        Self {
            name: name.into(),
            raw,
            target: None,
        }
    }

    pub fn with_target(mut self, target: Distance) -> Self {
        self.target = Some(target);
        self
    }
}

/// Result of one batch entry.
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub outcome: Result<(PCenterResult, SolveRecord)>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn record(&self) -> Option<&SolveRecord> {
        self.outcome.as_ref().ok().map(|(_, record)| record)
    }
}

/// Batch solver.
pub struct BatchRunner;

impl BatchRunner {
    /// Solves every item, preserving input order in the output.
    ///
    /// When `config.seed` is set, item `k` runs with seed `seed + k` so that
    /// the batch is reproducible without every instance sharing one random
    /// stream.
    pub fn run<O>(items: &[BatchItem], oracle: &O, config: &PCenterConfig) -> Vec<BatchOutcome>
    where
        O: DistanceOracle + Sync,
    {
        #[cfg(feature = "parallel")]
        let outcomes = items
            .par_iter()
            .enumerate()
            .map(|(k, item)| Self::solve_one(k, item, oracle, config))
            .collect::<Vec<_>>();

        #[cfg(not(feature = "parallel"))]
        let outcomes = items
            .iter()
            .enumerate()
            .map(|(k, item)| Self::solve_one(k, item, oracle, config))
            .collect::<Vec<_>>();

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        log::info!(
            "batch finished: {} solved, {} failed",
            outcomes.len() - failed,
            failed
        );
        outcomes
    }

    fn solve_one<O: DistanceOracle>(
        k: usize,
        item: &BatchItem,
        oracle: &O,
        config: &PCenterConfig,
    ) -> BatchOutcome {
        let start = Instant::now();
        let mut config = config.clone();
        if let Some(seed) = config.seed {
            config.seed = Some(seed.wrapping_add(k as u64));
        }
        if let Some(target) = item.target {
            config.target_objective = Some(target);
        }

        let solve = || -> Result<(PCenterResult, SolveRecord)> {
            let instance = item.raw.build(oracle)?;
            let result = PCenterRunner::run(&instance, &config)?;
            let record = SolveRecord::new(&item.name, &instance, &result, start.elapsed());
            Ok((result, record))
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(solve))
            .unwrap_or_else(|payload| Err(PCenterError::Internal(panic_message(payload))));

        match &outcome {
            Ok((result, _)) => log::debug!(
                "{}: objective {} after {} iterations",
                item.name,
                result.objective,
                result.iterations
            ),
            Err(e @ PCenterError::Internal(_)) => log::error!("{}: {}", item.name, e),
            Err(e) => log::warn!("{}: {}", item.name, e),
        }

        BatchOutcome {
            name: item.name.clone(),
            outcome,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "solver panicked".to_string()
    }
}
