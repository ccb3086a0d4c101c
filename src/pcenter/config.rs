//! P-center tabu search configuration.

use std::time::Duration;

use crate::graph::Distance;

/// How long an accepted swap stays forbidden.
///
/// The drawn value `tt` is added to the current iteration; the reverse swap
/// is tabu until the iteration index passes `iteration + tt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenureRule {
    /// `tt = P/5 + 5 + U[1, P/10 + 5]`, scaled to the facility count.
    #[default]
    Scaled,

    /// `tt = ⌊0.6 N⌋ + U[0, ⌊0.8 P⌋)`, scaled to the vertex count.
    ///
    /// Much longer tenures; useful on instances where the scaled rule cycles.
    NodeScaled,

    /// A constant tenure.
    Fixed(usize),
}

/// Configuration for the p-center tabu search.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pcenter::pcenter::{PCenterConfig, TenureRule};
///
/// let config = PCenterConfig::default()
///     .with_max_iterations(5_000)
///     .with_target_objective(127)
///     .with_time_limit(Duration::from_secs(10))
///     .with_tenure(TenureRule::Fixed(12))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PCenterConfig {
    /// Maximum number of search iterations after construction.
    pub max_iterations: usize,

    /// Known bound; the search stops once the best objective is at or below it.
    pub target_objective: Option<Distance>,

    /// Wall-clock budget, checked once per iteration.
    pub time_limit: Option<Duration>,

    /// Tabu tenure rule.
    pub tenure: TenureRule,

    /// Random seed (None for fresh entropy).
    pub seed: Option<u64>,
}

impl Default for PCenterConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            target_objective: None,
            time_limit: None,
            tenure: TenureRule::default(),
            seed: None,
        }
    }
}

impl PCenterConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_target_objective(mut self, target: Distance) -> Self {
        self.target_objective = Some(target);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_tenure(mut self, tenure: TenureRule) -> Self {
        self.tenure = tenure;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let TenureRule::Fixed(0) = self.tenure {
            return Err("fixed tenure must be at least 1".into());
        }
        if let Some(limit) = self.time_limit {
            if limit.is_zero() {
                return Err("time_limit must be positive".into());
            }
        }
        Ok(())
    }
}
