//! Monte Carlo scenario simulation
//!
//! Projects delay and cost-impact distributions for one (project, scenario)
//! pair by sampling normal deviates around the scenario baseline.
//!
//! Global invariants enforced:
//! - Each run is independent and reentrant
//! - Identical (project, scenario, iterations, seed) yields identical results
//! - Percentiles are read from sorted samples, so P10 <= P50 <= P80 <= P90 <= P95

use crate::error::{EngineError, EngineResult};
use crate::project::Project;
use crate::rng::UniformSource;
use crate::scenario::ScenarioTable;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};

/// Number of histogram buckets, fixed regardless of range
pub const HISTOGRAM_BUCKETS: usize = 18;

/// Iteration count used when the caller has no preference
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Standard deviation of the trial delay, in days
const DELAY_SPREAD_DAYS: f64 = 8.0;

/// Standard deviation of the trial cost fraction
const COST_SPREAD: f64 = 0.04;

/// DRI is divided by this to add delivery-risk drag (days)
const DRI_DELAY_DIVISOR: f64 = 10.0;

/// FRI is divided by this to add financial-risk cost pressure
const FRI_COST_DIVISOR: f64 = 500.0;

/// One histogram bucket `[label, label + width)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistogramBucket {
    /// Lower bound of the bucket (days)
    pub label: i64,
    pub count: usize,
    /// Share of all trials, one decimal
    pub pct: f64,
}

/// Summary of one Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationResult {
    pub project_id: String,
    pub scenario: String,
    pub iterations: usize,
    pub histogram: Vec<HistogramBucket>,
    pub p10: i64,
    pub p50: i64,
    pub p80: i64,
    pub p90: i64,
    /// P95 delay
    pub worst_delay: i64,
    /// Mean delay in days, one decimal
    pub avg_delay: f64,
    /// Mean cost impact in percent, one decimal
    pub avg_cost: f64,
    /// P80 cost impact in percent, one decimal
    pub cost_p80: f64,
}

/// Round to a fixed number of decimal places
pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Box-Muller transform of two uniforms into two standard normal deviates
///
/// z1 = sqrt(-2 ln u1) * cos(2 pi u2)
/// z2 = sqrt(-2 ln u2) * cos(2 pi u1)
pub fn box_muller(u1: f64, u2: f64) -> (f64, f64) {
    let z1 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    let z2 = (-2.0 * u2.ln()).sqrt() * (2.0 * PI * u1).cos();
    (z1, z2)
}

/// Value at fraction `p` of a sorted slice: `sorted[floor(N * p)]`, clamped to the last index
///
/// Returns `None` for an empty slice.
pub fn percentile<T: Copy>(sorted: &[T], p: f64) -> Option<T> {
    let last = sorted.len().checked_sub(1)?;
    let idx = (sorted.len() as f64 * p.clamp(0.0, 1.0)).floor() as usize;
    Some(sorted[idx.min(last)])
}

/// Bucket sorted delays into 18 fixed-width buckets starting at the minimum
///
/// Width is `ceil((max - min) / 18)`, at least 1. Buckets are generated by
/// count, so when `max - min` is a positive multiple of 18 the maximum falls
/// just past the last bucket and is not counted.
pub fn build_histogram(sorted_delays: &[i64], iterations: usize) -> Vec<HistogramBucket> {
    let (Some(&min), Some(&max)) = (sorted_delays.first(), sorted_delays.last()) else {
        return Vec::new();
    };
    let buckets = HISTOGRAM_BUCKETS as i64;
    let width = ((max - min + buckets - 1) / buckets).max(1);

    (0..buckets)
        .map(|i| {
            let lo = min + i * width;
            let hi = lo + width;
            let count = sorted_delays.partition_point(|&d| d < hi)
                - sorted_delays.partition_point(|&d| d < lo);
            HistogramBucket {
                label: lo,
                count,
                pct: round_dp(count as f64 / iterations as f64 * 100.0, 1),
            }
        })
        .collect()
}

/// Monte Carlo engine bound to a scenario table
#[derive(Debug, Clone, Default)]
pub struct MonteCarloEngine {
    scenarios: ScenarioTable,
}

impl MonteCarloEngine {
    pub fn new(scenarios: ScenarioTable) -> Self {
        MonteCarloEngine { scenarios }
    }

    pub fn scenarios(&self) -> &ScenarioTable {
        &self.scenarios
    }

    /// Run `iterations` trials for one project under one scenario
    ///
    /// Unknown scenarios sample around the fallback baseline.
    pub fn simulate<R: UniformSource + ?Sized>(
        &self,
        project: &Project,
        scenario_id: &str,
        iterations: usize,
        rng: &mut R,
    ) -> EngineResult<SimulationResult> {
        self.run(project, scenario_id, iterations, rng, None)
    }

    /// Like `simulate`, checking `cancel` between trials
    pub fn simulate_with_cancel<R: UniformSource + ?Sized>(
        &self,
        project: &Project,
        scenario_id: &str,
        iterations: usize,
        rng: &mut R,
        cancel: &AtomicBool,
    ) -> EngineResult<SimulationResult> {
        self.run(project, scenario_id, iterations, rng, Some(cancel))
    }

    fn run<R: UniformSource + ?Sized>(
        &self,
        project: &Project,
        scenario_id: &str,
        iterations: usize,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> EngineResult<SimulationResult> {
        if iterations == 0 {
            return Err(EngineError::InvalidArgument(
                "iterations must be a positive integer".to_string(),
            ));
        }

        let baseline = self.scenarios.baseline(scenario_id);
        let delay_drag = project.dri / DRI_DELAY_DIVISOR;
        let cost_drag = project.fri / FRI_COST_DIVISOR;

        let mut delays: Vec<i64> = Vec::with_capacity(iterations);
        let mut costs: Vec<f64> = Vec::with_capacity(iterations);

        for trial in 0..iterations {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(EngineError::Cancelled {
                        completed: trial,
                        requested: iterations,
                    });
                }
            }

            let u1 = rng.next_uniform();
            let u2 = rng.next_uniform();
            let (z1, z2) = box_muller(u1, u2);

            let delay = baseline.delay_days as f64 + z1 * DELAY_SPREAD_DAYS + delay_drag;
            delays.push(delay.round() as i64);
            costs.push(round_dp(
                baseline.cost_multiplier + z2 * COST_SPREAD + cost_drag,
                3,
            ));
        }

        delays.sort_unstable();
        costs.sort_by(|a, b| a.total_cmp(b));

        let result = summarize(project, scenario_id, iterations, &delays, &costs);
        tracing::trace!(
            project = %project.id,
            scenario = scenario_id,
            iterations,
            p50 = result.p50,
            worst = result.worst_delay,
            "simulation complete"
        );
        Ok(result)
    }
}

/// Reduce sorted trial series to a result
fn summarize(
    project: &Project,
    scenario_id: &str,
    iterations: usize,
    delays: &[i64],
    costs: &[f64],
) -> SimulationResult {
    let delay_at = |p: f64| percentile(delays, p).unwrap_or_default();
    let n = iterations as f64;

    SimulationResult {
        project_id: project.id.clone(),
        scenario: scenario_id.to_string(),
        iterations,
        histogram: build_histogram(delays, iterations),
        p10: delay_at(0.10),
        p50: delay_at(0.50),
        p80: delay_at(0.80),
        p90: delay_at(0.90),
        worst_delay: delay_at(0.95),
        avg_delay: round_dp(delays.iter().sum::<i64>() as f64 / n, 1),
        avg_cost: round_dp(costs.iter().sum::<f64>() / n * 100.0, 1),
        cost_p80: round_dp(percentile(costs, 0.80).unwrap_or_default() * 100.0, 1),
    }
}

/// Simulate against the built-in scenario table
pub fn simulate<R: UniformSource + ?Sized>(
    project: &Project,
    scenario_id: &str,
    iterations: usize,
    rng: &mut R,
) -> EngineResult<SimulationResult> {
    MonteCarloEngine::default().simulate(project, scenario_id, iterations, rng)
}
