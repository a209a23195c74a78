//! Multi-project sandbox aggregation
//!
//! Sums static scenario baselines over a staged set of (project, scenario)
//! pairs. Deterministic: no sampling happens here.

use crate::scenario::SandboxBaselines;
use serde::{Deserialize, Serialize};

/// Total delay above which the sandbox reports medium risk
const MEDIUM_RISK_DELAY_DAYS: i64 = 20;

/// Total delay above which the sandbox reports high risk
const HIGH_RISK_DELAY_DAYS: i64 = 40;

/// A (project, scenario) pair queued for aggregate evaluation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StagedScenario {
    pub project_id: String,
    pub scenario: String,
}

impl StagedScenario {
    pub fn new(project_id: impl Into<String>, scenario: impl Into<String>) -> Self {
        StagedScenario {
            project_id: project_id.into(),
            scenario: scenario.into(),
        }
    }
}

/// Caller-managed working set of staged scenarios, in staging order
///
/// Staging a pair that is already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedSet {
    items: Vec<StagedScenario>,
}

impl StagedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a pair; returns false when it was already staged
    pub fn stage(&mut self, project_id: &str, scenario: &str) -> bool {
        if self.contains(project_id, scenario) {
            tracing::debug!(project = project_id, scenario, "pair already staged");
            return false;
        }
        self.items.push(StagedScenario::new(project_id, scenario));
        true
    }

    /// Remove a pair; returns false when it was not staged
    pub fn unstage(&mut self, project_id: &str, scenario: &str) -> bool {
        let before = self.items.len();
        self.items
            .retain(|s| !(s.project_id == project_id && s.scenario == scenario));
        self.items.len() != before
    }

    pub fn contains(&self, project_id: &str, scenario: &str) -> bool {
        self.items
            .iter()
            .any(|s| s.project_id == project_id && s.scenario == scenario)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[StagedScenario] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedScenario> {
        self.items.iter()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for StagedSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut set = StagedSet::new();
        for (project_id, scenario) in iter {
            set.stage(project_id, scenario);
        }
        set
    }
}

/// Aggregate risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SandboxRisk {
    Low,
    Medium,
    High,
}

impl SandboxRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            SandboxRisk::Low => "Low",
            SandboxRisk::Medium => "Medium",
            SandboxRisk::High => "High",
        }
    }

    /// Low up to 20 days, Medium up to 40, High beyond
    pub fn from_total_delay(total_delay_days: i64) -> Self {
        if total_delay_days > HIGH_RISK_DELAY_DAYS {
            SandboxRisk::High
        } else if total_delay_days > MEDIUM_RISK_DELAY_DAYS {
            SandboxRisk::Medium
        } else {
            SandboxRisk::Low
        }
    }
}

impl std::fmt::Display for SandboxRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate impact of a staged set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SandboxResult {
    /// Combined delay in days
    pub delay: i64,
    /// Combined cost pressure in percentage points
    pub cost: i64,
    pub count: usize,
    pub risk: SandboxRisk,
}

/// Sandbox aggregator bound to a baseline table
#[derive(Debug, Clone, Default)]
pub struct SandboxAggregator {
    baselines: SandboxBaselines,
}

impl SandboxAggregator {
    pub fn new(baselines: SandboxBaselines) -> Self {
        SandboxAggregator { baselines }
    }

    /// Sum baselines over every entry given
    ///
    /// Entries are not deduplicated here; stage through `StagedSet` for that.
    pub fn aggregate(&self, staged: &[StagedScenario]) -> SandboxResult {
        let (delay, cost) = staged.iter().fold((0i64, 0i64), |(delay, cost), item| {
            let baseline = self.baselines.baseline(&item.scenario);
            (delay + baseline.delay_days, cost + baseline.cost_points)
        });

        SandboxResult {
            delay,
            cost,
            count: staged.len(),
            risk: SandboxRisk::from_total_delay(delay),
        }
    }
}

/// Aggregate against the built-in sandbox table
pub fn aggregate(staged: &[StagedScenario]) -> SandboxResult {
    SandboxAggregator::default().aggregate(staged)
}
