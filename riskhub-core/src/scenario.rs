//! Scenario baselines
//!
//! Two distinct tables live here and must not be unified:
//! - `ScenarioTable`: fractional cost multipliers sampled by the Monte Carlo engine
//! - `SandboxBaselines`: whole-percentage cost points summed by the sandbox
//!
//! Delay baselines agree across both tables. Unknown scenario ids resolve to
//! documented defaults instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Delay baseline (days) for unregistered scenarios
pub const DEFAULT_DELAY_DAYS: i64 = 10;

/// Fractional cost multiplier for unregistered scenarios
pub const DEFAULT_COST_MULTIPLIER: f64 = 0.06;

/// Sandbox cost pressure (percentage points) for unregistered scenarios
pub const DEFAULT_COST_POINTS: i64 = 6;

/// The five built-in what-if scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    BudgetCut,
    ScopeExpand,
    ResourceLoss,
    DeadlineCompress,
    ComplianceBreach,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::BudgetCut,
        Scenario::ScopeExpand,
        Scenario::ResourceLoss,
        Scenario::DeadlineCompress,
        Scenario::ComplianceBreach,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::BudgetCut => "budget_cut",
            Scenario::ScopeExpand => "scope_expand",
            Scenario::ResourceLoss => "resource_loss",
            Scenario::DeadlineCompress => "deadline_compress",
            Scenario::ComplianceBreach => "compliance_breach",
        }
    }

    pub fn from_name(name: &str) -> Option<Scenario> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Baseline schedule impact in days (negative compresses the schedule)
    pub fn delay_days(&self) -> i64 {
        match self {
            Scenario::BudgetCut => 14,
            Scenario::ScopeExpand => 21,
            Scenario::ResourceLoss => 28,
            Scenario::DeadlineCompress => -5,
            Scenario::ComplianceBreach => 10,
        }
    }

    /// Fractional cost multiplier used by Monte Carlo sampling
    pub fn cost_multiplier(&self) -> f64 {
        match self {
            Scenario::BudgetCut => -0.12,
            Scenario::ScopeExpand => 0.18,
            Scenario::ResourceLoss => 0.08,
            Scenario::DeadlineCompress => 0.14,
            Scenario::ComplianceBreach => 0.06,
        }
    }

    /// Whole-percentage cost pressure used by sandbox aggregation
    pub fn cost_points(&self) -> i64 {
        match self {
            Scenario::BudgetCut => -12,
            Scenario::ScopeExpand => 18,
            Scenario::ResourceLoss => 8,
            Scenario::DeadlineCompress => 14,
            Scenario::ComplianceBreach => 6,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Perturbation parameters sampled around by the Monte Carlo engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBaseline {
    pub delay_days: i64,
    pub cost_multiplier: f64,
}

impl ScenarioBaseline {
    pub const FALLBACK: ScenarioBaseline = ScenarioBaseline {
        delay_days: DEFAULT_DELAY_DAYS,
        cost_multiplier: DEFAULT_COST_MULTIPLIER,
    };
}

/// Scenario id to Monte Carlo baseline
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioTable {
    entries: BTreeMap<String, ScenarioBaseline>,
}

impl Default for ScenarioTable {
    fn default() -> Self {
        let entries = Scenario::ALL
            .into_iter()
            .map(|s| {
                (
                    s.name().to_string(),
                    ScenarioBaseline {
                        delay_days: s.delay_days(),
                        cost_multiplier: s.cost_multiplier(),
                    },
                )
            })
            .collect();
        ScenarioTable { entries }
    }
}

impl ScenarioTable {
    /// Register or replace a scenario
    pub fn insert(&mut self, id: impl Into<String>, baseline: ScenarioBaseline) {
        self.entries.insert(id.into(), baseline);
    }

    pub fn get(&self, id: &str) -> Option<ScenarioBaseline> {
        self.entries.get(id).copied()
    }

    /// Baseline for `id`, or the fallback (10 days, 0.06) when unregistered
    pub fn baseline(&self, id: &str) -> ScenarioBaseline {
        self.get(id).unwrap_or_else(|| {
            tracing::debug!(scenario = id, "unknown scenario, using fallback baseline");
            ScenarioBaseline::FALLBACK
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Deterministic per-scenario figures summed by the sandbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxBaseline {
    pub delay_days: i64,
    pub cost_points: i64,
}

impl SandboxBaseline {
    pub const FALLBACK: SandboxBaseline = SandboxBaseline {
        delay_days: DEFAULT_DELAY_DAYS,
        cost_points: DEFAULT_COST_POINTS,
    };
}

/// Scenario id to sandbox baseline (whole percentage points, not multipliers)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxBaselines {
    entries: BTreeMap<String, SandboxBaseline>,
}

impl Default for SandboxBaselines {
    fn default() -> Self {
        let entries = Scenario::ALL
            .into_iter()
            .map(|s| {
                (
                    s.name().to_string(),
                    SandboxBaseline {
                        delay_days: s.delay_days(),
                        cost_points: s.cost_points(),
                    },
                )
            })
            .collect();
        SandboxBaselines { entries }
    }
}

impl SandboxBaselines {
    pub fn insert(&mut self, id: impl Into<String>, baseline: SandboxBaseline) {
        self.entries.insert(id.into(), baseline);
    }

    pub fn get(&self, id: &str) -> Option<SandboxBaseline> {
        self.entries.get(id).copied()
    }

    /// Baseline for `id`, or the fallback (10 days, 6 points) when unregistered
    pub fn baseline(&self, id: &str) -> SandboxBaseline {
        self.get(id).unwrap_or_else(|| {
            tracing::debug!(scenario = id, "unknown sandbox scenario, using fallback baseline");
            SandboxBaseline::FALLBACK
        })
    }
}
