//! Portfolio aggregation views
//!
//! Computes derived portfolio figures from project records without modifying them.
//!
//! Global invariants enforced:
//! - Aggregates are strictly derived (never stored, always computed)
//! - Deterministic ordering

use crate::profile::ProfileRegistry;
use crate::project::Project;
use crate::risk::{analyze_risk, StatusTier};
use crate::simulation::round_dp;
use serde::{Deserialize, Serialize};

/// Scored view of one project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ProjectScore {
    pub id: String,
    pub name: String,
    /// Label of the profile actually used (the default when the key was unknown)
    pub profile: String,
    pub rix: u8,
    pub tier: StatusTier,
    pub action: String,
}

/// Number of projects per status tier
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TierCounts {
    pub on_track: usize,
    pub at_risk: usize,
    pub critical: usize,
}

impl TierCounts {
    fn record(&mut self, tier: StatusTier) {
        match tier {
            StatusTier::OnTrack => self.on_track += 1,
            StatusTier::AtRisk => self.at_risk += 1,
            StatusTier::Critical => self.critical += 1,
        }
    }

    pub fn get(&self, tier: StatusTier) -> usize {
        match tier {
            StatusTier::OnTrack => self.on_track,
            StatusTier::AtRisk => self.at_risk,
            StatusTier::Critical => self.critical,
        }
    }
}

/// Portfolio-wide overview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PortfolioSummary {
    pub project_count: usize,
    pub tiers: TierCounts,
    /// Mean RIx, one decimal; 0.0 for an empty portfolio
    pub mean_rix: f64,
    pub total_budget: f64,
    pub total_spent: f64,
    pub projects: Vec<ProjectScore>,
}

/// Score every project, sorted by RIx descending then id ascending
pub fn score_projects(projects: &[Project], registry: &ProfileRegistry) -> Vec<ProjectScore> {
    let mut scores: Vec<ProjectScore> = projects
        .iter()
        .map(|project| {
            let (rix, classification) = analyze_risk(project, registry);
            ProjectScore {
                id: project.id.clone(),
                name: project.name.clone(),
                profile: registry.resolve(&project.profile).label.clone(),
                rix,
                tier: classification.tier,
                action: classification.action.to_string(),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.rix.cmp(&a.rix).then_with(|| a.id.cmp(&b.id)));
    scores
}

/// Summarize a portfolio under a registry snapshot
pub fn summarize(projects: &[Project], registry: &ProfileRegistry) -> PortfolioSummary {
    let scores = score_projects(projects, registry);

    let mut tiers = TierCounts::default();
    for score in &scores {
        tiers.record(score.tier);
    }

    let mean_rix = if scores.is_empty() {
        0.0
    } else {
        let total: u32 = scores.iter().map(|s| u32::from(s.rix)).sum();
        round_dp(f64::from(total) / scores.len() as f64, 1)
    };

    PortfolioSummary {
        project_count: projects.len(),
        tiers,
        mean_rix,
        total_budget: projects.iter().map(|p| p.budget).sum(),
        total_spent: projects.iter().map(|p| p.spent).sum(),
        projects: scores,
    }
}
