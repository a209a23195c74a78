//! Composite Risk Index (RIx) calculation and status tiers
//!
//! Global invariants enforced:
//! - RIx is an integer in [0, 99] for any input
//! - Tier boundaries resolve toward escalation

use crate::profile::{ProfileRegistry, RiskWeightProfile};
use crate::project::Project;
use serde::{Deserialize, Serialize};

/// Hard ceiling of the displayed 0-99 scale
pub const RIX_CEILING: u8 = 99;

/// Lowest RIx classified as at risk
pub const AT_RISK_THRESHOLD: u8 = 35;

/// Lowest RIx classified as critical
pub const CRITICAL_THRESHOLD: u8 = 65;

/// Status tier over RIx
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    OnTrack,  // < 35
    AtRisk,   // 35-64
    Critical, // >= 65
}

impl StatusTier {
    pub const ALL: [StatusTier; 3] = [StatusTier::OnTrack, StatusTier::AtRisk, StatusTier::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::OnTrack => "on_track",
            StatusTier::AtRisk => "at_risk",
            StatusTier::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::OnTrack => "On Track",
            StatusTier::AtRisk => "At Risk",
            StatusTier::Critical => "Critical",
        }
    }

    /// Recommended governance action for the tier
    pub fn action(&self) -> &'static str {
        match self {
            StatusTier::OnTrack => "Rule-based action applied",
            StatusTier::AtRisk => "Pending manager review",
            StatusTier::Critical => "Escalate to steering committee",
        }
    }
}

impl std::fmt::Display for StatusTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tier plus the action recommended for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: StatusTier,
    pub action: &'static str,
}

/// Unrounded weighted blend of the four sub-indices
///
/// Formula: FRI * w_fri + DRI * w_dri + CII * w_cii + GSI * w_gsi
pub fn weighted_sum(project: &Project, profile: &RiskWeightProfile) -> f64 {
    project.fri * profile.fri
        + project.dri * profile.dri
        + project.cii * profile.cii
        + project.gsi * profile.gsi
}

/// Composite Risk Index: `min(99, round(weighted_sum))`
///
/// Rounds half away from zero (34.5 becomes 35). Weights are not assumed to
/// sum to 1; negative or non-finite blends score 0.
pub fn score(project: &Project, profile: &RiskWeightProfile) -> u8 {
    let raw = weighted_sum(project, profile).round();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= f64::from(RIX_CEILING) {
        RIX_CEILING
    } else {
        raw as u8
    }
}

/// Score a project with the registry profile it references
///
/// Unknown profile keys score with the registry's default profile.
pub fn score_with_registry(project: &Project, registry: &ProfileRegistry) -> u8 {
    score(project, registry.resolve(&project.profile))
}

/// Assign a status tier to a RIx value
pub fn classify(rix: u8) -> Classification {
    let tier = if rix < AT_RISK_THRESHOLD {
        StatusTier::OnTrack
    } else if rix < CRITICAL_THRESHOLD {
        StatusTier::AtRisk
    } else {
        StatusTier::Critical
    };
    Classification {
        tier,
        action: tier.action(),
    }
}

/// Score and classify in one step
pub fn analyze_risk(project: &Project, registry: &ProfileRegistry) -> (u8, Classification) {
    let rix = score_with_registry(project, registry);
    (rix, classify(rix))
}
