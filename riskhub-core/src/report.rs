//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::aggregates::PortfolioSummary;
use crate::risk::StatusTier;
use crate::sandbox::SandboxResult;
use crate::simulation::SimulationResult;
use crate::trends::{TrendIndicator, TrendPoint};
use serde::Serialize;

/// Width of the longest histogram bar in text output
const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Render a portfolio summary as text
pub fn render_summary_text(summary: &PortfolioSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<4} {:<10} {:<12} {:<20} {:<16} {}\n",
        "RIX", "TIER", "ID", "NAME", "PROFILE", "ACTION"
    ));
    for score in &summary.projects {
        output.push_str(&format!(
            "{:<4} {:<10} {:<12} {:<20} {:<16} {}\n",
            score.rix,
            score.tier.label(),
            truncate_or_pad(&score.id, 12),
            truncate_or_pad(&score.name, 20),
            truncate_or_pad(&score.profile, 16),
            score.action,
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Projects: {}  Mean RIx: {:.1}\n",
        summary.project_count, summary.mean_rix
    ));
    let tiers = StatusTier::ALL
        .iter()
        .map(|tier| format!("{}: {}", tier.label(), summary.tiers.get(*tier)))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(&tiers);
    output.push('\n');
    if summary.total_budget > 0.0 {
        output.push_str(&format!(
            "Budget: {:.0}  Spent: {:.0} ({:.1}%)\n",
            summary.total_budget,
            summary.total_spent,
            summary.total_spent / summary.total_budget * 100.0
        ));
    }

    output
}

/// Render a Monte Carlo result as text, including a histogram
pub fn render_simulation_text(result: &SimulationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Scenario: {}  Project: {}  Iterations: {}\n\n",
        result.scenario, result.project_id, result.iterations
    ));
    output.push_str(&format!(
        "Delay (days)   P10 {:>4}  P50 {:>4}  P80 {:>4}  P90 {:>4}  Worst (P95) {:>4}\n",
        result.p10, result.p50, result.p80, result.p90, result.worst_delay
    ));
    output.push_str(&format!(
        "Mean delay     {:.1}d\n",
        result.avg_delay
    ));
    output.push_str(&format!(
        "Cost impact    mean {:+.1}%  P80 {:+.1}%\n\n",
        result.avg_cost, result.cost_p80
    ));

    let peak = result
        .histogram
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for bucket in &result.histogram {
        let bar_len = bucket.count * HISTOGRAM_BAR_WIDTH / peak;
        output.push_str(&format!(
            "{:>5}d {:<width$} {:>5.1}%\n",
            bucket.label,
            "#".repeat(bar_len),
            bucket.pct,
            width = HISTOGRAM_BAR_WIDTH
        ));
    }

    output
}

/// Render a sandbox aggregate as text
pub fn render_sandbox_text(result: &SandboxResult) -> String {
    format!(
        "Projects: {}\nCombined delay: {}d\nCost pressure: {:+}%\nRisk level: {}\n",
        result.count, result.delay, result.cost, result.risk
    )
}

/// Render a synthetic trend as text
pub fn render_trend_text(points: &[TrendPoint], indicator: Option<&TrendIndicator>) -> String {
    let mut output = String::new();
    for point in points {
        output.push_str(&format!("t={:<2} {:>5.1}\n", point.t, point.value));
    }
    match indicator {
        Some(ind) => output.push_str(&format!(
            "Trend: {} ({:+.1})\n",
            ind.direction.as_str(),
            ind.delta
        )),
        None => output.push_str("Trend: n/a\n"),
    }
    output
}

/// Render any engine output as pretty JSON
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
