//! Project records and portfolio files
//!
//! Projects are produced by external data-entry systems. The engine only
//! reads them; budget and milestone metadata are carried through untouched.

use crate::profile::DEFAULT_PROFILE_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Inclusive upper bound of every risk sub-index
pub const SUB_INDEX_MAX: f64 = 100.0;

fn default_profile_key() -> String {
    DEFAULT_PROFILE_KEY.to_string()
}

/// A tracked initiative with its four risk sub-indices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Weight-profile key; unknown keys score with the default profile
    #[serde(default = "default_profile_key")]
    pub profile: String,
    /// Financial Risk Index
    pub fri: f64,
    /// Delivery Risk Index
    pub dri: f64,
    /// Change Impact Index
    pub cii: f64,
    /// Governance Stability Index
    pub gsi: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub milestones: u32,
    #[serde(default)]
    pub completed: u32,
}

impl Project {
    /// Create a project on the default profile with no pass-through metadata
    pub fn new(id: impl Into<String>, fri: f64, dri: f64, cii: f64, gsi: f64) -> Self {
        let id = id.into();
        Project {
            name: id.clone(),
            id,
            profile: default_profile_key(),
            fri,
            dri,
            cii,
            gsi,
            domain: None,
            owner: None,
            budget: 0.0,
            spent: 0.0,
            milestones: 0,
            completed: 0,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_budget(mut self, budget: f64, spent: f64) -> Self {
        self.budget = budget;
        self.spent = spent;
        self
    }

    /// Sub-indices in FRI, DRI, CII, GSI order
    pub fn sub_indices(&self) -> [(&'static str, f64); 4] {
        [
            ("fri", self.fri),
            ("dri", self.dri),
            ("cii", self.cii),
            ("gsi", self.gsi),
        ]
    }

    /// Check the record against its input contract
    ///
    /// The scorer never calls this; it is for loaders that want to reject
    /// malformed records before they reach a dashboard.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            anyhow::bail!("project id must not be empty");
        }
        for (name, value) in self.sub_indices() {
            if !value.is_finite() || !(0.0..=SUB_INDEX_MAX).contains(&value) {
                anyhow::bail!(
                    "project {}: {} must be within [0, 100] (got {})",
                    self.id,
                    name,
                    value
                );
            }
        }
        Ok(())
    }
}

/// A portfolio file: `{ "projects": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Portfolio {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Portfolio {
    /// Parse and validate a portfolio from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let portfolio: Portfolio =
            serde_json::from_str(json).context("failed to parse portfolio JSON")?;
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// Load and validate a portfolio file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read portfolio file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid portfolio in: {}", path.display()))
    }

    /// Validate every project and reject duplicate ids
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            project.validate()?;
            if !seen.insert(project.id.as_str()) {
                anyhow::bail!("duplicate project id: {}", project.id);
            }
        }
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_project_defaults_profile() {
        let json = r#"{"projects": [{"id": "PRJ-001", "fri": 28, "dri": 22, "cii": 18, "gsi": 12}]}"#;
        let portfolio = Portfolio::from_json(json).unwrap();
        assert_eq!(portfolio.projects.len(), 1);
        assert_eq!(portfolio.projects[0].profile, "default");
        assert_eq!(portfolio.projects[0].budget, 0.0);
    }

    #[test]
    fn test_reject_sub_index_out_of_range() {
        let project = Project::new("PRJ-009", 101.0, 0.0, 0.0, 0.0);
        assert!(project.validate().is_err());

        let project = Project::new("PRJ-009", 0.0, -1.0, 0.0, 0.0);
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_reject_duplicate_ids() {
        let json = r#"{"projects": [
            {"id": "PRJ-001", "fri": 1, "dri": 1, "cii": 1, "gsi": 1},
            {"id": "PRJ-001", "fri": 2, "dri": 2, "cii": 2, "gsi": 2}
        ]}"#;
        let err = Portfolio::from_json(json).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate project id"));
    }

    #[test]
    fn test_reject_unknown_top_level_fields() {
        let json = r#"{"projects": [], "extra": 1}"#;
        assert!(Portfolio::from_json(json).is_err());
    }

    #[test]
    fn test_find_by_id() {
        let portfolio = Portfolio {
            projects: vec![
                Project::new("PRJ-001", 1.0, 1.0, 1.0, 1.0),
                Project::new("PRJ-002", 2.0, 2.0, 2.0, 2.0),
            ],
        };
        assert_eq!(portfolio.find("PRJ-002").map(|p| p.fri), Some(2.0));
        assert!(portfolio.find("PRJ-404").is_none());
    }
}
