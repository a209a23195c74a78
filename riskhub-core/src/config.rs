//! Configuration file support for riskhub
//!
//! Loads weight profiles and simulation defaults from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.riskhubrc.json` in project root
//! 3. `riskhub.config.json` in project root
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::profile::{ProfileRegistry, RiskWeightProfile, WEIGHT_SUM_TOLERANCE};
use crate::simulation::DEFAULT_ITERATIONS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// riskhub configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskhubConfig {
    /// Weight profiles added to (or replacing) the stock profiles, by key
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,

    /// Monte Carlo defaults
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,

    /// Trend history defaults
    #[serde(default)]
    pub trend: Option<TrendConfig>,
}

/// One weight profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Display name (default: the profile key)
    #[serde(default)]
    pub label: Option<String>,
    pub fri: f64,
    pub dri: f64,
    pub cii: f64,
    pub gsi: f64,
}

/// Monte Carlo defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Trials per run (default: 1000)
    pub iterations: Option<usize>,
    /// Fixed seed for reproducible runs (default: fresh entropy)
    pub seed: Option<u64>,
}

/// Trend history defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendConfig {
    /// Fixed seed for reproducible histories (default: fresh entropy)
    pub seed: Option<u64>,
}

/// Resolved configuration ready for use
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Stock profiles merged with configured ones
    pub registry: ProfileRegistry,
    pub iterations: usize,
    pub simulation_seed: Option<u64>,
    pub trend_seed: Option<u64>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl ProfileConfig {
    fn to_profile(&self, key: &str) -> RiskWeightProfile {
        RiskWeightProfile::new(
            self.label.clone().unwrap_or_else(|| key.to_string()),
            self.fri,
            self.dri,
            self.cii,
            self.gsi,
        )
    }
}

impl RiskhubConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        for (key, p) in &self.profiles {
            if key.trim().is_empty() {
                anyhow::bail!("profile keys must not be empty");
            }
            if let Some(label) = &p.label {
                if label.trim().is_empty() {
                    anyhow::bail!("profiles.{}.label must not be empty", key);
                }
            }
            for (name, val) in [("fri", p.fri), ("dri", p.dri), ("cii", p.cii), ("gsi", p.gsi)] {
                if !val.is_finite() || val < 0.0 {
                    anyhow::bail!("profiles.{}.{} must be non-negative (got {})", key, name, val);
                }
                if val > 1.0 {
                    anyhow::bail!("profiles.{}.{} must be at most 1.0 (got {})", key, name, val);
                }
            }
            let sum = p.fri + p.dri + p.cii + p.gsi;
            if (sum - 1.0).abs() >= WEIGHT_SUM_TOLERANCE {
                anyhow::bail!(
                    "profiles.{} weights must sum to 1.0 (got {:.2})",
                    key,
                    sum
                );
            }
        }

        if let Some(ref sim) = self.simulation {
            if sim.iterations == Some(0) {
                anyhow::bail!("simulation.iterations must be positive (got 0)");
            }
        }

        Ok(())
    }

    /// Resolve config into a registry and effective defaults
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let mut registry = ProfileRegistry::default();
        for (key, p) in &self.profiles {
            registry
                .insert(key, p.to_profile(key))
                .with_context(|| format!("invalid profile: {}", key))?;
        }

        let (iterations, simulation_seed) = match &self.simulation {
            Some(sim) => (sim.iterations.unwrap_or(DEFAULT_ITERATIONS), sim.seed),
            None => (DEFAULT_ITERATIONS, None),
        };

        Ok(ResolvedConfig {
            registry,
            iterations,
            simulation_seed,
            trend_seed: self.trend.as_ref().and_then(|t| t.seed),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        RiskhubConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.riskhubrc.json`
/// 2. `riskhub.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(RiskhubConfig, PathBuf)>> {
    for name in [".riskhubrc.json", "riskhub.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<RiskhubConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: RiskhubConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (RiskhubConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = RiskhubConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.registry, ProfileRegistry::default());
        assert_eq!(resolved.iterations, 1000);
        assert!(resolved.simulation_seed.is_none());
        assert!(resolved.trend_seed.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "profiles": {
                "default": { "label": "House", "fri": 0.4, "dri": 0.2, "cii": 0.2, "gsi": 0.2 },
                "data_platform": { "fri": 0.1, "dri": 0.4, "cii": 0.4, "gsi": 0.1 }
            },
            "simulation": { "iterations": 2500, "seed": 42 },
            "trend": { "seed": 7 }
        }"#;
        let config: RiskhubConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.registry.default_profile().label, "House");
        assert_eq!(resolved.registry.resolve("data_platform").label, "data_platform");
        assert!(resolved.registry.contains("cloud"), "stock profiles are kept");
        assert_eq!(resolved.iterations, 2500);
        assert_eq!(resolved.simulation_seed, Some(42));
        assert_eq!(resolved.trend_seed, Some(7));
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<RiskhubConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_negative_weight() {
        let json = r#"{"profiles": {"x": {"fri": -0.1, "dri": 0.5, "cii": 0.3, "gsi": 0.3}}}"#;
        let config: RiskhubConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_weight_sum_off_by_more_than_tolerance() {
        let json = r#"{"profiles": {"x": {"fri": 0.3, "dri": 0.3, "cii": 0.3, "gsi": 0.3}}}"#;
        let config: RiskhubConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_zero_iterations() {
        let json = r#"{"simulation": {"iterations": 0}}"#;
        let config: RiskhubConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_simulation_uses_defaults() {
        let json = r#"{"simulation": {"seed": 3}}"#;
        let config: RiskhubConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.iterations, 1000);
        assert_eq!(resolved.simulation_seed, Some(3));
    }

    #[test]
    fn test_discover_riskhubrc() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".riskhubrc.json");
        fs::write(&config_path, r#"{"simulation": {"iterations": 500}}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.simulation.and_then(|s| s.iterations), Some(500));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".riskhubrc.json"),
            r#"{"trend": {"seed": 1}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("riskhub.config.json"),
            r#"{"trend": {"seed": 2}}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.trend.and_then(|t| t.seed),
            Some(1),
            ".riskhubrc.json should take priority"
        );
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(
            &config_path,
            r#"{"profiles": {"ops": {"label": "Ops", "fri": 0.25, "dri": 0.25, "cii": 0.25, "gsi": 0.25}}}"#,
        )
        .unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.registry.resolve("ops").label, "Ops");
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
