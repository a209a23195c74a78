//! Weight profiles and the caller-owned profile registry
//!
//! The registry is an explicit value: the engine only ever borrows it.
//! A `default` profile always exists, so lookups never fail.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the profile that always exists
pub const DEFAULT_PROFILE_KEY: &str = "default";

/// Allowed deviation of a profile's weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// A named set of four sub-index weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RiskWeightProfile {
    pub label: String,
    pub fri: f64,
    pub dri: f64,
    pub cii: f64,
    pub gsi: f64,
}

impl RiskWeightProfile {
    pub fn new(label: impl Into<String>, fri: f64, dri: f64, cii: f64, gsi: f64) -> Self {
        RiskWeightProfile {
            label: label.into(),
            fri,
            dri,
            cii,
            gsi,
        }
    }

    /// A profile weighting all four sub-indices equally
    pub fn equal(label: impl Into<String>) -> Self {
        Self::new(label, 0.25, 0.25, 0.25, 0.25)
    }

    pub fn weight_sum(&self) -> f64 {
        self.fri + self.dri + self.cii + self.gsi
    }

    /// Edit-time check: weights finite and non-negative, summing to 1.0 ± 0.01
    ///
    /// Scoring does not require this to hold.
    pub fn validate(&self, key: &str) -> EngineResult<()> {
        let invalid = |reason: String| EngineError::InvalidProfile {
            key: key.to_string(),
            reason,
        };

        if self.label.trim().is_empty() {
            return Err(invalid("label must not be empty".to_string()));
        }
        for (name, weight) in [
            ("fri", self.fri),
            ("dri", self.dri),
            ("cii", self.cii),
            ("gsi", self.gsi),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "{} weight must be a non-negative number (got {})",
                    name, weight
                )));
            }
        }
        let sum = self.weight_sum();
        if (sum - 1.0).abs() >= WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!(
                "weights must sum to 1.0 ± {} (got {:.2})",
                WEIGHT_SUM_TOLERANCE, sum
            )));
        }
        Ok(())
    }
}

/// Derive a registry key from a display label: lowercase, whitespace runs to `_`
pub fn profile_key_from_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Keyed collection of weight profiles with a guaranteed default entry
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRegistry {
    default: RiskWeightProfile,
    others: BTreeMap<String, RiskWeightProfile>,
}

impl Default for ProfileRegistry {
    /// The stock registry: default, compliance, innovation, erp, cloud
    fn default() -> Self {
        let mut registry =
            Self::with_default(RiskWeightProfile::new("Default", 0.30, 0.25, 0.25, 0.20));
        for (key, profile) in [
            (
                "compliance",
                RiskWeightProfile::new("Compliance", 0.20, 0.15, 0.15, 0.50),
            ),
            (
                "innovation",
                RiskWeightProfile::new("Innovation", 0.20, 0.35, 0.30, 0.15),
            ),
            (
                "erp",
                RiskWeightProfile::new("ERP / Finance", 0.40, 0.25, 0.20, 0.15),
            ),
            (
                "cloud",
                RiskWeightProfile::new("Cloud", 0.25, 0.35, 0.25, 0.15),
            ),
        ] {
            registry.others.insert(key.to_string(), profile);
        }
        registry
    }
}

impl ProfileRegistry {
    /// A registry holding only the given default profile
    pub fn with_default(default: RiskWeightProfile) -> Self {
        ProfileRegistry {
            default,
            others: BTreeMap::new(),
        }
    }

    pub fn default_profile(&self) -> &RiskWeightProfile {
        &self.default
    }

    pub fn get(&self, key: &str) -> Option<&RiskWeightProfile> {
        if key == DEFAULT_PROFILE_KEY {
            Some(&self.default)
        } else {
            self.others.get(key)
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Look up a profile, substituting the default for unknown keys
    pub fn resolve(&self, key: &str) -> &RiskWeightProfile {
        match self.get(key) {
            Some(profile) => profile,
            None => {
                tracing::debug!(profile = key, "unknown weight profile, using default");
                &self.default
            }
        }
    }

    /// Add a profile or edit one in place, returning the replaced profile
    pub fn insert(
        &mut self,
        key: &str,
        profile: RiskWeightProfile,
    ) -> EngineResult<Option<RiskWeightProfile>> {
        if key.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "profile key must not be empty".to_string(),
            ));
        }
        profile.validate(key)?;

        if key == DEFAULT_PROFILE_KEY {
            Ok(Some(std::mem::replace(&mut self.default, profile)))
        } else {
            Ok(self.others.insert(key.to_string(), profile))
        }
    }

    /// Create an equal-weight profile from a label and return its key
    ///
    /// An existing profile under the derived key is replaced.
    pub fn create(&mut self, label: &str) -> EngineResult<String> {
        let key = profile_key_from_label(label);
        if key.is_empty() {
            return Err(EngineError::InvalidArgument(
                "profile label must not be empty".to_string(),
            ));
        }
        self.insert(&key, RiskWeightProfile::equal(label.trim()))?;
        Ok(key)
    }

    pub fn len(&self) -> usize {
        self.others.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Profiles in deterministic order: default first, then by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RiskWeightProfile)> {
        std::iter::once((DEFAULT_PROFILE_KEY, &self.default))
            .chain(self.others.iter().map(|(k, p)| (k.as_str(), p)))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.iter().map(|(key, _)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_registry_profiles_are_valid() {
        let registry = ProfileRegistry::default();
        assert_eq!(
            registry.keys(),
            vec!["default", "cloud", "compliance", "erp", "innovation"]
        );
        for (key, profile) in registry.iter() {
            profile
                .validate(key)
                .unwrap_or_else(|e| panic!("stock profile {} invalid: {}", key, e));
        }
    }

    #[test]
    fn test_resolve_unknown_key_falls_back_to_default() {
        let registry = ProfileRegistry::default();
        assert_eq!(registry.resolve("no_such_profile").label, "Default");
        assert_eq!(registry.resolve("erp").label, "ERP / Finance");
    }

    #[test]
    fn test_insert_edits_in_place() {
        let mut registry = ProfileRegistry::default();
        let previous = registry
            .insert("cloud", RiskWeightProfile::new("Cloud", 0.1, 0.4, 0.4, 0.1))
            .unwrap();
        assert_eq!(previous.map(|p| p.fri), Some(0.25));
        assert_eq!(registry.resolve("cloud").dri, 0.4);
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_insert_can_replace_default() {
        let mut registry = ProfileRegistry::default();
        registry
            .insert("default", RiskWeightProfile::equal("Flat"))
            .unwrap();
        assert_eq!(registry.default_profile().label, "Flat");
        assert_eq!(registry.resolve("missing").label, "Flat");
    }

    #[test]
    fn test_insert_rejects_bad_sum() {
        let mut registry = ProfileRegistry::default();
        let err = registry
            .insert("heavy", RiskWeightProfile::new("Heavy", 0.5, 0.5, 0.5, 0.5))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidProfile { .. }));
        assert!(!registry.contains("heavy"));
    }

    #[test]
    fn test_insert_accepts_sum_within_tolerance() {
        let mut registry = ProfileRegistry::default();
        registry
            .insert("near", RiskWeightProfile::new("Near", 0.3, 0.3, 0.2, 0.205))
            .unwrap();
        assert!(registry.contains("near"));
    }

    #[test]
    fn test_insert_rejects_negative_weight() {
        let mut registry = ProfileRegistry::default();
        let result = registry.insert("neg", RiskWeightProfile::new("Neg", -0.1, 0.5, 0.3, 0.3));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_derives_key_from_label() {
        let mut registry = ProfileRegistry::default();
        let key = registry.create("  Data  Platform ").unwrap();
        assert_eq!(key, "data_platform");
        let profile = registry.get(&key).unwrap();
        assert_eq!(profile.label, "Data  Platform");
        assert_eq!(profile.weight_sum(), 1.0);
    }

    #[test]
    fn test_create_rejects_blank_label() {
        let mut registry = ProfileRegistry::default();
        assert!(registry.create("   ").is_err());
    }
}
