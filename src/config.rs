use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::xt_grid::{DEFAULT_COLS, DEFAULT_ROWS};

/// Tuning knobs for the lane and value model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Corridor half-width (pitch units) at the receiving end of a pass.
    pub lane_width: f64,
    /// Interception probability of a defender standing on the pass line.
    pub max_intercept: f64,
    /// Length scale of the completion decay with pass distance.
    pub range_scale: f64,
    /// Threat conceded when the pass is lost.
    pub turnover_cost: f64,
    pub xt_cols: usize,
    pub xt_rows: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lane_width: 6.0,
            max_intercept: 0.9,
            range_scale: 80.0,
            turnover_cost: 0.02,
            xt_cols: DEFAULT_COLS,
            xt_rows: DEFAULT_ROWS,
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read analyzer config {}", path.display()))?;
        let cfg: AnalyzerConfig =
            serde_json::from_str(&raw).context("parse analyzer config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.lane_width.is_finite() && self.lane_width > 0.0) {
            bail!("lane_width must be positive, got {}", self.lane_width);
        }
        if !(self.max_intercept > 0.0 && self.max_intercept < 1.0) {
            bail!("max_intercept must be in (0, 1), got {}", self.max_intercept);
        }
        if !(self.range_scale.is_finite() && self.range_scale > 0.0) {
            bail!("range_scale must be positive, got {}", self.range_scale);
        }
        // A positive turnover cost keeps the score strictly rising with completion
        // even where the target zone carries no threat.
        if !(self.turnover_cost.is_finite() && self.turnover_cost > 0.0) {
            bail!("turnover_cost must be positive, got {}", self.turnover_cost);
        }
        if self.xt_cols == 0 || self.xt_rows == 0 {
            bail!("xT grid needs at least one zone");
        }
        Ok(())
    }

    /// Overlay `PASS_*` environment variables. Values that fail to parse are
    /// ignored; parsed values are clamped into a range `validate` accepts.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = read_f64(&lookup, "PASS_LANE_WIDTH") {
            self.lane_width = v.clamp(0.5, 40.0);
        }
        if let Some(v) = read_f64(&lookup, "PASS_MAX_INTERCEPT") {
            self.max_intercept = v.clamp(0.01, 0.99);
        }
        if let Some(v) = read_f64(&lookup, "PASS_RANGE_SCALE") {
            self.range_scale = v.clamp(5.0, 1000.0);
        }
        if let Some(v) = read_f64(&lookup, "PASS_TURNOVER_COST") {
            self.turnover_cost = v.clamp(0.001, 1.0);
        }
        if let Some(v) = read_usize(&lookup, "PASS_XT_COLS") {
            self.xt_cols = v.clamp(1, 120);
        }
        if let Some(v) = read_usize(&lookup, "PASS_XT_ROWS") {
            self.xt_rows = v.clamp(1, 80);
        }
        self
    }
}

fn read_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<f64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(key, value = %raw, "ignoring unparseable config value");
            None
        }
    }
}

fn read_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_validate() {
        AnalyzerConfig::default().validate().unwrap();
    }

    #[test]
    fn overrides_apply_and_clamp() {
        let cfg = AnalyzerConfig::default().with_overrides(lookup(&[
            ("PASS_LANE_WIDTH", "8.5"),
            ("PASS_MAX_INTERCEPT", "3"),
            ("PASS_XT_COLS", "24"),
        ]));
        assert_eq!(cfg.lane_width, 8.5);
        assert_eq!(cfg.max_intercept, 0.99);
        assert_eq!(cfg.xt_cols, 24);
        assert_eq!(cfg.xt_rows, DEFAULT_ROWS);
    }

    #[test]
    fn bad_values_are_ignored() {
        let cfg = AnalyzerConfig::default().with_overrides(lookup(&[
            ("PASS_RANGE_SCALE", "far"),
            ("PASS_TURNOVER_COST", "NaN"),
            ("PASS_XT_ROWS", "-3"),
        ]));
        assert_eq!(cfg, AnalyzerConfig::default());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: AnalyzerConfig = serde_json::from_str(r#"{"lane_width": 4.0}"#).unwrap();
        assert_eq!(cfg.lane_width, 4.0);
        assert_eq!(cfg.range_scale, AnalyzerConfig::default().range_scale);
    }

    #[test]
    fn validate_rejects_certain_interception() {
        let cfg = AnalyzerConfig {
            max_intercept: 1.0,
            ..AnalyzerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_settings_that_flatten_the_lane_penalty() {
        let no_intercept = AnalyzerConfig {
            max_intercept: 0.0,
            ..AnalyzerConfig::default()
        };
        assert!(no_intercept.validate().is_err());
        let free_turnover = AnalyzerConfig {
            turnover_cost: 0.0,
            ..AnalyzerConfig::default()
        };
        assert!(free_turnover.validate().is_err());
    }

    #[test]
    fn zero_env_values_are_clamped_into_a_valid_config() {
        let cfg = AnalyzerConfig::default().with_overrides(lookup(&[
            ("PASS_MAX_INTERCEPT", "0"),
            ("PASS_TURNOVER_COST", "0"),
            ("PASS_LANE_WIDTH", "0"),
        ]));
        assert_eq!(cfg.max_intercept, 0.01);
        assert_eq!(cfg.turnover_cost, 0.001);
        assert_eq!(cfg.lane_width, 0.5);
        cfg.validate().unwrap();
    }
}
