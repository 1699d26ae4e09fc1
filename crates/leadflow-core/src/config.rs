use crate::error::{CrmError, Result};
use crate::paths;
use crate::types::Urgency;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StageThresholds
// ---------------------------------------------------------------------------

/// Day-count boundaries mapping time-in-stage to an urgency level, plus the
/// per-day score decay rate. Stages nearer deal closure carry tighter
/// boundaries and steeper decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageThresholds {
    #[serde(default = "default_medium_after")]
    pub medium_after_days: u32,
    #[serde(default = "default_high_after")]
    pub high_after_days: u32,
    #[serde(default = "default_critical_after")]
    pub critical_after_days: u32,
    #[serde(default = "default_decay_per_day")]
    pub decay_per_day: u32,
}

fn default_medium_after() -> u32 {
    10
}

fn default_high_after() -> u32 {
    21
}

fn default_critical_after() -> u32 {
    45
}

fn default_decay_per_day() -> u32 {
    2
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            medium_after_days: default_medium_after(),
            high_after_days: default_high_after(),
            critical_after_days: default_critical_after(),
            decay_per_day: default_decay_per_day(),
        }
    }
}

impl StageThresholds {
    pub const fn new(medium: u32, high: u32, critical: u32, decay: u32) -> Self {
        Self {
            medium_after_days: medium,
            high_after_days: high,
            critical_after_days: critical,
            decay_per_day: decay,
        }
    }

    /// Map days-in-stage to the highest urgency whose boundary is met.
    pub fn urgency_for(&self, days: u32) -> Urgency {
        if days >= self.critical_after_days {
            Urgency::Critical
        } else if days >= self.high_after_days {
            Urgency::High
        } else if days >= self.medium_after_days {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Fallback table for stage slugs without an explicit entry — the most
    /// lenient (early-funnel) boundaries, so retired or unknown stages never
    /// read as artificially stale.
    #[serde(default)]
    pub default_thresholds: StageThresholds,
    #[serde(default)]
    pub stages: HashMap<String, StageThresholds>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut stages = HashMap::new();
        stages.insert("cliente-nuevo".to_string(), StageThresholds::default());
        stages.insert("contactado".to_string(), StageThresholds::new(5, 10, 21, 3));
        stages.insert("documentos".to_string(), StageThresholds::new(3, 7, 14, 4));
        stages.insert("preaprobado".to_string(), StageThresholds::new(2, 4, 7, 8));
        stages.insert("aprobado".to_string(), StageThresholds::new(1, 3, 5, 10));
        stages.insert("entregado".to_string(), StageThresholds::default());
        Self {
            default_thresholds: StageThresholds::default(),
            stages,
        }
    }
}

impl ScoringConfig {
    pub fn thresholds_for(&self, stage: &str) -> &StageThresholds {
        self.stages.get(stage).unwrap_or(&self.default_thresholds)
    }
}

// ---------------------------------------------------------------------------
// StageConfig
// ---------------------------------------------------------------------------

/// One column of the pipeline board, in funnel order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub slug: String,
    pub title: String,
}

fn default_stages() -> Vec<StageConfig> {
    let pairs = [
        ("cliente-nuevo", "Cliente nuevo"),
        ("contactado", "Contactado"),
        ("documentos", "Documentos"),
        ("preaprobado", "Preaprobado"),
        ("aprobado", "Aprobado"),
        ("entregado", "Entregado"),
    ];
    pairs
        .iter()
        .map(|(slug, title)| StageConfig {
            slug: slug.to_string(),
            title: title.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            stages: default_stages(),
            scoring: ScoringConfig::default(),
        }
    }

    pub fn has_stage(&self, slug: &str) -> bool {
        self.stages.iter().any(|s| s.slug == slug)
    }

    pub fn stage(&self, slug: &str) -> Option<&StageConfig> {
        self.stages.iter().find(|s| s.slug == slug)
    }

    /// First stage of the funnel, where newly captured leads land.
    pub fn first_stage(&self) -> Result<&StageConfig> {
        self.stages.first().ok_or(CrmError::NoStages)
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CrmError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.stages.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "no stages configured: the board will be empty".to_string(),
            });
        }

        // Duplicate stage slugs
        let mut seen = std::collections::HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.slug.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("duplicate stage slug '{}'", stage.slug),
                });
            }
        }

        // Scoring entries must reference configured stages
        for slug in self.scoring.stages.keys() {
            if !self.has_stage(slug) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("scoring entry for unknown stage '{}'", slug),
                });
            }
        }

        // Threshold boundaries must increase with severity
        let mut check = |slug: &str, t: &StageThresholds| {
            if t.medium_after_days > t.high_after_days
                || t.high_after_days > t.critical_after_days
            {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "thresholds for '{}' are not increasing ({}/{}/{})",
                        slug, t.medium_after_days, t.high_after_days, t.critical_after_days
                    ),
                });
            }
            if t.decay_per_day == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("decay_per_day for '{}' is 0: scores never decay", slug),
                });
            }
        };
        check("default", &self.scoring.default_thresholds);
        let mut slugs: Vec<&String> = self.scoring.stages.keys().collect();
        slugs.sort();
        for slug in slugs {
            check(slug, &self.scoring.stages[slug]);
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("moto-crm");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "moto-crm");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.stages.len(), 6);
        assert_eq!(parsed.stages[0].slug, "cliente-nuevo");
    }

    #[test]
    fn thresholds_for_known_stage() {
        let scoring = ScoringConfig::default();
        let t = scoring.thresholds_for("preaprobado");
        assert_eq!(t.critical_after_days, 7);
        assert_eq!(t.decay_per_day, 8);
    }

    #[test]
    fn thresholds_for_unknown_stage_falls_back_to_lenient() {
        let scoring = ScoringConfig::default();
        let t = scoring.thresholds_for("etapa-retirada");
        assert_eq!(*t, scoring.default_thresholds);
        assert_eq!(t.critical_after_days, 45);
    }

    #[test]
    fn urgency_for_boundaries() {
        let t = StageThresholds::new(3, 7, 14, 4);
        assert_eq!(t.urgency_for(0), Urgency::Low);
        assert_eq!(t.urgency_for(2), Urgency::Low);
        assert_eq!(t.urgency_for(3), Urgency::Medium);
        assert_eq!(t.urgency_for(7), Urgency::High);
        assert_eq!(t.urgency_for(13), Urgency::High);
        assert_eq!(t.urgency_for(14), Urgency::Critical);
        assert_eq!(t.urgency_for(500), Urgency::Critical);
    }

    #[test]
    fn config_minimal_yaml_backward_compat() {
        // A config.yaml with only a project key must still deserialize with
        // the default funnel and scoring tables.
        let yaml = "version: 1\nproject:\n  name: moto-crm\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.stages.len(), 6);
        assert_eq!(cfg.scoring.thresholds_for("aprobado").decay_per_day, 10);
    }

    #[test]
    fn partial_thresholds_fill_defaults() {
        let yaml = r#"
version: 1
project:
  name: moto-crm
scoring:
  stages:
    contactado:
      medium_after_days: 2
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let t = cfg.scoring.thresholds_for("contactado");
        assert_eq!(t.medium_after_days, 2);
        assert_eq!(t.high_after_days, 21);
        assert_eq!(t.critical_after_days, 45);
    }

    #[test]
    fn first_stage_of_default_funnel() {
        let cfg = Config::new("x");
        assert_eq!(cfg.first_stage().unwrap().slug, "cliente-nuevo");
    }

    #[test]
    fn first_stage_of_empty_funnel_errors() {
        let mut cfg = Config::new("x");
        cfg.stages.clear();
        assert!(matches!(cfg.first_stage(), Err(CrmError::NoStages)));
    }

    #[test]
    fn validate_default_config_no_warnings() {
        let cfg = Config::new("moto-crm");
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected: {warnings:?}");
    }

    #[test]
    fn validate_duplicate_stage() {
        let mut cfg = Config::new("x");
        cfg.stages.push(StageConfig {
            slug: "contactado".to_string(),
            title: "Contactado otra vez".to_string(),
        });
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("duplicate stage")));
    }

    #[test]
    fn validate_scoring_for_unknown_stage() {
        let mut cfg = Config::new("x");
        cfg.scoring
            .stages
            .insert("retirada".to_string(), StageThresholds::default());
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("unknown stage 'retirada'")));
    }

    #[test]
    fn validate_non_increasing_thresholds() {
        let mut cfg = Config::new("x");
        cfg.scoring
            .stages
            .insert("contactado".to_string(), StageThresholds::new(10, 5, 21, 3));
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("not increasing")));
    }

    #[test]
    fn validate_zero_decay() {
        let mut cfg = Config::new("x");
        cfg.scoring
            .stages
            .insert("documentos".to_string(), StageThresholds::new(3, 7, 14, 0));
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("scores never decay")));
    }

    #[test]
    fn validate_empty_stage_list() {
        let mut cfg = Config::new("x");
        cfg.stages.clear();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("no stages")));
    }
}
