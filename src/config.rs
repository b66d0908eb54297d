//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. HORIZON_RS_SIM_CONFIG environment variable
//! 2. Default: `config.toml` in the platform config directory
//!
//! Every section and field is optional; anything missing takes the built-in default.

use color_eyre::eyre::{Result, WrapErr, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::geo::{Coordinates, Geofence};
use crate::core::knowledge_base;
use crate::core::models::ViolationCategory;
use crate::logging::{CONFIG_ENV, get_config_dir};

const DEFAULT_SITE: Coordinates = Coordinates::new(37.7749, -122.4194);

/// An inclusive `[min, max]` range of percentages.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct PercentRange {
    pub min: f64,
    pub max: f64,
}

/// An inclusive `[min, max]` range of integer scores.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct ScoreRange {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    /// Interval between progress updates.
    pub tick_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { min_latency_ms: 1200, max_latency_ms: 2600, tick_ms: 60 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub allowed_confidence: PercentRange,
    pub blocked_confidence: PercentRange,
    pub allowed_safety: ScoreRange,
    pub blocked_safety: ScoreRange,
    /// Per-category overrides of the knowledge base trip probabilities.
    pub probabilities: HashMap<ViolationCategory, f64>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            allowed_confidence: PercentRange { min: 88.0, max: 99.0 },
            blocked_confidence: PercentRange { min: 95.0, max: 100.0 },
            allowed_safety: ScoreRange { min: 85, max: 100 },
            blocked_safety: ScoreRange { min: 5, max: 45 },
            probabilities: HashMap::new(),
        }
    }
}

impl ModerationConfig {
    /// Trip probability for `category`: the configured override, else the table default.
    pub fn probability_for(&self, category: ViolationCategory) -> f64 {
        self.probabilities.get(&category).copied().unwrap_or_else(|| {
            knowledge_base::get_category_detail(category).map_or(0.0, |d| d.probability)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckInConfig {
    /// Subject used when the input field is left empty.
    pub default_subject: String,
    /// Where the simulated device believes it is, before jitter.
    pub site: Coordinates,
    /// Mock position substituted when the location request is denied.
    pub fallback: Coordinates,
    /// Maximum simulated GPS error, in meters.
    pub jitter_m: f64,
    pub permission_denial_probability: f64,
    pub biometric_failure_probability: f64,
    /// Minimum biometric match score counted as verified.
    pub biometric_threshold: u8,
    /// Local hour (inclusive) from which check-ins are on schedule.
    pub schedule_start_hour: u32,
    /// Local hour (exclusive) until which check-ins are on schedule.
    pub schedule_end_hour: u32,
    pub geofences: Vec<Geofence>,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            default_subject: "EMP-2050-0001".to_string(),
            site: DEFAULT_SITE,
            fallback: DEFAULT_SITE,
            jitter_m: 120.0,
            permission_denial_probability: 0.1,
            biometric_failure_probability: 0.03,
            biometric_threshold: 85,
            schedule_start_hour: 7,
            schedule_end_hour: 19,
            geofences: vec![
                Geofence { name: "HQ Campus".to_string(), center: DEFAULT_SITE, radius_m: 150.0 },
                Geofence {
                    name: "Innovation Hub".to_string(),
                    center: DEFAULT_SITE.offset_m(900.0, -400.0),
                    radius_m: 80.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub moderation: ModerationConfig,
    pub checkin: CheckInConfig,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Config {
    /// Resolves the config path from the environment, falling back to the config dir.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV.as_str())
            .map(PathBuf::from)
            .unwrap_or_else(|| get_config_dir().join("config.toml"))
    }

    /// Loads the configuration from the default location.
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Loads configuration from `path`, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults.");
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config file.");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = ?e, "Invalid config file, using defaults.");
                Self::default()
            }
        }
    }

    /// Reads, parses and validates a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Path the config was read from, or `None` for built-in defaults.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.min_latency_ms > sim.max_latency_ms {
            bail!("simulation.min_latency_ms must not exceed simulation.max_latency_ms");
        }
        if sim.tick_ms == 0 {
            bail!("simulation.tick_ms must be greater than zero");
        }

        let m = &self.moderation;
        check_percent_range("moderation.allowed_confidence", m.allowed_confidence)?;
        check_percent_range("moderation.blocked_confidence", m.blocked_confidence)?;
        check_score_range("moderation.allowed_safety", m.allowed_safety)?;
        check_score_range("moderation.blocked_safety", m.blocked_safety)?;
        for (category, p) in &m.probabilities {
            check_probability(&format!("moderation.probabilities.{category}"), *p)?;
        }

        let c = &self.checkin;
        check_probability("checkin.permission_denial_probability", c.permission_denial_probability)?;
        check_probability("checkin.biometric_failure_probability", c.biometric_failure_probability)?;
        if c.biometric_threshold > 100 {
            bail!("checkin.biometric_threshold must be within 0..=100");
        }
        if c.schedule_start_hour >= 24 || c.schedule_end_hour > 24 {
            bail!("checkin schedule hours must be within 0..24");
        }
        if c.schedule_start_hour >= c.schedule_end_hour {
            bail!("checkin.schedule_start_hour must be before checkin.schedule_end_hour");
        }
        if !c.jitter_m.is_finite() || c.jitter_m < 0.0 {
            bail!("checkin.jitter_m must be a finite, non-negative distance");
        }
        if !c.site.is_valid() || !c.fallback.is_valid() {
            bail!("checkin.site and checkin.fallback must be valid coordinates");
        }
        for fence in &c.geofences {
            if !fence.radius_m.is_finite() || fence.radius_m <= 0.0 || !fence.center.is_valid() {
                bail!("geofence '{}' needs a positive radius and a valid center", fence.name);
            }
        }
        Ok(())
    }
}

fn check_percent_range(name: &str, range: PercentRange) -> Result<()> {
    if !(0.0..=100.0).contains(&range.min) || !(0.0..=100.0).contains(&range.max) {
        bail!("{name} must lie within 0..=100");
    }
    if range.min > range.max {
        bail!("{name}.min must not exceed {name}.max");
    }
    Ok(())
}

fn check_score_range(name: &str, range: ScoreRange) -> Result<()> {
    if range.max > 100 {
        bail!("{name} must lie within 0..=100");
    }
    if range.min > range.max {
        bail!("{name}.min must not exceed {name}.max");
    }
    Ok(())
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        bail!("{name} must be a probability in 0..=1");
    }
    Ok(())
}
