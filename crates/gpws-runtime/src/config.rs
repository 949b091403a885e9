//! Runtime configuration from environment.

use gpws_core::AlertThresholds;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read thresholds file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid thresholds file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid thresholds: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub thresholds: AlertThresholds,
    /// `tracing-subscriber` filter directives, used when `RUST_LOG` is unset
    pub log_filter: String,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: AlertThresholds::default(),
            log_filter: "gpws=info".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`], with `thresholds_file` (when given) taking
    /// the place of `GPWS_THRESHOLDS_FILE`.
    pub fn from_env_with_thresholds_file(thresholds_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_lookup_with_thresholds_file(|key| env::var(key).ok(), thresholds_file)
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// `GPWS_THRESHOLDS_FILE` is loaded first, then individual `GPWS_*`
    /// variables override single thresholds. Unparseable values are ignored
    /// with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup_with_thresholds_file(lookup, None)
    }

    /// [`Config::from_lookup`] with an explicit thresholds file that replaces
    /// `GPWS_THRESHOLDS_FILE`. Individual `GPWS_*` overrides still apply on top.
    pub fn from_lookup_with_thresholds_file(
        lookup: impl Fn(&str) -> Option<String>,
        thresholds_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut thresholds = match (thresholds_file, lookup("GPWS_THRESHOLDS_FILE")) {
            (Some(path), _) => load_thresholds_file(path)?,
            (None, Some(path)) if !path.trim().is_empty() => load_thresholds_file(path.trim())?,
            _ => AlertThresholds::default(),
        };

        let t = &mut thresholds;
        override_f64(&lookup, "GPWS_CEILING_AGL_M", &mut t.ceiling_agl_m);
        override_f64(&lookup, "GPWS_FLARE_AGL_M", &mut t.flare_agl_m);
        override_f64(&lookup, "GPWS_LANDING_MUTE_AGL_M", &mut t.landing_mute_agl_m);
        override_f64(&lookup, "GPWS_LANDING_MUTE_MIN_VZ_MPS", &mut t.landing_mute_min_vz_mps);
        override_f64(&lookup, "GPWS_LANDING_MUTE_MAX_VZ_MPS", &mut t.landing_mute_max_vz_mps);
        override_f64(
            &lookup,
            "GPWS_LANDING_MUTE_MAX_GROUND_SPEED_MPS",
            &mut t.landing_mute_max_ground_speed_mps,
        );
        override_f64(&lookup, "GPWS_HORIZON_S", &mut t.horizon_s);
        override_f64(&lookup, "GPWS_WARN_CLEARANCE_M", &mut t.warn_clearance_m);
        override_f64(&lookup, "GPWS_SINK_CLEARANCE_M", &mut t.sink_clearance_m);
        override_f64(&lookup, "GPWS_WARN_SINK_RATE_MPS", &mut t.warn_sink_rate_mps);
        override_u64(&lookup, "GPWS_TICK_PERIOD_MS", &mut t.tick_period_ms);
        override_u64(&lookup, "GPWS_AUDIO_COOLDOWN_MS", &mut t.audio_cooldown_ms);

        validate(&thresholds)?;

        Ok(Self {
            thresholds,
            log_filter: lookup("GPWS_LOG").unwrap_or_else(|| "gpws=info".to_string()),
            log_json: lookup("GPWS_LOG_JSON")
                .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// Load thresholds from a JSON document; missing fields keep their defaults.
pub fn load_thresholds_file(path: impl AsRef<Path>) -> Result<AlertThresholds, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let thresholds: AlertThresholds =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&thresholds)?;
    Ok(thresholds)
}

/// Reject threshold sets the evaluator cannot make sense of.
pub fn validate(t: &AlertThresholds) -> Result<(), ConfigError> {
    let values = [
        ("ceiling_agl_m", t.ceiling_agl_m),
        ("flare_agl_m", t.flare_agl_m),
        ("landing_mute_agl_m", t.landing_mute_agl_m),
        ("landing_mute_min_vz_mps", t.landing_mute_min_vz_mps),
        ("landing_mute_max_vz_mps", t.landing_mute_max_vz_mps),
        ("landing_mute_max_ground_speed_mps", t.landing_mute_max_ground_speed_mps),
        ("horizon_s", t.horizon_s),
        ("warn_clearance_m", t.warn_clearance_m),
        ("sink_clearance_m", t.sink_clearance_m),
        ("warn_sink_rate_mps", t.warn_sink_rate_mps),
    ];
    if let Some((name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
        return Err(ConfigError::Invalid(format!("{name} must be finite")));
    }
    if t.horizon_s <= 0.0 {
        return Err(ConfigError::Invalid("horizon_s must be > 0".to_string()));
    }
    if t.landing_mute_min_vz_mps >= t.landing_mute_max_vz_mps {
        return Err(ConfigError::Invalid(
            "landing mute vertical speed band is empty".to_string(),
        ));
    }
    if t.tick_period_ms == 0 {
        return Err(ConfigError::Invalid("tick_period_ms must be > 0".to_string()));
    }
    Ok(())
}

fn override_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut f64) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => *slot = value,
        _ => tracing::warn!("Ignoring {}={:?}: not a finite number", key, raw),
    }
}

fn override_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut u64) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!("Ignoring {}={:?}: not a whole number", key, raw),
    }
}
