//! Per-instance schedule settings.
//!
//! Every field carries a default so a partial JSON file is valid. Two
//! schedules built from different options never share palette, time unit, or
//! scale parameters.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::model::Scale;

pub const DAY_MS: i64 = 86_400_000;

/// Upper bound on header buckets for any scale.
pub const MAX_BUCKETS: usize = 10_000;

/// Pixel density and header length for one scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleSettings {
    pub pixel_per_unit: f32,
    pub bucket_count: usize,
}

/// Whether a row's lock state is frozen at add time or re-evaluated each render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockPolicy {
    #[default]
    Snapshot,
    Live,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    /// Initial earliest-known date; `None` means "now" at construction.
    pub start_date: Option<NaiveDateTime>,
    pub scale: Scale,
    pub day: ScaleSettings,
    pub month: ScaleSettings,
    pub year: ScaleSettings,
    pub time_unit_ms: i64,
    /// Bar colours as `#RRGGBB` / `#RRGGBBAA`.
    pub palette: Vec<String>,
    pub lock_policy: LockPolicy,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            start_date: None,
            scale: Scale::Month,
            day: ScaleSettings {
                pixel_per_unit: 50.0,
                bucket_count: 500,
            },
            month: ScaleSettings {
                pixel_per_unit: 8.0,
                bucket_count: 60,
            },
            year: ScaleSettings {
                pixel_per_unit: 1.0,
                bucket_count: 10,
            },
            time_unit_ms: DAY_MS,
            palette: default_palette(),
            lock_policy: LockPolicy::Snapshot,
        }
    }
}

impl ScheduleOptions {
    pub fn scale_settings(&self, scale: Scale) -> ScaleSettings {
        match scale {
            Scale::Day => self.day,
            Scale::Month => self.month,
            Scale::Year => self.year,
        }
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_start_date(mut self, start: NaiveDateTime) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_lock_policy(mut self, policy: LockPolicy) -> Self {
        self.lock_policy = policy;
        self
    }

    /// Reject settings that cannot be laid out.
    pub fn validate(&self) -> ScheduleResult<()> {
        for scale in Scale::ALL {
            let settings = self.scale_settings(scale);
            if !settings.pixel_per_unit.is_finite() || settings.pixel_per_unit <= 0.0 {
                return Err(ScheduleError::Config(format!(
                    "{scale}: pixel_per_unit must be a positive number, got {}",
                    settings.pixel_per_unit
                )));
            }
            if !(1..=MAX_BUCKETS).contains(&settings.bucket_count) {
                return Err(ScheduleError::Config(format!(
                    "{scale}: bucket_count must be between 1 and {MAX_BUCKETS}, got {}",
                    settings.bucket_count
                )));
            }
        }
        if self.time_unit_ms <= 0 {
            return Err(ScheduleError::Config(format!(
                "time_unit_ms must be positive, got {}",
                self.time_unit_ms
            )));
        }
        if self.palette.is_empty() {
            return Err(ScheduleError::Config("palette must not be empty".into()));
        }
        Ok(())
    }
}

pub fn default_palette() -> Vec<String> {
    [
        "#FF000066", "#FFFF0066", "#00FF0066", "#00FFFF66", "#0000FF66", "#FF00FF66", "#00000066",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

/// Location of the settings file in the OS config directory.
pub fn default_path() -> PathBuf {
    match directories::ProjectDirs::from("", "", "TimeSchedule") {
        Some(dirs) => dirs.config_dir().join("settings.json"),
        None => PathBuf::from(".").join("settings.json"),
    }
}

/// Read options from `path`; a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> ScheduleResult<ScheduleOptions> {
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(ScheduleOptions::default());
    }
    let json = std::fs::read_to_string(path)?;
    let options: ScheduleOptions = serde_json::from_str(&json)?;
    options.validate()?;
    debug!(path = %path.display(), "loaded settings");
    Ok(options)
}

pub fn save(options: &ScheduleOptions, path: &Path) -> ScheduleResult<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(options)?;
    std::fs::write(path, json)?;
    Ok(())
}
