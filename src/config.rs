//! Runtime configuration read from the environment (and `.env`)

use std::env;
use std::path::PathBuf;

use crate::error::EngineError;
use crate::mesocycle::AthleteProfile;
use crate::models::{EquipmentContext, ExperienceLevel, Muscle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

impl std::str::FromStr for LogFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "pretty" => Ok(Self::Pretty),
      "json" => Ok(Self::Json),
      _ => Err(format!("expected json or pretty, got {}", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
  /// Fixed seed for reproducible day shuffles
  pub seed: Option<u64>,
  pub log_format: LogFormat,
  /// Catalog JSON to load instead of the built-in sample
  pub catalog_path: Option<PathBuf>,
  pub profile: AthleteProfile,
}

impl EngineConfig {
  pub fn from_env() -> Result<Self, EngineError> {
    let seed = optional_var("PERIODIZATION_SEED")
      .map(|v| v.parse::<u64>().map_err(|e| invalid("PERIODIZATION_SEED", e)))
      .transpose()?;

    let log_format = optional_var("PERIODIZATION_LOG_FORMAT")
      .map(|v| v.parse::<LogFormat>().map_err(|e| invalid("PERIODIZATION_LOG_FORMAT", e)))
      .transpose()?
      .unwrap_or_default();

    let level = optional_var("PERIODIZATION_LEVEL")
      .map(|v| v.parse::<ExperienceLevel>().map_err(|e| invalid("PERIODIZATION_LEVEL", e)))
      .transpose()?
      .unwrap_or(ExperienceLevel::Intermediate);

    let days_per_week = optional_var("PERIODIZATION_DAYS")
      .map(|v| v.parse::<u8>().map_err(|e| invalid("PERIODIZATION_DAYS", e)))
      .transpose()?
      .unwrap_or(3);

    let focus = optional_var("PERIODIZATION_FOCUS")
      .map(|v| v.parse::<Muscle>().map_err(|e| invalid("PERIODIZATION_FOCUS", e)))
      .transpose()?
      .unwrap_or(Muscle::Chest);

    let equipment = optional_var("PERIODIZATION_EQUIPMENT")
      .map(|v| v.parse::<EquipmentContext>().map_err(|e| invalid("PERIODIZATION_EQUIPMENT", e)))
      .transpose()?
      .unwrap_or(EquipmentContext::FullGym);

    Ok(Self {
      seed,
      log_format,
      catalog_path: optional_var("PERIODIZATION_CATALOG").map(PathBuf::from),
      profile: AthleteProfile {
        level,
        days_per_week,
        focus,
        equipment,
        mesocycle: 1,
      },
    })
  }
}

/// Unset and blank variables both read as absent
fn optional_var(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn invalid(key: &'static str, err: impl std::fmt::Display) -> EngineError {
  EngineError::Config {
    key,
    message: err.to_string(),
  }
}
