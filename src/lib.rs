pub mod adaptation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod mesocycle;
pub mod models;
pub mod readiness;
pub mod schedule;

#[cfg(test)]
mod test_utils;

pub use adaptation::{AdaptationEngine, MuscleAnalysis, VolumeRecommendation};
pub use catalog::{ExerciseCatalog, InMemoryCatalog};
pub use config::{EngineConfig, LogFormat};
pub use error::EngineError;
pub use mesocycle::{AthleteProfile, Mesocycle, MuscleAdjustment, StrengthTrend, WeekTransition};
pub use readiness::{DayCategory, ReadinessInput, WorkoutAdjustment};
pub use schedule::{PlanRequest, ScheduleBuilder};

use chrono::Local;
use tracing::info;

/// Build week 1 for the configured athlete and print it as JSON
pub fn run() -> Result<(), EngineError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = EngineConfig::from_env()?;
  logging::init_logging(config.log_format)?;

  let catalog = match &config.catalog_path {
    Some(path) => InMemoryCatalog::load(path)?,
    None => InMemoryCatalog::sample()?,
  };
  info!(entries = catalog.len(), "Catalog ready");

  let start_date = Local::now().date_naive();
  let mesocycle = Mesocycle::start(config.profile.clone(), catalog, start_date, config.seed)?;

  let json = serde_json::to_string_pretty(mesocycle.current_week())
    .map_err(|e| EngineError::Output(e.to_string()))?;
  println!("{}", json);
  Ok(())
}
