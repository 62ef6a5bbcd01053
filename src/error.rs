//! Error types for the periodization engine
//!
//! Missing training data is not an error here: the engine falls back to a
//! "hold" decision and reports a reason string instead. These variants cover
//! the failures a caller has to act on.

use serde::Serialize;

use crate::models::{ExerciseId, ExperienceLevel};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error("Catalog lookup failed: {0}")]
  Catalog(String),

  #[error("Failed to read catalog: {0}")]
  CatalogIo(#[from] std::io::Error),

  #[error("Failed to parse catalog: {0}")]
  CatalogParse(#[from] serde_json::Error),

  #[error("{days} training days per week is not supported for {level} athletes")]
  UnsupportedFrequency { level: ExperienceLevel, days: u8 },

  #[error("Invalid readiness answer for {field}: {value} (expected 1-5)")]
  InvalidReadiness { field: &'static str, value: u8 },

  #[error("Invalid session rating for {field}: {value} (expected 1-3)")]
  InvalidRating { field: &'static str, value: u8 },

  #[error("Unknown muscle group: {0}")]
  UnknownMuscle(String),

  #[error("Invalid rep range: {0}")]
  InvalidRepRange(String),

  #[error("Invalid configuration for {key}: {message}")]
  Config { key: &'static str, message: String },

  #[error("Failed to initialize logging: {0}")]
  Logging(String),

  #[error("Exercise {exercise_id} is not planned on day {day}")]
  UnplannedExercise { exercise_id: ExerciseId, day: usize },

  #[error("Training block is complete, start a new mesocycle")]
  BlockComplete,

  #[error("Day {0} does not exist in the current week")]
  UnknownDay(usize),

  #[error("Failed to serialize output: {0}")]
  Output(String),
}

impl Serialize for EngineError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_serializes_as_message() {
    let err = EngineError::UnsupportedFrequency {
      level: ExperienceLevel::Beginner,
      days: 5,
    };
    let json = serde_json::to_string(&err).unwrap();
    assert_eq!(
      json,
      "\"5 training days per week is not supported for beginner athletes\""
    );
  }

  #[test]
  fn test_parse_error_converts() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: EngineError = parse_err.into();
    assert!(err.to_string().starts_with("Failed to parse catalog"));
  }
}
