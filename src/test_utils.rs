//! Test utilities shared by the unit tests
//!
//! Factories for exercises, plan requests and logged sessions, plus a fixed
//! start date so generated weeks are reproducible.

use chrono::NaiveDate;

use crate::mesocycle::AthleteProfile;
use crate::models::{
  EquipmentContext, Exercise, ExerciseId, ExerciseKind, ExperienceLevel, Muscle, PerformanceRecord,
  RepRange, SessionFeedback, SetEntry, SorenessReport,
};
use crate::schedule::PlanRequest;

/// ---------------------------------------------------------------------------
/// Model factories
/// ---------------------------------------------------------------------------

/// Monday 2024-01-01
pub fn test_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Exercises with secondary muscles are compounds, the rest isolation
pub fn make_exercise(
  id: ExerciseId,
  name: &str,
  primary: Muscle,
  secondary: &[Muscle],
  (low, high): (u32, u32),
) -> Exercise {
  let kind = if secondary.is_empty() {
    ExerciseKind::Isolation
  } else {
    ExerciseKind::Compound
  };

  Exercise {
    id,
    name: name.to_string(),
    primary_muscle: primary,
    secondary_muscles: secondary.to_vec(),
    rep_range: RepRange::new(low, high).unwrap(),
    equipment: Vec::new(),
    kind,
    joints: Vec::new(),
    fatigue: 5,
    level: 1,
    rest_seconds: 90,
  }
}

/// ---------------------------------------------------------------------------
/// Plan factories
/// ---------------------------------------------------------------------------

pub fn make_request(level: ExperienceLevel, days_per_week: u8, focus: Muscle) -> PlanRequest {
  PlanRequest {
    level,
    days_per_week,
    focus,
    equipment: EquipmentContext::FullGym,
    mesocycle: 1,
    week_number: 1,
    start_date: test_date(),
    volume_overrides: Default::default(),
  }
}

pub fn make_profile(level: ExperienceLevel, days_per_week: u8, focus: Muscle) -> AthleteProfile {
  AthleteProfile {
    level,
    days_per_week,
    focus,
    equipment: EquipmentContext::FullGym,
    mesocycle: 1,
  }
}

/// ---------------------------------------------------------------------------
/// Session factories
/// ---------------------------------------------------------------------------

/// A day-1 session; sets are (load, reps, rep-range label)
pub fn make_record(
  exercise_id: ExerciseId,
  muscle: Muscle,
  week: u32,
  (mind_muscle, pump, joint_pain): (u8, u8, u8),
  sets: Vec<(f64, i32, &str)>,
) -> PerformanceRecord {
  let feedback = SessionFeedback {
    mind_muscle,
    pump,
    joint_pain,
  };
  let sets = sets
    .into_iter()
    .map(|(load, reps, label)| SetEntry::new(load, reps, label))
    .collect();

  PerformanceRecord::new(exercise_id, muscle, week, 1, feedback, sets)
}

pub fn make_soreness(muscle: Muscle, week: u32, value: u8) -> SorenessReport {
  SorenessReport {
    muscle,
    day: 1,
    week,
    value,
  }
}
