//! Performance & fatigue model
//!
//! A `PerformanceRecord` is built from one exercise's logged working sets and
//! the athlete's subjective ratings. Stimulus and estimated 1RM are derived on
//! construction; fatigue interference and SFR stay at zero until the
//! adaptation engine applies the rule for the record's week.

use serde::{Deserialize, Serialize};

use super::exercise::{ExerciseId, Muscle};
use crate::error::EngineError;

/// Session ratings and soreness are all on a 1-3 scale
const RATING_SCALE: std::ops::RangeInclusive<u8> = 1..=3;

fn check_rating(field: &'static str, value: u8) -> Result<(), EngineError> {
  if RATING_SCALE.contains(&value) {
    Ok(())
  } else {
    Err(EngineError::InvalidRating { field, value })
  }
}

/// One executed working set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
  pub load: f64,
  pub reps: i32,
  /// Target rep-range label the set was programmed for, e.g. "6-8"
  pub rep_range: String,
}

impl SetEntry {
  pub fn new(load: f64, reps: i32, rep_range: &str) -> Self {
    Self {
      load,
      reps,
      rep_range: rep_range.to_string(),
    }
  }

  pub fn one_rep_max(&self) -> f64 {
    estimate_one_rep_max(self.load, self.reps)
  }

  /// Sets with a non-positive load or rep count are kept in the log but
  /// ignored by every calculation
  pub fn is_valid(&self) -> bool {
    self.load > 0.0 && self.reps > 0
  }
}

/// Epley estimate: load * (1 + reps / 30). Zero for non-positive load or reps.
pub fn estimate_one_rep_max(load: f64, reps: i32) -> f64 {
  if load <= 0.0 || reps <= 0 {
    return 0.0;
  }
  load * (1.0 + reps as f64 / 30.0)
}

/// Subjective 1-3 ratings collected after the exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFeedback {
  pub mind_muscle: u8,
  pub pump: u8,
  pub joint_pain: u8,
}

impl SessionFeedback {
  pub fn validate(&self) -> Result<(), EngineError> {
    check_rating("mind_muscle", self.mind_muscle)?;
    check_rating("pump", self.pump)?;
    check_rating("joint_pain", self.joint_pain)
  }
}

// ---------------------------------------------------------------------------
/// Performance Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
  pub exercise_id: ExerciseId,
  pub day: u8,
  pub week: u32,
  pub primary_muscle: Muscle,
  pub feedback: SessionFeedback,
  pub sets: Vec<SetEntry>,

  /// Mind-muscle connection + pump
  pub stimulus: f64,
  /// Best estimated 1RM over the executed sets
  pub one_rep_max: f64,
  pub fatigue_interference: f64,
  /// Stimulus-to-fatigue ratio, valid once the week's fatigue rule has run
  pub sfr: f64,
  /// Regression versus the previous week's average 1RM (week 3 only)
  pub performance_loss_pct: f64,
}

impl PerformanceRecord {
  pub fn new(
    exercise_id: ExerciseId,
    primary_muscle: Muscle,
    week: u32,
    day: u8,
    feedback: SessionFeedback,
    sets: Vec<SetEntry>,
  ) -> Self {
    let stimulus = feedback.mind_muscle as f64 + feedback.pump as f64;
    let one_rep_max = sets
      .iter()
      .map(SetEntry::one_rep_max)
      .fold(0.0, f64::max);

    Self {
      exercise_id,
      day,
      week,
      primary_muscle,
      feedback,
      sets,
      stimulus,
      one_rep_max,
      fatigue_interference: 0.0,
      sfr: 0.0,
      performance_loss_pct: 0.0,
    }
  }

  /// FI = max(1, joint pain + performance loss); SFR = stimulus / FI
  pub fn apply_fatigue(&mut self, performance_loss_pct: f64) {
    self.performance_loss_pct = performance_loss_pct;
    self.fatigue_interference = (self.feedback.joint_pain as f64 + performance_loss_pct).max(1.0);
    self.sfr = self.stimulus / self.fatigue_interference;
  }

  /// Working sets that count as performed volume
  pub fn set_count(&self) -> u32 {
    self.sets.iter().filter(|s| s.is_valid()).count() as u32
  }
}

/// Delayed-onset soreness rating (1-3) for one muscle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorenessReport {
  pub muscle: Muscle,
  pub day: u8,
  pub week: u32,
  pub value: u8,
}

impl SorenessReport {
  pub fn validate(&self) -> Result<(), EngineError> {
    check_rating("soreness", self.value)
  }
}
