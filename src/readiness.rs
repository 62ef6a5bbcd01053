//! Daily readiness check
//!
//! A short questionnaire answered right before training decides whether the
//! planned day runs as written (GREEN), runs lighter (YELLOW) or is swapped
//! for recovery (RED). The stored plan is never touched: `apply_adjustment`
//! returns a modified copy of the day.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::models::{label_upper_bound, ExerciseId, Muscle, WorkoutDay};

// ---------------------------------------------------------------------------
/// Readiness Input
// ---------------------------------------------------------------------------

/// Answers on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessInput {
  pub energy: u8,
  pub sleep: u8,
  /// Soreness of the muscles trained today
  pub soreness: u8,
  pub joint_pain: u8,
  #[serde(default)]
  pub time_limited: bool,
}

impl ReadinessInput {
  pub fn new(energy: u8, sleep: u8, soreness: u8, joint_pain: u8, time_limited: bool) -> Result<Self, EngineError> {
    let input = Self {
      energy,
      sleep,
      soreness,
      joint_pain,
      time_limited,
    };
    input.validate()?;
    Ok(input)
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    for (field, value) in [
      ("energy", self.energy),
      ("sleep", self.sleep),
      ("soreness", self.soreness),
      ("joint_pain", self.joint_pain),
    ] {
      if !(1..=5).contains(&value) {
        return Err(EngineError::InvalidReadiness { field, value });
      }
    }
    Ok(())
  }

  fn rest_quality(&self) -> f64 {
    (self.energy as f64 + self.sleep as f64) / 2.0
  }

  /// Mean of energy and sleep, minus one point per joint-pain level above 2
  pub fn score(&self) -> f64 {
    self.rest_quality() - self.joint_pain.saturating_sub(2) as f64
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayCategory {
  Green,
  Yellow,
  Red,
}

impl std::fmt::Display for DayCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Green => write!(f, "GREEN"),
      Self::Yellow => write!(f, "YELLOW"),
      Self::Red => write!(f, "RED"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutAdjustment {
  pub category: DayCategory,
  pub message: String,
  /// Extra reps in reserve for every exercise of the day
  pub rir_adjustment: i32,
  /// Sets to remove per exercise
  pub set_reductions: BTreeMap<ExerciseId, u32>,
}

impl WorkoutAdjustment {
  fn green() -> Self {
    Self {
      category: DayCategory::Green,
      message: "You're at your best! Train the day as planned and aim for the top of each rep range.".to_string(),
      rir_adjustment: 0,
      set_reductions: BTreeMap::new(),
    }
  }

  fn red(reason: &str) -> Self {
    Self {
      category: DayCategory::Red,
      message: format!("RED DAY: {reason} Rest, or do light cardio and stretching instead."),
      rir_adjustment: 3,
      set_reductions: BTreeMap::new(),
    }
  }
}

// ---------------------------------------------------------------------------
/// Assessment
// ---------------------------------------------------------------------------

/// Classify the day and work out how to modulate it
pub fn assess(input: &ReadinessInput, day: &WorkoutDay) -> WorkoutAdjustment {
  let score = input.score();
  debug!(score, joint_pain = input.joint_pain, soreness = input.soreness, "Assessing readiness");

  if input.joint_pain >= 4 {
    return WorkoutAdjustment::red(
      "Severe joint pain. Avoid making it worse today: pick rest or active recovery.",
    );
  }

  if score < 2.0 {
    return WorkoutAdjustment::red("Energy and sleep are very low. Training today would be counterproductive.");
  }

  let fatigued = score < 3.5 || input.soreness >= 4;
  if !fatigued && !input.time_limited {
    return WorkoutAdjustment::green();
  }

  let mut messages = Vec::new();
  let mut rir_adjustment = 0;
  let mut set_reductions: BTreeMap<ExerciseId, u32> = BTreeMap::new();

  if fatigued {
    messages.push("YELLOW DAY: moderate the effort.".to_string());
    rir_adjustment = 1;

    if input.rest_quality() < 2.5 {
      rir_adjustment = 2;
      messages.push("Low energy: widen the buffer (RIR +2) and focus on technique.".to_string());
    }

    if input.soreness >= 4 {
      messages.push("High soreness: volume is slightly reduced on isolation exercises.".to_string());
      for exercise in day.exercises.iter().filter(|e| e.is_isolation()) {
        *set_reductions.entry(exercise.id).or_insert(0) += 1;
      }
    }
  }

  if input.time_limited {
    messages.push("Limited time: volume is reduced on the highest-rep exercises to shorten the session.".to_string());
    for exercise_id in highest_rep_per_muscle(day) {
      *set_reductions.entry(exercise_id).or_insert(0) += 1;
    }
  }

  WorkoutAdjustment {
    category: DayCategory::Yellow,
    message: messages.join("\n"),
    rir_adjustment,
    set_reductions,
  }
}

/// For each primary muscle of the day, the exercise whose planned rep-range
/// labels reach the highest upper bound; ties keep the earlier exercise
fn highest_rep_per_muscle(day: &WorkoutDay) -> Vec<ExerciseId> {
  let mut best: BTreeMap<Muscle, (u32, ExerciseId)> = BTreeMap::new();

  for exercise in &day.exercises {
    let Some(entry) = day.log.get(&exercise.id) else {
      continue;
    };
    let Some(upper) = entry.rep_ranges.iter().map(|l| label_upper_bound(l)).max() else {
      continue;
    };

    match best.get(&exercise.primary_muscle) {
      Some(&(current, _)) if current >= upper => {}
      _ => {
        best.insert(exercise.primary_muscle, (upper, exercise.id));
      }
    }
  }

  best.into_values().map(|(_, id)| id).collect()
}

/// Copy of the day with the adjustment applied. RED days come back empty.
pub fn apply_adjustment(day: &WorkoutDay, adjustment: &WorkoutAdjustment) -> WorkoutDay {
  let mut adjusted = day.clone();
  adjusted.adjustment_message = Some(adjustment.message.clone());

  if adjustment.category == DayCategory::Red {
    adjusted.exercises.clear();
    adjusted.log.clear();
    return adjusted;
  }

  for (exercise_id, entry) in adjusted.log.iter_mut() {
    if let Some(&reduction) = adjustment.set_reductions.get(exercise_id) {
      entry.planned_sets = entry.planned_sets.saturating_sub(reduction).max(1);
      entry.rep_ranges.truncate(entry.planned_sets as usize);
    }
    entry.rir_adjustment = adjustment.rir_adjustment;
  }

  adjusted
}
