use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::exercise::{Exercise, ExerciseId, Muscle};
use super::performance::SetEntry;

/// Per-exercise entry of a day's performance log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
  pub exercise_name: String,
  pub primary_muscle: Muscle,
  pub planned_sets: u32,
  /// Target rep-range label for each planned set, e.g. ["6-8", "6-8"]
  pub rep_ranges: Vec<String>,
  /// Sets actually performed, appended by the logging flow
  #[serde(default)]
  pub executed: Vec<SetEntry>,
  /// Extra reps in reserve requested by the readiness check
  #[serde(default)]
  pub rir_adjustment: i32,
}

// ---------------------------------------------------------------------------
/// Workout Day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
  /// 1-based position within the week
  pub day_index: u8,
  pub week: u32,
  pub split_label: String,
  pub date: NaiveDate,
  pub exercises: Vec<Exercise>,
  pub log: BTreeMap<ExerciseId, ExerciseLog>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub adjustment_message: Option<String>,
}

impl WorkoutDay {
  pub fn new(day_index: u8, week: u32, split_label: &str, date: NaiveDate) -> Self {
    Self {
      day_index,
      week,
      split_label: split_label.to_string(),
      date,
      exercises: Vec::new(),
      log: BTreeMap::new(),
      adjustment_message: None,
    }
  }

  /// Append an exercise with its planned sets.
  ///
  /// When the exercise is already on the day (a muscle with a single catalog
  /// exercise uses it as both heavy and light), the sets are merged into the
  /// existing entry instead of listing it twice.
  pub fn add_exercise(&mut self, exercise: &Exercise, sets: u32, rep_ranges: Vec<String>) {
    if let Some(entry) = self.log.get_mut(&exercise.id) {
      entry.planned_sets += sets;
      entry.rep_ranges.extend(rep_ranges);
      return;
    }

    self.exercises.push(exercise.clone());
    self.log.insert(
      exercise.id,
      ExerciseLog {
        exercise_name: exercise.name.clone(),
        primary_muscle: exercise.primary_muscle,
        planned_sets: sets,
        rep_ranges,
        executed: Vec::new(),
        rir_adjustment: 0,
      },
    );
  }

  /// Record an executed set. Returns false when the exercise is not planned today.
  pub fn record_set(&mut self, exercise_id: ExerciseId, set: SetEntry) -> bool {
    match self.log.get_mut(&exercise_id) {
      Some(entry) => {
        entry.executed.push(set);
        true
      }
      None => false,
    }
  }

  pub fn muscles_trained(&self) -> Vec<Muscle> {
    self
      .exercises
      .iter()
      .map(|e| e.primary_muscle)
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }

  pub fn planned_sets(&self, exercise_id: ExerciseId) -> u32 {
    self.log.get(&exercise_id).map_or(0, |l| l.planned_sets)
  }

  pub fn is_rest_day(&self) -> bool {
    self.exercises.is_empty()
  }
}

// ---------------------------------------------------------------------------
/// Training Week
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingWeek {
  pub number: u32,
  pub start_date: NaiveDate,
  pub days: Vec<WorkoutDay>,
}

impl TrainingWeek {
  pub fn new(number: u32, start_date: NaiveDate, days: Vec<WorkoutDay>) -> Self {
    Self {
      number,
      start_date,
      days,
    }
  }

  /// Planned direct sets per primary muscle across the week
  pub fn planned_volume(&self) -> BTreeMap<Muscle, u32> {
    let mut volume = BTreeMap::new();
    for day in &self.days {
      for entry in day.log.values() {
        *volume.entry(entry.primary_muscle).or_insert(0) += entry.planned_sets;
      }
    }
    volume
  }

  pub fn planned_muscles(&self) -> BTreeSet<Muscle> {
    self
      .days
      .iter()
      .flat_map(|d| d.exercises.iter().map(|e| e.primary_muscle))
      .collect()
  }

  pub fn training_days(&self) -> impl Iterator<Item = &WorkoutDay> {
    self.days.iter().filter(|d| !d.is_rest_day())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{make_exercise, test_date};

  #[test]
  fn test_add_exercise_merges_duplicates() {
    let curl = make_exercise(7, "Curl Manubri", Muscle::Biceps, &[], (8, 12));
    let mut day = WorkoutDay::new(1, 1, "Full Body", test_date());

    day.add_exercise(&curl, 2, vec!["6-8".into(), "6-8".into()]);
    day.add_exercise(&curl, 2, vec!["12-14".into(), "20-22".into()]);

    assert_eq!(day.exercises.len(), 1);
    assert_eq!(day.planned_sets(7), 4);
    assert_eq!(day.log[&7].rep_ranges, vec!["6-8", "6-8", "12-14", "20-22"]);
  }

  #[test]
  fn test_record_set_requires_planned_exercise() {
    let row = make_exercise(3, "Rematore", Muscle::Back, &[Muscle::Biceps], (6, 10));
    let mut day = WorkoutDay::new(2, 1, "Full Body", test_date());
    day.add_exercise(&row, 3, vec!["6-8".into(); 3]);

    assert!(day.record_set(3, SetEntry::new(70.0, 8, "6-8")));
    assert!(!day.record_set(99, SetEntry::new(70.0, 8, "6-8")));
    assert_eq!(day.log[&3].executed.len(), 1);
  }

  #[test]
  fn test_week_planned_volume() {
    let bench = make_exercise(1, "Panca Piana", Muscle::Chest, &[Muscle::Triceps], (6, 8));
    let fly = make_exercise(2, "Croci", Muscle::Chest, &[], (12, 15));
    let mut d1 = WorkoutDay::new(1, 1, "Full Body", test_date());
    let mut d2 = WorkoutDay::new(2, 1, "Full Body", test_date());
    d1.add_exercise(&bench, 3, vec!["6-8".into(); 3]);
    d2.add_exercise(&fly, 2, vec!["12-14".into(); 2]);
    let d3 = WorkoutDay::new(3, 1, "Full Body", test_date());

    let week = TrainingWeek::new(1, test_date(), vec![d1, d2, d3]);
    assert_eq!(week.planned_volume()[&Muscle::Chest], 5);
    assert_eq!(week.training_days().count(), 2);
    assert!(week.planned_muscles().contains(&Muscle::Chest));
  }
}
