//! Exercise catalog access
//!
//! The schedule builder only needs one query: the enabled exercises for a
//! muscle in an equipment context, best candidates first.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::models::{EquipmentContext, Exercise, ExerciseId, Muscle, RepRange};

/// Priority value that marks an entry as disabled
pub const DISABLED_PRIORITY: u32 = 99;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

pub trait ExerciseCatalog {
  /// Enabled exercises whose primary muscle matches, ordered by priority.
  /// An empty list is a valid answer.
  fn lookup(&self, context: EquipmentContext, muscle: Muscle) -> Result<Vec<Exercise>, EngineError>;

  /// Id -> exercise map, used to put names on reports
  fn exercise_details(&self) -> BTreeMap<ExerciseId, Exercise> {
    BTreeMap::new()
  }
}

// ---------------------------------------------------------------------------
/// In-memory catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub context: EquipmentContext,
  /// Lower is preferred; 99 disables the entry
  pub priority: u32,
  #[serde(flatten)]
  pub exercise: Exercise,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
  entries: Vec<CatalogEntry>,
}

impl InMemoryCatalog {
  /// Parse a JSON array of catalog entries
  pub fn from_json(json: &str) -> Result<Self, EngineError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;

    let mut seen = std::collections::BTreeSet::new();
    for entry in &entries {
      if !seen.insert((entry.context.as_str(), entry.exercise.id)) {
        return Err(EngineError::Catalog(format!(
          "duplicate exercise id {} in {}",
          entry.exercise.id,
          entry.context.as_str()
        )));
      }

      let range = entry.exercise.rep_range;
      RepRange::new(range.low, range.high).map_err(|_| {
        EngineError::InvalidRepRange(format!("{} ({})", range.label(), entry.exercise.name))
      })?;
    }

    debug!(entries = entries.len(), "Loaded exercise catalog");
    Ok(Self { entries })
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    Self::from_json(&json)
  }

  /// Built-in catalog covering every muscle for both equipment contexts
  pub fn sample() -> Result<Self, EngineError> {
    Self::from_json(SAMPLE_CATALOG)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl ExerciseCatalog for InMemoryCatalog {
  fn lookup(&self, context: EquipmentContext, muscle: Muscle) -> Result<Vec<Exercise>, EngineError> {
    let mut matches: Vec<&CatalogEntry> = self
      .entries
      .iter()
      .filter(|e| e.context == context)
      .filter(|e| e.exercise.primary_muscle == muscle)
      .filter(|e| e.priority != DISABLED_PRIORITY)
      .collect();

    matches.sort_by_key(|e| e.priority);

    Ok(matches.into_iter().map(|e| e.exercise.clone()).collect())
  }

  fn exercise_details(&self) -> BTreeMap<ExerciseId, Exercise> {
    self
      .entries
      .iter()
      .map(|e| (e.exercise.id, e.exercise.clone()))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sample_catalog_covers_every_muscle() {
    let catalog = InMemoryCatalog::sample().unwrap();
    for context in [EquipmentContext::FullGym, EquipmentContext::HomeDumbbells] {
      for muscle in Muscle::ALL {
        let found = catalog.lookup(context, muscle).unwrap();
        assert!(!found.is_empty(), "{} has no exercise in {}", muscle, context.as_str());
      }
    }
  }

  #[test]
  fn test_lookup_orders_by_priority_and_skips_disabled() {
    let catalog = InMemoryCatalog::sample().unwrap();
    let back = catalog.lookup(EquipmentContext::FullGym, Muscle::Back).unwrap();

    let names: Vec<&str> = back.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Rematore Bilanciere", "Lat Machine"]);
  }

  #[test]
  fn test_lookup_filters_by_context() {
    let catalog = InMemoryCatalog::sample().unwrap();
    let home = catalog.lookup(EquipmentContext::HomeDumbbells, Muscle::Chest).unwrap();
    assert!(home
      .iter()
      .all(|e| !e.equipment.iter().any(|item| item.eq_ignore_ascii_case("bilanciere"))));
    assert_eq!(home[0].name, "Panca Manubri");
  }

  #[test]
  fn test_from_json_rejects_bad_rep_range() {
    let json = r#"[{
      "context": "Palestra Completa", "priority": 1, "id": 1, "name": "Broken",
      "primary_muscle": "Petto", "rep_range": {"low": 12, "high": 8},
      "kind": "Fondamentale", "fatigue": 5
    }]"#;

    let err = InMemoryCatalog::from_json(json).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRepRange(_)));
  }

  #[test]
  fn test_from_json_rejects_duplicate_ids() {
    let json = r#"[
      {"context": "home_dumbbells", "priority": 1, "id": 4, "name": "A",
       "primary_muscle": "Schiena", "rep_range": {"low": 8, "high": 10}, "kind": "compound", "fatigue": 4},
      {"context": "home_dumbbells", "priority": 2, "id": 4, "name": "B",
       "primary_muscle": "Schiena", "rep_range": {"low": 10, "high": 12}, "kind": "compound", "fatigue": 4}
    ]"#;

    let err = InMemoryCatalog::from_json(json).unwrap_err();
    assert!(matches!(err, EngineError::Catalog(_)));
  }

  #[test]
  fn test_from_json_rejects_malformed_input() {
    let err = InMemoryCatalog::from_json("[{").unwrap_err();
    assert!(matches!(err, EngineError::CatalogParse(_)));
  }

  #[test]
  fn test_from_json_accepts_string_rep_ranges() {
    let json = r#"[
      {"context": "Palestra Completa", "priority": 1, "id": 1, "name": "Panca Piana",
       "primary_muscle": "Petto", "rep_range": "[6,8]", "kind": "Fondamentale", "fatigue": 7},
      {"context": "Palestra Completa", "priority": 2, "id": 2, "name": "Croci",
       "primary_muscle": "Petto", "rep_range": "12-15", "kind": "Isolamento", "fatigue": 3}
    ]"#;

    let catalog = InMemoryCatalog::from_json(json).unwrap();
    let chest = catalog.lookup(EquipmentContext::FullGym, Muscle::Chest).unwrap();
    assert_eq!(chest[0].rep_range, RepRange { low: 6, high: 8 });
    assert_eq!(chest[1].rep_range.label(), "12-15");
  }

  #[test]
  fn test_load_missing_file_is_io_error() {
    let err = InMemoryCatalog::load("/nonexistent/catalog.json").unwrap_err();
    assert!(matches!(err, EngineError::CatalogIo(_)));
  }

  #[test]
  fn test_exercise_details_by_id() {
    let catalog = InMemoryCatalog::sample().unwrap();
    let details = catalog.exercise_details();
    assert_eq!(details[&11].name, "Squat");
    assert_eq!(details.len(), catalog.len());
  }
}
