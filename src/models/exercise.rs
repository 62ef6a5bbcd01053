use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub type ExerciseId = i64;

// ---------------------------------------------------------------------------
/// Muscle groups, declared in full-body hierarchy order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Muscle {
  #[serde(rename = "Petto")]
  Chest,
  #[serde(rename = "Schiena")]
  Back,
  #[serde(rename = "Bicipiti")]
  Biceps,
  #[serde(rename = "Tricipiti")]
  Triceps,
  #[serde(rename = "Quadricipiti")]
  Quads,
  #[serde(rename = "Glutei")]
  Glutes,
  #[serde(rename = "Femorali")]
  Hamstrings,
  #[serde(rename = "Spalle")]
  Shoulders,
  #[serde(rename = "Polpacci")]
  Calves,
}

impl Muscle {
  /// Full-body hierarchy: chest, back, arms, quads, glutes, hamstrings, shoulders, calves
  pub const ALL: [Muscle; 9] = [
    Muscle::Chest,
    Muscle::Back,
    Muscle::Biceps,
    Muscle::Triceps,
    Muscle::Quads,
    Muscle::Glutes,
    Muscle::Hamstrings,
    Muscle::Shoulders,
    Muscle::Calves,
  ];

  /// Catalog label for this muscle group
  pub fn as_str(&self) -> &'static str {
    match self {
      Muscle::Chest => "Petto",
      Muscle::Back => "Schiena",
      Muscle::Biceps => "Bicipiti",
      Muscle::Triceps => "Tricipiti",
      Muscle::Quads => "Quadricipiti",
      Muscle::Glutes => "Glutei",
      Muscle::Hamstrings => "Femorali",
      Muscle::Shoulders => "Spalle",
      Muscle::Calves => "Polpacci",
    }
  }
}

impl std::fmt::Display for Muscle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Muscle {
  type Err = EngineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "petto" | "chest" => Ok(Muscle::Chest),
      "schiena" | "back" => Ok(Muscle::Back),
      "bicipiti" | "biceps" => Ok(Muscle::Biceps),
      "tricipiti" | "triceps" => Ok(Muscle::Triceps),
      "quadricipiti" | "quads" => Ok(Muscle::Quads),
      "glutei" | "glutes" => Ok(Muscle::Glutes),
      "femorali" | "hamstrings" => Ok(Muscle::Hamstrings),
      "spalle" | "shoulders" => Ok(Muscle::Shoulders),
      "polpacci" | "calves" => Ok(Muscle::Calves),
      _ => Err(EngineError::UnknownMuscle(s.to_string())),
    }
  }
}

// ---------------------------------------------------------------------------
/// Experience tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
  #[serde(alias = "principiante")]
  Beginner,
  #[serde(alias = "intermedio")]
  Intermediate,
  #[serde(alias = "avanzato")]
  Advanced,
}

impl ExperienceLevel {
  /// Direct sets every trained muscle receives regardless of indirect credit
  pub fn min_direct_sets(&self) -> u32 {
    match self {
      ExperienceLevel::Beginner => 4,
      ExperienceLevel::Intermediate | ExperienceLevel::Advanced => 6,
    }
  }
}

impl std::fmt::Display for ExperienceLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Beginner => write!(f, "beginner"),
      Self::Intermediate => write!(f, "intermediate"),
      Self::Advanced => write!(f, "advanced"),
    }
  }
}

impl std::str::FromStr for ExperienceLevel {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "beginner" | "principiante" => Ok(Self::Beginner),
      "intermediate" | "intermedio" => Ok(Self::Intermediate),
      "advanced" | "avanzato" => Ok(Self::Advanced),
      _ => Err(format!("Unknown experience level: {}", s)),
    }
  }
}

// ---------------------------------------------------------------------------
/// Equipment context used to filter the catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentContext {
  #[serde(alias = "Palestra Completa")]
  FullGym,
  #[serde(alias = "Home Manubri")]
  HomeDumbbells,
}

impl EquipmentContext {
  pub fn as_str(&self) -> &'static str {
    match self {
      EquipmentContext::FullGym => "Palestra Completa",
      EquipmentContext::HomeDumbbells => "Home Manubri",
    }
  }
}

impl std::str::FromStr for EquipmentContext {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "full_gym" | "palestra completa" | "palestra_completa" => Ok(Self::FullGym),
      "home_dumbbells" | "home manubri" | "home_manubri" => Ok(Self::HomeDumbbells),
      _ => Err(format!("Unknown equipment context: {}", s)),
    }
  }
}

// ---------------------------------------------------------------------------
/// Repetition range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RepRange {
  pub low: u32,
  pub high: u32,
}

/// Catalog files carry either `{"low": 6, "high": 8}` or the legacy
/// string form ("6-8", "[6,8]"); unreadable strings become 1-10
impl<'de> Deserialize<'de> for RepRange {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRange {
      Bounds { low: u32, high: u32 },
      Text(String),
    }

    Ok(match RawRange::deserialize(deserializer)? {
      RawRange::Bounds { low, high } => RepRange { low, high },
      RawRange::Text(text) => RepRange::parse_lenient(&text),
    })
  }
}

impl RepRange {
  /// Used when a catalog row carries an unreadable range
  pub const FALLBACK: RepRange = RepRange { low: 1, high: 10 };

  pub fn new(low: u32, high: u32) -> Result<Self, EngineError> {
    if low == 0 || low > high {
      return Err(EngineError::InvalidRepRange(format!("{}-{}", low, high)));
    }
    Ok(Self { low, high })
  }

  /// Label used in performance logs, e.g. "6-8"
  pub fn label(&self) -> String {
    format!("{}-{}", self.low, self.high)
  }

  /// Parse "6-8" or "[6,8]", falling back to 1-10
  pub fn parse_lenient(s: &str) -> Self {
    s.parse().unwrap_or(Self::FALLBACK)
  }
}

impl std::str::FromStr for RepRange {
  type Err = EngineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let cleaned = s.trim().trim_start_matches('[').trim_end_matches(']');
    let (low, high) = cleaned
      .split_once('-')
      .or_else(|| cleaned.split_once(','))
      .ok_or_else(|| EngineError::InvalidRepRange(s.to_string()))?;

    let low: u32 = low
      .trim()
      .parse()
      .map_err(|_| EngineError::InvalidRepRange(s.to_string()))?;
    let high: u32 = high
      .trim()
      .parse()
      .map_err(|_| EngineError::InvalidRepRange(s.to_string()))?;

    RepRange::new(low, high)
  }
}

/// Upper bound of a rep-range label ("8-12" -> 12), 0 when unreadable
pub fn label_upper_bound(label: &str) -> u32 {
  label
    .split_once('-')
    .and_then(|(_, high)| high.trim().parse().ok())
    .unwrap_or(0)
}

// ---------------------------------------------------------------------------
/// Exercise: immutable catalog value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
  #[serde(alias = "Fondamentale")]
  Compound,
  #[serde(alias = "Isolamento")]
  Isolation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: ExerciseId,
  pub name: String,
  pub primary_muscle: Muscle,
  #[serde(default)]
  pub secondary_muscles: Vec<Muscle>,
  pub rep_range: RepRange,
  #[serde(default)]
  pub equipment: Vec<String>,
  pub kind: ExerciseKind,
  #[serde(default)]
  pub joints: Vec<String>,
  /// Fatigue / joint-stress tag, 1 (gentle) to 10 (taxing)
  pub fatigue: u8,
  /// 1 = beginner, 2 = intermediate, 3 = advanced
  #[serde(default = "default_level")]
  pub level: u8,
  #[serde(default = "default_rest_seconds")]
  pub rest_seconds: u32,
}

fn default_level() -> u8 {
  1
}

fn default_rest_seconds() -> u32 {
  90
}

impl Exercise {
  /// True when the muscle only receives indirect work from this exercise
  pub fn credits_indirectly(&self, muscle: Muscle) -> bool {
    self.primary_muscle != muscle && self.secondary_muscles.contains(&muscle)
  }

  pub fn is_isolation(&self) -> bool {
    self.kind == ExerciseKind::Isolation
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::make_exercise;

  #[test]
  fn test_muscle_parse_accepts_both_languages() {
    assert_eq!("Petto".parse::<Muscle>().unwrap(), Muscle::Chest);
    assert_eq!("quads".parse::<Muscle>().unwrap(), Muscle::Quads);
    assert_eq!(" SPALLE ".parse::<Muscle>().unwrap(), Muscle::Shoulders);
    assert!("Collo".parse::<Muscle>().is_err());
  }

  #[test]
  fn test_muscle_order_follows_hierarchy() {
    let mut shuffled = vec![Muscle::Calves, Muscle::Chest, Muscle::Shoulders, Muscle::Biceps];
    shuffled.sort();
    assert_eq!(
      shuffled,
      vec![Muscle::Chest, Muscle::Biceps, Muscle::Shoulders, Muscle::Calves]
    );
  }

  #[test]
  fn test_muscle_serde_uses_catalog_label() {
    let json = serde_json::to_string(&Muscle::Hamstrings).unwrap();
    assert_eq!(json, "\"Femorali\"");
    let parsed: Muscle = serde_json::from_str("\"Glutei\"").unwrap();
    assert_eq!(parsed, Muscle::Glutes);
  }

  #[test]
  fn test_rep_range_parsing() {
    assert_eq!("6-8".parse::<RepRange>().unwrap(), RepRange { low: 6, high: 8 });
    assert_eq!("[5,7]".parse::<RepRange>().unwrap(), RepRange { low: 5, high: 7 });
    assert!("8-6".parse::<RepRange>().is_err());
    assert_eq!(RepRange::parse_lenient("heavy"), RepRange::FALLBACK);
  }

  #[test]
  fn test_rep_range_deserializes_from_string_or_bounds() {
    let bounds: RepRange = serde_json::from_str(r#"{"low": 8, "high": 12}"#).unwrap();
    assert_eq!(bounds, RepRange { low: 8, high: 12 });

    let bracketed: RepRange = serde_json::from_str(r#""[6,8]""#).unwrap();
    assert_eq!(bracketed, RepRange { low: 6, high: 8 });

    let unreadable: RepRange = serde_json::from_str(r#""to failure""#).unwrap();
    assert_eq!(unreadable, RepRange::FALLBACK);
  }

  #[test]
  fn test_label_upper_bound() {
    assert_eq!(label_upper_bound("8-12"), 12);
    assert_eq!(label_upper_bound("20-22"), 22);
    assert_eq!(label_upper_bound("max"), 0);
  }

  #[test]
  fn test_indirect_credit_excludes_primary() {
    let bench = make_exercise(1, "Panca Piana", Muscle::Chest, &[Muscle::Triceps, Muscle::Shoulders], (6, 8));
    assert!(bench.credits_indirectly(Muscle::Triceps));
    assert!(!bench.credits_indirectly(Muscle::Chest));
    assert!(!bench.credits_indirectly(Muscle::Calves));
  }

  #[test]
  fn test_level_floors() {
    assert_eq!(ExperienceLevel::Beginner.min_direct_sets(), 4);
    assert_eq!(ExperienceLevel::Advanced.min_direct_sets(), 6);
    assert_eq!("intermedio".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Intermediate);
  }
}
