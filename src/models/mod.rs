pub mod exercise;
pub mod performance;
pub mod workout;

pub use exercise::{
  label_upper_bound, EquipmentContext, Exercise, ExerciseId, ExerciseKind, ExperienceLevel, Muscle,
  RepRange,
};
pub use performance::{estimate_one_rep_max, PerformanceRecord, SessionFeedback, SetEntry, SorenessReport};
pub use workout::{ExerciseLog, TrainingWeek, WorkoutDay};
