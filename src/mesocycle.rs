//! Mesocycle orchestration
//!
//! Owns one athlete's block: three accumulation weeks and a deload. The
//! athlete logs sessions into the current week; `finish_week` turns the
//! logged data into per-muscle volume targets and builds the next week.
//!
//! Week transitions:
//! - 1 -> 2: soreness-based forecast for every full-body muscle
//! - 2 -> 3: strength-progression points per trained muscle
//! - 3 -> 4: deload at half the performed volume
//! - 4: end-of-block SFR analysis and report

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adaptation::{
    format_recommendation, next_week_volume, target_rir, AdaptationEngine, MuscleAnalysis,
    VolumeRecommendation,
};
use crate::catalog::ExerciseCatalog;
use crate::error::EngineError;
use crate::models::{
    EquipmentContext, ExerciseId, ExperienceLevel, Muscle, PerformanceRecord, SessionFeedback,
    SetEntry, SorenessReport, TrainingWeek, WorkoutDay,
};
use crate::readiness::{apply_adjustment, assess, ReadinessInput, WorkoutAdjustment};
use crate::schedule::{PlanRequest, ScheduleBuilder};

/// Accumulation weeks plus the deload
pub const BLOCK_WEEKS: u32 = 4;

/// Deload weeks never plan fewer weekly sets than this
const MIN_DELOAD_SETS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteProfile {
    pub level: ExperienceLevel,
    pub days_per_week: u8,
    pub focus: Muscle,
    pub equipment: EquipmentContext,
    /// 1 for the first block, incremented per completed block
    #[serde(default = "default_mesocycle")]
    pub mesocycle: u32,
}

fn default_mesocycle() -> u32 {
    1
}

// ---------------------------------------------------------------------------
/// Week transitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleAdjustment {
    pub muscle: Muscle,
    /// Sets actually logged in the finished week
    pub previous_sets: u32,
    pub recommendation: String,
    pub reason: Option<String>,
    /// Weekly target handed to the builder
    pub next_sets: u32,
}

impl MuscleAdjustment {
    fn from_recommendation(muscle: Muscle, previous_sets: u32, rec: VolumeRecommendation) -> Self {
        Self {
            muscle,
            previous_sets,
            next_sets: next_week_volume(previous_sets, &rec.recommendation),
            recommendation: rec.recommendation,
            reason: rec.reason,
        }
    }

    fn deload(muscle: Muscle, previous_sets: u32) -> Self {
        let next_sets = ((previous_sets as f64 / 2.0).round_ties_even() as u32).max(MIN_DELOAD_SETS);
        Self {
            muscle,
            previous_sets,
            recommendation: format_recommendation(next_sets as i32 - previous_sets as i32),
            reason: None,
            next_sets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeekTransition {
    NextWeek {
        week: u32,
        adjustments: Vec<MuscleAdjustment>,
    },
    BlockComplete {
        analysis: BTreeMap<Muscle, MuscleAnalysis>,
        report: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthTrend {
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    /// (week, best estimated 1RM) for each week the exercise was logged
    pub weekly_best: Vec<(u32, f64)>,
    /// % change between consecutive entries of `weekly_best`
    pub changes_pct: Vec<f64>,
}

// ---------------------------------------------------------------------------
/// Mesocycle
// ---------------------------------------------------------------------------

pub struct Mesocycle<C> {
    profile: AthleteProfile,
    builder: ScheduleBuilder<C>,
    engine: AdaptationEngine,
    start_date: NaiveDate,
    current: TrainingWeek,
    volume_history: BTreeMap<u32, BTreeMap<Muscle, u32>>,
    complete: bool,
}

impl<C: ExerciseCatalog> Mesocycle<C> {
    /// Build week 1 of a new block
    pub fn start(
        profile: AthleteProfile,
        catalog: C,
        start_date: NaiveDate,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        let engine = AdaptationEngine::new(catalog.exercise_details());
        let mut builder = ScheduleBuilder::new(catalog, seed);

        let request = plan_request(&profile, start_date, 1, BTreeMap::new());
        let current = builder.build_week(&request)?;

        let mut mesocycle = Self {
            profile,
            builder,
            engine,
            start_date,
            current,
            volume_history: BTreeMap::new(),
            complete: false,
        };
        mesocycle.register_week_exercises();

        info!(
            level = %mesocycle.profile.level,
            days = mesocycle.profile.days_per_week,
            focus = %mesocycle.profile.focus,
            "Started mesocycle"
        );
        Ok(mesocycle)
    }

    pub fn profile(&self) -> &AthleteProfile {
        &self.profile
    }

    pub fn current_week(&self) -> &TrainingWeek {
        &self.current
    }

    pub fn week_number(&self) -> u32 {
        self.current.number
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn engine(&self) -> &AdaptationEngine {
        &self.engine
    }

    /// Sets performed per muscle, by week
    pub fn volume_history(&self) -> &BTreeMap<u32, BTreeMap<Muscle, u32>> {
        &self.volume_history
    }

    /// Reps in reserve the current week should be trained at
    pub fn target_rir(&self) -> u8 {
        target_rir(self.current.number)
    }

    pub fn day(&self, day_index: usize) -> Result<&WorkoutDay, EngineError> {
        day_index
            .checked_sub(1)
            .and_then(|i| self.current.days.get(i))
            .ok_or(EngineError::UnknownDay(day_index))
    }

    /// Log one exercise of a session in the current week
    pub fn log_performance(
        &mut self,
        day_index: usize,
        exercise_id: ExerciseId,
        feedback: SessionFeedback,
        sets: Vec<SetEntry>,
    ) -> Result<(), EngineError> {
        if self.complete {
            return Err(EngineError::BlockComplete);
        }
        feedback.validate()?;

        let week = self.current.number;
        let day = day_index
            .checked_sub(1)
            .and_then(|i| self.current.days.get_mut(i))
            .ok_or(EngineError::UnknownDay(day_index))?;

        let muscle = day
            .log
            .get(&exercise_id)
            .map(|entry| entry.primary_muscle)
            .ok_or(EngineError::UnplannedExercise {
                exercise_id,
                day: day_index,
            })?;

        for set in &sets {
            let recorded = day.record_set(exercise_id, set.clone());
            debug_assert!(recorded, "exercise {exercise_id} checked as planned above");
        }

        let record = PerformanceRecord::new(exercise_id, muscle, week, day.day_index, feedback, sets);
        self.engine.record_performance(record);
        Ok(())
    }

    /// Soreness felt going into the next week
    pub fn record_soreness(&mut self, muscle: Muscle, day: u8, value: u8) -> Result<(), EngineError> {
        if self.complete {
            return Err(EngineError::BlockComplete);
        }

        let report = SorenessReport {
            muscle,
            day,
            week: self.current.number + 1,
            value,
        };
        report.validate()?;

        self.engine.record_soreness(report);
        Ok(())
    }

    /// Readiness-adjusted copy of a day. The stored week is left as planned.
    pub fn prepare_day(
        &self,
        day_index: usize,
        readiness: &ReadinessInput,
    ) -> Result<(WorkoutAdjustment, WorkoutDay), EngineError> {
        readiness.validate()?;
        let day = self.day(day_index)?;

        let adjustment = assess(readiness, day);
        let adjusted = apply_adjustment(day, &adjustment);
        info!(day = day_index, category = %adjustment.category, "Prepared training day");
        Ok((adjustment, adjusted))
    }

    /// Close the current week and move the block forward
    pub fn finish_week(&mut self) -> Result<WeekTransition, EngineError> {
        if self.complete {
            return Err(EngineError::BlockComplete);
        }

        let week = self.current.number;
        let performed = self.performed_volume();
        self.volume_history.insert(week, performed.clone());

        let adjustments: Vec<MuscleAdjustment> = match week {
            1 => {
                self.engine.compute_week1_sfr();
                Muscle::ALL
                    .iter()
                    .map(|&muscle| {
                        let previous = performed.get(&muscle).copied().unwrap_or(0);
                        let rec = self.engine.forecast_week2_volume(muscle, self.profile.level);
                        MuscleAdjustment::from_recommendation(muscle, previous, rec)
                    })
                    .collect()
            }
            2 => performed
                .iter()
                .map(|(&muscle, &previous)| {
                    let rec = self.engine.week3_volume_recommendation(muscle);
                    MuscleAdjustment::from_recommendation(muscle, previous, rec)
                })
                .collect(),
            3 => performed
                .iter()
                .map(|(&muscle, &previous)| MuscleAdjustment::deload(muscle, previous))
                .collect(),
            _ => {
                self.engine.compute_week3_sfr();
                let analysis = self.engine.analyze_by_muscle();
                let report = self.engine.generate_report();
                self.complete = true;

                info!(muscles = analysis.len(), "Mesocycle complete");
                return Ok(WeekTransition::BlockComplete { analysis, report });
            }
        };

        let overrides = adjustments.iter().map(|a| (a.muscle, a.next_sets)).collect();
        let request = plan_request(&self.profile, self.start_date, week + 1, overrides);
        self.current = self.builder.build_week(&request)?;
        self.register_week_exercises();

        info!(
            finished = week,
            next = week + 1,
            sets = performed.values().sum::<u32>(),
            "Advanced to next week"
        );
        Ok(WeekTransition::NextWeek {
            week: week + 1,
            adjustments,
        })
    }

    /// Week-over-week change of the best estimated 1RM on each muscle's
    /// heaviest exercise (the lowest rep-range floor)
    pub fn strength_trend(&self) -> BTreeMap<Muscle, StrengthTrend> {
        let mut by_muscle: BTreeMap<Muscle, BTreeSet<ExerciseId>> = BTreeMap::new();
        for week in 1..=BLOCK_WEEKS {
            for record in self.engine.records(week) {
                by_muscle
                    .entry(record.primary_muscle)
                    .or_default()
                    .insert(record.exercise_id);
            }
        }

        let mut trends = BTreeMap::new();
        for (muscle, exercises) in by_muscle {
            let Some(&exercise_id) = exercises.iter().min_by_key(|id| {
                self.engine
                    .exercise(**id)
                    .map_or(u32::MAX, |e| e.rep_range.low)
            }) else {
                continue;
            };

            let weekly_best: Vec<(u32, f64)> = (1..=BLOCK_WEEKS)
                .filter_map(|week| {
                    let best = self
                        .engine
                        .records(week)
                        .iter()
                        .filter(|r| r.exercise_id == exercise_id)
                        .map(|r| r.one_rep_max)
                        .fold(0.0, f64::max);
                    (best > 0.0).then_some((week, best))
                })
                .collect();

            let changes_pct = weekly_best
                .windows(2)
                .map(|pair| (pair[1].1 - pair[0].1) / pair[0].1 * 100.0)
                .collect();

            let exercise_name = self
                .engine
                .exercise(exercise_id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| format!("Exercise #{}", exercise_id));

            trends.insert(
                muscle,
                StrengthTrend {
                    exercise_id,
                    exercise_name,
                    weekly_best,
                    changes_pct,
                },
            );
        }
        trends
    }

    /// Valid sets logged this week per primary muscle. Planned muscles that
    /// were never trained count as 0.
    fn performed_volume(&self) -> BTreeMap<Muscle, u32> {
        let mut volume: BTreeMap<Muscle, u32> = self
            .current
            .planned_muscles()
            .into_iter()
            .map(|m| (m, 0))
            .collect();

        for record in self.engine.records(self.current.number) {
            *volume.entry(record.primary_muscle).or_insert(0) += record.set_count();
        }
        volume
    }

    fn register_week_exercises(&mut self) {
        for day in &self.current.days {
            for exercise in &day.exercises {
                self.engine.register_exercise(exercise);
            }
        }
    }
}

fn plan_request(
    profile: &AthleteProfile,
    start_date: NaiveDate,
    week_number: u32,
    volume_overrides: BTreeMap<Muscle, u32>,
) -> PlanRequest {
    PlanRequest {
        level: profile.level,
        days_per_week: profile.days_per_week,
        focus: profile.focus,
        equipment: profile.equipment,
        mesocycle: profile.mesocycle,
        week_number,
        start_date: start_date + Duration::weeks(week_number as i64 - 1),
        volume_overrides,
    }
}
