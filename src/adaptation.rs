//! Weekly Adaptation Engine
//!
//! Drives a three-week accumulation block from logged feedback:
//! - week 1: baseline stimulus-to-fatigue ratio per exercise
//! - week 2: volume forecast per muscle from stimulus and soreness
//! - week 2 -> 3: volume change from strength progression points
//! - week 3: fatigue-adjusted SFR using the measured regression
//! - end of block: best / worst exercise per muscle
//!
//! Volume changes cross module boundaries as short strings ("+3 serie",
//! "mantieni"); consumers only read the first signed integer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    estimate_one_rep_max, Exercise, ExerciseId, ExperienceLevel, Muscle, PerformanceRecord,
    SorenessReport,
};

/// Recommendation string meaning "keep the current volume"
pub const HOLD: &str = "mantieni";

/// Weekly direct sets never drop below this after an adjustment
pub const MIN_WEEKLY_SETS: u32 = 4;

static DELTA_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[+-]?\d+").ok());

// ---------------------------------------------------------------------------
/// Recommendation protocol
// ---------------------------------------------------------------------------

/// "+3 serie", "-2 serie" or "mantieni"
pub fn format_recommendation(delta: i32) -> String {
    if delta == 0 {
        HOLD.to_string()
    } else {
        format!("{:+} serie", delta)
    }
}

/// First signed integer in the string, 0 when there is none
pub fn parse_volume_delta(recommendation: &str) -> i32 {
    DELTA_PATTERN
        .as_ref()
        .and_then(|re| re.find(recommendation))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// max(4, previous + delta)
pub fn next_week_volume(previous: u32, recommendation: &str) -> u32 {
    let next = previous as i64 + parse_volume_delta(recommendation) as i64;
    next.max(MIN_WEEKLY_SETS as i64) as u32
}

/// Target reps in reserve for a block week; anything past week 3 is a deload
pub fn target_rir(week: u32) -> u8 {
    match week {
        1 => 4,
        2 => 3,
        3 => 2,
        _ => 4,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRecommendation {
    pub recommendation: String,
    /// Why the engine fell back to holding volume
    pub reason: Option<String>,
}

impl VolumeRecommendation {
    fn change(delta: i32) -> Self {
        Self {
            recommendation: format_recommendation(delta),
            reason: None,
        }
    }

    fn hold_because(reason: String) -> Self {
        Self {
            recommendation: HOLD.to_string(),
            reason: Some(reason),
        }
    }

    pub fn delta(&self) -> i32 {
        parse_volume_delta(&self.recommendation)
    }
}

/// Points for the week-1 -> week-2 strength change of one exercise
pub fn performance_points(improvement_pct: f64) -> i32 {
    match improvement_pct {
        p if p >= 4.0 => 2,
        p if p >= 1.5 => 1,
        p if p >= 0.0 => 0,
        p if p >= -2.5 => -1,
        _ => -2,
    }
}

/// Week-3 set change for a muscle's average performance points
pub fn delta_for_points(average_points: f64) -> i32 {
    match average_points {
        p if p >= 1.2 => 3,
        p if p >= 0.5 => 2,
        p if p >= -0.5 => 0,
        p if p >= -1.2 => -1,
        _ => -2,
    }
}

// ---------------------------------------------------------------------------
/// End-of-block analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseScore {
    pub exercise_id: ExerciseId,
    pub name: String,
    pub sfr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleAnalysis {
    pub best: ExerciseScore,
    /// Only present when at least two exercises were compared
    pub worst: Option<ExerciseScore>,
}

// ---------------------------------------------------------------------------
/// Adaptation Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AdaptationEngine {
    performance: BTreeMap<u32, Vec<PerformanceRecord>>,
    soreness: BTreeMap<u32, Vec<SorenessReport>>,
    week1_sfr: BTreeMap<ExerciseId, f64>,
    week3_sfr: BTreeMap<ExerciseId, f64>,
    final_sfr: BTreeMap<ExerciseId, f64>,
    exercise_details: BTreeMap<ExerciseId, Exercise>,
}

impl AdaptationEngine {
    /// `exercise_details` only supplies names for the report
    pub fn new(exercise_details: BTreeMap<ExerciseId, Exercise>) -> Self {
        Self {
            exercise_details,
            ..Self::default()
        }
    }

    /// Make an exercise's name available to the report
    pub fn register_exercise(&mut self, exercise: &Exercise) {
        self.exercise_details
            .entry(exercise.id)
            .or_insert_with(|| exercise.clone());
    }

    pub fn exercise(&self, exercise_id: ExerciseId) -> Option<&Exercise> {
        self.exercise_details.get(&exercise_id)
    }

    /// Append a record under its own week
    pub fn record_performance(&mut self, record: PerformanceRecord) {
        self.performance.entry(record.week).or_default().push(record);
    }

    pub fn record_soreness(&mut self, report: SorenessReport) {
        self.soreness.entry(report.week).or_default().push(report);
    }

    pub fn records(&self, week: u32) -> &[PerformanceRecord] {
        self.performance.get(&week).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn week1_sfr(&self) -> &BTreeMap<ExerciseId, f64> {
        &self.week1_sfr
    }

    pub fn week3_sfr(&self) -> &BTreeMap<ExerciseId, f64> {
        &self.week3_sfr
    }

    /// Distinct exercises logged for a muscle in a week
    pub fn exercises_for_muscle(&self, muscle: Muscle, week: u32) -> BTreeSet<ExerciseId> {
        self.records(week)
            .iter()
            .filter(|r| r.primary_muscle == muscle)
            .map(|r| r.exercise_id)
            .collect()
    }

    /// Mean stimulus of an exercise's sessions in a week, 0 without sessions
    pub fn average_stimulus(&self, exercise_id: ExerciseId, week: u32) -> f64 {
        mean(
            self.records(week)
                .iter()
                .filter(|r| r.exercise_id == exercise_id)
                .map(|r| r.stimulus),
        )
        .unwrap_or(0.0)
    }

    // ===== Week 1 =====

    /// FI = max(1, joint pain); averages SFR per exercise into the baseline
    pub fn compute_week1_sfr(&mut self) -> &BTreeMap<ExerciseId, f64> {
        let mut per_exercise: BTreeMap<ExerciseId, Vec<f64>> = BTreeMap::new();

        if let Some(records) = self.performance.get_mut(&1) {
            for record in records.iter_mut() {
                record.apply_fatigue(0.0);
                per_exercise.entry(record.exercise_id).or_default().push(record.sfr);
            }
        }

        self.week1_sfr = average_each(per_exercise);
        debug!(exercises = self.week1_sfr.len(), "Computed week-1 SFR baseline");
        &self.week1_sfr
    }

    /// Week-2 set change for a muscle from week-1 stimulus plus the
    /// soreness reported going into week 2.
    pub fn forecast_week2_volume(&self, muscle: Muscle, level: ExperienceLevel) -> VolumeRecommendation {
        let Some(reports) = self.soreness.get(&2) else {
            return VolumeRecommendation::hold_because("No soreness data recorded for week 2".to_string());
        };

        let Some(soreness) = reports.iter().find(|r| r.muscle == muscle).map(|r| r.value) else {
            return VolumeRecommendation::hold_because(format!("No soreness value entered for {}", muscle));
        };

        let exercises = self.exercises_for_muscle(muscle, 1);
        if exercises.is_empty() {
            return VolumeRecommendation::hold_because(format!("No week-1 performance data for {}", muscle));
        }

        let x = mean(
            exercises
                .iter()
                .filter(|id| self.week1_sfr.contains_key(*id))
                .map(|id| self.average_stimulus(*id, 1) + soreness as f64),
        );
        let Some(x) = x else {
            return VolumeRecommendation::hold_because(format!("No week-1 stimulus could be computed for {}", muscle));
        };

        let step = match level {
            ExperienceLevel::Beginner => 2,
            ExperienceLevel::Intermediate | ExperienceLevel::Advanced => 3,
        };

        debug!(%muscle, x, soreness, "Week-2 volume forecast");
        // 4 < x < 5 falls through to a decrease
        if x <= 4.0 {
            VolumeRecommendation::change(step)
        } else if (5.0..=7.0).contains(&x) {
            VolumeRecommendation::change(0)
        } else {
            VolumeRecommendation::change(-step)
        }
    }

    // ===== Week 2 =====

    /// Mean % change of estimated 1RM from week 1 to week 2 per exercise.
    /// Sets are only compared against sets of the same rep-range label.
    pub fn week2_improvement(&self) -> BTreeMap<ExerciseId, f64> {
        let mut groups: BTreeMap<(ExerciseId, String), [Vec<f64>; 2]> = BTreeMap::new();

        for (slot, week) in [1u32, 2].into_iter().enumerate() {
            for record in self.records(week) {
                for set in &record.sets {
                    let orm = estimate_one_rep_max(set.load, set.reps);
                    if orm > 0.0 {
                        groups
                            .entry((record.exercise_id, set.rep_range.clone()))
                            .or_default()[slot]
                            .push(orm);
                    }
                }
            }
        }

        let mut per_exercise: BTreeMap<ExerciseId, Vec<f64>> = BTreeMap::new();
        for ((exercise_id, _), [week1, week2]) in groups {
            let (Some(before), Some(after)) = (mean(week1.into_iter()), mean(week2.into_iter())) else {
                continue;
            };
            per_exercise
                .entry(exercise_id)
                .or_default()
                .push((after - before) / before * 100.0);
        }

        average_each(per_exercise)
    }

    pub fn week2_performance_points(&self) -> BTreeMap<ExerciseId, i32> {
        self.week2_improvement()
            .into_iter()
            .map(|(id, pct)| (id, performance_points(pct)))
            .collect()
    }

    /// Week-3 set change for a muscle; exercises without a score count 0
    pub fn week3_volume_recommendation(&self, muscle: Muscle) -> VolumeRecommendation {
        let exercises = self.exercises_for_muscle(muscle, 2);
        if exercises.is_empty() {
            return VolumeRecommendation::hold_because(format!("No week-2 performance data for {}", muscle));
        }

        let points = self.week2_performance_points();
        let average = mean(exercises.iter().map(|id| points.get(id).copied().unwrap_or(0) as f64)).unwrap_or(0.0);

        debug!(%muscle, average, "Week-3 volume from performance points");
        VolumeRecommendation::change(delta_for_points(average))
    }

    // ===== Week 3 =====

    /// Regression against the week-2 average 1RM counts as fatigue:
    /// FI = max(1, joint pain + loss %)
    pub fn compute_week3_sfr(&mut self) -> &BTreeMap<ExerciseId, f64> {
        let mut week2_orm: BTreeMap<ExerciseId, Vec<f64>> = BTreeMap::new();
        for record in self.records(2) {
            week2_orm.entry(record.exercise_id).or_default().push(record.one_rep_max);
        }
        let week2_orm = average_each(week2_orm);

        let mut per_exercise: BTreeMap<ExerciseId, Vec<f64>> = BTreeMap::new();
        if let Some(records) = self.performance.get_mut(&3) {
            for record in records.iter_mut() {
                let loss = match week2_orm.get(&record.exercise_id) {
                    Some(&before) if before > 0.0 => ((before - record.one_rep_max) / before * 100.0).max(0.0),
                    _ => 0.0,
                };
                record.apply_fatigue(loss);
                per_exercise.entry(record.exercise_id).or_default().push(record.sfr);
            }
        }

        self.week3_sfr = average_each(per_exercise);
        &self.week3_sfr
    }

    // ===== End of block =====

    /// Mean of the week-1 and week-3 SFR for exercises present in both
    pub fn compute_final_sfr(&mut self) -> &BTreeMap<ExerciseId, f64> {
        self.final_sfr = self
            .week1_sfr
            .iter()
            .filter_map(|(id, w1)| self.week3_sfr.get(id).map(|w3| (*id, (w1 + w3) / 2.0)))
            .collect();
        &self.final_sfr
    }

    pub fn analyze_by_muscle(&mut self) -> BTreeMap<Muscle, MuscleAnalysis> {
        self.compute_final_sfr();
        if self.final_sfr.is_empty() {
            warn!("No exercise has both week-1 and week-3 SFR, nothing to compare");
            return BTreeMap::new();
        }

        let muscle_of: BTreeMap<ExerciseId, Muscle> = self
            .performance
            .values()
            .flatten()
            .map(|r| (r.exercise_id, r.primary_muscle))
            .collect();

        let mut by_muscle: BTreeMap<Muscle, Vec<ExerciseScore>> = BTreeMap::new();
        for (&exercise_id, &sfr) in &self.final_sfr {
            let Some(&muscle) = muscle_of.get(&exercise_id) else {
                continue;
            };
            by_muscle.entry(muscle).or_default().push(ExerciseScore {
                exercise_id,
                name: self.exercise_name(exercise_id),
                sfr,
            });
        }

        by_muscle
            .into_iter()
            .filter_map(|(muscle, mut scores)| {
                scores.sort_by(|a, b| b.sfr.total_cmp(&a.sfr));
                let worst = if scores.len() >= 2 { scores.pop() } else { None };
                let best = scores.into_iter().next()?;
                Some((muscle, MuscleAnalysis { best, worst }))
            })
            .collect()
    }

    pub fn generate_report(&mut self) -> String {
        let analysis = self.analyze_by_muscle();
        if analysis.is_empty() {
            return "Not enough data for a comparative exercise analysis.\n\n\
                    Complete at least two different exercises per muscle group in weeks 1 and 3 \
                    to get a full analysis."
                .to_string();
        }

        let heavy_rule = "=".repeat(60);
        let light_rule = "-".repeat(50);

        let mut report = format!("{heavy_rule}\n      END-OF-BLOCK ANALYSIS BY MUSCLE GROUP\n{heavy_rule}\n\n");
        report.push_str("RECOMMENDATIONS FOR THE NEXT BLOCK\n");
        report.push_str(&format!("{light_rule}\n"));
        report.push_str(
            "The analysis ranks exercises by stimulus-to-fatigue ratio (SFR): \
             a higher value means the exercise works better for you.\n\n",
        );

        for (muscle, result) in &analysis {
            report.push_str(&format!("--- {} ---\n", muscle.as_str().to_uppercase()));
            report.push_str(&format!("Most effective exercise: {}\n", result.best.name));
            report.push_str(&format!("   (average SFR: {:.2})\n", result.best.sfr));

            match &result.worst {
                Some(worst) => {
                    report.push_str(&format!("Least effective exercise: {}\n", worst.name));
                    report.push_str(&format!("   (average SFR: {:.2})\n\n", worst.sfr));
                    report.push_str(&format!(
                        "-> Recommendation: keep '{}' next block and consider replacing '{}' with a variant.\n",
                        result.best.name, worst.name
                    ));
                }
                None => report.push_str(
                    "\n-> Note: only one exercise was performed for this muscle. \
                     Include at least two variants next cycle for a comparison.\n",
                ),
            }
            report.push_str(&format!("{light_rule}\n\n"));
        }

        report.push_str(&format!("{heavy_rule}\n"));
        report
    }

    fn exercise_name(&self, exercise_id: ExerciseId) -> String {
        self.exercise_details
            .get(&exercise_id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("Exercise #{}", exercise_id))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn average_each(groups: BTreeMap<ExerciseId, Vec<f64>>) -> BTreeMap<ExerciseId, f64> {
    groups
        .into_iter()
        .filter_map(|(id, values)| mean(values.into_iter()).map(|m| (id, m)))
        .collect()
}
