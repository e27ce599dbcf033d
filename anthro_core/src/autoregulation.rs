//! RPE-based load autoregulation.
//!
//! The mean RPE of the most recent entries for an exercise decides whether
//! load goes up (mean ≤ low threshold), down (mean ≥ high threshold) or holds.
//!
//! History slices are most-recent-first.

use crate::tables::{
    ensure_valid, AutoregulationTables, RpeScaleEntry, LOAD_INCREMENT_KG, MAX_RELIABLE_REPS,
    TRAINING_LOAD_CHART,
};
use crate::types::{
    AdviceBasis, LoadSuggestion, OneRepMaxFormula, RpeAdvice, RpeInput, TrainingLoad,
};
use crate::{Config, Error, Result};

/// RPE-based load advisor over an injectable scale and thresholds
#[derive(Clone, Debug)]
pub struct LoadAutoregulationAdvisor {
    tables: AutoregulationTables,
}

impl Default for LoadAutoregulationAdvisor {
    fn default() -> Self {
        Self {
            tables: crate::config::canonical().autoregulation.clone(),
        }
    }
}

impl LoadAutoregulationAdvisor {
    /// Wrap a table after checking it for inconsistencies
    ///
    /// # Errors
    ///
    /// `Config` listing every problem `AutoregulationTables::validate` finds.
    pub fn new(tables: AutoregulationTables) -> Result<Self> {
        ensure_valid("autoregulation", tables.validate())?;
        Ok(Self { tables })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.autoregulation.clone())
    }

    pub fn tables(&self) -> &AutoregulationTables {
        &self.tables
    }

    /// Look up an RPE value on the scale
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the value is not one of the scale's points.
    pub fn scale_entry(&self, rpe: f64) -> Result<&RpeScaleEntry> {
        self.tables.scale_entry(rpe).ok_or_else(|| {
            let allowed: Vec<String> = self
                .tables
                .scale
                .iter()
                .rev()
                .map(|e| e.value.to_string())
                .collect();
            Error::InvalidInput(format!(
                "RPE {} is not on the scale ({})",
                rpe,
                allowed.join(", ")
            ))
        })
    }

    /// Advise on the next load given today's rating and earlier ones
    ///
    /// `current` counts as the newest entry; history entries for other
    /// exercises are ignored.
    pub fn advise(&self, current: &RpeInput, history: &[RpeInput]) -> Result<RpeAdvice> {
        self.scale_entry(current.rpe)?;
        let entries: Vec<&RpeInput> = std::iter::once(current)
            .chain(history.iter().filter(|e| e.exercise == current.exercise))
            .collect();
        self.advise_window(&current.exercise, &entries)
    }

    /// Advise from history alone, using the newest entries for `exercise`
    pub fn advise_history(&self, exercise: &str, history: &[RpeInput]) -> Result<RpeAdvice> {
        let entries: Vec<&RpeInput> = history.iter().filter(|e| e.exercise == exercise).collect();
        self.advise_window(exercise, &entries)
    }

    fn advise_window(&self, exercise: &str, entries: &[&RpeInput]) -> Result<RpeAdvice> {
        if entries.len() < self.tables.min_entries {
            return Err(Error::InsufficientHistory {
                required: self.tables.min_entries,
                available: entries.len(),
            });
        }

        let window = &entries[..entries.len().min(self.tables.window)];
        for entry in window {
            self.scale_entry(entry.rpe)?;
        }
        let mean_rpe = window.iter().map(|e| e.rpe).sum::<f64>() / window.len() as f64;

        let suggestion = if mean_rpe <= self.tables.low_threshold {
            LoadSuggestion::Increase
        } else if mean_rpe >= self.tables.high_threshold {
            LoadSuggestion::Decrease
        } else {
            LoadSuggestion::Hold
        };

        tracing::debug!(
            "{}: mean RPE {:.2} over {} entries -> {:?}",
            exercise,
            mean_rpe,
            window.len(),
            suggestion
        );

        Ok(RpeAdvice {
            exercise: exercise.to_string(),
            suggestion,
            basis: AdviceBasis {
                window: window.len(),
                mean_rpe,
            },
        })
    }
}

/// Mean RPE across entries, optionally restricted to one exercise
pub fn average_rpe(entries: &[RpeInput], exercise: Option<&str>) -> Option<f64> {
    let values: Vec<f64> = entries
        .iter()
        .filter(|e| exercise.map_or(true, |name| e.exercise == name))
        .map(|e| e.rpe)
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Estimate a one-rep max from a set
///
/// A single rep is returned as-is. Reps above 15 are capped since the
/// formulas are unreliable beyond that.
///
/// # Errors
///
/// `InvalidInput` on non-positive weight or zero reps.
pub fn estimate_one_rep_max(weight_kg: f64, reps: u32, formula: OneRepMaxFormula) -> Result<f64> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(Error::InvalidInput(format!(
            "weight must be positive, got {}",
            weight_kg
        )));
    }
    if reps == 0 {
        return Err(Error::InvalidInput("reps must be at least 1".into()));
    }
    if reps == 1 {
        return Ok(weight_kg);
    }

    let r = f64::from(reps.min(MAX_RELIABLE_REPS));
    let e1rm = match formula {
        OneRepMaxFormula::Epley => weight_kg * (1.0 + r / 30.0),
        OneRepMaxFormula::Brzycki => weight_kg * 36.0 / (37.0 - r),
    };
    Ok(e1rm)
}

/// Working loads from 100% down to 60% of a one-rep max
///
/// Each load is rounded to the nearest 2.5 kg plate increment.
///
/// # Errors
///
/// `InvalidInput` on a non-positive one-rep max.
pub fn training_loads(one_rep_max_kg: f64) -> Result<Vec<TrainingLoad>> {
    if !(one_rep_max_kg.is_finite() && one_rep_max_kg > 0.0) {
        return Err(Error::InvalidInput(format!(
            "one-rep max must be positive, got {}",
            one_rep_max_kg
        )));
    }

    Ok(TRAINING_LOAD_CHART
        .iter()
        .map(|&(percent, reps)| TrainingLoad {
            percent,
            load_kg: round_to_increment(one_rep_max_kg * percent / 100.0),
            reps: reps.to_string(),
        })
        .collect())
}

fn round_to_increment(kg: f64) -> f64 {
    (kg / LOAD_INCREMENT_KG).round() * LOAD_INCREMENT_KG
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(exercise: &str, values: &[f64]) -> Vec<RpeInput> {
        values.iter().map(|&v| RpeInput::new(exercise, v)).collect()
    }

    #[test]
    fn test_reference_histories() {
        let advisor = LoadAutoregulationAdvisor::default();

        let hold = advisor
            .advise_history("squat", &history("squat", &[8.0, 8.0, 8.0]))
            .unwrap();
        assert_eq!(hold.suggestion, LoadSuggestion::Hold);
        assert_eq!(hold.basis.window, 3);
        assert_eq!(hold.basis.mean_rpe, 8.0);

        let up = advisor
            .advise_history("squat", &history("squat", &[6.0, 6.5, 7.0]))
            .unwrap();
        assert_eq!(up.suggestion, LoadSuggestion::Increase);

        let down = advisor
            .advise_history("squat", &history("squat", &[9.5, 9.0, 9.5]))
            .unwrap();
        assert_eq!(down.suggestion, LoadSuggestion::Decrease);
    }

    #[test]
    fn test_single_entry_is_insufficient() {
        let advisor = LoadAutoregulationAdvisor::default();
        let current = RpeInput::new("bench", 8.0);

        match advisor.advise(&current, &[]) {
            Err(Error::InsufficientHistory {
                required,
                available,
            }) => {
                assert_eq!(required, 2);
                assert_eq!(available, 1);
            }
            other => panic!("Expected InsufficientHistory, got {:?}", other),
        }

        assert!(matches!(
            advisor.advise_history("bench", &history("bench", &[8.0])),
            Err(Error::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_current_counts_as_newest() {
        let advisor = LoadAutoregulationAdvisor::default();
        let current = RpeInput::new("deadlift", 8.0);
        let advice = advisor
            .advise(&current, &history("deadlift", &[8.0, 8.0, 6.0, 6.0]))
            .unwrap();
        // Window of three: 8, 8, 8
        assert_eq!(advice.basis.window, 3);
        assert_eq!(advice.suggestion, LoadSuggestion::Hold);
    }

    #[test]
    fn test_other_exercises_ignored() {
        let advisor = LoadAutoregulationAdvisor::default();
        let mut mixed = history("bench", &[10.0, 10.0]);
        mixed.extend(history("squat", &[7.0]));

        let advice = advisor
            .advise(&RpeInput::new("squat", 7.0), &mixed)
            .unwrap();
        assert_eq!(advice.basis.window, 2);
        assert_eq!(advice.suggestion, LoadSuggestion::Increase);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let advisor = LoadAutoregulationAdvisor::default();
        let at_low = advisor
            .advise_history("row", &history("row", &[7.5, 7.5]))
            .unwrap();
        assert_eq!(at_low.suggestion, LoadSuggestion::Increase);

        let at_high = advisor
            .advise_history("row", &history("row", &[9.0, 9.0]))
            .unwrap();
        assert_eq!(at_high.suggestion, LoadSuggestion::Decrease);
    }

    #[test]
    fn test_off_scale_rpe_rejected() {
        let advisor = LoadAutoregulationAdvisor::default();
        assert!(matches!(
            advisor.advise(&RpeInput::new("squat", 5.5), &history("squat", &[8.0])),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            advisor.advise_history("squat", &history("squat", &[8.0, 11.0])),
            Err(Error::InvalidInput(_))
        ));
        assert!(advisor.scale_entry(3.0).is_err());
        assert_eq!(advisor.scale_entry(9.5).unwrap().reps_in_reserve, "0-1");
    }

    #[test]
    fn test_configurable_window() {
        let mut tables = AutoregulationTables::default();
        tables.window = 2;
        let advisor = LoadAutoregulationAdvisor::new(tables).unwrap();
        let advice = advisor
            .advise_history("press", &history("press", &[9.5, 9.5, 5.0]))
            .unwrap();
        assert_eq!(advice.basis.window, 2);
        assert_eq!(advice.suggestion, LoadSuggestion::Decrease);
    }

    #[test]
    fn test_inconsistent_tables_rejected() {
        let mut tables = AutoregulationTables::default();
        tables.window = 0;
        match LoadAutoregulationAdvisor::new(tables) {
            Err(Error::Config(msg)) => assert!(msg.contains("window")),
            other => panic!("Expected config error, got {:?}", other),
        }

        let mut config = Config::default();
        config.autoregulation.scale.clear();
        assert!(matches!(
            LoadAutoregulationAdvisor::from_config(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_average_rpe() {
        let mut entries = history("squat", &[8.0, 9.0]);
        entries.extend(history("bench", &[7.0]));
        assert_eq!(average_rpe(&entries, Some("squat")), Some(8.5));
        assert_eq!(average_rpe(&entries, None), Some(8.0));
        assert_eq!(average_rpe(&entries, Some("curl")), None);
    }

    #[test]
    fn test_one_rep_max() {
        assert_eq!(
            estimate_one_rep_max(100.0, 1, OneRepMaxFormula::Epley).unwrap(),
            100.0
        );
        let epley = estimate_one_rep_max(100.0, 5, OneRepMaxFormula::Epley).unwrap();
        assert!((epley - 116.6667).abs() < 1e-3);
        let brzycki = estimate_one_rep_max(100.0, 5, OneRepMaxFormula::Brzycki).unwrap();
        assert!((brzycki - 112.5).abs() < 1e-9);

        let capped = estimate_one_rep_max(100.0, 30, OneRepMaxFormula::Brzycki).unwrap();
        let at_cap = estimate_one_rep_max(100.0, 15, OneRepMaxFormula::Brzycki).unwrap();
        assert_eq!(capped, at_cap);

        assert!(estimate_one_rep_max(0.0, 5, OneRepMaxFormula::Epley).is_err());
        assert!(estimate_one_rep_max(100.0, 0, OneRepMaxFormula::Epley).is_err());
    }

    #[test]
    fn test_training_loads() {
        let loads = training_loads(116.0).unwrap();
        assert_eq!(loads.len(), 9);
        assert_eq!(loads[0].percent, 100.0);
        assert_eq!(loads[0].load_kg, 115.0);
        assert_eq!(loads[0].reps, "1");
        // 85% of 116 is 98.6
        assert_eq!(loads[3].load_kg, 97.5);
        assert_eq!(loads[8].percent, 60.0);
        assert_eq!(loads[8].load_kg, 70.0);
        assert!(loads.windows(2).all(|w| w[0].load_kg >= w[1].load_kg));
        assert!(loads
            .iter()
            .all(|l| (l.load_kg / 2.5).fract() == 0.0));

        assert!(matches!(training_loads(0.0), Err(Error::InvalidInput(_))));
        assert!(matches!(training_loads(f64::NAN), Err(Error::InvalidInput(_))));
    }
}
