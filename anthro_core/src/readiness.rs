//! Composite readiness score from subjective daily ratings.
//!
//! Each sub-rating is normalized to a 0-1 fraction of its own scale, inverted
//! where higher means worse (soreness, stress), and multiplied by its weight.
//! The weights sum to 100 so the rounded total is the score.
//!
//! History slices are most-recent-first.

use crate::tables::{ensure_valid, ReadinessTables, RATING_MIN};
use crate::types::{
    CompositeScoreResult, Dimension, ReadinessComponents, ReadinessInput, Recommendation, Trend,
};
use crate::{Config, Error, Result};
use std::collections::HashMap;

impl ReadinessInput {
    /// Build from named (dimension, value) pairs supplied in any order
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a dimension is missing, repeated, or an ordinal
    /// value is not a whole number.
    pub fn from_ratings<I>(ratings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Dimension, f64)>,
    {
        let mut values: HashMap<Dimension, f64> = HashMap::new();
        for (dimension, value) in ratings {
            if values.insert(dimension, value).is_some() {
                return Err(Error::InvalidInput(format!(
                    "{} supplied more than once",
                    dimension.name()
                )));
            }
        }

        let take = |dimension: Dimension| -> Result<f64> {
            values.get(&dimension).copied().ok_or_else(|| {
                Error::InvalidInput(format!("{} is required", dimension.name()))
            })
        };
        let ordinal = |dimension: Dimension| -> Result<u8> {
            let value = take(dimension)?;
            if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "{} must be a whole rating, got {}",
                    dimension.name(),
                    value
                )));
            }
            Ok(value as u8)
        };

        Ok(Self {
            sleep_hours: take(Dimension::SleepHours)?,
            sleep_quality: ordinal(Dimension::SleepQuality)?,
            soreness: ordinal(Dimension::Soreness)?,
            stress: ordinal(Dimension::Stress)?,
            nutrition: ordinal(Dimension::Nutrition)?,
            hydration: ordinal(Dimension::Hydration)?,
        })
    }
}

/// Readiness scoring engine over injectable weights and thresholds
#[derive(Clone, Debug)]
pub struct CompositeScoreEngine {
    tables: ReadinessTables,
}

impl Default for CompositeScoreEngine {
    fn default() -> Self {
        Self {
            tables: crate::config::canonical().readiness.clone(),
        }
    }
}

impl CompositeScoreEngine {
    /// Wrap a table after checking it for inconsistencies
    ///
    /// # Errors
    ///
    /// `Config` listing every problem `ReadinessTables::validate` finds.
    pub fn new(tables: ReadinessTables) -> Result<Self> {
        ensure_valid("readiness", tables.validate())?;
        Ok(Self { tables })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.readiness.clone())
    }

    pub fn tables(&self) -> &ReadinessTables {
        &self.tables
    }

    /// Score a day's ratings and map the score to a recommendation
    ///
    /// # Errors
    ///
    /// `InvalidInput` if sleep hours are negative or above 24, or an ordinal
    /// rating is outside its scale.
    pub fn score(&self, input: &ReadinessInput) -> Result<CompositeScoreResult> {
        if !input.sleep_hours.is_finite() || !(0.0..=24.0).contains(&input.sleep_hours) {
            return Err(Error::InvalidInput(format!(
                "sleep_hours must be between 0 and 24, got {}",
                input.sleep_hours
            )));
        }

        let w = &self.tables.weights;
        let sleep_fraction = (input.sleep_hours / self.tables.sleep_reference_hours).min(1.0);

        let components = ReadinessComponents {
            sleep_hours: sleep_fraction * w.sleep_hours,
            sleep_quality: self.fraction(Dimension::SleepQuality, input.sleep_quality)?
                * w.sleep_quality,
            soreness: self.fraction(Dimension::Soreness, input.soreness)? * w.soreness,
            stress: self.fraction(Dimension::Stress, input.stress)? * w.stress,
            nutrition: self.fraction(Dimension::Nutrition, input.nutrition)? * w.nutrition,
            hydration: self.fraction(Dimension::Hydration, input.hydration)? * w.hydration,
        };

        let score = components.total().round().clamp(0.0, 100.0) as u8;
        let recommendation = self.recommend(score);

        tracing::debug!(
            "Readiness score {} ({:?}) from {:?}",
            score,
            recommendation,
            components
        );

        Ok(CompositeScoreResult {
            score,
            recommendation,
            components,
        })
    }

    /// Band a score; lower bounds are inclusive
    pub fn recommend(&self, score: u8) -> Recommendation {
        let t = &self.tables.thresholds;
        if score >= t.high_intensity {
            Recommendation::HighIntensity
        } else if score >= t.moderate {
            Recommendation::Moderate
        } else if score >= t.light {
            Recommendation::Light
        } else {
            Recommendation::Rest
        }
    }

    /// Compare the mean of the latest window against the window before it
    ///
    /// # Errors
    ///
    /// `InsufficientHistory` unless there is a full recent window and at least
    /// one earlier score.
    pub fn trend(&self, history: &[u8]) -> Result<Trend> {
        let window = self.tables.trend_window;
        if history.len() <= window {
            return Err(Error::InsufficientHistory {
                required: window + 1,
                available: history.len(),
            });
        }

        let recent = mean(&history[..window]);
        let prior_end = (window * 2).min(history.len());
        let prior = mean(&history[window..prior_end]);
        let delta = self.tables.trend_min_delta;

        let trend = if recent > prior + delta {
            Trend::Improving
        } else if recent < prior - delta {
            Trend::Declining
        } else {
            Trend::Stable
        };

        tracing::debug!(
            "Readiness trend {:?}: recent {:.1} vs prior {:.1}",
            trend,
            recent,
            prior
        );
        Ok(trend)
    }

    /// Normalize an ordinal rating to 0-1, inverting where higher is worse
    fn fraction(&self, dimension: Dimension, value: u8) -> Result<f64> {
        let max = self.tables.rating_max;
        if !(RATING_MIN..=max).contains(&value) {
            return Err(Error::InvalidInput(format!(
                "{} must be between {} and {}, got {}",
                dimension.name(),
                RATING_MIN,
                max,
                value
            )));
        }
        let max = f64::from(max);
        let value = f64::from(value);
        if dimension.is_inverted() {
            Ok((max - value) / max)
        } else {
            Ok(value / max)
        }
    }
}

/// Rounded mean of a score history, `None` when empty
pub fn average_score(history: &[u8]) -> Option<u8> {
    if history.is_empty() {
        return None;
    }
    Some(mean(history).round() as u8)
}

fn mean(scores: &[u8]) -> f64 {
    scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn typical() -> ReadinessInput {
        ReadinessInput {
            sleep_hours: 7.0,
            sleep_quality: 4,
            soreness: 2,
            stress: 2,
            nutrition: 4,
            hydration: 4,
        }
    }

    #[test]
    fn test_typical_day() {
        let result = CompositeScoreEngine::default().score(&typical()).unwrap();
        assert_eq!(result.score, 72);
        assert_eq!(result.recommendation, Recommendation::Moderate);
        assert!((result.components.soreness - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_and_worst_days() {
        let engine = CompositeScoreEngine::default();

        let best = engine
            .score(&ReadinessInput {
                sleep_hours: 10.0,
                sleep_quality: 5,
                soreness: 1,
                stress: 1,
                nutrition: 5,
                hydration: 5,
            })
            .unwrap();
        assert_eq!(best.score, 93);
        assert_eq!(best.recommendation, Recommendation::HighIntensity);
        // Sleep beyond the reference ceiling is capped
        assert!((best.components.sleep_hours - 25.0).abs() < 1e-9);

        let worst = engine
            .score(&ReadinessInput {
                sleep_hours: 0.0,
                sleep_quality: 1,
                soreness: 5,
                stress: 5,
                nutrition: 1,
                hydration: 1,
            })
            .unwrap();
        assert_eq!(worst.score, 8);
        assert_eq!(worst.recommendation, Recommendation::Rest);
    }

    #[test]
    fn test_band_boundaries() {
        let engine = CompositeScoreEngine::default();
        assert_eq!(engine.recommend(0), Recommendation::Rest);
        assert_eq!(engine.recommend(49), Recommendation::Rest);
        assert_eq!(engine.recommend(50), Recommendation::Light);
        assert_eq!(engine.recommend(69), Recommendation::Light);
        assert_eq!(engine.recommend(70), Recommendation::Moderate);
        assert_eq!(engine.recommend(84), Recommendation::Moderate);
        assert_eq!(engine.recommend(85), Recommendation::HighIntensity);
        assert_eq!(engine.recommend(100), Recommendation::HighIntensity);
    }

    #[test]
    fn test_out_of_scale_ratings() {
        let engine = CompositeScoreEngine::default();

        let mut input = typical();
        input.stress = 6;
        assert!(matches!(engine.score(&input), Err(Error::InvalidInput(_))));

        let mut input = typical();
        input.hydration = 0;
        assert!(matches!(engine.score(&input), Err(Error::InvalidInput(_))));

        let mut input = typical();
        input.sleep_hours = -1.0;
        assert!(matches!(engine.score(&input), Err(Error::InvalidInput(_))));

        let mut input = typical();
        input.sleep_hours = f64::NAN;
        assert!(engine.score(&input).is_err());
    }

    #[test]
    fn test_custom_weights() {
        let mut tables = ReadinessTables::default();
        tables.weights.sleep_hours = 40.0;
        tables.weights.sleep_quality = 0.0;
        let result = CompositeScoreEngine::new(tables)
            .unwrap()
            .score(&typical())
            .unwrap();
        // 7/9·40 + 12 + 9 + 12 + 8
        assert_eq!(result.score, 72);
    }

    #[test]
    fn test_inconsistent_tables_rejected() {
        let mut tables = ReadinessTables::default();
        tables.trend_window = 0;
        match CompositeScoreEngine::new(tables) {
            Err(Error::Config(msg)) => assert!(msg.contains("trend window")),
            other => panic!("Expected config error, got {:?}", other),
        }

        let mut tables = ReadinessTables::default();
        tables.weights.stress = 0.0;
        assert!(matches!(
            CompositeScoreEngine::new(tables),
            Err(Error::Config(msg)) if msg.contains("sum to")
        ));
    }

    #[test]
    fn test_from_ratings_missing_and_duplicate() {
        let missing = ReadinessInput::from_ratings(vec![
            (Dimension::SleepHours, 7.0),
            (Dimension::SleepQuality, 4.0),
        ]);
        assert!(matches!(missing, Err(Error::InvalidInput(msg)) if msg.contains("soreness")));

        let duplicate = ReadinessInput::from_ratings(vec![
            (Dimension::Stress, 2.0),
            (Dimension::Stress, 3.0),
        ]);
        assert!(matches!(duplicate, Err(Error::InvalidInput(_))));

        let fractional = ReadinessInput::from_ratings(vec![
            (Dimension::SleepHours, 7.0),
            (Dimension::SleepQuality, 4.5),
            (Dimension::Soreness, 2.0),
            (Dimension::Stress, 2.0),
            (Dimension::Nutrition, 4.0),
            (Dimension::Hydration, 4.0),
        ]);
        assert!(fractional.is_err());
    }

    #[test]
    fn test_trend() {
        let engine = CompositeScoreEngine::default();
        assert_eq!(engine.trend(&[80, 82, 84, 70, 71, 72]).unwrap(), Trend::Improving);
        assert_eq!(engine.trend(&[60, 62, 58, 75, 74, 76]).unwrap(), Trend::Declining);
        assert_eq!(engine.trend(&[70, 72, 74, 70, 69, 68]).unwrap(), Trend::Stable);
        // Exactly five points apart is still stable
        assert_eq!(engine.trend(&[75, 75, 75, 70, 70, 70]).unwrap(), Trend::Stable);
        // Partial prior window is averaged as-is
        assert_eq!(engine.trend(&[90, 90, 90, 60]).unwrap(), Trend::Improving);
    }

    #[test]
    fn test_trend_insufficient_history() {
        let engine = CompositeScoreEngine::default();
        match engine.trend(&[80, 70, 60]) {
            Err(Error::InsufficientHistory {
                required,
                available,
            }) => {
                assert_eq!(required, 4);
                assert_eq!(available, 3);
            }
            other => panic!("Expected InsufficientHistory, got {:?}", other),
        }
        assert!(engine.trend(&[]).is_err());
    }

    #[test]
    fn test_average_score() {
        assert_eq!(average_score(&[]), None);
        assert_eq!(average_score(&[85, 62]), Some(74));
        assert_eq!(average_score(&[70, 71, 71]), Some(71));
    }

    proptest! {
        #[test]
        fn prop_score_independent_of_rating_order(
            hours in 0.0f64..12.0,
            quality in 1u8..=5,
            soreness in 1u8..=5,
            stress in 1u8..=5,
            nutrition in 1u8..=5,
            hydration in 1u8..=5,
            rotation in 0usize..6,
            reverse in any::<bool>(),
        ) {
            let mut pairs = vec![
                (Dimension::SleepHours, hours),
                (Dimension::SleepQuality, f64::from(quality)),
                (Dimension::Soreness, f64::from(soreness)),
                (Dimension::Stress, f64::from(stress)),
                (Dimension::Nutrition, f64::from(nutrition)),
                (Dimension::Hydration, f64::from(hydration)),
            ];
            let canonical = ReadinessInput::from_ratings(pairs.clone()).unwrap();

            pairs.rotate_left(rotation);
            if reverse {
                pairs.reverse();
            }
            let shuffled = ReadinessInput::from_ratings(pairs).unwrap();

            let engine = CompositeScoreEngine::default();
            let a = engine.score(&canonical).unwrap();
            let b = engine.score(&shuffled).unwrap();
            prop_assert_eq!(a.score, b.score);
            prop_assert_eq!(a.recommendation, b.recommendation);
            prop_assert!(a.score <= 100);
        }
    }
}
