//! Energy expenditure and macronutrient targets.
//!
//! - BMR: Mifflin-St Jeor, `10·w + 6.25·h − 5·a` plus +5 (male) or −161 (female)
//! - TDEE: BMR × activity multiplier
//! - Target: TDEE + goal delta
//! - Macros: protein and fat from per-kg coefficients, carbs take the remainder

use crate::tables::{
    ensure_valid, EnergyTables, MacroRatio, CALORIE_LADDER, CARBS_KCAL_PER_G, FAT_KCAL_PER_G,
    PROTEIN_KCAL_PER_G, SPLIT_BALANCED, SPLIT_HIGH_PROTEIN, SPLIT_KETO, SPLIT_LOW_CARB,
};
use crate::types::{
    ActivityLevel, CalorieTarget, EnergyInput, EnergyResult, Goal, MacroSplitPreset, Macros, Sex,
};
use crate::{Config, Error, Result};

const MIN_AGE: u32 = 1;
const MAX_AGE: u32 = 120;

/// Energy expenditure estimator over an injectable coefficient table
#[derive(Clone, Debug)]
pub struct EnergyExpenditureEstimator {
    tables: EnergyTables,
}

impl Default for EnergyExpenditureEstimator {
    fn default() -> Self {
        Self {
            tables: crate::config::canonical().energy.clone(),
        }
    }
}

impl EnergyExpenditureEstimator {
    /// Wrap a table after checking it for inconsistencies
    ///
    /// # Errors
    ///
    /// `Config` listing every problem `EnergyTables::validate` finds.
    pub fn new(tables: EnergyTables) -> Result<Self> {
        ensure_valid("energy", tables.validate())?;
        Ok(Self { tables })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.energy.clone())
    }

    pub fn tables(&self) -> &EnergyTables {
        &self.tables
    }

    /// Basal metabolic rate (kcal/day)
    ///
    /// # Errors
    ///
    /// `InvalidInput` on non-positive weight/height, age outside 1-120, or a
    /// body too small for the regression to give a positive rate.
    pub fn bmr(&self, sex: Sex, age: u32, weight_kg: f64, height_cm: f64) -> Result<f64> {
        validate_subject(age, weight_kg, height_cm)?;
        let c = &self.tables.bmr;
        let bmr = c.weight_coef * weight_kg + c.height_coef * height_cm
            - c.age_coef * f64::from(age)
            + c.sex_constant(sex);
        if !(bmr.is_finite() && bmr > 0.0) {
            return Err(Error::InvalidInput(format!(
                "BMR of {:.1} kcal for {} kg, {} cm, age {} is not positive",
                bmr, weight_kg, height_cm, age
            )));
        }
        Ok(bmr)
    }

    /// Total daily energy expenditure for a given BMR
    pub fn tdee(&self, bmr: f64, activity_level: ActivityLevel) -> f64 {
        bmr * self.tables.activity.get(activity_level)
    }

    /// Full estimate: BMR, TDEE, goal target and macro plan
    ///
    /// # Errors
    ///
    /// `InvalidInput` for out-of-range subject data, `MacroBudgetExceeded`
    /// when protein and fat alone exceed the calorie target.
    pub fn estimate(&self, input: &EnergyInput) -> Result<EnergyResult> {
        let bmr = self.bmr(input.sex, input.age, input.weight_kg, input.height_cm)?;
        let tdee = self.tdee(bmr, input.activity_level);
        let profile = self.tables.goals.get(input.goal);
        let target_calories = tdee + profile.calorie_delta;

        tracing::debug!(
            "BMR {:.0} kcal, TDEE {:.0} kcal ({:?}), target {:.0} kcal ({:?})",
            bmr,
            tdee,
            input.activity_level,
            target_calories,
            input.goal
        );

        let macros = self.macros(input.weight_kg, input.goal, target_calories)?;

        Ok(EnergyResult {
            bmr,
            tdee,
            target_calories,
            macro_percentages: macros.percentages(),
            macros,
            activity_level: input.activity_level,
            goal: input.goal,
        })
    }

    /// Goal-based macro plan; carbs absorb whatever protein and fat leave
    ///
    /// # Errors
    ///
    /// `MacroBudgetExceeded` if the carbohydrate remainder would be negative.
    pub fn macros(&self, weight_kg: f64, goal: Goal, target_calories: f64) -> Result<Macros> {
        if !(weight_kg.is_finite() && weight_kg > 0.0) {
            return Err(Error::InvalidInput(format!(
                "weight must be positive, got {}",
                weight_kg
            )));
        }
        let profile = self.tables.goals.get(goal);
        let protein_g = weight_kg * profile.protein_g_per_kg;
        let fat_g = weight_kg * profile.fat_g_per_kg;
        let committed_calories = protein_g * PROTEIN_KCAL_PER_G + fat_g * FAT_KCAL_PER_G;
        let remaining = target_calories - committed_calories;

        if remaining < 0.0 {
            tracing::warn!(
                "Protein and fat need {:.0} kcal, above the {:.0} kcal target for {:?}",
                committed_calories,
                target_calories,
                goal
            );
            return Err(Error::MacroBudgetExceeded {
                target_calories,
                committed_calories,
            });
        }

        Ok(Macros {
            protein_g,
            carbs_g: remaining / CARBS_KCAL_PER_G,
            fat_g,
        })
    }
}

/// Fixed calorie offsets around TDEE, from the largest deficit to the largest surplus
pub fn calorie_ladder(tdee: f64) -> Vec<CalorieTarget> {
    CALORIE_LADDER
        .iter()
        .map(|&(label, delta)| CalorieTarget {
            label: label.to_string(),
            delta_kcal: delta,
            calories: tdee + delta,
        })
        .collect()
}

/// Percentages behind a preset split
pub fn preset_ratio(preset: MacroSplitPreset) -> MacroRatio {
    match preset {
        MacroSplitPreset::Balanced => SPLIT_BALANCED,
        MacroSplitPreset::HighProtein => SPLIT_HIGH_PROTEIN,
        MacroSplitPreset::LowCarb => SPLIT_LOW_CARB,
        MacroSplitPreset::Keto => SPLIT_KETO,
    }
}

/// Split a calorie target by fixed percentages
///
/// # Errors
///
/// `InvalidInput` if calories are not positive or the ratio does not sum to 100.
pub fn split_by_ratio(calories: f64, ratio: &MacroRatio) -> Result<Macros> {
    if !(calories.is_finite() && calories > 0.0) {
        return Err(Error::InvalidInput(format!(
            "calories must be positive, got {}",
            calories
        )));
    }
    let total = ratio.protein_percent + ratio.carbs_percent + ratio.fat_percent;
    if (total - 100.0).abs() > 1e-9
        || [ratio.protein_percent, ratio.carbs_percent, ratio.fat_percent]
            .iter()
            .any(|&p| p < 0.0)
    {
        return Err(Error::InvalidInput(format!(
            "macro percentages must be non-negative and sum to 100, got {}",
            total
        )));
    }

    Ok(Macros {
        protein_g: calories * ratio.protein_percent / 100.0 / PROTEIN_KCAL_PER_G,
        carbs_g: calories * ratio.carbs_percent / 100.0 / CARBS_KCAL_PER_G,
        fat_g: calories * ratio.fat_percent / 100.0 / FAT_KCAL_PER_G,
    })
}

/// Split a calorie target by one of the preset ratios
pub fn split_by_preset(calories: f64, preset: MacroSplitPreset) -> Result<Macros> {
    split_by_ratio(calories, &preset_ratio(preset))
}

fn validate_subject(age: u32, weight_kg: f64, height_cm: f64) -> Result<()> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(Error::InvalidInput(format!(
            "weight must be positive, got {}",
            weight_kg
        )));
    }
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(Error::InvalidInput(format!(
            "height must be positive, got {}",
            height_cm
        )));
    }
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(Error::InvalidInput(format!(
            "age must be between {} and {}, got {}",
            MIN_AGE, MAX_AGE, age
        )));
    }
    Ok(())
}
