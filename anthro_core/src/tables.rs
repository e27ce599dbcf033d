//! Canonical coefficient and threshold tables.
//!
//! Every constant the estimators use lives here under a name, grouped into
//! one table struct per estimator. The structs are plain data so a caller
//! (or a config file) can substitute alternate reference tables.

use crate::types::{ActivityLevel, BodyFatCategory, Goal, Sex};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Body Composition
// ============================================================================

/// US Navy log-linear regression: `d = intercept − girth·log10(g) + height·log10(h)`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NavyCoefficients {
    pub intercept: f64,
    pub girth_coef: f64,
    pub height_coef: f64,
}

/// Jackson-Pollock density regression:
/// `d = intercept − sum·s + sum_sq·s² − age·a`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DensityRegression {
    pub intercept: f64,
    pub sum_coef: f64,
    pub sum_sq_coef: f64,
    pub age_coef: f64,
}

/// Siri equation: `bf% = numerator / density − offset`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SiriConstants {
    pub numerator: f64,
    pub offset: f64,
}

/// Exclusive upper bounds of the first four categories; anything at or above
/// the last bound is obese.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyFatBands {
    pub male: [f64; 4],
    pub female: [f64; 4],
}

impl BodyFatBands {
    pub fn for_sex(&self, sex: Sex) -> &[f64; 4] {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }

    /// Map a body-fat percentage to its band. Lower bounds are inclusive.
    pub fn categorize(&self, sex: Sex, body_fat_percent: f64) -> BodyFatCategory {
        let bounds = self.for_sex(sex);
        bounds
            .iter()
            .position(|&upper| body_fat_percent < upper)
            .map(|idx| BodyFatCategory::ALL[idx])
            .unwrap_or(BodyFatCategory::Obese)
    }
}

pub const NAVY_MALE: NavyCoefficients = NavyCoefficients {
    intercept: 1.0324,
    girth_coef: 0.19077,
    height_coef: 0.15456,
};

pub const NAVY_FEMALE: NavyCoefficients = NavyCoefficients {
    intercept: 1.29579,
    girth_coef: 0.35004,
    height_coef: 0.22100,
};

pub const JP3_MALE: DensityRegression = DensityRegression {
    intercept: 1.10938,
    sum_coef: 0.0008267,
    sum_sq_coef: 0.0000016,
    age_coef: 0.0002574,
};

pub const JP3_FEMALE: DensityRegression = DensityRegression {
    intercept: 1.0994921,
    sum_coef: 0.0009929,
    sum_sq_coef: 0.0000023,
    age_coef: 0.0001392,
};

pub const JP7_MALE: DensityRegression = DensityRegression {
    intercept: 1.112,
    sum_coef: 0.00043499,
    sum_sq_coef: 0.00000055,
    age_coef: 0.00028826,
};

pub const JP7_FEMALE: DensityRegression = DensityRegression {
    intercept: 1.097,
    sum_coef: 0.00046971,
    sum_sq_coef: 0.00000056,
    age_coef: 0.00012828,
};

pub const SIRI: SiriConstants = SiriConstants {
    numerator: 495.0,
    offset: 450.0,
};

pub const MALE_BODY_FAT_BANDS: [f64; 4] = [6.0, 14.0, 18.0, 25.0];
pub const FEMALE_BODY_FAT_BANDS: [f64; 4] = [14.0, 21.0, 25.0, 32.0];

/// All body composition tables
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyCompositionTables {
    #[serde(default = "default_navy_male")]
    pub navy_male: NavyCoefficients,
    #[serde(default = "default_navy_female")]
    pub navy_female: NavyCoefficients,
    #[serde(default = "default_jp3_male")]
    pub jp3_male: DensityRegression,
    #[serde(default = "default_jp3_female")]
    pub jp3_female: DensityRegression,
    #[serde(default = "default_jp7_male")]
    pub jp7_male: DensityRegression,
    #[serde(default = "default_jp7_female")]
    pub jp7_female: DensityRegression,
    #[serde(default = "default_siri")]
    pub siri: SiriConstants,
    #[serde(default = "default_bands")]
    pub bands: BodyFatBands,
}

impl Default for BodyCompositionTables {
    fn default() -> Self {
        Self {
            navy_male: NAVY_MALE,
            navy_female: NAVY_FEMALE,
            jp3_male: JP3_MALE,
            jp3_female: JP3_FEMALE,
            jp7_male: JP7_MALE,
            jp7_female: JP7_FEMALE,
            siri: SIRI,
            bands: default_bands(),
        }
    }
}

impl BodyCompositionTables {
    pub fn navy(&self, sex: Sex) -> &NavyCoefficients {
        match sex {
            Sex::Male => &self.navy_male,
            Sex::Female => &self.navy_female,
        }
    }

    /// Collect table inconsistencies
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, bounds) in [("male", &self.bands.male), ("female", &self.bands.female)] {
            if !strictly_increasing(bounds) {
                errors.push(format!(
                    "body fat bands for {} are not strictly increasing: {:?}",
                    name, bounds
                ));
            }
            if bounds.iter().any(|b| !(0.0..=100.0).contains(b)) {
                errors.push(format!("body fat bands for {} leave [0, 100]", name));
            }
        }
        if self.siri.numerator <= 0.0 {
            errors.push("Siri numerator must be positive".into());
        }
        errors
    }
}

fn default_navy_male() -> NavyCoefficients {
    NAVY_MALE
}
fn default_navy_female() -> NavyCoefficients {
    NAVY_FEMALE
}
fn default_jp3_male() -> DensityRegression {
    JP3_MALE
}
fn default_jp3_female() -> DensityRegression {
    JP3_FEMALE
}
fn default_jp7_male() -> DensityRegression {
    JP7_MALE
}
fn default_jp7_female() -> DensityRegression {
    JP7_FEMALE
}
fn default_siri() -> SiriConstants {
    SIRI
}
fn default_bands() -> BodyFatBands {
    BodyFatBands {
        male: MALE_BODY_FAT_BANDS,
        female: FEMALE_BODY_FAT_BANDS,
    }
}

// ============================================================================
// Energy Expenditure
// ============================================================================

/// Mifflin-St Jeor: `10·w + 6.25·h − 5·a + sex constant`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MifflinStJeor {
    pub weight_coef: f64,
    pub height_coef: f64,
    pub age_coef: f64,
    pub male_constant: f64,
    pub female_constant: f64,
}

impl MifflinStJeor {
    pub fn sex_constant(&self, sex: Sex) -> f64 {
        match sex {
            Sex::Male => self.male_constant,
            Sex::Female => self.female_constant,
        }
    }
}

pub const MIFFLIN_ST_JEOR: MifflinStJeor = MifflinStJeor {
    weight_coef: 10.0,
    height_coef: 6.25,
    age_coef: 5.0,
    male_constant: 5.0,
    female_constant: -161.0,
};

/// TDEE multipliers per activity level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityMultipliers {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub active: f64,
    pub very_active: f64,
}

impl ActivityMultipliers {
    pub fn get(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }
}

pub const ACTIVITY_MULTIPLIERS: ActivityMultipliers = ActivityMultipliers {
    sedentary: 1.2,
    light: 1.375,
    moderate: 1.55,
    active: 1.725,
    very_active: 1.9,
};

/// Calorie delta and per-kg macro coefficients for one goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalProfile {
    pub calorie_delta: f64,
    pub protein_g_per_kg: f64,
    pub fat_g_per_kg: f64,
}

pub const FAT_G_PER_KG: f64 = 0.8;

/// Atwater energy factors
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
pub const CARBS_KCAL_PER_G: f64 = 4.0;
pub const FAT_KCAL_PER_G: f64 = 9.0;

pub const GOAL_CUT: GoalProfile = GoalProfile {
    calorie_delta: -500.0,
    protein_g_per_kg: 2.2,
    fat_g_per_kg: FAT_G_PER_KG,
};

pub const GOAL_MAINTAIN: GoalProfile = GoalProfile {
    calorie_delta: 0.0,
    protein_g_per_kg: 1.8,
    fat_g_per_kg: FAT_G_PER_KG,
};

pub const GOAL_BULK: GoalProfile = GoalProfile {
    calorie_delta: 300.0,
    protein_g_per_kg: 2.0,
    fat_g_per_kg: FAT_G_PER_KG,
};

pub const GOAL_RECOMP: GoalProfile = GoalProfile {
    calorie_delta: -200.0,
    protein_g_per_kg: 2.2,
    fat_g_per_kg: FAT_G_PER_KG,
};

/// Goal profiles keyed by goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalProfiles {
    pub cut: GoalProfile,
    pub maintain: GoalProfile,
    pub bulk: GoalProfile,
    pub recomp: GoalProfile,
}

impl GoalProfiles {
    pub fn get(&self, goal: Goal) -> &GoalProfile {
        match goal {
            Goal::Cut => &self.cut,
            Goal::Maintain => &self.maintain,
            Goal::Bulk => &self.bulk,
            Goal::Recomp => &self.recomp,
        }
    }
}

/// Fixed offsets around TDEE shown as a calorie ladder
pub const CALORIE_LADDER: [(&str, f64); 7] = [
    ("extreme_loss", -1000.0),
    ("fast_loss", -750.0),
    ("moderate_loss", -500.0),
    ("slow_loss", -250.0),
    ("maintenance", 0.0),
    ("slow_gain", 250.0),
    ("moderate_gain", 500.0),
];

/// Protein/carbs/fat percentage of calories
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroRatio {
    pub protein_percent: f64,
    pub carbs_percent: f64,
    pub fat_percent: f64,
}

pub const SPLIT_BALANCED: MacroRatio = MacroRatio {
    protein_percent: 30.0,
    carbs_percent: 40.0,
    fat_percent: 30.0,
};

pub const SPLIT_HIGH_PROTEIN: MacroRatio = MacroRatio {
    protein_percent: 40.0,
    carbs_percent: 30.0,
    fat_percent: 30.0,
};

pub const SPLIT_LOW_CARB: MacroRatio = MacroRatio {
    protein_percent: 35.0,
    carbs_percent: 20.0,
    fat_percent: 45.0,
};

pub const SPLIT_KETO: MacroRatio = MacroRatio {
    protein_percent: 25.0,
    carbs_percent: 5.0,
    fat_percent: 70.0,
};

/// All energy tables
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EnergyTables {
    #[serde(default = "default_bmr")]
    pub bmr: MifflinStJeor,
    #[serde(default = "default_activity")]
    pub activity: ActivityMultipliers,
    #[serde(default = "default_goals")]
    pub goals: GoalProfiles,
}

impl Default for EnergyTables {
    fn default() -> Self {
        Self {
            bmr: MIFFLIN_ST_JEOR,
            activity: ACTIVITY_MULTIPLIERS,
            goals: default_goals(),
        }
    }
}

impl EnergyTables {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let multipliers: Vec<f64> = ActivityLevel::ALL
            .iter()
            .map(|&level| self.activity.get(level))
            .collect();
        if !strictly_increasing(&multipliers) {
            errors.push(format!(
                "activity multipliers are not strictly increasing: {:?}",
                multipliers
            ));
        }
        if multipliers.iter().any(|&m| m <= 0.0) {
            errors.push("activity multipliers must be positive".into());
        }
        for goal in Goal::ALL {
            let profile = self.goals.get(goal);
            if profile.protein_g_per_kg < 0.0 || profile.fat_g_per_kg < 0.0 {
                errors.push(format!("goal {:?} has a negative macro coefficient", goal));
            }
        }
        errors
    }
}

fn default_bmr() -> MifflinStJeor {
    MIFFLIN_ST_JEOR
}
fn default_activity() -> ActivityMultipliers {
    ACTIVITY_MULTIPLIERS
}
fn default_goals() -> GoalProfiles {
    GoalProfiles {
        cut: GOAL_CUT,
        maintain: GOAL_MAINTAIN,
        bulk: GOAL_BULK,
        recomp: GOAL_RECOMP,
    }
}

// ============================================================================
// Readiness
// ============================================================================

/// Points per sub-rating; must sum to 100
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReadinessWeights {
    pub sleep_hours: f64,
    pub sleep_quality: f64,
    pub soreness: f64,
    pub stress: f64,
    pub nutrition: f64,
    pub hydration: f64,
}

impl ReadinessWeights {
    pub fn total(&self) -> f64 {
        self.sleep_hours
            + self.sleep_quality
            + self.soreness
            + self.stress
            + self.nutrition
            + self.hydration
    }
}

/// Sleep 40 (25 duration + 15 quality), soreness 20, stress 15, nutrition 15, hydration 10
pub const READINESS_WEIGHTS: ReadinessWeights = ReadinessWeights {
    sleep_hours: 25.0,
    sleep_quality: 15.0,
    soreness: 20.0,
    stress: 15.0,
    nutrition: 15.0,
    hydration: 10.0,
};

pub const SLEEP_REFERENCE_HOURS: f64 = 9.0;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// Inclusive lower bounds of the light, moderate and high-intensity bands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendationThresholds {
    pub light: u8,
    pub moderate: u8,
    pub high_intensity: u8,
}

pub const RECOMMENDATION_THRESHOLDS: RecommendationThresholds = RecommendationThresholds {
    light: 50,
    moderate: 70,
    high_intensity: 85,
};

pub const TREND_WINDOW: usize = 3;
pub const TREND_MIN_DELTA: f64 = 5.0;

/// All readiness tables
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReadinessTables {
    #[serde(default = "default_weights")]
    pub weights: ReadinessWeights,
    #[serde(default = "default_sleep_reference_hours")]
    pub sleep_reference_hours: f64,
    #[serde(default = "default_rating_max")]
    pub rating_max: u8,
    #[serde(default = "default_thresholds")]
    pub thresholds: RecommendationThresholds,
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    #[serde(default = "default_trend_min_delta")]
    pub trend_min_delta: f64,
}

impl Default for ReadinessTables {
    fn default() -> Self {
        Self {
            weights: READINESS_WEIGHTS,
            sleep_reference_hours: SLEEP_REFERENCE_HOURS,
            rating_max: RATING_MAX,
            thresholds: RECOMMENDATION_THRESHOLDS,
            trend_window: TREND_WINDOW,
            trend_min_delta: TREND_MIN_DELTA,
        }
    }
}

impl ReadinessTables {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let total = self.weights.total();
        if (total - 100.0).abs() > 1e-9 {
            errors.push(format!("readiness weights sum to {} instead of 100", total));
        }
        let t = &self.thresholds;
        if !(t.light < t.moderate && t.moderate < t.high_intensity && t.high_intensity <= 100) {
            errors.push(format!(
                "recommendation thresholds must ascend within 0-100: {}/{}/{}",
                t.light, t.moderate, t.high_intensity
            ));
        }
        if self.sleep_reference_hours <= 0.0 {
            errors.push("sleep reference hours must be positive".into());
        }
        if self.rating_max <= RATING_MIN {
            errors.push(format!("rating max must exceed {}", RATING_MIN));
        }
        if self.trend_window == 0 {
            errors.push("trend window must be at least 1".into());
        }
        errors
    }
}

fn default_weights() -> ReadinessWeights {
    READINESS_WEIGHTS
}
fn default_sleep_reference_hours() -> f64 {
    SLEEP_REFERENCE_HOURS
}
fn default_rating_max() -> u8 {
    RATING_MAX
}
fn default_thresholds() -> RecommendationThresholds {
    RECOMMENDATION_THRESHOLDS
}
fn default_trend_window() -> usize {
    TREND_WINDOW
}
fn default_trend_min_delta() -> f64 {
    TREND_MIN_DELTA
}

// ============================================================================
// Load Autoregulation
// ============================================================================

/// One point on the RPE scale
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RpeScaleEntry {
    pub value: f64,
    pub label: String,
    pub reps_in_reserve: String,
}

/// (value, label, reps in reserve), highest first
pub const RPE_SCALE: [(f64, &str, &str); 11] = [
    (10.0, "max effort", "0"),
    (9.5, "near max", "0-1"),
    (9.0, "very hard", "1"),
    (8.5, "hard+", "1-2"),
    (8.0, "hard", "2"),
    (7.5, "moderate+", "2-3"),
    (7.0, "moderate", "3"),
    (6.5, "moderate-", "3-4"),
    (6.0, "light", "4"),
    (5.0, "easy", "5+"),
    (4.0, "warm-up", "6+"),
];

pub const RPE_WINDOW: usize = 3;
pub const RPE_MIN_ENTRIES: usize = 2;
pub const RPE_LOW_THRESHOLD: f64 = 7.5;
pub const RPE_HIGH_THRESHOLD: f64 = 9.0;
pub const MAX_RELIABLE_REPS: u32 = 15;

/// (percent of 1RM, typical reps), heaviest first
pub const TRAINING_LOAD_CHART: [(f64, &str); 9] = [
    (100.0, "1"),
    (95.0, "2"),
    (90.0, "3-4"),
    (85.0, "5-6"),
    (80.0, "7-8"),
    (75.0, "9-10"),
    (70.0, "11-12"),
    (65.0, "13-15"),
    (60.0, "15+"),
];

/// Plate increment that training loads are rounded to
pub const LOAD_INCREMENT_KG: f64 = 2.5;

/// All autoregulation tables
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AutoregulationTables {
    #[serde(default = "default_rpe_scale")]
    pub scale: Vec<RpeScaleEntry>,
    #[serde(default = "default_rpe_window")]
    pub window: usize,
    #[serde(default = "default_rpe_min_entries")]
    pub min_entries: usize,
    #[serde(default = "default_rpe_low")]
    pub low_threshold: f64,
    #[serde(default = "default_rpe_high")]
    pub high_threshold: f64,
}

impl Default for AutoregulationTables {
    fn default() -> Self {
        Self {
            scale: default_rpe_scale(),
            window: RPE_WINDOW,
            min_entries: RPE_MIN_ENTRIES,
            low_threshold: RPE_LOW_THRESHOLD,
            high_threshold: RPE_HIGH_THRESHOLD,
        }
    }
}

impl AutoregulationTables {
    /// Find the scale entry for an exact RPE value
    pub fn scale_entry(&self, value: f64) -> Option<&RpeScaleEntry> {
        self.scale
            .iter()
            .find(|entry| (entry.value - value).abs() < 1e-9)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.scale.is_empty() {
            errors.push("RPE scale is empty".into());
        }
        let values: Vec<f64> = self.scale.iter().rev().map(|e| e.value).collect();
        if !strictly_increasing(&values) {
            errors.push("RPE scale must be listed from highest to lowest without repeats".into());
        }
        if self.min_entries < 1 {
            errors.push("minimum RPE entries must be at least 1".into());
        }
        if self.window < self.min_entries {
            errors.push(format!(
                "RPE window ({}) is smaller than the minimum entries ({})",
                self.window, self.min_entries
            ));
        }
        if self.low_threshold >= self.high_threshold {
            errors.push(format!(
                "RPE low threshold ({}) must be below the high threshold ({})",
                self.low_threshold, self.high_threshold
            ));
        }
        errors
    }
}

fn default_rpe_scale() -> Vec<RpeScaleEntry> {
    RPE_SCALE
        .iter()
        .map(|&(value, label, rir)| RpeScaleEntry {
            value,
            label: label.into(),
            reps_in_reserve: rir.into(),
        })
        .collect()
}
fn default_rpe_window() -> usize {
    RPE_WINDOW
}
fn default_rpe_min_entries() -> usize {
    RPE_MIN_ENTRIES
}
fn default_rpe_low() -> f64 {
    RPE_LOW_THRESHOLD
}
fn default_rpe_high() -> f64 {
    RPE_HIGH_THRESHOLD
}

/// Turn the problems a `validate()` call collected into a config error
pub(crate) fn ensure_valid(section: &str, problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        return Ok(());
    }
    Err(Error::Config(format!(
        "{} tables are inconsistent: {}",
        section,
        problems.join("; ")
    )))
}

fn strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}
