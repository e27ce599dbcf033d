//! Core domain types for the anthropometric estimation engine.
//!
//! This module defines the input and result records passed across the
//! estimator boundary:
//! - Population and method selectors
//! - Body measurements and body composition results
//! - Energy expenditure inputs, macro plans and results
//! - Readiness ratings, scores and recommendations
//! - RPE entries and load advice

use crate::tables::{CARBS_KCAL_PER_G, FAT_KCAL_PER_G, PROTEIN_KCAL_PER_G};
use serde::{Deserialize, Serialize};

// ============================================================================
// Population
// ============================================================================

/// Biological sex, selects the regression coefficients and category bands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

// ============================================================================
// Body Composition Types
// ============================================================================

/// Body-fat estimation method, always chosen by the caller
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// US Navy circumference method
    Navy,
    /// Jackson-Pollock 3-site skinfold
    JacksonPollock3,
    /// Jackson-Pollock 7-site skinfold
    JacksonPollock7,
}

/// A measured anatomical site
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Neck,
    Waist,
    Hip,
    Chest,
    Abdomen,
    Thigh,
    Triceps,
    Suprailiac,
    Midaxillary,
    Subscapular,
}

impl Site {
    /// Field name used in error messages and CLI flags
    pub fn name(&self) -> &'static str {
        match self {
            Site::Neck => "neck",
            Site::Waist => "waist",
            Site::Hip => "hip",
            Site::Chest => "chest",
            Site::Abdomen => "abdomen",
            Site::Thigh => "thigh",
            Site::Triceps => "triceps",
            Site::Suprailiac => "suprailiac",
            Site::Midaxillary => "midaxillary",
            Site::Subscapular => "subscapular",
        }
    }

    /// Skinfolds are in millimetres, circumferences in centimetres
    pub fn unit(&self) -> &'static str {
        match self {
            Site::Neck | Site::Waist | Site::Hip => "cm",
            _ => "mm",
        }
    }
}

/// Raw measurement set. Which fields are required depends on method and sex.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Measurements {
    pub neck_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub chest_mm: Option<f64>,
    pub abdomen_mm: Option<f64>,
    pub thigh_mm: Option<f64>,
    pub triceps_mm: Option<f64>,
    pub suprailiac_mm: Option<f64>,
    pub midaxillary_mm: Option<f64>,
    pub subscapular_mm: Option<f64>,
}

impl Measurements {
    /// Get the recorded value for a site, if any
    pub fn get(&self, site: Site) -> Option<f64> {
        match site {
            Site::Neck => self.neck_cm,
            Site::Waist => self.waist_cm,
            Site::Hip => self.hip_cm,
            Site::Chest => self.chest_mm,
            Site::Abdomen => self.abdomen_mm,
            Site::Thigh => self.thigh_mm,
            Site::Triceps => self.triceps_mm,
            Site::Suprailiac => self.suprailiac_mm,
            Site::Midaxillary => self.midaxillary_mm,
            Site::Subscapular => self.subscapular_mm,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, site: Site, value: f64) -> Self {
        let slot = match site {
            Site::Neck => &mut self.neck_cm,
            Site::Waist => &mut self.waist_cm,
            Site::Hip => &mut self.hip_cm,
            Site::Chest => &mut self.chest_mm,
            Site::Abdomen => &mut self.abdomen_mm,
            Site::Thigh => &mut self.thigh_mm,
            Site::Triceps => &mut self.triceps_mm,
            Site::Suprailiac => &mut self.suprailiac_mm,
            Site::Midaxillary => &mut self.midaxillary_mm,
            Site::Subscapular => &mut self.subscapular_mm,
        };
        *slot = Some(value);
        self
    }
}

/// Input record for body composition estimation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnthropometricInput {
    pub sex: Sex,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub method: Method,
    pub measurements: Measurements,
}

/// Body-fat category, ordered from leanest to highest
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatCategory {
    Essential,
    Athletic,
    Fitness,
    Average,
    Obese,
}

impl BodyFatCategory {
    /// All categories in ascending order
    pub const ALL: [BodyFatCategory; 5] = [
        BodyFatCategory::Essential,
        BodyFatCategory::Athletic,
        BodyFatCategory::Fitness,
        BodyFatCategory::Average,
        BodyFatCategory::Obese,
    ];
}

/// Body composition estimate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BodyCompositionResult {
    pub method: Method,
    /// Body density (g/cm³); for the Navy method this is the regression proxy
    pub body_density: f64,
    /// Clamped to [0, 100]
    pub body_fat_percent: f64,
    pub fat_mass_kg: f64,
    pub lean_mass_kg: f64,
    pub category: BodyFatCategory,
}

// ============================================================================
// Energy Expenditure Types
// ============================================================================

/// Activity level, ordered from least to most active
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    Light,
    /// 3-5 days/week
    Moderate,
    /// 6-7 days/week
    Active,
    /// Hard daily training or twice a day
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];
}

/// Nutrition goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Cut,
    Maintain,
    Bulk,
    Recomp,
}

impl Goal {
    pub const ALL: [Goal; 4] = [Goal::Cut, Goal::Maintain, Goal::Bulk, Goal::Recomp];
}

/// Input record for energy expenditure estimation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyInput {
    pub sex: Sex,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Daily macronutrient grams
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Macros {
    /// Total energy of the plan in kcal
    pub fn calories(&self) -> f64 {
        self.protein_g * PROTEIN_KCAL_PER_G
            + self.carbs_g * CARBS_KCAL_PER_G
            + self.fat_g * FAT_KCAL_PER_G
    }

    /// Share of calories from each macronutrient
    pub fn percentages(&self) -> MacroPercentages {
        let total = self.calories();
        if total <= 0.0 {
            return MacroPercentages {
                protein_percent: 0.0,
                carbs_percent: 0.0,
                fat_percent: 0.0,
            };
        }
        MacroPercentages {
            protein_percent: self.protein_g * PROTEIN_KCAL_PER_G / total * 100.0,
            carbs_percent: self.carbs_g * CARBS_KCAL_PER_G / total * 100.0,
            fat_percent: self.fat_g * FAT_KCAL_PER_G / total * 100.0,
        }
    }
}

/// Macronutrient percentage breakdown
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroPercentages {
    pub protein_percent: f64,
    pub carbs_percent: f64,
    pub fat_percent: f64,
}

/// Energy expenditure estimate with a goal-adjusted macro plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyResult {
    /// kcal/day
    pub bmr: f64,
    /// kcal/day, bmr × activity multiplier
    pub tdee: f64,
    /// tdee + goal delta
    pub target_calories: f64,
    pub macros: Macros,
    pub macro_percentages: MacroPercentages,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Fixed percentage macro split applied to a calorie target
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MacroSplitPreset {
    Balanced,
    HighProtein,
    LowCarb,
    Keto,
}

/// One rung of the calorie ladder around TDEE
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalorieTarget {
    pub label: String,
    pub delta_kcal: f64,
    pub calories: f64,
}

// ============================================================================
// Readiness Types
// ============================================================================

/// A named readiness sub-rating
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    SleepHours,
    SleepQuality,
    Soreness,
    Stress,
    Nutrition,
    Hydration,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::SleepHours,
        Dimension::SleepQuality,
        Dimension::Soreness,
        Dimension::Stress,
        Dimension::Nutrition,
        Dimension::Hydration,
    ];

    /// Higher raw values mean worse recovery
    pub fn is_inverted(&self) -> bool {
        matches!(self, Dimension::Soreness | Dimension::Stress)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::SleepHours => "sleep_hours",
            Dimension::SleepQuality => "sleep_quality",
            Dimension::Soreness => "soreness",
            Dimension::Stress => "stress",
            Dimension::Nutrition => "nutrition",
            Dimension::Hydration => "hydration",
        }
    }
}

/// Subjective daily ratings. Ordinal fields use a 1-5 scale.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReadinessInput {
    pub sleep_hours: f64,
    pub sleep_quality: u8,
    pub soreness: u8,
    pub stress: u8,
    pub nutrition: u8,
    pub hydration: u8,
}

/// Points contributed by each sub-rating
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReadinessComponents {
    pub sleep_hours: f64,
    pub sleep_quality: f64,
    pub soreness: f64,
    pub stress: f64,
    pub nutrition: f64,
    pub hydration: f64,
}

impl ReadinessComponents {
    pub fn total(&self) -> f64 {
        self.sleep_hours
            + self.sleep_quality
            + self.soreness
            + self.stress
            + self.nutrition
            + self.hydration
    }
}

/// Training recommendation, ordered from least to most demanding
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Rest,
    Light,
    Moderate,
    HighIntensity,
}

/// Composite readiness score
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositeScoreResult {
    /// 0-100
    pub score: u8,
    pub recommendation: Recommendation,
    pub components: ReadinessComponents,
}

/// Direction of recent scores versus the window before them
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

// ============================================================================
// Load Autoregulation Types
// ============================================================================

/// A single perceived-exertion rating for an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RpeInput {
    pub exercise: String,
    pub rpe: f64,
}

impl RpeInput {
    pub fn new(exercise: impl Into<String>, rpe: f64) -> Self {
        Self {
            exercise: exercise.into(),
            rpe,
        }
    }
}

/// Suggested load change
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LoadSuggestion {
    Increase,
    Hold,
    Decrease,
}

/// The averaging window behind a suggestion
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdviceBasis {
    /// Number of entries averaged
    pub window: usize,
    pub mean_rpe: f64,
}

/// Load advice for one exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpeAdvice {
    pub exercise: String,
    pub suggestion: LoadSuggestion,
    pub basis: AdviceBasis,
}

/// Estimated one-rep-max formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OneRepMaxFormula {
    /// w × (1 + r/30)
    Epley,
    /// w × 36 / (37 − r)
    Brzycki,
}

/// Working weight at one percentage of a one-rep max
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainingLoad {
    pub percent: f64,
    pub load_kg: f64,
    /// Typical rep range at this intensity
    pub reps: String,
}
