//! Body composition from circumference or skinfold measurements.
//!
//! Supported methods:
//! - US Navy (neck/waist, plus hip for women), log-linear regression on girths and height
//! - Jackson-Pollock 3-site and 7-site skinfolds, quadratic density regression
//!   converted with the Siri equation
//!
//! Every result is clamped to [0, 100] percent. Inputs that would push a
//! logarithm or the density out of its domain fail instead of producing NaN.

use crate::tables::{ensure_valid, BodyCompositionTables, DensityRegression, SiriConstants};
use crate::types::{
    AnthropometricInput, BodyCompositionResult, Measurements, Method, Sex, Site,
};
use crate::{Config, Error, Result};

const NAVY_MALE_SITES: [Site; 2] = [Site::Neck, Site::Waist];
const NAVY_FEMALE_SITES: [Site; 3] = [Site::Neck, Site::Waist, Site::Hip];
const JP3_MALE_SITES: [Site; 3] = [Site::Chest, Site::Abdomen, Site::Thigh];
const JP3_FEMALE_SITES: [Site; 3] = [Site::Triceps, Site::Suprailiac, Site::Thigh];
const JP7_SITES: [Site; 7] = [
    Site::Chest,
    Site::Abdomen,
    Site::Thigh,
    Site::Triceps,
    Site::Suprailiac,
    Site::Midaxillary,
    Site::Subscapular,
];

/// Sites a method needs for a given sex
pub fn required_sites(method: Method, sex: Sex) -> &'static [Site] {
    match (method, sex) {
        (Method::Navy, Sex::Male) => &NAVY_MALE_SITES,
        (Method::Navy, Sex::Female) => &NAVY_FEMALE_SITES,
        (Method::JacksonPollock3, Sex::Male) => &JP3_MALE_SITES,
        (Method::JacksonPollock3, Sex::Female) => &JP3_FEMALE_SITES,
        (Method::JacksonPollock7, _) => &JP7_SITES,
    }
}

/// Convert body density to body-fat percent with the Siri equation (unclamped)
///
/// Fails when density is not strictly positive.
pub fn siri_body_fat(density: f64, siri: &SiriConstants) -> Result<f64> {
    if !density.is_finite() || density <= 0.0 {
        return Err(Error::InvalidMeasurement(format!(
            "body density must be positive, got {}",
            density
        )));
    }
    Ok(siri.numerator / density - siri.offset)
}

/// Body composition estimator over an injectable coefficient table
#[derive(Clone, Debug)]
pub struct BodyCompositionEstimator {
    tables: BodyCompositionTables,
}

impl Default for BodyCompositionEstimator {
    fn default() -> Self {
        Self {
            tables: crate::config::canonical().body_composition.clone(),
        }
    }
}

impl BodyCompositionEstimator {
    /// Wrap a table after checking it for inconsistencies
    ///
    /// # Errors
    ///
    /// `Config` listing every problem `BodyCompositionTables::validate` finds.
    pub fn new(tables: BodyCompositionTables) -> Result<Self> {
        ensure_valid("body_composition", tables.validate())?;
        Ok(Self { tables })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.body_composition.clone())
    }

    pub fn tables(&self) -> &BodyCompositionTables {
        &self.tables
    }

    /// Estimate body fat, fat/lean mass and category
    ///
    /// # Errors
    ///
    /// `InvalidMeasurement` if weight/height/age or any required site is
    /// missing or non-positive, or if the regression leaves its domain.
    pub fn estimate(&self, input: &AnthropometricInput) -> Result<BodyCompositionResult> {
        validate_subject(input)?;
        let sites = collect_sites(input.method, input.sex, &input.measurements)?;

        let density = match input.method {
            Method::Navy => self.navy_density(input, &sites)?,
            Method::JacksonPollock3 | Method::JacksonPollock7 => {
                let regression = self.density_regression(input.method, input.sex);
                let sum: f64 = sites.iter().sum();
                skinfold_density(sum, input.age, regression)
            }
        };

        tracing::debug!(
            "{:?} {:?}: density {:.5} from {} sites",
            input.method,
            input.sex,
            density,
            sites.len()
        );

        let raw = siri_body_fat(density, &self.tables.siri)?;
        let body_fat_percent = raw.clamp(0.0, 100.0);
        if body_fat_percent != raw {
            tracing::warn!(
                "Body fat {:.2}% outside [0, 100], clamped to {:.1}%",
                raw,
                body_fat_percent
            );
        }

        let fat_mass_kg = input.weight_kg * body_fat_percent / 100.0;
        let lean_mass_kg = input.weight_kg - fat_mass_kg;
        let category = self.tables.bands.categorize(input.sex, body_fat_percent);

        Ok(BodyCompositionResult {
            method: input.method,
            body_density: density,
            body_fat_percent,
            fat_mass_kg,
            lean_mass_kg,
            category,
        })
    }

    /// Navy density proxy; `sites` are ordered as in [`required_sites`]
    fn navy_density(&self, input: &AnthropometricInput, sites: &[f64]) -> Result<f64> {
        let girth = match input.sex {
            Sex::Male => sites[1] - sites[0],
            Sex::Female => sites[1] + sites[2] - sites[0],
        };
        if girth <= 0.0 {
            let expr = match input.sex {
                Sex::Male => "waist - neck",
                Sex::Female => "waist + hip - neck",
            };
            return Err(Error::InvalidMeasurement(format!(
                "{} must be positive for the Navy method, got {:.1}",
                expr, girth
            )));
        }

        let coef = self.tables.navy(input.sex);
        let density = coef.intercept - coef.girth_coef * girth.log10()
            + coef.height_coef * input.height_cm.log10();
        Ok(density)
    }

    fn density_regression(&self, method: Method, sex: Sex) -> &DensityRegression {
        match (method, sex) {
            (Method::JacksonPollock7, Sex::Male) => &self.tables.jp7_male,
            (Method::JacksonPollock7, Sex::Female) => &self.tables.jp7_female,
            (_, Sex::Male) => &self.tables.jp3_male,
            (_, Sex::Female) => &self.tables.jp3_female,
        }
    }
}

/// Jackson-Pollock body density from a skinfold sum (mm) and age
pub fn skinfold_density(sum_mm: f64, age: u32, regression: &DensityRegression) -> f64 {
    regression.intercept - regression.sum_coef * sum_mm
        + regression.sum_sq_coef * sum_mm * sum_mm
        - regression.age_coef * f64::from(age)
}

fn validate_subject(input: &AnthropometricInput) -> Result<()> {
    if !(input.weight_kg.is_finite() && input.weight_kg > 0.0) {
        return Err(Error::InvalidMeasurement(format!(
            "weight must be positive, got {}",
            input.weight_kg
        )));
    }
    if !(input.height_cm.is_finite() && input.height_cm > 0.0) {
        return Err(Error::InvalidMeasurement(format!(
            "height must be positive, got {}",
            input.height_cm
        )));
    }
    if input.age == 0 {
        return Err(Error::InvalidMeasurement("age must be positive".into()));
    }
    Ok(())
}

/// Pull the required sites in order, failing on the first missing or non-positive one
fn collect_sites(method: Method, sex: Sex, measurements: &Measurements) -> Result<Vec<f64>> {
    required_sites(method, sex)
        .iter()
        .map(|&site| match measurements.get(site) {
            None => Err(Error::InvalidMeasurement(format!(
                "{} ({}) is required for {:?} ({:?})",
                site.name(),
                site.unit(),
                method,
                sex
            ))),
            Some(v) if !v.is_finite() || v <= 0.0 => Err(Error::InvalidMeasurement(format!(
                "{} must be positive, got {}",
                site.name(),
                v
            ))),
            Some(v) => Ok(v),
        })
        .collect()
}
