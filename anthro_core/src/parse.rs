//! Conversion of caller-supplied text into typed inputs.
//!
//! Malformed text fails here with [`Error::Parse`], before any formula sees it.
//! Range checks that depend on the domain (positive lengths, plausible age)
//! stay with the estimators.

use crate::types::{ActivityLevel, Goal, MacroSplitPreset, Method, OneRepMaxFormula, Sex};
use crate::{Error, Result};
use std::str::FromStr;

/// Parse a finite decimal number
pub fn parse_number(field: &str, text: &str) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::parse(field, text))?;
    if !value.is_finite() {
        return Err(Error::parse(field, text));
    }
    Ok(value)
}

/// Parse a number that must be strictly positive
pub fn parse_positive(field: &str, text: &str) -> Result<f64> {
    let value = parse_number(field, text)?;
    if value <= 0.0 {
        return Err(Error::InvalidMeasurement(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(value)
}

/// Parse an optional measurement; empty text means "not measured"
pub fn parse_optional(field: &str, text: Option<&str>) -> Result<Option<f64>> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => parse_positive(field, t).map(Some),
    }
}

/// Parse an age in whole years
pub fn parse_age(text: &str) -> Result<u32> {
    text.trim().parse().map_err(|_| Error::parse("age", text))
}

/// Parse an ordinal rating (e.g. 1-5)
pub fn parse_rating(field: &str, text: &str) -> Result<u8> {
    text.trim().parse().map_err(|_| Error::parse(field, text))
}

/// Parse a repetition count
pub fn parse_reps(text: &str) -> Result<u32> {
    text.trim().parse().map_err(|_| Error::parse("reps", text))
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "male" | "m" | "man" => Ok(Sex::Male),
            "female" | "f" | "woman" => Ok(Sex::Female),
            _ => Err(Error::parse("sex", s)),
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "navy" | "us_navy" => Ok(Method::Navy),
            "jp3" | "jackson_pollock_3" | "jackson3" => Ok(Method::JacksonPollock3),
            "jp7" | "jackson_pollock_7" | "jackson7" => Ok(Method::JacksonPollock7),
            _ => Err(Error::parse("method", s)),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" | "veryactive" | "extra_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(Error::parse("activity", s)),
        }
    }
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "cut" | "cutting" => Ok(Goal::Cut),
            "maintain" | "maintenance" => Ok(Goal::Maintain),
            "bulk" | "bulking" => Ok(Goal::Bulk),
            "recomp" | "recomposition" => Ok(Goal::Recomp),
            _ => Err(Error::parse("goal", s)),
        }
    }
}

impl FromStr for MacroSplitPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "balanced" => Ok(MacroSplitPreset::Balanced),
            "high_protein" => Ok(MacroSplitPreset::HighProtein),
            "low_carb" => Ok(MacroSplitPreset::LowCarb),
            "keto" => Ok(MacroSplitPreset::Keto),
            _ => Err(Error::parse("split", s)),
        }
    }
}

impl FromStr for OneRepMaxFormula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "epley" => Ok(OneRepMaxFormula::Epley),
            "brzycki" => Ok(OneRepMaxFormula::Brzycki),
            _ => Err(Error::parse("formula", s)),
        }
    }
}
