//! History loading from dated CSV logs.
//!
//! RPE logs use the columns `date,exercise,rpe`; readiness logs use
//! `date,score`. Dates are `YYYY-MM-DD`. Rows are returned most-recent-first,
//! which is the order the advisor and trend computation expect. Rows sharing
//! a date keep the later row first.

use crate::parse::{parse_number, parse_rating};
use crate::{Error, Result, RpeInput};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct RpeRow {
    date: String,
    exercise: String,
    rpe: String,
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    date: String,
    score: String,
}

/// A CSV row that resolves to a dated value
trait DatedRow: for<'de> Deserialize<'de> {
    type Value;

    fn into_dated(self) -> Result<(NaiveDate, Self::Value)>;
}

impl DatedRow for RpeRow {
    type Value = RpeInput;

    fn into_dated(self) -> Result<(NaiveDate, RpeInput)> {
        let date = parse_date(&self.date)?;
        if self.exercise.is_empty() {
            return Err(Error::parse("exercise", &self.exercise));
        }
        let rpe = parse_number("rpe", &self.rpe)?;
        Ok((date, RpeInput::new(self.exercise, rpe)))
    }
}

impl DatedRow for ScoreRow {
    type Value = u8;

    fn into_dated(self) -> Result<(NaiveDate, u8)> {
        let date = parse_date(&self.date)?;
        let score = parse_rating("score", &self.score)?;
        if score > 100 {
            return Err(Error::parse("score", &self.score));
        }
        Ok((date, score))
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| Error::parse("date", text))
}

/// Read every row, failing on the first malformed one
fn read_rows<R: DatedRow>(path: &Path) -> Result<Vec<(NaiveDate, R::Value)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<R>() {
        rows.push(result?.into_dated()?);
    }
    Ok(rows)
}

/// Order by date, newest first; later file rows win ties
fn newest_first<T>(rows: Vec<(NaiveDate, T)>) -> Vec<T> {
    let mut indexed: Vec<(usize, (NaiveDate, T))> = rows.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, (da, _)), (ib, (db, _))| db.cmp(da).then(ib.cmp(ia)));
    indexed.into_iter().map(|(_, (_, value))| value).collect()
}

/// Load an RPE log, optionally keeping only one exercise
pub fn load_rpe_history(path: &Path, exercise: Option<&str>) -> Result<Vec<RpeInput>> {
    let rows = read_rows::<RpeRow>(path)?;
    let total = rows.len();
    let entries: Vec<RpeInput> = newest_first(rows)
        .into_iter()
        .filter(|e| exercise.map_or(true, |name| e.exercise == name))
        .collect();

    tracing::info!(
        "Loaded {} of {} RPE entries from {:?}",
        entries.len(),
        total,
        path
    );
    Ok(entries)
}

/// Load a readiness score log
pub fn load_readiness_history(path: &Path) -> Result<Vec<u8>> {
    let rows = read_rows::<ScoreRow>(path)?;
    let scores = newest_first(rows);
    tracing::info!("Loaded {} readiness scores from {:?}", scores.len(), path);
    Ok(scores)
}
