//! Degree-award aggregation and statistics.
//!
//! Every function here is a pure reduction over a slice of records.
//! Sums go through [`add_degrees`], which rejects `AWARDS` values that
//! cannot be read as numbers. Only [`total_degrees`] also checks that
//! every record carries the field before summing.
//!
//! Groupings key every record by [`FieldKey`], so records with an absent
//! or `null` campus or year form groups of their own instead of being
//! dropped.

use crate::error::{AggregateError, Result};
use crate::models::{
    DegreeCount, FieldKey, Record, AWARDS, CAMPUS, CIP_DESC, DOCTORAL_DEGREES, FISCAL_YEAR,
    HAWAIIAN, HAWAIIAN_LEGACY, OUTCOME,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

/// Running sum of `AWARDS` values.
///
/// Whole degrees are added with overflow checks. Fractional parts are
/// carried separately and only truncated by [`DegreeTally::total`], so
/// `2.9 + 2.9` totals `5`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DegreeTally {
    whole: DegreeCount,
    /// Always strictly between -1 and 1.
    fraction: f64,
}

impl DegreeTally {
    /// The sum so far, truncated toward zero.
    pub fn total(self) -> DegreeCount {
        if self.whole > 0 && self.fraction < 0.0 {
            self.whole - 1
        } else if self.whole < 0 && self.fraction > 0.0 {
            self.whole + 1
        } else {
            self.whole
        }
    }

    fn from_f64(count: f64) -> Result<Self> {
        if !count.is_finite() {
            return Err(AggregateError::NotANumber);
        }

        let whole = count.trunc();
        // i64::MAX rounds up to 2^63 as f64, which is already out of range.
        if whole < DegreeCount::MIN as f64 || whole >= DegreeCount::MAX as f64 {
            return Err(AggregateError::OutOfRange);
        }

        Ok(Self {
            whole: whole as DegreeCount,
            fraction: count - whole,
        })
    }

    fn checked_add(self, other: Self) -> Result<Self> {
        let fraction = self.fraction + other.fraction;
        let carry = fraction.trunc();

        let whole = self
            .whole
            .checked_add(other.whole)
            .and_then(|w| w.checked_add(carry as DegreeCount))
            .ok_or(AggregateError::OutOfRange)?;

        Ok(Self {
            whole,
            fraction: fraction - carry,
        })
    }
}

impl From<DegreeCount> for DegreeTally {
    fn from(whole: DegreeCount) -> Self {
        Self {
            whole,
            fraction: 0.0,
        }
    }
}

/// Total number of degrees awarded across the dataset.
///
/// Fails with [`AggregateError::MissingField`] if any record lacks `AWARDS`,
/// checked over the whole dataset before anything is summed. Records whose
/// `AWARDS` is blank (zero, empty string, `null`, `false`) are skipped.
pub fn total_degrees(data: &[Record]) -> Result<DegreeCount> {
    if let Some(index) = data.iter().position(|r| !r.has_field(AWARDS)) {
        debug!("Record {} has no {} field", index, AWARDS);
        return Err(AggregateError::MissingField);
    }

    sum_awarded(data.iter())
}

/// Adds one record's `AWARDS` to a running tally.
///
/// A missing field counts as not a number. A sum that leaves the range of
/// [`DegreeCount`] fails with [`AggregateError::OutOfRange`].
pub fn add_degrees(tally: DegreeTally, record: &Record) -> Result<DegreeTally> {
    tally.checked_add(award_count(record.get(AWARDS))?)
}

/// Degrees awarded to students of Hawaiian legacy.
pub fn hawaiian_degrees(data: &[Record]) -> Result<DegreeCount> {
    let hawaiian = Value::from(HAWAIIAN);
    sum_awarded(
        data.iter()
            .filter(|r| r.field_equals(HAWAIIAN_LEGACY, &hawaiian)),
    )
}

/// Percentage of all degrees awarded to Hawaiian-legacy students.
///
/// A zero total is not guarded against, so the result is NaN or infinite.
pub fn percentage_hawaiian(data: &[Record]) -> Result<f64> {
    let hawaiian = hawaiian_degrees(data)?;
    let total = total_degrees(data)?;
    Ok(hawaiian as f64 / total as f64 * 100.0)
}

/// Records whose `FISCAL_YEAR` is exactly `year`.
///
/// No type coercion: the number `2012` does not match the string `"2012"`.
pub fn filter_by_year<'a>(data: &'a [Record], year: &Value) -> Vec<&'a Record> {
    data.iter()
        .filter(|r| r.field_equals(FISCAL_YEAR, year))
        .collect()
}

/// Total degrees awarded in `year`.
///
/// Only records from that year are validated.
pub fn total_degrees_by_year(data: &[Record], year: &Value) -> Result<DegreeCount> {
    sum_degrees(filter_by_year(data, year))
}

/// Campus of every record, duplicates included.
pub fn map_campus(data: &[Record]) -> Vec<FieldKey> {
    data.iter().map(|r| r.field_key(CAMPUS)).collect()
}

/// Distinct campuses in order of first appearance.
pub fn list_campuses(data: &[Record]) -> Vec<FieldKey> {
    unique(map_campus(data))
}

/// Group records by campus.
pub fn group_by_campus(data: &[Record]) -> HashMap<FieldKey, Vec<&Record>> {
    group_by(data, CAMPUS)
}

/// Degrees awarded by each campus.
///
/// Every record is summed, including those without a campus.
pub fn list_campus_degrees(data: &[Record]) -> Result<HashMap<FieldKey, DegreeCount>> {
    group_by_campus(data)
        .into_iter()
        .map(|(campus, records)| Ok((campus, sum_degrees(records)?)))
        .collect()
}

/// Group records by fiscal year.
///
/// A `null` year and an absent year are separate groups.
pub fn group_by_year(data: &[Record]) -> HashMap<FieldKey, Vec<&Record>> {
    group_by(data, FISCAL_YEAR)
}

/// Greatest number of degrees awarded in any one year.
///
/// `None` when the dataset is empty.
pub fn max_degrees(data: &[Record]) -> Result<Option<DegreeCount>> {
    let grouped = group_by_year(data);
    debug!("Computing yearly maximum over {} years", grouped.len());

    let mut max = None;
    for records in grouped.into_values() {
        let total = sum_degrees(records)?;
        max = max.max(Some(total));
    }

    Ok(max)
}

/// Distinct programs that award doctoral degrees, in order of first appearance.
pub fn doctoral_degree_programs(data: &[Record]) -> Vec<String> {
    let doctoral = Value::from(DOCTORAL_DEGREES);
    let programs = data
        .iter()
        .filter(|r| r.field_equals(OUTCOME, &doctoral))
        .filter_map(|r| r.field_text(CIP_DESC))
        .collect();

    unique(programs)
}

fn group_by<'a>(data: &'a [Record], field: &str) -> HashMap<FieldKey, Vec<&'a Record>> {
    let mut grouped: HashMap<FieldKey, Vec<&Record>> = HashMap::new();

    for record in data {
        grouped
            .entry(record.field_key(field))
            .or_default()
            .push(record);
    }

    grouped
}

/// Sum the records that carry a non-blank `AWARDS` value.
fn sum_awarded<'a>(records: impl Iterator<Item = &'a Record>) -> Result<DegreeCount> {
    records
        .filter(|r| r.get(AWARDS).is_some_and(|v| !is_blank(v)))
        .try_fold(DegreeTally::default(), add_degrees)
        .map(DegreeTally::total)
}

fn sum_degrees(records: Vec<&Record>) -> Result<DegreeCount> {
    records
        .into_iter()
        .try_fold(DegreeTally::default(), add_degrees)
        .map(DegreeTally::total)
}

/// Whether a value is semantically empty: `null`, `false`, zero or `""`.
///
/// The string `"0"` is not blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Read an `AWARDS` value as a tally of one.
///
/// Numbers pass as-is and numeric strings are parsed (surrounding whitespace
/// ignored, an empty string reads as zero). `null` reads as zero.
fn award_count(value: Option<&Value>) -> Result<DegreeTally> {
    let parsed = match value {
        Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(count) => return Ok(count.into()),
            None => n.as_f64(),
        },
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else if let Ok(count) = trimmed.parse::<DegreeCount>() {
                return Ok(count.into());
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    parsed.map_or(Err(AggregateError::NotANumber), DegreeTally::from_f64)
}

fn unique<T: Eq + Hash + Clone>(values: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
