//! Data models for degree-award analysis.
//!
//! This module contains the record type the aggregator works over and
//! the summary and report structures built from it.

use crate::analysis;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Number of degrees awarded.
pub type DegreeCount = i64;

/// Field holding the award count.
pub const AWARDS: &str = "AWARDS";
/// Field naming the awarding campus.
pub const CAMPUS: &str = "CAMPUS";
/// Field holding the reporting year.
pub const FISCAL_YEAR: &str = "FISCAL_YEAR";
/// Field flagging Hawaiian-legacy students.
pub const HAWAIIAN_LEGACY: &str = "HAWAIIAN_LEGACY";
/// Field describing the award type.
pub const OUTCOME: &str = "OUTCOME";
/// Field holding the program classification description.
pub const CIP_DESC: &str = "CIP_DESC";

/// `HAWAIIAN_LEGACY` value marking Hawaiian-legacy students.
pub const HAWAIIAN: &str = "HAWAIIAN";
/// `OUTCOME` value for doctoral awards.
pub const DOCTORAL_DEGREES: &str = "Doctoral Degrees";

/// A single degree-award observation: one row of the dataset.
///
/// Records are flat key-value mappings. Any field may be missing, and
/// values keep whatever JSON type the source gave them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON value. Returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Returns the record with `field` set to `value`.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Looks up a field. `None` means the key is absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the key is present, regardless of its value.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether the field is present and exactly equal to `expected`.
    pub fn field_equals(&self, field: &str, expected: &Value) -> bool {
        self.get(field) == Some(expected)
    }

    /// Renders a scalar field as text (strings unquoted).
    ///
    /// Absent fields, `null`, arrays and objects give `None`.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The grouping key for a field.
    ///
    /// Unlike [`Record::field_text`], this never drops a record: absent and
    /// `null` fields get keys of their own, and arrays or objects are keyed
    /// by their JSON text.
    pub fn field_key(&self, field: &str) -> FieldKey {
        match self.get(field) {
            None => FieldKey::Missing,
            Some(Value::Null) => FieldKey::Null,
            Some(Value::String(s)) => FieldKey::Text(s.clone()),
            Some(other) => FieldKey::Text(other.to_string()),
        }
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Key that records are grouped under for one field.
///
/// Serialized as an optional string: both `Missing` and `Null` become
/// `null`, and read back as `Null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FieldKey {
    /// The record has no such field.
    Missing,
    /// The field is present and `null`.
    Null,
    /// Text rendering of any other value (strings unquoted).
    Text(String),
}

impl FieldKey {
    /// The text of a present, non-null value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldKey::Text(text) => Some(text),
            FieldKey::Missing | FieldKey::Null => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Missing => write!(f, "(none)"),
            FieldKey::Null => write!(f, "(null)"),
            FieldKey::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(text: &str) -> Self {
        FieldKey::Text(text.to_string())
    }
}

impl From<Option<String>> for FieldKey {
    fn from(text: Option<String>) -> Self {
        text.map_or(FieldKey::Null, FieldKey::Text)
    }
}

impl From<FieldKey> for Option<String> {
    fn from(key: FieldKey) -> Self {
        match key {
            FieldKey::Text(text) => Some(text),
            FieldKey::Missing | FieldKey::Null => None,
        }
    }
}

impl PartialEq<&str> for FieldKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

/// Degrees awarded by one campus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusDegrees {
    /// Campus the records were grouped under.
    pub campus: FieldKey,
    /// Sum of `AWARDS` for the campus.
    pub degrees: DegreeCount,
}

/// Degrees awarded in one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearDegrees {
    /// Fiscal year as it was requested.
    pub fiscal_year: Value,
    /// Sum of `AWARDS` for records of that year.
    pub degrees: DegreeCount,
}

/// Every statistic the aggregator offers, computed over one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegreeSummary {
    /// Number of records examined.
    pub record_count: usize,
    /// Total degrees awarded.
    pub total_degrees: DegreeCount,
    /// Degrees awarded to Hawaiian-legacy students.
    pub hawaiian_degrees: DegreeCount,
    /// Hawaiian-legacy share of all degrees, in percent.
    ///
    /// NaN or infinite when the total is zero; serialized as `null` then.
    pub percentage_hawaiian: f64,
    /// Highest single-year total, `None` for an empty dataset.
    pub max_degrees_in_year: Option<DegreeCount>,
    /// Per-campus totals, most degrees first.
    pub campuses: Vec<CampusDegrees>,
    /// Totals for the requested fiscal years, in request order.
    pub years: Vec<YearDegrees>,
    /// Distinct programs that award doctoral degrees.
    pub doctoral_programs: Vec<String>,
}

impl DegreeSummary {
    /// Computes a summary over `records`, with per-year totals for `years`.
    pub fn from_records(records: &[Record], years: &[Value]) -> Result<Self> {
        debug!(
            "Summarizing {} records ({} requested years)",
            records.len(),
            years.len()
        );

        let hawaiian_degrees = analysis::hawaiian_degrees(records)?;
        let total_degrees = analysis::total_degrees(records)?;
        let percentage_hawaiian = analysis::percentage_hawaiian(records)?;

        let mut campuses: Vec<CampusDegrees> = analysis::list_campus_degrees(records)?
            .into_iter()
            .map(|(campus, degrees)| CampusDegrees { campus, degrees })
            .collect();
        campuses.sort_by(|a, b| {
            b.degrees
                .cmp(&a.degrees)
                .then_with(|| a.campus.cmp(&b.campus))
        });

        let years = years
            .iter()
            .map(|year| {
                Ok(YearDegrees {
                    fiscal_year: year.clone(),
                    degrees: analysis::total_degrees_by_year(records, year)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            record_count: records.len(),
            total_degrees,
            hawaiian_degrees,
            percentage_hawaiian,
            max_degrees_in_year: analysis::max_degrees(records)?,
            campuses,
            years,
            doctoral_programs: analysis::doctoral_degree_programs(records),
        })
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path the dataset was loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of dataset files read.
    pub files_loaded: usize,
    /// Number of records in the dataset.
    pub record_count: usize,
    /// Time spent loading and aggregating, in seconds.
    pub duration_seconds: f64,
}

/// The complete degree report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Aggregated statistics.
    pub summary: DegreeSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AggregateError;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_record_from_value() {
        assert!(Record::from_value(json!({"AWARDS": 3})).is_some());
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("CAMPUS")).is_none());
    }

    #[test]
    fn test_record_field_presence() {
        let r = record(json!({"AWARDS": null, "CAMPUS": "Manoa"}));
        assert!(r.has_field(AWARDS));
        assert_eq!(r.get(AWARDS), Some(&Value::Null));
        assert!(!r.has_field(OUTCOME));
        assert_eq!(r.get(OUTCOME), None);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_record_field_text() {
        let r = Record::new()
            .with(CAMPUS, "Hilo")
            .with(FISCAL_YEAR, 2012)
            .with(CIP_DESC, Value::Null);

        assert_eq!(r.field_text(CAMPUS), Some("Hilo".to_string()));
        assert_eq!(r.field_text(FISCAL_YEAR), Some("2012".to_string()));
        assert_eq!(r.field_text(CIP_DESC), None);
        assert_eq!(r.field_text(OUTCOME), None);
    }

    #[test]
    fn test_record_field_key() {
        let r = record(json!({"CAMPUS": "Hilo", "FISCAL_YEAR": null, "AWARDS": [1]}));

        assert_eq!(r.field_key(CAMPUS), FieldKey::from("Hilo"));
        assert_eq!(r.field_key(FISCAL_YEAR), FieldKey::Null);
        assert_eq!(r.field_key(OUTCOME), FieldKey::Missing);
        assert_eq!(r.field_key(AWARDS), FieldKey::from("[1]"));
        assert_ne!(FieldKey::Null, FieldKey::Missing);
        assert_ne!(FieldKey::from("null"), FieldKey::Null);
    }

    #[test]
    fn test_field_key_display_and_serialization() {
        assert_eq!(FieldKey::from("Manoa").to_string(), "Manoa");
        assert_eq!(FieldKey::Null.to_string(), "(null)");
        assert_eq!(FieldKey::Missing.to_string(), "(none)");

        assert_eq!(serde_json::to_value(FieldKey::from("Manoa")).unwrap(), json!("Manoa"));
        assert_eq!(serde_json::to_value(FieldKey::Missing).unwrap(), json!(null));
        let key: FieldKey = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(key, FieldKey::Null);
    }

    #[test]
    fn test_record_field_equals_is_exact() {
        let r = Record::new().with(FISCAL_YEAR, 2012);
        assert!(r.field_equals(FISCAL_YEAR, &json!(2012)));
        assert!(!r.field_equals(FISCAL_YEAR, &json!("2012")));
    }

    #[test]
    fn test_record_deserializes_from_object() {
        let records: Vec<Record> =
            serde_json::from_str(r#"[{"CAMPUS": "Manoa", "AWARDS": 4}, {}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field_text(CAMPUS), Some("Manoa".to_string()));
        assert!(records[1].is_empty());
    }

    #[test]
    fn test_degree_summary_from_records() {
        let records = vec![
            record(json!({"CAMPUS": "Manoa", "FISCAL_YEAR": 2012, "AWARDS": 25,
                "HAWAIIAN_LEGACY": "HAWAIIAN", "OUTCOME": "Doctoral Degrees",
                "CIP_DESC": "Physics"})),
            record(json!({"CAMPUS": "Hilo", "FISCAL_YEAR": 2012, "AWARDS": 15,
                "HAWAIIAN_LEGACY": "NOT HAWAIIAN", "OUTCOME": "Bachelors Degrees",
                "CIP_DESC": "Biology"})),
            record(json!({"CAMPUS": "Hilo", "FISCAL_YEAR": 2013, "AWARDS": 60,
                "HAWAIIAN_LEGACY": "NOT HAWAIIAN", "OUTCOME": "Doctoral Degrees",
                "CIP_DESC": "Pharmacy"})),
        ];

        let summary = DegreeSummary::from_records(&records, &[json!(2012), json!(2014)]).unwrap();

        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.total_degrees, 100);
        assert_eq!(summary.hawaiian_degrees, 25);
        assert_eq!(summary.percentage_hawaiian, 25.0);
        assert_eq!(summary.max_degrees_in_year, Some(60));
        assert_eq!(
            summary.campuses,
            vec![
                CampusDegrees {
                    campus: "Hilo".into(),
                    degrees: 75
                },
                CampusDegrees {
                    campus: "Manoa".into(),
                    degrees: 25
                },
            ]
        );
        assert_eq!(summary.years[0].degrees, 40);
        assert_eq!(summary.years[1].degrees, 0);
        assert_eq!(summary.doctoral_programs, vec!["Physics", "Pharmacy"]);
    }

    #[test]
    fn test_degree_summary_keeps_records_without_campus() {
        let records = vec![
            record(json!({"CAMPUS": "Hilo", "FISCAL_YEAR": 2012, "AWARDS": 2})),
            record(json!({"FISCAL_YEAR": 2012, "AWARDS": 9})),
        ];

        let summary = DegreeSummary::from_records(&records, &[]).unwrap();
        assert_eq!(
            summary.campuses,
            vec![
                CampusDegrees {
                    campus: FieldKey::Missing,
                    degrees: 9
                },
                CampusDegrees {
                    campus: "Hilo".into(),
                    degrees: 2
                },
            ]
        );
        let total: DegreeCount = summary.campuses.iter().map(|c| c.degrees).sum();
        assert_eq!(total, summary.total_degrees);
    }

    #[test]
    fn test_degree_summary_propagates_errors() {
        let records = vec![record(json!({"CAMPUS": "Manoa"}))];
        assert_eq!(
            DegreeSummary::from_records(&records, &[]),
            Err(AggregateError::MissingField)
        );
    }
}
