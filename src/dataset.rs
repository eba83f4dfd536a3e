use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::models::{ReadinessField, Status, Submission};

pub const ID_COLUMN: &str = "id";
pub const CREATED_COLUMN: &str = "createdDate";
pub const STATUS_COLUMN: &str = "status";
pub const TYPE_COLUMN: &str = "type";

/// Submissions loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    submissions: Vec<Submission>,
    has_type_column: bool,
}

impl Dataset {
    pub fn new(submissions: Vec<Submission>, has_type_column: bool) -> Self {
        Dataset {
            submissions,
            has_type_column,
        }
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Submission> {
        self.submissions().iter()
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    pub fn has_type_column(&self) -> bool {
        self.has_type_column
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<String>,
    #[serde(rename = "createdDate")]
    created_date: Option<String>,
    status: Option<String>,
    #[serde(rename = "type", default)]
    idea_type: Option<String>,
    #[serde(rename = "meta.businessmodeldescription", default)]
    business_model: Option<String>,
    #[serde(rename = "meta.problemdescription", default)]
    problem_description: Option<String>,
    #[serde(rename = "meta.valuepropdescription", default)]
    value_proposition: Option<String>,
}

pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![ID_COLUMN, CREATED_COLUMN, STATUS_COLUMN];
    columns.extend(ReadinessField::ALL.iter().map(|field| field.column()));
    columns
}

pub fn load(path: &Path) -> Result<Dataset, AnalysisError> {
    let file = File::open(path).map_err(|source| AnalysisError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loading submissions from {}", path.display());
    read_dataset(file)
}

/// Parses and validates every row, failing on the first bad one.
pub fn read_dataset<R: Read>(input: R) -> Result<Dataset, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|source| AnalysisError::Csv {
            row: csv_row(&source),
            source,
        })?
        .clone();

    for column in required_columns() {
        if !headers.iter().any(|header| header == column) {
            return Err(AnalysisError::Schema {
                column: column.to_string(),
                detail: "column is missing from the header".to_string(),
            });
        }
    }
    let has_type_column = headers.iter().any(|header| header == TYPE_COLUMN);
    debug!(
        "Header has {} columns (type column present: {})",
        headers.len(),
        has_type_column
    );

    let mut submissions: Vec<Submission> = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut record = csv::StringRecord::new();

    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|source| AnalysisError::Csv {
                row: csv_row(&source),
                source,
            })?;
        if !more {
            break;
        }

        let row = record.position().map(|pos| pos.line()).unwrap_or(0);
        if record.len() > headers.len() {
            return Err(AnalysisError::value(
                row,
                "*",
                &format!("{} fields", record.len()),
                format!("header declares only {} columns", headers.len()),
            ));
        }
        // Short rows: missing trailing cells deserialize as empty.
        while record.len() < headers.len() {
            record.push_field("");
        }

        let raw: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|source| AnalysisError::Csv { row, source })?;
        let submission = submission_from_row(row, raw)?;
        if !seen_ids.insert(submission.id.clone()) {
            return Err(AnalysisError::value(
                row,
                ID_COLUMN,
                &submission.id,
                "duplicate identifier",
            ));
        }
        submissions.push(submission);
    }

    info!("Loaded {} submissions", submissions.len());
    Ok(Dataset::new(submissions, has_type_column))
}

fn submission_from_row(row: u64, raw: CsvRow) -> Result<Submission, AnalysisError> {
    let id = non_empty(raw.id)
        .ok_or_else(|| AnalysisError::value(row, ID_COLUMN, "", "identifier is empty"))?;

    let created_raw = raw.created_date.unwrap_or_default();
    let created_at = parse_created_date(&created_raw).ok_or_else(|| {
        AnalysisError::value(row, CREATED_COLUMN, &created_raw, "unparseable date")
    })?;

    let status_raw = raw.status.unwrap_or_default();
    let status = Status::parse(&status_raw).ok_or_else(|| {
        AnalysisError::value(row, STATUS_COLUMN, &status_raw, "unknown status")
    })?;

    Ok(Submission {
        id: id.trim().to_string(),
        created_at,
        status,
        idea_type: non_empty(raw.idea_type),
        business_model: non_empty(raw.business_model),
        problem_description: non_empty(raw.problem_description),
        value_proposition: non_empty(raw.value_proposition),
    })
}

/// Missing, `null`, empty and whitespace-only values all count as empty.
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|value| {
        let trimmed = value.trim();
        !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("null")
    })
}

/// Accepts epoch milliseconds (as integer or integral float), RFC 3339,
/// `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`. All interpreted as UTC.
pub fn parse_created_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(millis) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }

    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            return DateTime::from_timestamp_millis(value as i64).map(|dt| dt.naive_utc());
        }
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn csv_row(err: &csv::Error) -> u64 {
    err.position().map(|pos| pos.line()).unwrap_or(0)
}
