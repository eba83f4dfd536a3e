use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Rejected,
    Alumni,
    Pending,
    Approved,
    BlueBox,
    RedBox,
    GoldBox,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Rejected,
        Status::Alumni,
        Status::Pending,
        Status::Approved,
        Status::BlueBox,
        Status::RedBox,
        Status::GoldBox,
    ];

    /// Code as it appears in the `status` column.
    pub fn code(self) -> &'static str {
        match self {
            Status::Rejected => "REJECTED",
            Status::Alumni => "ALUMNI",
            Status::Pending => "PENDING",
            Status::Approved => "APPROVED",
            Status::BlueBox => "BLUEBOX",
            Status::RedBox => "REDBOX",
            Status::GoldBox => "GOLDBOX",
        }
    }

    pub fn parse(raw: &str) -> Option<Status> {
        let trimmed = raw.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(trimmed))
    }

    pub fn group(self) -> StatusGroup {
        match self {
            Status::Rejected => StatusGroup::Rejected,
            Status::Alumni => StatusGroup::Alumni,
            Status::Pending => StatusGroup::Pending,
            Status::Approved => StatusGroup::Approved,
            Status::BlueBox | Status::RedBox | Status::GoldBox => StatusGroup::Advanced,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Statuses with the three box stages folded into `Advanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StatusGroup {
    Rejected,
    Alumni,
    Pending,
    Approved,
    Advanced,
}

impl fmt::Display for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusGroup::Rejected => "Rejected",
            StatusGroup::Alumni => "Alumni",
            StatusGroup::Pending => "Pending",
            StatusGroup::Approved => "Approved",
            StatusGroup::Advanced => "Advanced (Blue/Red/Gold Box)",
        };
        f.write_str(label)
    }
}

/// Optional free-text fields tracked for business readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ReadinessField {
    #[serde(rename = "Business Model")]
    BusinessModel,
    #[serde(rename = "Problem Description")]
    ProblemDescription,
    #[serde(rename = "Value Proposition")]
    ValueProposition,
}

impl ReadinessField {
    pub const ALL: [ReadinessField; 3] = [
        ReadinessField::BusinessModel,
        ReadinessField::ProblemDescription,
        ReadinessField::ValueProposition,
    ];

    pub fn column(self) -> &'static str {
        match self {
            ReadinessField::BusinessModel => "meta.businessmodeldescription",
            ReadinessField::ProblemDescription => "meta.problemdescription",
            ReadinessField::ValueProposition => "meta.valuepropdescription",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessField::BusinessModel => "Business Model",
            ReadinessField::ProblemDescription => "Problem Description",
            ReadinessField::ValueProposition => "Value Proposition",
        }
    }
}

impl fmt::Display for ReadinessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearQuarter {
    pub year: i32,
    pub quarter: u32,
}

impl fmt::Display for YearQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

/// One row of the input. Empty optional text is stored as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: String,
    pub created_at: NaiveDateTime,
    pub status: Status,
    pub idea_type: Option<String>,
    pub business_model: Option<String>,
    pub problem_description: Option<String>,
    pub value_proposition: Option<String>,
}

impl Submission {
    pub fn date(&self) -> NaiveDate {
        self.created_at.date()
    }

    pub fn year(&self) -> i32 {
        self.created_at.year()
    }

    pub fn month(&self) -> u32 {
        self.created_at.month()
    }

    /// ceil(month / 3)
    pub fn quarter(&self) -> u32 {
        (self.month() + 2) / 3
    }

    pub fn year_quarter(&self) -> YearQuarter {
        YearQuarter {
            year: self.year(),
            quarter: self.quarter(),
        }
    }

    pub fn readiness(&self, field: ReadinessField) -> Option<&str> {
        match field {
            ReadinessField::BusinessModel => self.business_model.as_deref(),
            ReadinessField::ProblemDescription => self.problem_description.as_deref(),
            ReadinessField::ValueProposition => self.value_proposition.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow<K> {
    pub key: K,
    pub count: usize,
    pub percentage: f64,
}

/// Counts and percentages of the dataset total, keyed by a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable<K> {
    pub total: usize,
    pub rows: Vec<SummaryRow<K>>,
}

impl<K: Ord> SummaryTable<K> {
    /// Builds a table keeping the order of `counts`.
    pub fn from_counts(total: usize, counts: impl IntoIterator<Item = (K, usize)>) -> Self {
        let rows = counts
            .into_iter()
            .map(|(key, count)| SummaryRow {
                key,
                count,
                percentage: percentage(count, total),
            })
            .collect();
        SummaryTable { total, rows }
    }

    pub fn get(&self, key: &K) -> Option<&SummaryRow<K>> {
        self.rows.iter().find(|row| &row.key == key)
    }

    pub fn count(&self, key: &K) -> usize {
        self.get(key).map(|row| row.count).unwrap_or(0)
    }

    pub fn count_sum(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    pub fn percentage_sum(&self) -> f64 {
        self.rows.iter().map(|row| row.percentage).sum()
    }

    /// Row with the highest count; ties go to the smallest key.
    pub fn peak(&self) -> Option<&SummaryRow<K>> {
        self.rows.iter().fold(None, |best: Option<&SummaryRow<K>>, row| match best {
            Some(current)
                if current.count > row.count
                    || (current.count == row.count && current.key <= row.key) =>
            {
                Some(current)
            }
            _ => Some(row),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Submission counts per (year, month), zero-filled for heatmaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyGrid {
    pub years: Vec<i32>,
    pub counts: Vec<[usize; 12]>,
}

impl MonthlyGrid {
    pub fn get(&self, year: i32, month: u32) -> usize {
        if !(1..=12).contains(&month) {
            return 0;
        }
        self.years
            .iter()
            .position(|y| *y == year)
            .map(|idx| self.counts[idx][(month - 1) as usize])
            .unwrap_or(0)
    }

    pub fn year_total(&self, year: i32) -> usize {
        self.years
            .iter()
            .position(|y| *y == year)
            .map(|idx| self.counts[idx].iter().sum())
            .unwrap_or(0)
    }

    pub fn max_cell(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Every table the report and charts need, derived from one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total: usize,
    pub first_submission: Option<NaiveDate>,
    pub last_submission: Option<NaiveDate>,
    pub status: SummaryTable<Status>,
    pub status_groups: SummaryTable<StatusGroup>,
    pub idea_types: Option<SummaryTable<String>>,
    pub yearly: SummaryTable<i32>,
    pub monthly: MonthlyGrid,
    pub month_of_year: SummaryTable<u32>,
    pub quarterly: SummaryTable<YearQuarter>,
    pub quarter_of_year: SummaryTable<u32>,
    pub readiness: SummaryTable<ReadinessField>,
}

pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
