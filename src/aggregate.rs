use std::collections::BTreeMap;

use tracing::debug;

use crate::dataset::Dataset;
use crate::models::{
    percentage, round1, Insights, MonthlyGrid, ReadinessField, Status, StatusGroup, Submission,
    SummaryRow, SummaryTable, YearQuarter,
};

pub const UNSPECIFIED_TYPE: &str = "(unspecified)";

pub fn aggregate(dataset: &Dataset) -> Insights {
    let total = dataset.len();
    let status = status_distribution(dataset);
    let status_groups = status_group_distribution(&status);

    let insights = Insights {
        total,
        first_submission: dataset.iter().map(Submission::date).min(),
        last_submission: dataset.iter().map(Submission::date).max(),
        status,
        status_groups,
        idea_types: dataset
            .has_type_column()
            .then(|| type_distribution(dataset)),
        yearly: yearly_counts(dataset),
        monthly: monthly_grid(dataset),
        month_of_year: month_of_year_counts(dataset),
        quarterly: quarterly_counts(dataset),
        quarter_of_year: quarter_of_year_counts(dataset),
        readiness: field_completion(dataset),
    };

    debug_assert_eq!(insights.status.count_sum(), total);
    debug!(
        "Aggregated {} submissions into {} statuses across {} years",
        total,
        insights.status.rows.len(),
        insights.yearly.rows.len()
    );
    insights
}

fn count_by<K: Ord>(dataset: &Dataset, key: impl Fn(&Submission) -> K) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for submission in dataset.iter() {
        *counts.entry(key(submission)).or_insert(0) += 1;
    }
    counts
}

/// Sorts by count descending; the sort is stable so ties keep key order.
fn by_count_desc<K>(counts: BTreeMap<K, usize>) -> Vec<(K, usize)> {
    let mut ordered: Vec<(K, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered
}

pub fn status_distribution(dataset: &Dataset) -> SummaryTable<Status> {
    let counts = count_by(dataset, |submission| submission.status);
    SummaryTable::from_counts(dataset.len(), by_count_desc(counts))
}

/// Folds the box stages into `Advanced`. A group's percentage is the sum of
/// its members' rounded percentages.
pub fn status_group_distribution(status: &SummaryTable<Status>) -> SummaryTable<StatusGroup> {
    let mut groups: BTreeMap<StatusGroup, (usize, f64)> = BTreeMap::new();
    for row in &status.rows {
        let entry = groups.entry(row.key.group()).or_insert((0, 0.0));
        entry.0 += row.count;
        entry.1 += row.percentage;
    }

    let mut rows: Vec<SummaryRow<StatusGroup>> = groups
        .into_iter()
        .map(|(key, (count, pct))| SummaryRow {
            key,
            count,
            percentage: round1(pct),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));

    SummaryTable {
        total: status.total,
        rows,
    }
}

pub fn type_distribution(dataset: &Dataset) -> SummaryTable<String> {
    let counts = count_by(dataset, |submission| {
        submission
            .idea_type
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_TYPE.to_string())
    });
    SummaryTable::from_counts(dataset.len(), by_count_desc(counts))
}

pub fn yearly_counts(dataset: &Dataset) -> SummaryTable<i32> {
    SummaryTable::from_counts(dataset.len(), count_by(dataset, Submission::year))
}

pub fn month_of_year_counts(dataset: &Dataset) -> SummaryTable<u32> {
    SummaryTable::from_counts(dataset.len(), count_by(dataset, Submission::month))
}

pub fn quarterly_counts(dataset: &Dataset) -> SummaryTable<YearQuarter> {
    SummaryTable::from_counts(dataset.len(), count_by(dataset, Submission::year_quarter))
}

pub fn quarter_of_year_counts(dataset: &Dataset) -> SummaryTable<u32> {
    SummaryTable::from_counts(dataset.len(), count_by(dataset, Submission::quarter))
}

/// Raw year x month counts, every observed year zero-filled to 12 months.
pub fn monthly_grid(dataset: &Dataset) -> MonthlyGrid {
    let mut rows: BTreeMap<i32, [usize; 12]> = BTreeMap::new();
    for submission in dataset.iter() {
        let row = rows.entry(submission.year()).or_insert([0; 12]);
        row[(submission.month() - 1) as usize] += 1;
    }

    let (years, counts) = rows.into_iter().unzip();
    MonthlyGrid { years, counts }
}

pub fn field_completion(dataset: &Dataset) -> SummaryTable<ReadinessField> {
    let counts = ReadinessField::ALL.into_iter().map(|field| {
        let present = dataset
            .iter()
            .filter(|submission| submission.readiness(field).is_some())
            .count();
        (field, present)
    });
    SummaryTable::from_counts(dataset.len(), counts)
}

impl Insights {
    pub fn peak_year(&self) -> Option<&SummaryRow<i32>> {
        self.yearly.peak()
    }

    pub fn peak_month(&self) -> Option<&SummaryRow<u32>> {
        self.month_of_year.peak()
    }

    pub fn peak_quarter(&self) -> Option<&SummaryRow<YearQuarter>> {
        self.quarterly.peak()
    }

    pub fn approved(&self) -> usize {
        self.status.count(&Status::Approved)
    }

    pub fn approval_rate(&self) -> f64 {
        percentage(self.approved(), self.total)
    }

    /// Change from the first to the last observed year, in percent.
    pub fn growth_rate(&self) -> Option<(i32, i32, f64)> {
        let first = self.yearly.rows.first()?;
        let last = self.yearly.rows.last()?;
        if first.key == last.key || first.count == 0 {
            return None;
        }
        let change = (last.count as f64 - first.count as f64) / first.count as f64 * 100.0;
        Some((first.key, last.key, round1(change)))
    }

    pub fn years_active(&self) -> usize {
        self.yearly.rows.len()
    }

    pub fn average_per_year(&self) -> usize {
        match self.years_active() {
            0 => 0,
            years => self.total / years,
        }
    }
}
