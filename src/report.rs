use std::fmt::{Display, Write};

use crate::models::{Insights, ReadinessField, StatusGroup, SummaryTable};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

fn write_table<K: Display>(output: &mut String, table: &SummaryTable<K>, unit: &str) {
    if table.rows.is_empty() {
        let _ = writeln!(output, "No submissions recorded.");
        return;
    }
    for row in &table.rows {
        let _ = writeln!(
            output,
            "- {}: {} {} ({:.1}%)",
            row.key, row.count, unit, row.percentage
        );
    }
}

/// Plain-text tables for the `summary` command.
pub fn build_summary(insights: &Insights) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Total submissions: {}", insights.total);
    if let (Some(first), Some(last)) = (insights.first_submission, insights.last_submission) {
        let _ = writeln!(output, "Date range: {first} to {last}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Status distribution:");
    write_table(&mut output, &insights.status, "submissions");

    if let Some(types) = &insights.idea_types {
        let _ = writeln!(output);
        let _ = writeln!(output, "Idea types:");
        write_table(&mut output, types, "submissions");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Submissions by year:");
    for row in &insights.yearly.rows {
        let _ = writeln!(output, "- {}: {} startups", row.key, row.count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Submissions by quarter:");
    for row in &insights.quarterly.rows {
        let _ = writeln!(output, "- {}: {}", row.key, row.count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Field completion:");
    for row in &insights.readiness.rows {
        let _ = writeln!(
            output,
            "- {}: {} out of {} ({:.1}%)",
            row.key, row.count, insights.total, row.percentage
        );
    }

    output
}

pub fn build_report(source: &str, insights: &Insights) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Startup Submission Insights");
    let _ = writeln!(
        output,
        "Generated from {} ({} submissions)",
        source, insights.total
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Overall Statistics");
    let _ = writeln!(output, "- **Total Startups Analyzed**: {}", insights.total);
    if let (Some(first), Some(last)) = (insights.first_submission, insights.last_submission) {
        let _ = writeln!(output, "- **Submission Window**: {first} to {last}");
    }
    let _ = writeln!(
        output,
        "- **Approval Rate**: {:.1}% ({} out of {})",
        insights.approval_rate(),
        insights.approved(),
        insights.total
    );
    if let Some(peak) = insights.peak_year() {
        let _ = writeln!(
            output,
            "- **Peak Submission Year**: {} with {} startups",
            peak.key, peak.count
        );
    }
    if let Some((first, last, rate)) = insights.growth_rate() {
        let _ = writeln!(
            output,
            "- **Growth Rate**: {:.1}% from {} to {}",
            rate, first, last
        );
    }
    let _ = writeln!(
        output,
        "- **Years Active**: {} (average {} submissions per year)",
        insights.years_active(),
        insights.average_per_year()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Distribution");
    write_table(&mut output, &insights.status_groups, "startups");

    let advanced: Vec<String> = insights
        .status
        .rows
        .iter()
        .filter(|row| row.key.group() == StatusGroup::Advanced)
        .map(|row| format!("{} {}", row.key, row.count))
        .collect();
    if !advanced.is_empty() {
        let _ = writeln!(output, "  - Advanced stages: {}", advanced.join(", "));
    }

    if let Some(types) = &insights.idea_types {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Idea Types");
        write_table(&mut output, types, "ideas");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Submission Timeline");
    if insights.yearly.is_empty() {
        let _ = writeln!(output, "No submissions recorded.");
    } else {
        for row in &insights.yearly.rows {
            let _ = writeln!(output, "- {}: {} startups", row.key, row.count);
        }
    }
    if let Some(peak) = insights.peak_month() {
        let _ = writeln!(
            output,
            "- Busiest calendar month: {} ({} submissions across all years)",
            month_name(peak.key),
            peak.count
        );
    }
    if let Some(peak) = insights.peak_quarter() {
        let _ = writeln!(
            output,
            "- Busiest quarter: {} ({} submissions)",
            peak.key, peak.count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Business Readiness Analysis");
    for row in &insights.readiness.rows {
        let phrase = match row.key {
            ReadinessField::BusinessModel => "of startups have defined business models",
            ReadinessField::ProblemDescription => "of startups have clearly identified problems",
            ReadinessField::ValueProposition => "of startups have defined value propositions",
        };
        let _ = writeln!(
            output,
            "- **{}**: {:.1}% {} ({} out of {})",
            row.key, row.percentage, phrase, row.count, insights.total
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Recommendations");
    if insights.approval_rate() < 50.0 {
        let _ = writeln!(
            output,
            "- **Focus on Quality**: Low approval rate suggests need for better startup preparation and mentoring"
        );
    } else {
        let _ = writeln!(
            output,
            "- **Strong Pipeline**: High approval rate indicates effective filtering and preparation processes"
        );
    }
    let _ = writeln!(
        output,
        "- **Encourage Complete Submissions**: Business models, problem definitions and value propositions are often left blank"
    );
    let _ = writeln!(
        output,
        "- **Seasonal Planning**: Align intake resources with the busiest months and quarters"
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::dataset::Dataset;
    use crate::fixtures::{self, at, submission};
    use crate::models::Status;

    #[test]
    fn report_carries_reference_headlines() {
        let insights = aggregate(&fixtures::reference_dataset());
        let report = build_report("ideas.csv", &insights);

        assert!(report.starts_with("# Startup Submission Insights"));
        assert!(report.contains("- **Total Startups Analyzed**: 590"));
        assert!(report.contains("- **Approval Rate**: 3.6% (21 out of 590)"));
        assert!(report.contains("- **Peak Submission Year**: 2024 with 160 startups"));
        assert!(report.contains("- Rejected: 334 startups (56.6%)"));
        assert!(report.contains("- Advanced (Blue/Red/Gold Box): 20 startups (3.5%)"));
        assert!(report.contains("Advanced stages: BLUEBOX 11, REDBOX 8, GOLDBOX 1"));
        assert!(report.contains(
            "- **Business Model**: 39.2% of startups have defined business models (231 out of 590)"
        ));
        assert!(report.contains("Busiest calendar month: January (50"));
        assert!(report.contains("**Focus on Quality**"));
    }

    #[test]
    fn high_approval_rate_switches_recommendation() {
        let dataset = Dataset::new(
            vec![
                submission("1", Status::Approved, at(2023, 5, 1)),
                submission("2", Status::Approved, at(2023, 6, 1)),
                submission("3", Status::Rejected, at(2023, 7, 1)),
            ],
            false,
        );
        let report = build_report("small.csv", &aggregate(&dataset));
        assert!(report.contains("**Strong Pipeline**"));
        assert!(!report.contains("## Idea Types"));
        assert!(!report.contains("Growth Rate"));
    }

    #[test]
    fn empty_dataset_still_renders() {
        let report = build_report("empty.csv", &aggregate(&Dataset::default()));
        assert!(report.contains("- **Total Startups Analyzed**: 0"));
        assert!(report.contains("No submissions recorded."));
        assert!(!report.contains("Peak Submission Year"));
    }

    #[test]
    fn summary_lists_every_status() {
        let insights = aggregate(&fixtures::reference_dataset());
        let summary = build_summary(&insights);
        for status in Status::ALL {
            assert!(summary.contains(status.code()), "missing {status}");
        }
        assert!(summary.contains("- 2025: 20 startups"));
        assert!(summary.contains("Business Model: 231 out of 590 (39.2%)"));
    }

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
    }
}
