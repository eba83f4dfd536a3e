//! Static SVG charts for the report.
//!
//! Each `render_*` function returns a complete SVG document; `write_charts`
//! writes the whole set into an output directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::models::{Insights, MonthlyGrid, Status};
use crate::report::month_name;

const PALETTE: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FECA57", "#FF9FF3", "#54A0FF", "#5F27CD",
];

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 520.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 80.0;

/// One bar: axis label, bar length, text printed at the bar end.
#[derive(Debug, Clone)]
struct Bar {
    label: String,
    value: f64,
    annotation: String,
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn document(width: f64, height: f64, title: &str, body: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">
<rect width="100%" height="100%" fill="white"/>
<text x="{cx:.1}" y="36" text-anchor="middle" font-size="20" font-weight="bold">{title}</text>
{body}</svg>
"##,
        cx = width / 2.0,
        title = escape(title),
    )
}

fn nice_max(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let scaled = value / magnitude;
    let step = if scaled <= 1.0 {
        1.0
    } else if scaled <= 2.0 {
        2.0
    } else if scaled <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

fn horizontal_bars(title: &str, x_label: &str, bars: &[Bar]) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - 120.0 - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let left = MARGIN_LEFT + 120.0;
    let max = nice_max(bars.iter().map(|bar| bar.value).fold(0.0, f64::max));
    let slot = plot_h / bars.len().max(1) as f64;

    let mut body = String::new();
    for (idx, bar) in bars.iter().enumerate() {
        let y = MARGIN_TOP + idx as f64 * slot + slot * 0.15;
        let h = slot * 0.7;
        let w = bar.value / max * plot_w;
        let _ = writeln!(
            body,
            r##"<rect x="{left:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{}" opacity="0.8"/>"##,
            PALETTE[idx % PALETTE.len()]
        );
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="13">{}</text>"##,
            left - 8.0,
            y + h / 2.0 + 4.0,
            escape(&bar.label)
        );
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" font-size="12" font-weight="bold">{}</text>"##,
            left + w + 6.0,
            y + h / 2.0 + 4.0,
            escape(&bar.annotation)
        );
    }
    let _ = writeln!(
        body,
        r##"<line x1="{left:.1}" y1="{MARGIN_TOP:.1}" x2="{left:.1}" y2="{:.1}" stroke="#333"/>"##,
        MARGIN_TOP + plot_h
    );
    let _ = writeln!(
        body,
        r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"##,
        left + plot_w / 2.0,
        HEIGHT - 30.0,
        escape(x_label)
    );
    document(WIDTH, HEIGHT, title, &body)
}

fn vertical_bars(title: &str, x_label: &str, y_label: &str, bars: &[Bar]) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let max = nice_max(bars.iter().map(|bar| bar.value).fold(0.0, f64::max));
    let slot = plot_w / bars.len().max(1) as f64;

    let mut body = String::new();
    for (idx, bar) in bars.iter().enumerate() {
        let x = MARGIN_LEFT + idx as f64 * slot + slot * 0.15;
        let w = slot * 0.7;
        let h = bar.value / max * plot_h;
        let _ = writeln!(
            body,
            r##"<rect x="{x:.1}" y="{:.1}" width="{w:.1}" height="{h:.1}" fill="{}" opacity="0.8"/>"##,
            baseline - h,
            PALETTE[idx % PALETTE.len()]
        );
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" font-weight="bold">{}</text>"##,
            x + w / 2.0,
            baseline - h - 6.0,
            escape(&bar.annotation)
        );
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"##,
            x + w / 2.0,
            baseline + 18.0,
            escape(&bar.label)
        );
    }
    let _ = writeln!(
        body,
        r##"<line x1="{MARGIN_LEFT:.1}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="#333"/>"##,
        MARGIN_LEFT + plot_w
    );
    let _ = writeln!(
        body,
        r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"##,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 30.0,
        escape(x_label)
    );
    let _ = writeln!(
        body,
        r##"<text x="24" y="{:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 24 {:.1})">{}</text>"##,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0,
        escape(y_label)
    );
    document(WIDTH, HEIGHT, title, &body)
}

pub fn render_status_bars(insights: &Insights) -> String {
    // Smallest first so the largest status sits at the bottom.
    let bars: Vec<Bar> = insights
        .status
        .rows
        .iter()
        .rev()
        .map(|row| Bar {
            label: row.key.to_string(),
            value: row.count as f64,
            annotation: format!("{} ({:.1}%)", row.count, row.percentage),
        })
        .collect();
    horizontal_bars("Startup Status Distribution", "Number of Startups", &bars)
}

/// Pie with a count/percentage legend, slices clockwise from twelve o'clock.
pub fn render_status_pie(insights: &Insights) -> String {
    let (cx, cy, radius) = (300.0, 290.0, 190.0);
    let rows = &insights.status.rows;
    let total: usize = rows.iter().map(|row| row.count).sum();

    let mut body = String::new();
    let mut start = 0.0f64;
    for (idx, row) in rows.iter().enumerate() {
        if total == 0 || row.count == 0 {
            continue;
        }
        let color = PALETTE[idx % PALETTE.len()];
        let sweep = row.count as f64 / total as f64 * std::f64::consts::TAU;
        if row.count == total {
            let _ = writeln!(
                body,
                r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}"/>"##
            );
        } else {
            let point = |angle: f64| (cx + radius * angle.sin(), cy - radius * angle.cos());
            let (x1, y1) = point(start);
            let (x2, y2) = point(start + sweep);
            let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
            let _ = writeln!(
                body,
                r##"<path d="M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {radius:.1} {radius:.1} 0 {large} 1 {x2:.1} {y2:.1} Z" fill="{color}" stroke="white" stroke-width="2"/>"##
            );
        }
        let mid = start + sweep / 2.0;
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" font-weight="bold" fill="white">{:.1}%</text>"##,
            cx + radius * 0.75 * mid.sin(),
            cy - radius * 0.75 * mid.cos() + 4.0,
            row.percentage
        );
        start += sweep;
    }

    let legend_x = cx + radius + 60.0;
    let _ = writeln!(
        body,
        r##"<text x="{legend_x:.1}" y="110" font-size="14" font-weight="bold">Startup Status</text>"##
    );
    for (idx, row) in rows.iter().enumerate() {
        let y = 130.0 + idx as f64 * 26.0;
        let _ = writeln!(
            body,
            r##"<rect x="{legend_x:.1}" y="{y:.1}" width="14" height="14" fill="{}"/>"##,
            PALETTE[idx % PALETTE.len()]
        );
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" font-size="13">{}: {} ({:.1}%)</text>"##,
            legend_x + 22.0,
            y + 12.0,
            row.key,
            row.count,
            row.percentage
        );
    }
    document(WIDTH, 540.0, "Startup Status Distribution", &body)
}

pub fn render_yearly(insights: &Insights) -> String {
    let bars: Vec<Bar> = insights
        .yearly
        .rows
        .iter()
        .map(|row| Bar {
            label: row.key.to_string(),
            value: row.count as f64,
            annotation: row.count.to_string(),
        })
        .collect();
    vertical_bars(
        "Startup Submissions by Year",
        "Year",
        "Number of Submissions",
        &bars,
    )
}

pub fn render_type_distribution(insights: &Insights) -> Option<String> {
    let types = insights.idea_types.as_ref()?;
    let bars: Vec<Bar> = types
        .rows
        .iter()
        .map(|row| Bar {
            label: row.key.clone(),
            value: row.count as f64,
            annotation: row.count.to_string(),
        })
        .collect();
    Some(vertical_bars("Idea Type Distribution", "Type", "Count", &bars))
}

pub fn render_readiness(insights: &Insights) -> String {
    let bars: Vec<Bar> = insights
        .readiness
        .rows
        .iter()
        .map(|row| Bar {
            label: row.key.to_string(),
            value: row.percentage,
            annotation: format!("{:.1}% ({})", row.percentage, row.count),
        })
        .collect();
    vertical_bars(
        "Business Readiness: Completion Rates",
        "Component",
        "Completion Rate (%)",
        &bars,
    )
}

pub fn render_summary(insights: &Insights) -> String {
    let figures = [
        ("Total Startups", insights.total),
        ("Approved", insights.approved()),
        ("Alumni", insights.status.count(&Status::Alumni)),
        ("Rejected", insights.status.count(&Status::Rejected)),
    ];
    let bars: Vec<Bar> = figures
        .iter()
        .map(|(label, value)| Bar {
            label: label.to_string(),
            value: *value as f64,
            annotation: value.to_string(),
        })
        .collect();
    vertical_bars(
        "Startup Ecosystem Summary Statistics",
        "",
        "Count",
        &bars,
    )
}

pub fn render_quarterly(insights: &Insights) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let rows = &insights.quarterly.rows;
    let max = nice_max(rows.iter().map(|row| row.count as f64).fold(0.0, f64::max));
    let step = if rows.len() > 1 {
        plot_w / (rows.len() - 1) as f64
    } else {
        0.0
    };

    let points: Vec<(f64, f64)> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let x = if rows.len() > 1 {
                MARGIN_LEFT + idx as f64 * step
            } else {
                MARGIN_LEFT + plot_w / 2.0
            };
            (x, baseline - row.count as f64 / max * plot_h)
        })
        .collect();

    let mut body = String::new();
    if !points.is_empty() {
        let path: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect();
        let _ = writeln!(
            body,
            r##"<polyline points="{}" fill="none" stroke="darkgreen" stroke-width="3"/>"##,
            path.join(" ")
        );
    }
    for ((x, y), row) in points.iter().zip(rows) {
        let _ = writeln!(
            body,
            r##"<circle cx="{x:.1}" cy="{y:.1}" r="5" fill="darkgreen"><title>{}: {}</title></circle>"##,
            row.key, row.count
        );
        let _ = writeln!(
            body,
            r##"<text x="{x:.1}" y="{:.1}" font-size="11" text-anchor="end" transform="rotate(-45 {x:.1} {:.1})">{}</text>"##,
            baseline + 16.0,
            baseline + 16.0,
            row.key
        );
    }
    let _ = writeln!(
        body,
        r##"<line x1="{MARGIN_LEFT:.1}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="#333"/>"##,
        MARGIN_LEFT + plot_w
    );
    document(WIDTH, HEIGHT, "Quarterly Submission Trends", &body)
}

/// YlOrRd-style ramp from pale yellow to deep red.
fn heat_color(value: usize, max: usize) -> String {
    if max == 0 || value == 0 {
        return "#ffffcc".to_string();
    }
    let t = value as f64 / max as f64;
    let lerp = |from: f64, to: f64| (from + (to - from) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(255.0, 189.0),
        lerp(237.0, 0.0),
        lerp(160.0, 38.0)
    )
}

pub fn render_monthly_heatmap(grid: &MonthlyGrid) -> String {
    let cell_w = 56.0;
    let cell_h = 40.0;
    let left = 80.0;
    let top = MARGIN_TOP;
    let width = left + cell_w * 12.0 + 70.0;
    let height = top + cell_h * grid.years.len().max(1) as f64 + 70.0;
    let max = grid.max_cell();

    let mut body = String::new();
    for month in 1..=12u32 {
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"##,
            left + (month - 1) as f64 * cell_w + cell_w / 2.0,
            top - 8.0,
            &month_name(month)[..3]
        );
    }
    for (row_idx, year) in grid.years.iter().copied().enumerate() {
        let y = top + row_idx as f64 * cell_h;
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="13">{}</text>"##,
            left - 8.0,
            y + cell_h / 2.0 + 4.0,
            year
        );
        for month in 1..=12u32 {
            let count = grid.get(year, month);
            let x = left + (month - 1) as f64 * cell_w;
            let _ = writeln!(
                body,
                r##"<rect x="{x:.1}" y="{y:.1}" width="{cell_w:.1}" height="{cell_h:.1}" fill="{}" stroke="white"/>"##,
                heat_color(count, max)
            );
            let _ = writeln!(
                body,
                r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"##,
                x + cell_w / 2.0,
                y + cell_h / 2.0 + 4.0,
                count
            );
        }
        let _ = writeln!(
            body,
            r##"<text x="{:.1}" y="{:.1}" font-size="12" font-weight="bold">{}</text>"##,
            left + cell_w * 12.0 + 8.0,
            y + cell_h / 2.0 + 4.0,
            grid.year_total(year)
        );
    }
    document(
        width,
        height,
        "Startup Submissions Heatmap (Year vs Month)",
        &body,
    )
}

/// Writes every chart into `dir`, creating it if needed.
pub fn write_charts(insights: &Insights, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create chart directory {}", dir.display()))?;

    let mut charts = vec![
        ("status_distribution.svg", render_status_pie(insights)),
        ("status_distribution_bars.svg", render_status_bars(insights)),
        ("yearly_submissions.svg", render_yearly(insights)),
        (
            "monthly_heatmap.svg",
            render_monthly_heatmap(&insights.monthly),
        ),
        ("quarterly_trends.svg", render_quarterly(insights)),
        ("business_readiness.svg", render_readiness(insights)),
        ("summary_statistics.svg", render_summary(insights)),
    ];
    if let Some(svg) = render_type_distribution(insights) {
        charts.push(("type_distribution.svg", svg));
    }

    let mut written = Vec::with_capacity(charts.len());
    for (name, svg) in charts {
        let path = dir.join(name);
        std::fs::write(&path, svg)
            .with_context(|| format!("failed to write chart {}", path.display()))?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    info!("Rendered {} charts into {}", written.len(), dir.display());
    Ok(written)
}
