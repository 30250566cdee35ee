//! Terminal rendering of dashboard snapshots.
//!
//! All number and date formatting for the CLI lives here.

use analytics::MetricsSnapshot;
use api_client::Freshness;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{SeriesPoint, TrendDirection, format_date};
use engine::DashboardSnapshot;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Shown wherever a value is absent.
pub const ABSENT: &str = "–";

const TREND_BAR_WIDTH: usize = 10;

pub fn fmt_rate(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{v:.4}"))
}

/// Formats a fraction (0.015) as a signed percentage ("+1.50%").
pub fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{:+.2}%", v * 100.0))
}

fn fmt_point(point: &SeriesPoint) -> String {
    if point.filled {
        format!("{:.4} (carried)", point.value)
    } else {
        format!("{:.4}", point.value)
    }
}

/// A fixed-width bar whose fill follows the trend magnitude (10 to 100).
pub fn trend_bar(direction: TrendDirection, magnitude: f64) -> String {
    let arrow = match direction {
        TrendDirection::Up => '▲',
        TrendDirection::Down => '▼',
        TrendDirection::Flat => '▶',
    };
    let filled = ((magnitude / 100.0) * TREND_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(TREND_BAR_WIDTH);
    format!(
        "{arrow} {}{}",
        "█".repeat(filled),
        "░".repeat(TREND_BAR_WIDTH - filled)
    )
}

/// A one-line notice for data served from the offline cache.
pub fn stale_notice(freshness: Freshness) -> Option<String> {
    match freshness {
        Freshness::Live => None,
        Freshness::Cached { stored_at } => Some(format!(
            "Provider unreachable. Showing cached data from {} UTC.",
            stored_at.format("%Y-%m-%d %H:%M")
        )),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn value_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn render_currencies(currencies: &BTreeMap<String, String>) -> String {
    let mut table = new_table();
    table.set_header(vec!["Code", "Currency"]);
    for (code, name) in currencies {
        table.add_row(vec![code.as_str(), name.as_str()]);
    }
    table.to_string()
}

fn render_metrics(metrics: &MetricsSnapshot) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);

    let basis = if metrics.observed_only {
        format!("{} observed days", metrics.observations)
    } else {
        format!("{} days", metrics.observations)
    };
    // Volatility is 0 with no returns; show it as absent instead.
    let volatility = metrics.volatility.filter(|_| metrics.return_count > 0);
    // Streaks and slope count steps between basis values; a step is one
    // calendar day only when carried days are in the basis.
    let slope_label = if metrics.observed_only {
        "Slope / observation"
    } else {
        "Slope / day"
    };

    let rows = [
        ("Basis", basis),
        ("Mean", fmt_rate(metrics.mean)),
        ("Median", fmt_rate(metrics.median)),
        ("MA7", fmt_rate(metrics.ma7)),
        ("MA30", fmt_rate(metrics.ma30)),
        ("MA90", fmt_rate(metrics.ma90)),
        ("Volatility", fmt_pct(volatility)),
        ("Max drawdown", fmt_pct(metrics.max_drawdown)),
        ("Best day", fmt_pct(metrics.best_return)),
        ("Worst day", fmt_pct(metrics.worst_return)),
        ("Longest rise", format!("{} steps", metrics.longest_up_streak)),
        ("Longest fall", format!("{} steps", metrics.longest_down_streak)),
        (slope_label, fmt_pct(metrics.slope_pct)),
        (
            "Z-score",
            metrics.z_score.map_or_else(|| ABSENT.to_string(), |z| format!("{z:+.2}")),
        ),
        ("Percentile", fmt_pct(metrics.percentile_rank).trim_start_matches('+').to_string()),
        ("Month to date", fmt_pct(metrics.mtd_return)),
        ("Year to date", fmt_pct(metrics.ytd_return)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value_cell(value)]);
    }
    table
}

/// Renders the full text view of one refresh.
pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} · {} ({} – {})",
        snapshot.pair,
        snapshot.range.label(),
        format_date(snapshot.window.start()),
        format_date(snapshot.window.end())
    );

    if let Some(notice) = stale_notice(snapshot.freshness) {
        let _ = writeln!(out, "{notice}");
    }

    let Some(latest) = snapshot.latest() else {
        let _ = writeln!(out, "No rate data for this period.");
        return out;
    };

    let _ = writeln!(out, "Current   {} on {}", fmt_point(latest), format_date(latest.date));
    if let Some(summary) = &snapshot.summary {
        let _ = writeln!(out, "Range     {:.4} – {:.4}", summary.min, summary.max);
        let _ = writeln!(
            out,
            "Change    {:+.4} ({})",
            summary.change,
            fmt_pct(Some(summary.change_pct))
        );
    }
    if let Some(trend) = &snapshot.trend {
        let _ = writeln!(out, "Trend     {}", trend_bar(trend.direction, trend.magnitude));
    }

    let _ = writeln!(out, "\n{}", render_metrics(&snapshot.metrics));

    if !snapshot.overlays.is_empty() {
        let mut table = new_table();
        table.set_header(vec!["Overlay", "Points", "Latest"]);
        for overlay in &snapshot.overlays {
            table.add_row(vec![
                Cell::new(format!("MA{}", overlay.window)),
                value_cell(overlay.points.len().to_string()),
                value_cell(fmt_rate(overlay.latest())),
            ]);
        }
        let _ = writeln!(out, "\n{table}");
    }

    if let Some(extremes) = &snapshot.extremes {
        let _ = writeln!(
            out,
            "\nHigh      {:.4} on {}",
            extremes.high.value,
            format_date(extremes.high.date)
        );
        let _ = writeln!(
            out,
            "Low       {:.4} on {}",
            extremes.low.value,
            format_date(extremes.low.date)
        );
    }

    out
}
