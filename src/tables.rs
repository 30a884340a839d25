use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    cycle::CycleReport,
    fetcher::FetchFailure,
    series::Series,
    statistic::{StatisticData, StatisticMetadata},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn value_cell(value: Option<f64>) -> Cell {
    value
        .map_or_else(|| Cell::new("-").add_attribute(Attribute::Dim), |value| {
            Cell::new(format!("{value:.3}"))
        })
        .set_alignment(CellAlignment::Right)
}

pub fn build_reports_table<'a>(
    reports: impl IntoIterator<Item = (&'a Series, &'a CycleReport)>,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Series", "From", "Until", "Chunks", "Failed", "Readings", "Points"]);
    for (series, report) in reports {
        table.add_row(vec![
            Cell::new(series.statistic_id()),
            Cell::new(report.window.start.format("%Y-%m-%d %H:%M")),
            Cell::new(report.window.end.format("%Y-%m-%d %H:%M")).add_attribute(Attribute::Dim),
            Cell::new(report.n_chunks).set_alignment(CellAlignment::Right),
            Cell::new(report.failed_chunks.len())
                .set_alignment(CellAlignment::Right)
                .fg(if report.is_complete() { Color::Green } else { Color::Red }),
            Cell::new(report.n_readings).set_alignment(CellAlignment::Right),
            Cell::new(report.n_points).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Chunks which could not be fetched, one row per chunk.
pub fn build_failures_table<'a>(
    reports: impl IntoIterator<Item = (&'a Series, &'a CycleReport)>,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Series", "From", "Until", "Failure", "Error"]);
    for (series, report) in reports {
        for failed_chunk in &report.failed_chunks {
            let (kind, error) = match &failed_chunk.failure {
                FetchFailure::Transport(error) => ("transport", error),
                FetchFailure::Malformed(error) => ("malformed", error),
            };
            table.add_row(vec![
                Cell::new(series.statistic_id()),
                Cell::new(failed_chunk.chunk.start.format("%Y-%m-%d %H:%M")),
                Cell::new(failed_chunk.chunk.end.format("%Y-%m-%d %H:%M"))
                    .add_attribute(Attribute::Dim),
                Cell::new(kind).fg(Color::Red),
                Cell::new(format!("{error:#}")).add_attribute(Attribute::Dim),
            ]);
        }
    }
    table
}

pub fn build_metadata_table(metadata: &[StatisticMetadata]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Statistic ID", "Name", "Unit", "Unit class", "Mean", "Sum"]);
    for metadata in metadata {
        table.add_row(vec![
            Cell::new(&metadata.statistic_id),
            Cell::new(&metadata.name),
            Cell::new(&metadata.unit_of_measurement),
            Cell::new(metadata.unit_class.as_deref().unwrap_or("-")).add_attribute(Attribute::Dim),
            Cell::new(format!("{:?}", metadata.mean_type)),
            Cell::new(if metadata.has_sum { "yes" } else { "no" }),
        ]);
    }
    table
}

/// Rows are expected in chronological order.
pub fn build_statistics_table(rows: &[StatisticData]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Start", "Mean", "Min", "Max", "State", "Sum"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(row.start.format("%H:%M")),
            value_cell(row.mean),
            value_cell(row.min).add_attribute(Attribute::Dim),
            value_cell(row.max).add_attribute(Attribute::Dim),
            value_cell(row.state),
            value_cell(row.sum).fg(Color::Cyan),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        core::{channel::Channel, cycle::FailedChunk, interval::Interval, series::SeriesKind},
        prelude::*,
    };

    #[test]
    fn test_failures_table_lists_failed_chunks() -> Result {
        let series = Series::try_new(SeriesKind::Power, Channel::new("LU01", "1-1:1.29.0"))?;
        let report = CycleReport {
            window: Interval::new(
                Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap(),
            ),
            n_chunks: 2,
            n_readings: 96,
            n_points: 24,
            failed_chunks: vec![FailedChunk {
                chunk: Interval::new(
                    Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap(),
                ),
                failure: FetchFailure::Malformed(anyhow!("missing field `items`")),
            }],
        };
        let table = build_failures_table([(&series, &report)]).to_string();
        assert!(table.contains("2025-03-02 00:00"), "{table}");
        assert!(table.contains("malformed"), "{table}");
        assert!(table.contains("missing field `items`"), "{table}");
        Ok(())
    }
}
