use tracing::debug;

use crate::analyzers::{record_counts, unique_sensor_counts, CityCount};
use crate::error::Result;
use crate::models::{Bar, BarChart, Chart, ChartSpec, ReadingTable};
use crate::utils::constants::SCALE_VIRIDIS;
use crate::views::ViewSettings;

/// Records per city and distinct sensors per city, both ranked
pub fn charts(table: &ReadingTable, _settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
    let records = record_counts(table);
    let sensors = unique_sensor_counts(table);
    debug!(cities = records.len(), "Aggregated records and sensors");

    Ok(vec![
        ranked_bar("Total Records per City", "record_count", &records),
        ranked_bar("Unique Sensors per City", "unique_sensors", &sensors),
    ])
}

fn ranked_bar(title: &str, y_label: &str, counts: &[CityCount]) -> ChartSpec {
    ChartSpec::new(
        title,
        Chart::Bar(BarChart {
            x_label: "city".to_string(),
            y_label: y_label.to_string(),
            color_scale: SCALE_VIRIDIS.to_string(),
            bars: counts
                .iter()
                .map(|c| Bar {
                    label: c.city.clone(),
                    value: c.count as f64,
                })
                .collect(),
        }),
    )
}
