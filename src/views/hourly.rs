use tracing::debug;

use crate::analyzers::hourly_means;
use crate::error::Result;
use crate::models::{
    parameter_color, AreaChart, AxisValue, Chart, ChartSpec, ReadingTable, Series, SeriesPoint,
};
use crate::views::ViewSettings;

/// Mean level per hour of day, one series per pollutant in its fixed color
pub fn charts(table: &ReadingTable, settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
    let means = hourly_means(table);
    debug!(groups = means.len(), "Aggregated hourly means");

    // Means arrive sorted by (parameter, hour)
    let mut series: Vec<Series> = Vec::new();
    for mean in &means {
        let point = SeriesPoint {
            x: AxisValue::Number(mean.hour),
            y: mean.mean,
        };

        match series.last_mut() {
            Some(current) if current.name == mean.parameter => current.points.push(point),
            _ => series.push(Series {
                name: mean.parameter.clone(),
                color: parameter_color(&mean.parameter).to_string(),
                points: vec![point],
            }),
        }
    }

    Ok(vec![ChartSpec::new(
        format!("Average Hourly Pollutant Levels Across {}", settings.region),
        Chart::Area(AreaChart {
            x_label: "hour".to_string(),
            y_label: "value".to_string(),
            stacked: true,
            x_categories: Vec::new(),
            series,
        }),
    )])
}
