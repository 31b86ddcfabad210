use tracing::debug;

use crate::analyzers::{monthly_means, MonthlyMean};
use crate::error::Result;
use crate::models::{
    parameter_label, AreaChart, AxisValue, Chart, ChartSpec, ReadingTable, Series, SeriesPoint,
};
use crate::utils::constants::PALETTE_SET2;
use crate::views::ViewSettings;

/// One stacked area chart per pollutant: a series per city, January to December
pub fn charts(table: &ReadingTable, _settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
    let means = monthly_means(table);
    debug!(groups = means.len(), "Aggregated monthly means");

    let mut parameters: Vec<&str> = Vec::new();
    for mean in &means {
        if !parameters.contains(&mean.parameter.as_str()) {
            parameters.push(mean.parameter.as_str());
        }
    }

    Ok(parameters
        .into_iter()
        .map(|parameter| {
            let mut rows: Vec<&MonthlyMean> =
                means.iter().filter(|m| m.parameter == parameter).collect();
            rows.sort_by_key(|m| m.month.number_from_month());

            let mut months: Vec<String> = Vec::new();
            for row in &rows {
                let name = row.month.name();
                if months.last().map(String::as_str) != Some(name) {
                    months.push(name.to_string());
                }
            }

            ChartSpec::new(
                format!(
                    "Monthly Average {} Levels Across Cities",
                    parameter_label(parameter)
                ),
                Chart::Area(AreaChart {
                    x_label: "month".to_string(),
                    y_label: "value".to_string(),
                    stacked: true,
                    x_categories: months,
                    series: city_series(&rows),
                }),
            )
        })
        .collect())
}

// Cities take palette colors in the order they first appear along the month axis
fn city_series(rows: &[&MonthlyMean]) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();

    for row in rows {
        let point = SeriesPoint {
            x: AxisValue::Category(row.month.name().to_string()),
            y: row.mean,
        };

        match series.iter_mut().find(|s| s.name == row.city) {
            Some(existing) => existing.points.push(point),
            None => {
                let color = PALETTE_SET2[series.len() % PALETTE_SET2.len()];
                series.push(Series {
                    name: row.city.clone(),
                    color: color.to_string(),
                    points: vec![point],
                });
            }
        }
    }

    series
}
