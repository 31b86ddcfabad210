use tracing::debug;

use crate::analyzers::city_parameter_means;
use crate::error::Result;
use crate::models::{parameter_label, Bar, BarChart, Chart, ChartSpec, ReadingTable};
use crate::utils::constants::SCALE_VIRIDIS;
use crate::views::{title_with_years, ViewSettings};

/// One ranked bar chart of city means per pollutant. Pollutants follow their
/// first appearance in the city-then-parameter ordered means, so the first
/// city's pollutants come first.
pub fn charts(table: &ReadingTable, _settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
    let means = city_parameter_means(table);

    let mut parameters: Vec<&str> = Vec::new();
    for mean in &means {
        if !parameters.contains(&mean.parameter.as_str()) {
            parameters.push(mean.parameter.as_str());
        }
    }
    debug!(groups = means.len(), pollutants = parameters.len(), "Aggregated city means");

    Ok(parameters
        .into_iter()
        .map(|parameter| {
            let mut bars: Vec<Bar> = means
                .iter()
                .filter(|m| m.parameter == parameter)
                .map(|m| Bar {
                    label: m.city.clone(),
                    value: m.mean,
                })
                .collect();
            bars.sort_by(|a, b| b.value.total_cmp(&a.value));

            let title = title_with_years(
                format!("Average {} Levels by City", parameter_label(parameter)),
                table,
            );
            ChartSpec::new(
                title,
                Chart::Bar(BarChart {
                    x_label: "city".to_string(),
                    y_label: "value".to_string(),
                    color_scale: SCALE_VIRIDIS.to_string(),
                    bars,
                }),
            )
        })
        .collect())
}
