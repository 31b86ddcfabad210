use tracing::debug;

use crate::analyzers::{city_parameter_means, correlation_matrix, PivotTable};
use crate::error::{DashboardError, Result};
use crate::models::{Chart, ChartSpec, Heatmap, ReadingTable};
use crate::utils::constants::{HEATMAP_VALUE_FORMAT, SCALE_INFERNO};
use crate::views::ViewSettings;

/// Annotated heatmap of pollutant-to-pollutant correlation of city means
pub fn charts(table: &ReadingTable, _settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
    let pivot = PivotTable::from_means(&city_parameter_means(table));
    if pivot.is_empty() {
        return Err(DashboardError::Aggregation(
            "No city/pollutant means to correlate".to_string(),
        ));
    }

    let matrix = correlation_matrix(&pivot);
    debug!(
        cities = pivot.cities.len(),
        pollutants = matrix.labels.len(),
        "Computed correlation matrix"
    );

    Ok(vec![ChartSpec::new(
        "Pollutant Correlation Across Cities",
        Chart::Heatmap(Heatmap {
            labels: matrix.labels,
            values: matrix.values,
            color_scale: SCALE_INFERNO.to_string(),
            value_format: HEATMAP_VALUE_FORMAT.to_string(),
            colorbar_title: "Correlation".to_string(),
        }),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;

    #[test]
    fn test_heatmap_matrix() {
        let table = ReadingTable::new(vec![
            Reading::new("A", "1", "A", 1.0, 1.0, "pm25", Some(10.0), None),
            Reading::new("A", "1", "A", 1.0, 1.0, "no2", Some(5.0), None),
            Reading::new("B", "2", "B", 1.0, 1.0, "pm25", Some(30.0), None),
            Reading::new("B", "2", "B", 1.0, 1.0, "no2", Some(9.0), None),
        ]);

        let charts = charts(&table, &ViewSettings::default()).unwrap();
        let heatmap = charts[0].chart.as_heatmap().unwrap();

        assert_eq!(heatmap.labels, vec!["no2", "pm25"]);
        assert_eq!(heatmap.values[0][0], Some(1.0));
        assert_eq!(heatmap.values[0][1], heatmap.values[1][0]);
        assert!((heatmap.values[0][1].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table_fails() {
        let err = charts(&ReadingTable::default(), &ViewSettings::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Aggregation(_)));
    }
}
