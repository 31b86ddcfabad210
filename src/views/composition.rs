use tracing::debug;

use crate::analyzers::{city_parameter_means, CityParameterMean};
use crate::error::Result;
use crate::models::{Chart, ChartSpec, DonutChart, ReadingTable, Slice};
use crate::utils::constants::{DONUT_HOLE, PALETTE_INFERNO};
use crate::views::ViewSettings;

/// One donut per city; slices are the raw pollutant means, not normalized shares
pub fn charts(table: &ReadingTable, settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
    let means = city_parameter_means(table);

    // Means are sorted by city, so each city is one contiguous run
    let mut cities: Vec<(&str, Vec<&CityParameterMean>)> = Vec::new();
    for mean in &means {
        match cities.last_mut() {
            Some((city, rows)) if *city == mean.city => rows.push(mean),
            _ => cities.push((mean.city.as_str(), vec![mean])),
        }
    }
    debug!(cities = cities.len(), "Aggregated pollutant composition");

    Ok(cities
        .into_iter()
        .map(|(city, rows)| {
            let slices = rows
                .iter()
                .enumerate()
                .map(|(i, m)| Slice {
                    label: m.parameter.clone(),
                    value: m.mean,
                    color: PALETTE_INFERNO[i % PALETTE_INFERNO.len()].to_string(),
                })
                .collect();

            ChartSpec::new(
                format!("Pollutant Composition in {}", city),
                Chart::Donut(DonutChart {
                    hole: DONUT_HOLE,
                    slices,
                }),
            )
            .with_height(settings.donut_height)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;

    #[test]
    fn test_one_donut_per_city() {
        let table = ReadingTable::new(vec![
            Reading::new("Pune", "1", "A", 1.0, 1.0, "pm25", Some(40.0), None),
            Reading::new("Delhi", "2", "B", 1.0, 1.0, "pm25", Some(120.0), None),
            Reading::new("Delhi", "2", "B", 1.0, 1.0, "no2", Some(30.0), None),
            Reading::new("Delhi", "2", "B", 1.0, 1.0, "no2", Some(50.0), None),
        ]);

        let charts = charts(&table, &ViewSettings::default()).unwrap();
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].title, "Pollutant Composition in Delhi");
        assert_eq!(charts[1].title, "Pollutant Composition in Pune");

        let delhi = charts[0].chart.as_donut().unwrap();
        assert_eq!(delhi.hole, 0.4);
        assert_eq!(delhi.slices.len(), 2);
        assert_eq!(delhi.slices[0].label, "no2");
        assert_eq!(delhi.total(), 160.0);
        assert_eq!(delhi.slices[0].color, PALETTE_INFERNO[0]);
    }
}
