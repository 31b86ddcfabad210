use tracing::debug;

use crate::analyzers::sensor_locations;
use crate::error::Result;
use crate::models::{Chart, ChartSpec, MapPoint, ReadingTable, ScatterMap};
use crate::views::{title_with_years, ViewSettings};

/// One sensor map per city, centered on the mean of its sensor coordinates.
/// Sensors without both coordinates cannot be placed and are left off.
pub fn charts(table: &ReadingTable, settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
    let cities = sensor_locations(table);
    debug!(cities = cities.len(), "Collected distinct sensor locations");

    Ok(cities
        .iter()
        .filter_map(|city| {
            let center = city.center()?;
            let points = city
                .sensors
                .iter()
                .filter_map(|s| {
                    let position = s.coordinates()?;
                    Some(MapPoint {
                        location_id: s.location_id.clone(),
                        location_name: s.location_name.clone(),
                        latitude: position.lat,
                        longitude: position.lon,
                    })
                })
                .collect();

            let title = title_with_years(format!("Sensor Locations in {}", city.city), table);
            Some(
                ChartSpec::new(
                    title,
                    Chart::ScatterMap(ScatterMap {
                        series_name: city.city.clone(),
                        center,
                        zoom: settings.map_zoom,
                        style: settings.map_style.clone(),
                        points,
                    }),
                )
                .with_height(settings.map_height),
            )
        })
        .collect())
}
