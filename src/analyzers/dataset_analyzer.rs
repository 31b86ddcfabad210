use crate::error::{DashboardError, Result};
use crate::models::ReadingTable;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug)]
pub struct DatasetStatistics {
    pub total_records: usize,
    pub cities: usize,
    pub sensors: usize,
    pub parameters: Vec<String>,
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub missing_timestamps: usize,
    pub missing_values: usize,
    /// Absent when no reading has both coordinates
    pub geographic_bounds: Option<GeographicBounds>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, table: &ReadingTable) -> Result<DatasetStatistics> {
        if table.is_empty() {
            return Err(DashboardError::Aggregation(
                "No records to analyze".to_string(),
            ));
        }

        let mut cities = HashSet::new();
        let mut sensors = HashSet::new();
        let mut missing_values = 0;
        let mut bounds: Option<GeographicBounds> = None;

        for reading in table {
            cities.insert(reading.city.as_str());
            sensors.insert((reading.city.as_str(), reading.location_id.as_str()));

            if reading.value.is_none() {
                missing_values += 1;
            }

            if let Some(position) = reading.coordinates() {
                bounds = Some(match bounds {
                    None => GeographicBounds {
                        min_lat: position.lat,
                        max_lat: position.lat,
                        min_lon: position.lon,
                        max_lon: position.lon,
                    },
                    Some(b) => GeographicBounds {
                        min_lat: b.min_lat.min(position.lat),
                        max_lat: b.max_lat.max(position.lat),
                        min_lon: b.min_lon.min(position.lon),
                        max_lon: b.max_lon.max(position.lon),
                    },
                });
            }
        }

        Ok(DatasetStatistics {
            total_records: table.len(),
            cities: cities.len(),
            sensors: sensors.len(),
            parameters: table.parameters().into_iter().map(String::from).collect(),
            time_range: table.time_range(),
            missing_timestamps: table.missing_timestamps(),
            missing_values,
            geographic_bounds: bounds,
        })
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStatistics {
    /// Year span of the timestamps, e.g. "2016–2025"
    pub fn year_span(&self) -> Option<String> {
        year_span(self.time_range)
    }

    pub fn summary(&self) -> String {
        let date_range = match self.time_range {
            Some((start, end)) => format!(
                "{} to {}",
                start.format("%Y-%m-%d %H:%M"),
                end.format("%Y-%m-%d %H:%M")
            ),
            None => "No valid timestamps".to_string(),
        };

        let coverage = match self.geographic_bounds {
            Some(b) => format!(
                "{:.3}..{:.3} lat, {:.3}..{:.3} lon",
                b.min_lat, b.max_lat, b.min_lon, b.max_lon
            ),
            None => "No coordinates".to_string(),
        };

        format!(
            "Records: {} total\n\
            Cities: {}\n\
            Sensors: {}\n\
            Pollutants: {}\n\
            Date Range (UTC): {}\n\
            Missing Timestamps: {}\n\
            Missing Values: {}\n\
            Coverage: {}",
            self.total_records,
            self.cities,
            self.sensors,
            self.parameters.join(", "),
            date_range,
            self.missing_timestamps,
            self.missing_values,
            coverage
        )
    }
}

/// Format a timestamp range as its year span: "2024" or "2016–2025"
pub fn year_span(range: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Option<String> {
    use chrono::Datelike;

    let (start, end) = range?;
    if start.year() == end.year() {
        Some(start.year().to_string())
    } else {
        Some(format!("{}\u{2013}{}", start.year(), end.year()))
    }
}
