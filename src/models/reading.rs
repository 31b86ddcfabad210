use chrono::{DateTime, Datelike, Month, Timelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Pollutant;
use crate::utils::coordinates::LatLon;

/// One sensor observation of one pollutant at one place and time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Reading {
    pub city: String,
    pub location_id: String,
    pub location_name: String,

    // Coordinates are absent when the cell was empty or a missing-value token
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub parameter: String,

    // Absent when the cell was empty or a missing-value token
    pub value: Option<f64>,

    // Absent when the cell could not be parsed
    pub datetime_utc: Option<DateTime<Utc>>,
}

impl Reading {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        city: impl Into<String>,
        location_id: impl Into<String>,
        location_name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        parameter: impl Into<String>,
        value: Option<f64>,
        datetime_utc: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            city: city.into(),
            location_id: location_id.into(),
            location_name: location_name.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            parameter: parameter.into(),
            value,
            datetime_utc,
        }
    }

    pub fn pollutant(&self) -> Option<Pollutant> {
        Pollutant::from_code(&self.parameter)
    }

    /// Position of the sensor, when both coordinates are present
    pub fn coordinates(&self) -> Option<LatLon> {
        Some(LatLon::new(self.latitude?, self.longitude?))
    }

    /// Calendar month of the reading, derived from the timestamp
    pub fn month(&self) -> Option<Month> {
        self.datetime_utc
            .and_then(|ts| Month::try_from(ts.month() as u8).ok())
    }

    /// Hour of day (0-23) of the reading, derived from the timestamp
    pub fn hour(&self) -> Option<u32> {
        self.datetime_utc.map(|ts| ts.hour())
    }

    pub fn has_timestamp(&self) -> bool {
        self.datetime_utc.is_some()
    }
}
