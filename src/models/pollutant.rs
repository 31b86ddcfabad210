use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;
use crate::utils::constants::UNKNOWN_POLLUTANT_COLOR;

/// Pollutant codes carried in the `parameter` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    So2,
    Co,
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pm25" => Some(Pollutant::Pm25),
            "pm10" => Some(Pollutant::Pm10),
            "no2" => Some(Pollutant::No2),
            "so2" => Some(Pollutant::So2),
            "co" => Some(Pollutant::Co),
            "o3" => Some(Pollutant::O3),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
            Pollutant::O3 => "o3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM25",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Fixed series color for hourly trend charts
    pub fn color(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "#ff4500",
            Pollutant::Pm10 => "#ffa500",
            Pollutant::No2 => "#1f77b4",
            Pollutant::So2 => "#9467bd",
            Pollutant::O3 => "#2ca02c",
            Pollutant::Co => "#8c564b",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Pollutant {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pollutant::from_code(s)
            .ok_or_else(|| DashboardError::InvalidFormat(format!("Unknown pollutant code: '{}'", s)))
    }
}

/// Series color for any parameter code, known or not
pub fn parameter_color(parameter: &str) -> &'static str {
    Pollutant::from_code(parameter)
        .map(|p| p.color())
        .unwrap_or(UNKNOWN_POLLUTANT_COLOR)
}

/// Upper-case label used in chart titles
pub fn parameter_label(parameter: &str) -> String {
    Pollutant::from_code(parameter)
        .map(|p| p.label().to_string())
        .unwrap_or_else(|| parameter.to_uppercase())
}
