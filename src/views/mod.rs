//! The seven dashboard views.
//!
//! Each view is a pure function from the loaded table to chart specs. Views
//! share nothing: every one recomputes its own aggregation from the full
//! table.

pub mod composition;
pub mod correlation;
pub mod hourly;
pub mod maps;
pub mod monthly;
pub mod pollutant_levels;
pub mod records;

use serde::Serialize;
use tracing::{error, info};

use crate::analyzers::year_span;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::models::{ChartSpec, ReadingTable};
use crate::utils::constants::{
    DEFAULT_DONUT_HEIGHT, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_STYLE, DEFAULT_MAP_ZOOM, DEFAULT_REGION,
    DEFAULT_TITLE,
};

/// Presentation settings shared by the views
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub title: String,
    pub region: String,
    pub map_style: String,
    pub map_zoom: f64,
    pub map_height: u32,
    pub donut_height: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            region: DEFAULT_REGION.to_string(),
            map_style: DEFAULT_MAP_STYLE.to_string(),
            map_zoom: DEFAULT_MAP_ZOOM,
            map_height: DEFAULT_MAP_HEIGHT,
            donut_height: DEFAULT_DONUT_HEIGHT,
        }
    }
}

impl From<&DashboardConfig> for ViewSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            region: config.region.clone(),
            map_style: config.maps.style.clone(),
            map_zoom: config.maps.zoom,
            map_height: config.maps.height,
            donut_height: config.charts.donut_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    RecordsAndSensors,
    Maps,
    CityPollutantLevels,
    MonthlyTrends,
    HourlyTrends,
    CorrelationHeatmap,
    PollutantComposition,
}

impl View {
    /// Tab order
    pub const ALL: [View; 7] = [
        View::RecordsAndSensors,
        View::Maps,
        View::CityPollutantLevels,
        View::MonthlyTrends,
        View::HourlyTrends,
        View::CorrelationHeatmap,
        View::PollutantComposition,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::RecordsAndSensors => "Records & Sensors",
            View::Maps => "Maps",
            View::CityPollutantLevels => "City Pollutant Levels",
            View::MonthlyTrends => "Monthly Trends",
            View::HourlyTrends => "Hourly Trends",
            View::CorrelationHeatmap => "Correlation Heatmap",
            View::PollutantComposition => "Pollutant Composition",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            View::RecordsAndSensors => "records",
            View::Maps => "maps",
            View::CityPollutantLevels => "pollutant-levels",
            View::MonthlyTrends => "monthly",
            View::HourlyTrends => "hourly",
            View::CorrelationHeatmap => "correlation",
            View::PollutantComposition => "composition",
        }
    }

    pub fn render(&self, table: &ReadingTable, settings: &ViewSettings) -> Result<Vec<ChartSpec>> {
        match self {
            View::RecordsAndSensors => records::charts(table, settings),
            View::Maps => maps::charts(table, settings),
            View::CityPollutantLevels => pollutant_levels::charts(table, settings),
            View::MonthlyTrends => monthly::charts(table, settings),
            View::HourlyTrends => hourly::charts(table, settings),
            View::CorrelationHeatmap => correlation::charts(table, settings),
            View::PollutantComposition => composition::charts(table, settings),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TabContent {
    Rendered { charts: Vec<ChartSpec> },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    pub view: View,
    pub title: String,
    #[serde(flatten)]
    pub content: TabContent,
}

impl Tab {
    pub fn charts(&self) -> &[ChartSpec] {
        match &self.content {
            TabContent::Rendered { charts } => charts,
            TabContent::Failed { .. } => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.content, TabContent::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub record_count: usize,
    pub tabs: Vec<Tab>,
}

impl Dashboard {
    pub fn tab(&self, view: View) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.view == view)
    }

    pub fn chart_count(&self) -> usize {
        self.tabs.iter().map(|t| t.charts().len()).sum()
    }
}

/// Run every view over the table in tab order
///
/// A view that fails becomes a failed tab; the others still render.
pub fn build_dashboard(table: &ReadingTable, settings: &ViewSettings) -> Dashboard {
    let tabs: Vec<Tab> = View::ALL
        .iter()
        .map(|view| {
            let content = match view.render(table, settings) {
                Ok(charts) => TabContent::Rendered { charts },
                Err(e) => {
                    error!(view = view.title(), error = %e, "View failed to render");
                    TabContent::Failed {
                        error: e.to_string(),
                    }
                }
            };

            Tab {
                view: *view,
                title: view.title().to_string(),
                content,
            }
        })
        .collect();

    let dashboard = Dashboard {
        title: settings.title.clone(),
        record_count: table.len(),
        tabs,
    };

    info!(
        records = dashboard.record_count,
        charts = dashboard.chart_count(),
        "Dashboard rendered"
    );

    dashboard
}

/// Append the dataset's year span to a chart title when timestamps exist
pub(crate) fn title_with_years(title: String, table: &ReadingTable) -> String {
    match year_span(table.time_range()) {
        Some(span) => format!("{} ({})", title, span),
        None => title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;
    use chrono::{TimeZone, Utc};

    fn table() -> ReadingTable {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        ReadingTable::new(vec![
            Reading::new("Delhi", "1", "A", 28.6, 77.2, "pm25", Some(100.0), Some(ts)),
            Reading::new("Delhi", "1", "A", 28.6, 77.2, "no2", Some(40.0), Some(ts)),
            Reading::new("Pune", "2", "B", 18.5, 73.8, "pm25", Some(50.0), Some(ts)),
            Reading::new("Pune", "2", "B", 18.5, 73.8, "no2", Some(30.0), Some(ts)),
        ])
    }

    #[test]
    fn test_dashboard_has_all_tabs_in_order() {
        let dashboard = build_dashboard(&table(), &ViewSettings::default());

        let titles: Vec<&str> = dashboard.tabs.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Records & Sensors",
                "Maps",
                "City Pollutant Levels",
                "Monthly Trends",
                "Hourly Trends",
                "Correlation Heatmap",
                "Pollutant Composition",
            ]
        );
        assert!(dashboard.tabs.iter().all(|t| !t.is_failed()));
        assert_eq!(dashboard.record_count, 4);
    }

    #[test]
    fn test_failed_view_is_isolated() {
        // Nothing to correlate in an empty table; the other tabs still render
        let dashboard = build_dashboard(&ReadingTable::default(), &ViewSettings::default());

        let heatmap = dashboard.tab(View::CorrelationHeatmap).unwrap();
        assert!(heatmap.is_failed());
        assert!(!dashboard.tab(View::RecordsAndSensors).unwrap().is_failed());
        assert_eq!(dashboard.tab(View::RecordsAndSensors).unwrap().charts().len(), 2);
    }

    #[test]
    fn test_title_with_years() {
        assert_eq!(
            title_with_years("Sensor Locations in Delhi".to_string(), &table()),
            "Sensor Locations in Delhi (2024)"
        );
        assert_eq!(
            title_with_years("X".to_string(), &ReadingTable::default()),
            "X"
        );
    }

    #[test]
    fn test_dashboard_serializes_tab_status() {
        let dashboard = build_dashboard(&ReadingTable::default(), &ViewSettings::default());
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(json["tabs"][0]["status"], "rendered");
        assert_eq!(json["tabs"][5]["status"], "failed");
        assert_eq!(json["tabs"][5]["view"], "correlation_heatmap");
    }
}
