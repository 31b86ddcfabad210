use serde::{Deserialize, Serialize};

use crate::utils::coordinates::LatLon;

/// A renderer-independent chart description produced by a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    pub chart: Chart,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, chart: Chart) -> Self {
        Self {
            title: title.into(),
            height: None,
            chart,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    Bar(BarChart),
    ScatterMap(ScatterMap),
    Area(AreaChart),
    Heatmap(Heatmap),
    Donut(DonutChart),
}

impl Chart {
    pub fn kind(&self) -> &'static str {
        match self {
            Chart::Bar(_) => "bar",
            Chart::ScatterMap(_) => "scatter_map",
            Chart::Area(_) => "area",
            Chart::Heatmap(_) => "heatmap",
            Chart::Donut(_) => "donut",
        }
    }

    pub fn as_bar(&self) -> Option<&BarChart> {
        match self {
            Chart::Bar(bar) => Some(bar),
            _ => None,
        }
    }

    pub fn as_scatter_map(&self) -> Option<&ScatterMap> {
        match self {
            Chart::ScatterMap(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_area(&self) -> Option<&AreaChart> {
        match self {
            Chart::Area(area) => Some(area),
            _ => None,
        }
    }

    pub fn as_heatmap(&self) -> Option<&Heatmap> {
        match self {
            Chart::Heatmap(heatmap) => Some(heatmap),
            _ => None,
        }
    }

    pub fn as_donut(&self) -> Option<&DonutChart> {
        match self {
            Chart::Donut(donut) => Some(donut),
            _ => None,
        }
    }
}

/// Ranked bars colored on a continuous scale by their value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub x_label: String,
    pub y_label: String,
    pub color_scale: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl BarChart {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn value_of(&self, label: &str) -> Option<f64> {
        self.bars.iter().find(|b| b.label == label).map(|b| b.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterMap {
    pub series_name: String,
    pub center: LatLon,
    pub zoom: f64,
    pub style: String,
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub location_id: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaChart {
    pub x_label: String,
    pub y_label: String,
    pub stacked: bool,

    // Category axis order; empty for numeric axes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x_categories: Vec<String>,

    pub series: Vec<Series>,
}

impl AreaChart {
    pub fn series_named(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: AxisValue,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(u32),
    Category(String),
}

/// Square matrix with shared row/column labels; absent cells render blank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
    pub color_scale: String,
    pub value_format: String,
    pub colorbar_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutChart {
    pub hole: f64,
    pub slices: Vec<Slice>,
}

impl DonutChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: String,
}
