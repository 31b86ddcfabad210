pub mod chart;
pub mod pollutant;
pub mod reading;
pub mod table;

pub use chart::{
    AreaChart, AxisValue, Bar, BarChart, Chart, ChartSpec, DonutChart, Heatmap, MapPoint,
    ScatterMap, Series, SeriesPoint, Slice,
};
pub use pollutant::{parameter_color, parameter_label, Pollutant};
pub use reading::Reading;
pub use table::ReadingTable;
