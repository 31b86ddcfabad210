pub mod aggregations;
pub mod dataset_analyzer;

pub use aggregations::{
    city_parameter_means, correlation_matrix, hourly_means, monthly_means, record_counts,
    sensor_locations, unique_sensor_counts, CityCount, CityParameterMean, CitySensors,
    CorrelationMatrix, HourlyMean, MonthlyMean, PivotTable, SensorLocation,
};
pub use dataset_analyzer::{year_span, DatasetAnalyzer, DatasetStatistics};
