//! Group-by aggregations behind the dashboard views.
//!
//! Every function takes the full table by reference and returns a freshly
//! built result; nothing is cached between calls. Rows with an absent value
//! still count as records but never contribute to a mean, and a group whose
//! values are all absent has no mean and is left out.

use chrono::Month;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use crate::models::ReadingTable;
use crate::utils::constants::MIN_CORRELATION_OBSERVATIONS;
use crate::utils::coordinates::{mean_center, LatLon};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Groups kept in order of first appearance
struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Eq + Hash + Clone, V: Default> OrderedGroups<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut V {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// Number of readings per city, largest first
pub fn record_counts(table: &ReadingTable) -> Vec<CityCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for reading in table {
        *counts.entry(reading.city.as_str()).or_default() += 1;
    }
    rank_descending(counts)
}

/// Number of distinct location ids per city, largest first
pub fn unique_sensor_counts(table: &ReadingTable) -> Vec<CityCount> {
    let mut sensors: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for reading in table {
        sensors
            .entry(reading.city.as_str())
            .or_default()
            .insert(reading.location_id.as_str());
    }

    rank_descending(
        sensors
            .into_iter()
            .map(|(city, ids)| (city, ids.len()))
            .collect(),
    )
}

// Keys arrive sorted; the stable sort keeps that order among equal counts.
fn rank_descending(counts: BTreeMap<&str, usize>) -> Vec<CityCount> {
    let mut ranked: Vec<CityCount> = counts
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorLocation {
    pub location_id: String,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SensorLocation {
    pub fn coordinates(&self) -> Option<LatLon> {
        Some(LatLon::new(self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySensors {
    pub city: String,
    pub sensors: Vec<SensorLocation>,
}

impl CitySensors {
    /// Mean coordinate of the city's distinct sensor locations; each axis
    /// averages only the sensors where that coordinate is present
    pub fn center(&self) -> Option<LatLon> {
        mean_center(self.sensors.iter().map(|s| (s.latitude, s.longitude)))
    }
}

/// Distinct (city, location_id, location_name, latitude, longitude) tuples,
/// grouped by city; cities and sensors keep their order of first appearance
pub fn sensor_locations(table: &ReadingTable) -> Vec<CitySensors> {
    let mut seen: HashSet<(&str, &str, &str, Option<u64>, Option<u64>)> = HashSet::new();
    let mut groups: OrderedGroups<&str, Vec<SensorLocation>> = OrderedGroups::new();

    for reading in table {
        let key = (
            reading.city.as_str(),
            reading.location_id.as_str(),
            reading.location_name.as_str(),
            reading.latitude.map(f64::to_bits),
            reading.longitude.map(f64::to_bits),
        );

        if seen.insert(key) {
            groups.entry(reading.city.as_str()).push(SensorLocation {
                location_id: reading.location_id.clone(),
                location_name: reading.location_name.clone(),
                latitude: reading.latitude,
                longitude: reading.longitude,
            });
        }
    }

    groups
        .into_entries()
        .into_iter()
        .map(|(city, sensors)| CitySensors {
            city: city.to_string(),
            sensors,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityParameterMean {
    pub city: String,
    pub parameter: String,
    pub mean: f64,
}

/// Mean value per (city, parameter), sorted by city then parameter
pub fn city_parameter_means(table: &ReadingTable) -> Vec<CityParameterMean> {
    let mut groups: BTreeMap<(&str, &str), MeanAccumulator> = BTreeMap::new();
    for reading in table {
        groups
            .entry((reading.city.as_str(), reading.parameter.as_str()))
            .or_default()
            .push(reading.value);
    }

    groups
        .into_iter()
        .filter_map(|((city, parameter), acc)| {
            acc.mean().map(|mean| CityParameterMean {
                city: city.to_string(),
                parameter: parameter.to_string(),
                mean,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub parameter: String,
    pub city: String,
    pub month: Month,
    pub mean: f64,
}

/// Mean value per (parameter, city, calendar month) over timestamped rows,
/// keys in order of first appearance
pub fn monthly_means(table: &ReadingTable) -> Vec<MonthlyMean> {
    let mut groups: OrderedGroups<(&str, &str, Month), MeanAccumulator> = OrderedGroups::new();

    for reading in table.timestamped() {
        if let Some(month) = reading.month() {
            groups
                .entry((reading.parameter.as_str(), reading.city.as_str(), month))
                .push(reading.value);
        }
    }

    groups
        .into_entries()
        .into_iter()
        .filter_map(|((parameter, city, month), acc)| {
            acc.mean().map(|mean| MonthlyMean {
                parameter: parameter.to_string(),
                city: city.to_string(),
                month,
                mean,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyMean {
    pub parameter: String,
    pub hour: u32,
    pub mean: f64,
}

/// Mean value per (parameter, hour of day) over timestamped rows, sorted
pub fn hourly_means(table: &ReadingTable) -> Vec<HourlyMean> {
    let mut groups: BTreeMap<(&str, u32), MeanAccumulator> = BTreeMap::new();

    for reading in table.timestamped() {
        if let Some(hour) = reading.hour() {
            groups
                .entry((reading.parameter.as_str(), hour))
                .or_default()
                .push(reading.value);
        }
    }

    groups
        .into_iter()
        .filter_map(|((parameter, hour), acc)| {
            acc.mean().map(|mean| HourlyMean {
                parameter: parameter.to_string(),
                hour,
                mean,
            })
        })
        .collect()
}

/// City x parameter matrix of means; a city without a parameter has an absent cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub cities: Vec<String>,
    pub parameters: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    pub fn from_means(means: &[CityParameterMean]) -> Self {
        let cities: Vec<String> = means
            .iter()
            .map(|m| m.city.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        let parameters: Vec<String> = means
            .iter()
            .map(|m| m.parameter.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells = vec![vec![None; parameters.len()]; cities.len()];
        for mean in means {
            // Both lookups succeed: the label lists were built from `means`
            if let (Ok(row), Ok(col)) = (
                cities.binary_search(&mean.city),
                parameters.binary_search(&mean.parameter),
            ) {
                cells[row][col] = Some(mean.mean);
            }
        }

        Self {
            cities,
            parameters,
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() || self.parameters.is_empty()
    }

    pub fn get(&self, city: &str, parameter: &str) -> Option<f64> {
        let row = self.cities.iter().position(|c| c == city)?;
        let col = self.parameters.iter().position(|p| p == parameter)?;
        self.cells[row][col]
    }

    pub fn column(&self, col: usize) -> Vec<Option<f64>> {
        self.cells.iter().map(|row| row[col]).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.values[i][j]
    }
}

/// Pairwise Pearson correlation between the parameter columns of a pivot
///
/// Each pair uses only the cities where both columns have a mean. The
/// diagonal is 1.0 for any column with at least two means.
pub fn correlation_matrix(pivot: &PivotTable) -> CorrelationMatrix {
    let columns: Vec<Vec<Option<f64>>> = (0..pivot.parameters.len())
        .map(|col| pivot.column(col))
        .collect();
    let n = columns.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        let observations = columns[i].iter().flatten().count();
        values[i][i] = (observations >= MIN_CORRELATION_OBSERVATIONS).then_some(1.0);

        for j in (i + 1)..n {
            let pairs: Vec<(f64, f64)> = columns[i]
                .iter()
                .zip(&columns[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .collect();
            let r = pearson(&pairs);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: pivot.parameters.clone(),
        values,
    }
}

/// Pearson correlation coefficient; absent for fewer than two pairs or a
/// constant side
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < MIN_CORRELATION_OBSERVATIONS {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn reading(city: &str, location: &str, parameter: &str, value: Option<f64>) -> Reading {
        let ts = Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
        Reading::new(
            city,
            location,
            format!("{} {}", city, location),
            10.0 + location.len() as f64,
            70.0,
            parameter,
            value,
            Some(ts),
        )
    }

    #[test]
    fn test_mean_accumulator_skips_absent_values() {
        let mut acc = MeanAccumulator::default();
        assert_eq!(acc.mean(), None);

        acc.push(Some(2.0));
        acc.push(None);
        acc.push(Some(4.0));

        assert_eq!(acc.count(), 2);
        assert_eq!(acc.mean(), Some(3.0));
    }

    #[test]
    fn test_record_counts_ranked_with_stable_ties() {
        let table = ReadingTable::new(vec![
            reading("Pune", "1", "pm25", Some(1.0)),
            reading("Delhi", "1", "pm25", Some(1.0)),
            reading("Agra", "1", "pm25", Some(1.0)),
            reading("Agra", "2", "pm25", None),
            reading("Chennai", "1", "pm25", Some(1.0)),
        ]);

        let counts = record_counts(&table);
        let order: Vec<(&str, usize)> = counts.iter().map(|c| (c.city.as_str(), c.count)).collect();
        assert_eq!(
            order,
            vec![("Agra", 2), ("Chennai", 1), ("Delhi", 1), ("Pune", 1)]
        );
    }

    #[test]
    fn test_unique_sensor_counts() {
        let table = ReadingTable::new(vec![
            reading("Delhi", "1", "pm25", Some(1.0)),
            reading("Delhi", "1", "no2", Some(1.0)),
            reading("Delhi", "2", "pm25", Some(1.0)),
            reading("Pune", "9", "pm25", Some(1.0)),
        ]);

        let counts = unique_sensor_counts(&table);
        assert_eq!(counts[0], CityCount { city: "Delhi".to_string(), count: 2 });
        assert_eq!(counts[1], CityCount { city: "Pune".to_string(), count: 1 });
    }

    #[test]
    fn test_sensor_locations_distinct_in_appearance_order() {
        let table = ReadingTable::new(vec![
            reading("Pune", "1", "pm25", Some(1.0)),
            reading("Delhi", "22", "pm25", Some(1.0)),
            reading("Pune", "1", "no2", Some(1.0)),
            reading("Pune", "333", "pm25", Some(1.0)),
        ]);

        let locations = sensor_locations(&table);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].city, "Pune");
        assert_eq!(locations[0].sensors.len(), 2);
        assert_eq!(locations[1].city, "Delhi");

        let center = locations[0].center().unwrap();
        assert!((center.lat - 12.0).abs() < 1e-9); // (11 + 13) / 2
        assert!((center.lon - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_absent_coordinates_are_skipped_in_center() {
        let mut blank_lat = reading("Pune", "22", "pm25", Some(1.0));
        blank_lat.latitude = None;
        blank_lat.longitude = Some(76.0);
        let mut blank_both = reading("Pune", "4444", "pm25", Some(1.0));
        blank_both.latitude = None;
        blank_both.longitude = None;

        let table = ReadingTable::new(vec![
            reading("Pune", "1", "pm25", Some(1.0)),
            blank_lat.clone(),
            blank_lat,
            blank_both,
        ]);

        let locations = sensor_locations(&table);
        assert_eq!(locations[0].sensors.len(), 3);
        assert_eq!(locations[0].sensors[1].coordinates(), None);

        // Latitude from sensor 1 only, longitude from sensors 1 and 22
        let center = locations[0].center().unwrap();
        assert!((center.lat - 11.0).abs() < 1e-9);
        assert!((center.lon - 73.0).abs() < 1e-9);
    }

    #[test]
    fn test_city_parameter_means_sorted_and_skip_empty_groups() {
        let table = ReadingTable::new(vec![
            reading("Pune", "1", "pm25", Some(30.0)),
            reading("Delhi", "1", "pm25", Some(100.0)),
            reading("Delhi", "1", "pm25", Some(200.0)),
            reading("Delhi", "1", "co", None),
            reading("Delhi", "1", "no2", Some(40.0)),
        ]);

        let means = city_parameter_means(&table);
        let keys: Vec<(&str, &str, f64)> = means
            .iter()
            .map(|m| (m.city.as_str(), m.parameter.as_str(), m.mean))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("Delhi", "no2", 40.0),
                ("Delhi", "pm25", 150.0),
                ("Pune", "pm25", 30.0)
            ]
        );
    }

    #[test]
    fn test_monthly_means_skip_untimestamped_rows() {
        let jan = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap();

        let table = ReadingTable::new(vec![
            Reading::new("Delhi", "1", "A", 1.0, 1.0, "pm25", Some(10.0), Some(feb)),
            Reading::new("Delhi", "1", "A", 1.0, 1.0, "pm25", Some(20.0), Some(jan)),
            Reading::new("Delhi", "1", "A", 1.0, 1.0, "pm25", Some(40.0), Some(jan)),
            Reading::new("Delhi", "1", "A", 1.0, 1.0, "pm25", Some(999.0), None),
        ]);

        let means = monthly_means(&table);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].month, Month::February);
        assert_eq!(means[0].mean, 10.0);
        assert_eq!(means[1].month, Month::January);
        assert_eq!(means[1].mean, 30.0);
    }

    #[test]
    fn test_hourly_means_sorted() {
        let at = |h| Some(Utc.with_ymd_and_hms(2024, 1, 5, h, 0, 0).unwrap());

        let table = ReadingTable::new(vec![
            Reading::new("Delhi", "1", "A", 1.0, 1.0, "pm25", Some(10.0), at(23)),
            Reading::new("Pune", "2", "B", 1.0, 1.0, "pm25", Some(30.0), at(23)),
            Reading::new("Delhi", "1", "A", 1.0, 1.0, "no2", Some(5.0), at(0)),
            Reading::new("Delhi", "1", "A", 1.0, 1.0, "pm25", Some(8.0), at(1)),
        ]);

        let means = hourly_means(&table);
        let keys: Vec<(&str, u32, f64)> = means
            .iter()
            .map(|m| (m.parameter.as_str(), m.hour, m.mean))
            .collect();
        assert_eq!(keys, vec![("no2", 0, 5.0), ("pm25", 1, 8.0), ("pm25", 23, 20.0)]);
    }

    #[test]
    fn test_pivot_and_correlation() {
        let table = ReadingTable::new(vec![
            reading("A", "1", "pm25", Some(10.0)),
            reading("A", "1", "pm10", Some(20.0)),
            reading("A", "1", "o3", Some(9.0)),
            reading("B", "1", "pm25", Some(20.0)),
            reading("B", "1", "pm10", Some(40.0)),
            reading("B", "1", "o3", Some(6.0)),
            reading("C", "1", "pm25", Some(30.0)),
            reading("C", "1", "pm10", Some(60.0)),
            reading("C", "1", "o3", Some(3.0)),
            reading("C", "1", "so2", Some(1.0)),
        ]);

        let pivot = PivotTable::from_means(&city_parameter_means(&table));
        assert_eq!(pivot.cities, vec!["A", "B", "C"]);
        assert_eq!(pivot.parameters, vec!["o3", "pm10", "pm25", "so2"]);
        assert_eq!(pivot.get("B", "pm10"), Some(40.0));
        assert_eq!(pivot.get("A", "so2"), None);

        let corr = correlation_matrix(&pivot);
        let r = corr.get("pm25", "pm10").unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = corr.get("pm25", "o3").unwrap();
        assert!((r + 1.0).abs() < 1e-12);

        // so2 has a single city: no diagonal, no correlations
        assert_eq!(corr.get("so2", "so2"), None);
        assert_eq!(corr.get("so2", "pm25"), None);
        assert_eq!(corr.get("o3", "o3"), Some(1.0));
    }

    #[test]
    fn test_pearson_edge_cases() {
        assert_eq!(pearson(&[]), None);
        assert_eq!(pearson(&[(1.0, 2.0)]), None);
        assert_eq!(pearson(&[(1.0, 2.0), (1.0, 3.0)]), None);

        let r = pearson(&[(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0)]).unwrap();
        assert!((r - 0.6).abs() < 1e-12);
    }
}
