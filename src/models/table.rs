use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::models::Reading;

/// The loaded dataset: immutable once built, shared by reference with every view
#[derive(Debug, Clone, Default)]
pub struct ReadingTable {
    readings: Vec<Reading>,
}

impl ReadingTable {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Rows whose timestamp parsed; the only rows monthly and hourly views see
    pub fn timestamped(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter().filter(|r| r.has_timestamp())
    }

    pub fn missing_timestamps(&self) -> usize {
        self.readings.iter().filter(|r| !r.has_timestamp()).count()
    }

    /// Distinct cities in sorted order
    pub fn cities(&self) -> Vec<&str> {
        self.readings
            .iter()
            .map(|r| r.city.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct parameter codes in sorted order
    pub fn parameters(&self) -> Vec<&str> {
        self.readings
            .iter()
            .map(|r| r.parameter.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut timestamps = self.readings.iter().filter_map(|r| r.datetime_utc);
        let first = timestamps.next()?;
        Some(timestamps.fold((first, first), |(min, max), ts| (min.min(ts), max.max(ts))))
    }
}

impl From<Vec<Reading>> for ReadingTable {
    fn from(readings: Vec<Reading>) -> Self {
        Self::new(readings)
    }
}

impl<'a> IntoIterator for &'a ReadingTable {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
