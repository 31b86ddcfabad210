use crate::models::{Pollutant, Reading, ReadingTable};
use std::collections::BTreeMap;
use tracing::debug;
use validator::Validate;

const DEFAULT_SUMMARY_ISSUES: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub clean_records: usize,
    pub missing_values: usize,
    pub missing_timestamps: usize,
    pub issues: Vec<ReadingIssue>,
    pub city_statistics: BTreeMap<String, CityStatistics>,
}

impl IntegrityReport {
    pub fn count_of(&self, issue_type: IssueType) -> usize {
        self.issues
            .iter()
            .filter(|i| i.issue_type == issue_type)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ReadingIssue {
    /// Zero-based row position in the loaded table
    pub row: usize,
    pub city: String,
    pub location_id: String,
    pub issue_type: IssueType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    CoordinatesOutOfRange,
    MissingCoordinates,
    UnknownParameter,
    MissingValue,
    NegativeConcentration,
    MissingTimestamp,
}

#[derive(Debug, Clone, Default)]
pub struct CityStatistics {
    pub total_records: usize,
    pub missing_values: usize,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

/// Reports data quality problems without changing or rejecting any reading
pub struct IntegrityChecker {
    flag_missing_timestamps: bool,
    summary_issue_limit: usize,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            flag_missing_timestamps: true,
            summary_issue_limit: DEFAULT_SUMMARY_ISSUES,
        }
    }

    /// Number of individual issues listed by `generate_summary`
    pub fn with_issue_limit(mut self, limit: usize) -> Self {
        self.summary_issue_limit = limit;
        self
    }

    pub fn with_timestamp_checks(mut self, enabled: bool) -> Self {
        self.flag_missing_timestamps = enabled;
        self
    }

    pub fn check_integrity(&self, table: &ReadingTable) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: table.len(),
            ..IntegrityReport::default()
        };

        for (row, reading) in table.iter().enumerate() {
            let issues_before = report.issues.len();
            self.check_reading(row, reading, &mut report);
            if report.issues.len() == issues_before {
                report.clean_records += 1;
            }

            let stats = report
                .city_statistics
                .entry(reading.city.clone())
                .or_default();
            stats.total_records += 1;

            match reading.value {
                Some(value) => {
                    stats.min_value = Some(stats.min_value.map_or(value, |v| v.min(value)));
                    stats.max_value = Some(stats.max_value.map_or(value, |v| v.max(value)));
                }
                None => stats.missing_values += 1,
            }
        }

        debug!(
            records = report.total_records,
            issues = report.issues.len(),
            "Integrity check finished"
        );

        report
    }

    fn check_reading(&self, row: usize, reading: &Reading, report: &mut IntegrityReport) {
        if reading.value.is_none() {
            report.missing_values += 1;
        }
        if !reading.has_timestamp() {
            report.missing_timestamps += 1;
        }

        let mut push = |issue_type: IssueType, details: String| {
            report.issues.push(ReadingIssue {
                row,
                city: reading.city.clone(),
                location_id: reading.location_id.clone(),
                issue_type,
                details,
            });
        };

        if reading.validate().is_err() {
            push(
                IssueType::CoordinatesOutOfRange,
                format!(
                    "coordinates ({}, {}) are outside the valid range",
                    format_coordinate(reading.latitude),
                    format_coordinate(reading.longitude)
                ),
            );
        }

        if reading.coordinates().is_none() {
            push(
                IssueType::MissingCoordinates,
                format!(
                    "sensor {} has no usable position ({}, {})",
                    reading.location_id,
                    format_coordinate(reading.latitude),
                    format_coordinate(reading.longitude)
                ),
            );
        }

        if reading.pollutant().is_none() {
            push(
                IssueType::UnknownParameter,
                format!(
                    "unknown parameter code '{}' (known: {})",
                    reading.parameter,
                    known_parameter_codes().join(", ")
                ),
            );
        }

        match reading.value {
            None => push(
                IssueType::MissingValue,
                format!("{} value is missing", reading.parameter),
            ),
            Some(value) if value < 0.0 => push(
                IssueType::NegativeConcentration,
                format!("{} concentration {} is negative", reading.parameter, value),
            ),
            Some(_) => {}
        }

        if self.flag_missing_timestamps && !reading.has_timestamp() {
            push(
                IssueType::MissingTimestamp,
                "timestamp absent or unparsable".to_string(),
            );
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();
        let pct = |n: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_records as f64
            }
        };

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Clean Records: {} ({:.1}%)\n",
            report.clean_records,
            pct(report.clean_records)
        ));
        summary.push_str(&format!(
            "Missing Values: {} ({:.1}%)\n",
            report.missing_values,
            pct(report.missing_values)
        ));
        summary.push_str(&format!(
            "Missing Timestamps: {} ({:.1}%)\n",
            report.missing_timestamps,
            pct(report.missing_timestamps)
        ));

        summary.push_str(&format!("\nIssues: {}\n", report.issues.len()));
        for (label, issue_type) in [
            ("Coordinates out of range", IssueType::CoordinatesOutOfRange),
            ("Missing coordinates", IssueType::MissingCoordinates),
            ("Unknown parameters", IssueType::UnknownParameter),
            ("Negative concentrations", IssueType::NegativeConcentration),
        ] {
            let count = report.count_of(issue_type);
            if count > 0 {
                summary.push_str(&format!("  {}: {}\n", label, count));
            }
        }

        if !report.city_statistics.is_empty() {
            summary.push_str("\nRecords per City:\n");
            for (city, stats) in &report.city_statistics {
                let range = match (stats.min_value, stats.max_value) {
                    (Some(min), Some(max)) => format!("{:.1} to {:.1}", min, max),
                    _ => "no values".to_string(),
                };
                summary.push_str(&format!(
                    "  {}: {} records ({} missing values, range {})\n",
                    city, stats.total_records, stats.missing_values, range
                ));
            }
        }

        if !report.issues.is_empty() && self.summary_issue_limit > 0 {
            summary.push_str(&format!("\nTop {} Issues:\n", self.summary_issue_limit));
            for (i, issue) in report
                .issues
                .iter()
                .take(self.summary_issue_limit)
                .enumerate()
            {
                summary.push_str(&format!(
                    "  {}. Row {} ({}, location {}): {}\n",
                    i + 1,
                    issue.row + 1,
                    issue.city,
                    issue.location_id,
                    issue.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn format_coordinate(coordinate: Option<f64>) -> String {
    coordinate.map_or_else(|| "missing".to_string(), |c| c.to_string())
}

fn known_parameter_codes() -> Vec<&'static str> {
    Pollutant::ALL.iter().map(|p| p.code()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn table() -> ReadingTable {
        let ts = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        ReadingTable::new(vec![
            Reading::new("Delhi", "1", "A", 28.6, 77.2, "pm25", Some(120.0), Some(ts)),
            Reading::new("Delhi", "1", "A", 28.6, 77.2, "no2", None, Some(ts)),
            Reading::new("Delhi", "2", "B", 128.6, 77.2, "pm25", Some(80.0), Some(ts)),
            Reading::new("Pune", "3", "C", 18.5, 73.8, "bc", Some(2.0), Some(ts)),
            Reading::new("Pune", "3", "C", 18.5, 73.8, "o3", Some(-4.0), None),
        ])
    }

    #[test]
    fn test_check_integrity_counts() {
        let report = IntegrityChecker::new().check_integrity(&table());

        assert_eq!(report.total_records, 5);
        assert_eq!(report.clean_records, 1);
        assert_eq!(report.missing_values, 1);
        assert_eq!(report.missing_timestamps, 1);
        assert_eq!(report.count_of(IssueType::CoordinatesOutOfRange), 1);
        assert_eq!(report.count_of(IssueType::UnknownParameter), 1);
        assert_eq!(report.count_of(IssueType::MissingValue), 1);
        assert_eq!(report.count_of(IssueType::NegativeConcentration), 1);
        assert_eq!(report.count_of(IssueType::MissingTimestamp), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_city_statistics() {
        let report = IntegrityChecker::new().check_integrity(&table());

        let delhi = &report.city_statistics["Delhi"];
        assert_eq!(delhi.total_records, 3);
        assert_eq!(delhi.missing_values, 1);
        assert_eq!(delhi.min_value, Some(80.0));
        assert_eq!(delhi.max_value, Some(120.0));

        let pune = &report.city_statistics["Pune"];
        assert_eq!(pune.min_value, Some(-4.0));
    }

    #[test]
    fn test_timestamp_checks_can_be_disabled() {
        let report = IntegrityChecker::new()
            .with_timestamp_checks(false)
            .check_integrity(&table());

        assert_eq!(report.count_of(IssueType::MissingTimestamp), 0);
        // Still counted, just not reported as an issue
        assert_eq!(report.missing_timestamps, 1);
    }

    #[test]
    fn test_generate_summary() {
        let checker = IntegrityChecker::new();
        let summary = checker.generate_summary(&checker.check_integrity(&table()));

        assert!(summary.contains("Total Records: 5"));
        assert!(summary.contains("Unknown parameters: 1"));
        assert!(summary.contains("Delhi: 3 records"));
        assert!(summary.contains("Top 10 Issues:"));
        assert!(summary.contains("unknown parameter code 'bc'"));
    }

    #[test]
    fn test_issue_limit() {
        let checker = IntegrityChecker::new().with_issue_limit(2);
        let summary = checker.generate_summary(&checker.check_integrity(&table()));

        assert!(summary.contains("Top 2 Issues:"));
        assert!(summary.contains("  2. Row"));
        assert!(!summary.contains("  3. Row"));
    }

    #[test]
    fn test_missing_coordinates_are_reported() {
        let mut reading = Reading::new("Agra", "7", "D", 27.2, 78.0, "pm25", Some(5.0), None);
        reading.longitude = None;
        let checker = IntegrityChecker::new().with_timestamp_checks(false);
        let report = checker.check_integrity(&ReadingTable::new(vec![reading]));

        assert_eq!(report.count_of(IssueType::MissingCoordinates), 1);
        assert_eq!(report.count_of(IssueType::CoordinatesOutOfRange), 0);
        assert_eq!(report.clean_records, 0);

        let summary = checker.generate_summary(&report);
        assert!(summary.contains("Missing coordinates: 1"));
        assert!(summary.contains("sensor 7 has no usable position (27.2, missing)"));
    }

    #[test]
    fn test_empty_table_summary() {
        let checker = IntegrityChecker::new();
        let report = checker.check_integrity(&ReadingTable::default());

        assert!(report.is_clean());
        assert!(checker.generate_summary(&report).contains("Clean Records: 0 (0.0%)"));
    }
}
