use crate::error::{DashboardError, Result};
use crate::models::{Reading, ReadingTable};
use crate::utils::constants::{MISSING_VALUE_TOKENS, REQUIRED_COLUMNS};
use crate::utils::timestamps::parse_timestamp;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use memmap2::Mmap;
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw CSV row; extra columns in the file are ignored
#[derive(Debug, Deserialize)]
struct CsvRow {
    city: String,
    location_id: String,
    location_name: String,
    #[serde(deserialize_with = "optional_number")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    longitude: Option<f64>,
    parameter: String,
    #[serde(deserialize_with = "optional_number")]
    value: Option<f64>,
    #[serde(rename = "datetimeUtc")]
    datetime_utc: String,
}

pub struct ReadingReader {
    use_mmap: bool,
}

impl ReadingReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Load the whole dataset into an immutable table
    ///
    /// Every failure (missing file, undecodable bytes, missing column, a
    /// non-numeric coordinate or value) is reported as a load error. Bad
    /// timestamps are not failures: the row is kept without a timestamp.
    /// Empty numeric cells and missing-value tokens such as `NA` load as
    /// absent.
    pub fn read_table(&self, path: &Path) -> Result<ReadingTable> {
        let result = if self.use_mmap {
            self.read_readings_mmap(path)
        } else {
            self.read_readings_buffered(path)
        };

        let readings = result.map_err(|e| match e {
            DashboardError::Load { .. } => e,
            other => DashboardError::load(path, other.to_string()),
        })?;

        info!(
            path = %path.display(),
            records = readings.len(),
            "Loaded air quality readings"
        );

        Ok(ReadingTable::new(readings))
    }

    fn read_readings_buffered(&self, path: &Path) -> Result<Vec<Reading>> {
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes)
    }

    fn read_readings_mmap(&self, path: &Path) -> Result<Vec<Reading>> {
        let file = File::open(path)?;

        // Zero-length files cannot be mapped on every platform
        if file.metadata()?.len() == 0 {
            return self.parse_bytes(&[]);
        }

        let mmap = unsafe { Mmap::map(&file)? };
        self.parse_bytes(&mmap)
    }

    /// Decode raw file bytes and parse them as CSV
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<Reading>> {
        let content = decode_text(bytes);
        self.parse_str(&content)
    }

    /// Parse CSV text with a header row into readings
    pub fn parse_str(&self, content: &str) -> Result<Vec<Reading>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();

        if !missing.is_empty() {
            return Err(DashboardError::InvalidFormat(format!(
                "Missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let mut readings = Vec::new();
        let mut coerced_timestamps = 0usize;

        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row?;

            let datetime_utc = match parse_timestamp(&row.datetime_utc) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    // Header is line 1
                    debug!(line = index + 2, error = %e, "Timestamp coerced to absent");
                    coerced_timestamps += 1;
                    None
                }
            };

            readings.push(Reading {
                city: row.city,
                location_id: row.location_id,
                location_name: row.location_name,
                latitude: row.latitude,
                longitude: row.longitude,
                parameter: row.parameter,
                value: row.value,
                datetime_utc,
            });
        }

        if coerced_timestamps > 0 {
            warn!(
                rows = coerced_timestamps,
                "Rows with unparsable datetimeUtc kept without a timestamp"
            );
        }

        Ok(readings)
    }
}

impl Default for ReadingReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric cell where blanks and missing-value tokens are absent; NaN is
/// absent too, anything else that is not a number is an error
fn optional_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let cell = raw.trim();
    if is_missing_token(cell) {
        return Ok(None);
    }

    cell.parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|e| serde::de::Error::custom(format!("invalid number '{}': {}", cell, e)))
}

fn is_missing_token(cell: &str) -> bool {
    cell.is_empty()
        || MISSING_VALUE_TOKENS
            .iter()
            .any(|token| cell.eq_ignore_ascii_case(token))
}

/// Decode file contents: BOM first, then strict UTF-8, then Windows-1252
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return text;
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            warn!("Input is not valid UTF-8, decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "city,location_id,location_name,latitude,longitude,parameter,value,datetimeUtc";

    #[test]
    fn test_parse_rows() {
        let content = format!(
            "{}\n\
            Delhi,8118,Anand Vihar,28.6469,77.3159,pm25,182.5,2024-01-15T08:00:00Z\n\
            Delhi,8118,Anand Vihar,28.6469,77.3159,no2,,2024-01-15T08:00:00Z\n",
            HEADER
        );

        let reader = ReadingReader::new();
        let readings = reader.parse_str(&content).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].city, "Delhi");
        assert_eq!(readings[0].location_id, "8118");
        assert_eq!(readings[0].value, Some(182.5));
        assert_eq!(readings[0].datetime_utc.unwrap().hour(), 8);
        assert_eq!(readings[1].value, None);
    }

    #[test]
    fn test_bad_timestamp_is_coerced() {
        let content = format!(
            "{}\nMumbai,1,Bandra,19.06,72.83,pm10,90,yesterday\n",
            HEADER
        );

        let readings = ReadingReader::new().parse_str(&content).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].datetime_utc, None);
    }

    #[test]
    fn test_extra_columns_and_order_are_ignored() {
        let content = "datetimeUtc,unit,value,parameter,longitude,latitude,location_name,location_id,city\n\
            2023-05-01 10:00:00,µg/m³,41.0,o3,80.27,13.08,Alandur,42,Chennai\n";

        let readings = ReadingReader::new().parse_str(content).unwrap();
        assert_eq!(readings[0].city, "Chennai");
        assert_eq!(readings[0].parameter, "o3");
        assert_eq!(readings[0].datetime_utc.unwrap().month(), 5);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let content = "city,location_id,latitude,longitude,parameter,value\nDelhi,1,28.6,77.2,pm25,10\n";

        let err = ReadingReader::new().parse_str(content).unwrap_err();
        assert!(err.to_string().contains("location_name"));
        assert!(err.to_string().contains("datetimeUtc"));
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        let content = format!(
            "{}\nDelhi,1,Station,28.6,77.2,pm25,high,2024-01-01T00:00:00Z\n",
            HEADER
        );

        assert!(ReadingReader::new().parse_str(&content).is_err());
    }

    #[test]
    fn test_blank_coordinate_loads_as_absent() {
        let content = format!(
            "{}\n\
            Delhi,8118,Anand Vihar,28.6469,77.3159,pm25,182.5,2024-01-15T08:00:00Z\n\
            Delhi,8120,Okhla,,77.2713,pm25,150.0,2024-01-15T08:00:00Z\n\
            Delhi,8121,Dwarka,28.5921,NA,pm25,90.0,2024-01-15T08:00:00Z\n",
            HEADER
        );

        let readings = ReadingReader::new().parse_str(&content).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].latitude, Some(28.6469));
        assert_eq!(readings[1].latitude, None);
        assert_eq!(readings[1].longitude, Some(77.2713));
        assert_eq!(readings[2].longitude, None);
        assert_eq!(readings[2].value, Some(90.0));
    }

    #[test]
    fn test_missing_value_tokens_load_as_absent() {
        let mut content = HEADER.to_string();
        for token in ["NA", "N/A", "n/a", "null", "NULL", "None", "#N/A", "NaN", "nan", " "] {
            content.push_str(&format!(
                "\nPune,3,Karve Road,18.50,73.81,no2,{},2024-02-01T00:00:00Z",
                token
            ));
        }

        let readings = ReadingReader::new().parse_str(&content).unwrap();
        assert_eq!(readings.len(), 10);
        assert!(readings.iter().all(|r| r.value.is_none()));
    }

    #[test]
    fn test_read_file_buffered_and_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(
            temp_file,
            "Kolkata,7,Victoria,22.54,88.34,co,1.2,2022-12-01T23:00:00Z"
        )?;
        writeln!(
            temp_file,
            "Kolkata,7,Victoria,22.54,88.34,so2,8.5,2022-12-02T00:00:00Z"
        )?;
        temp_file.flush()?;

        let buffered = ReadingReader::new().read_table(temp_file.path())?;
        let mapped = ReadingReader::with_mmap(true).read_table(temp_file.path())?;

        assert_eq!(buffered.len(), 2);
        assert_eq!(buffered.readings(), mapped.readings());

        Ok(())
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = ReadingReader::new()
            .read_table(Path::new("does/not/exist.csv"))
            .unwrap_err();

        assert!(err.is_load_error());
        assert!(err.to_string().contains("does/not/exist.csv"));
    }

    #[test]
    fn test_empty_file_is_load_error() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        let err = ReadingReader::with_mmap(true)
            .read_table(temp_file.path())
            .unwrap_err();
        assert!(err.is_load_error());

        Ok(())
    }

    #[test]
    fn test_decode_bom_and_legacy_encoding() {
        let mut with_bom = vec![0xEF, 0xBB, 0xBF];
        with_bom.extend_from_slice(HEADER.as_bytes());
        assert_eq!(decode_text(&with_bom), HEADER);

        // "Thân" with a Windows-1252 'â'
        let legacy = [b'T', b'h', 0xE2, b'n'];
        assert_eq!(decode_text(&legacy), "Thân");
    }
}
