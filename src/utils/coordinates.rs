use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Arithmetic mean of a set of (latitude, longitude) pairs, used to center
/// per-city maps. Absent components are skipped per axis; there is no
/// center unless both axes have at least one value.
///
/// # Examples
/// ```
/// use aq_dashboard::utils::coordinates::{mean_center, LatLon};
///
/// let center = mean_center([
///     (Some(28.0), Some(77.0)),
///     (Some(29.0), Some(78.0)),
///     (None, Some(79.0)),
/// ])
/// .unwrap();
/// assert_eq!(center, LatLon::new(28.5, 78.0));
/// ```
pub fn mean_center<I>(points: I) -> Option<LatLon>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let (mut lat_sum, mut lat_count) = (0.0, 0usize);
    let (mut lon_sum, mut lon_count) = (0.0, 0usize);

    for (lat, lon) in points {
        if let Some(lat) = lat {
            lat_sum += lat;
            lat_count += 1;
        }
        if let Some(lon) = lon {
            lon_sum += lon;
            lon_count += 1;
        }
    }

    if lat_count == 0 || lon_count == 0 {
        None
    } else {
        Some(LatLon::new(
            lat_sum / lat_count as f64,
            lon_sum / lon_count as f64,
        ))
    }
}
