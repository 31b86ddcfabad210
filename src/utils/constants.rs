/// Input file read when no path is configured
pub const DEFAULT_DATA_FILE: &str = "combined.csv";

/// Optional configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Environment prefix for configuration overrides (AQ_DASHBOARD__SERVER__BIND_ADDR, ...)
pub const CONFIG_ENV_PREFIX: &str = "AQ_DASHBOARD";

/// Column names
pub const COL_CITY: &str = "city";
pub const COL_LOCATION_ID: &str = "location_id";
pub const COL_LOCATION_NAME: &str = "location_name";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_PARAMETER: &str = "parameter";
pub const COL_VALUE: &str = "value";
pub const COL_DATETIME_UTC: &str = "datetimeUtc";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_CITY,
    COL_LOCATION_ID,
    COL_LOCATION_NAME,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_PARAMETER,
    COL_VALUE,
    COL_DATETIME_UTC,
];

/// Cell contents read as a missing number, compared case-insensitively
/// after trimming; an empty cell is missing as well
pub const MISSING_VALUE_TOKENS: [&str; 14] = [
    "NA", "N/A", "#N/A", "#N/A N/A", "#NA", "<NA>", "NaN", "-NaN", "null", "None", "-1.#IND",
    "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Dashboard defaults
pub const DEFAULT_TITLE: &str = "Air Quality Analytics & Visualization Dashboard - India";
pub const DEFAULT_REGION: &str = "India";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Page header: info panel, then the two description columns
pub const HEADER_INTRO: &str = "An interactive air quality analytics dashboard for city sensor \
readings. It explores pollution levels and regional trends through a set of interactive \
charts.";

pub const DATA_SOURCES_HEADING: &str = "Data Sources";
pub const DATA_SOURCES_LEAD: &str =
    "The dataset integrates readings from air quality monitoring sensors across the region:";
pub const DATA_SOURCES_ITEMS: [&str; 4] = [
    "City and location identifiers with sensor coordinates",
    "Timestamped readings for trend analysis",
    "Concentrations of PM2.5, PM10, NO\u{2082}, SO\u{2082}, CO and O\u{2083}",
    "One row per sensor, pollutant and timestamp in a single CSV file",
];

pub const DASHBOARD_FEATURES_HEADING: &str = "Dashboard Features";
pub const DASHBOARD_FEATURES_ITEMS: [&str; 5] = [
    "City-wise pollutant averages: compare pollution intensity across regions",
    "Interactive maps: explore where each city's sensors are placed",
    "Data volume overview: check the number of records and sensors per city",
    "Trends and patterns: monthly and hourly pollutant levels",
    "Correlation and composition: how pollutants move together and their share per city",
];

/// Map defaults
pub const DEFAULT_MAP_STYLE: &str = "carto-positron";
pub const DEFAULT_MAP_ZOOM: f64 = 10.0;
pub const DEFAULT_MAP_HEIGHT: u32 = 550;

/// Donut defaults
pub const DEFAULT_DONUT_HEIGHT: u32 = 500;
pub const DONUT_HOLE: f64 = 0.4;

/// Heatmap annotation format
pub const HEATMAP_VALUE_FORMAT: &str = ".2f";

/// Minimum pairwise observations for a correlation coefficient
pub const MIN_CORRELATION_OBSERVATIONS: usize = 2;

/// Continuous color scales (Plotly names)
pub const SCALE_VIRIDIS: &str = "Viridis";
pub const SCALE_INFERNO: &str = "Inferno";

/// Qualitative Set2 palette, used for city series
pub const PALETTE_SET2: [&str; 8] = [
    "rgb(102,194,165)",
    "rgb(252,141,98)",
    "rgb(141,160,203)",
    "rgb(231,138,195)",
    "rgb(166,216,84)",
    "rgb(255,217,47)",
    "rgb(229,196,148)",
    "rgb(179,179,179)",
];

/// Sequential inferno palette, used for donut slices
pub const PALETTE_INFERNO: [&str; 10] = [
    "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60", "#cf4446", "#ed6925", "#fb9b06",
    "#f7d13d", "#fcffa4",
];

/// Fallback series color for parameter codes outside the known pollutants
pub const UNKNOWN_POLLUTANT_COLOR: &str = "#7f7f7f";

/// Plotly bundle served to the browser
pub const PLOTLY_CDN_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Output formats
pub const FORMAT_HTML: &str = "html";
pub const FORMAT_JSON: &str = "json";
