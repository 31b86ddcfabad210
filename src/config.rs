use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_BIND_ADDR, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE,
    DEFAULT_DONUT_HEIGHT, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_STYLE, DEFAULT_MAP_ZOOM, DEFAULT_REGION,
    DEFAULT_TITLE,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    pub style: String,
    pub zoom: f64,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub donut_height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub title: String,
    pub region: String,
    pub use_mmap: bool,
    pub server: ServerConfig,
    pub maps: MapConfig,
    pub charts: ChartConfig,
}

impl DashboardConfig {
    /// Layered load: built-in defaults, then the config file, then
    /// `AQ_DASHBOARD__*` environment variables
    ///
    /// An explicit `path` must exist; the default `dashboard.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Self::defaults()?
            .add_source(file_source)
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__"))
            .build()?;

        let loaded: DashboardConfig = config.try_deserialize()?;
        debug!(?loaded, "Configuration loaded");
        Ok(loaded)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("data_path", DEFAULT_DATA_FILE)?
            .set_default("title", DEFAULT_TITLE)?
            .set_default("region", DEFAULT_REGION)?
            .set_default("use_mmap", false)?
            .set_default("server.bind_addr", DEFAULT_BIND_ADDR)?
            .set_default("maps.style", DEFAULT_MAP_STYLE)?
            .set_default("maps.zoom", DEFAULT_MAP_ZOOM)?
            .set_default("maps.height", DEFAULT_MAP_HEIGHT as i64)?
            .set_default("charts.donut_height", DEFAULT_DONUT_HEIGHT as i64)?)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            title: DEFAULT_TITLE.to_string(),
            region: DEFAULT_REGION.to_string(),
            use_mmap: false,
            server: ServerConfig {
                bind_addr: DEFAULT_BIND_ADDR.to_string(),
            },
            maps: MapConfig {
                style: DEFAULT_MAP_STYLE.to_string(),
                zoom: DEFAULT_MAP_ZOOM,
                height: DEFAULT_MAP_HEIGHT,
            },
            charts: ChartConfig {
                donut_height: DEFAULT_DONUT_HEIGHT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "data_path = \"data/cities.csv\"")?;
        writeln!(file, "region = \"Maharashtra\"")?;
        writeln!(file, "[maps]")?;
        writeln!(file, "zoom = 11.5")?;
        file.flush()?;

        let config = DashboardConfig::load(Some(file.path()))?;

        assert_eq!(config.data_path, PathBuf::from("data/cities.csv"));
        assert_eq!(config.region, "Maharashtra");
        assert_eq!(config.maps.zoom, 11.5);
        // Untouched keys keep their defaults
        assert_eq!(config.maps.style, DEFAULT_MAP_STYLE);
        assert_eq!(config.maps.height, DEFAULT_MAP_HEIGHT);
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.server.bind_addr, DEFAULT_BIND_ADDR);

        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(DashboardConfig::load(Some(Path::new("no/such/dashboard.toml"))).is_err());
    }

    #[test]
    fn test_default_matches_builtin_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("combined.csv"));
        assert_eq!(config.charts.donut_height, 500);
        assert!(!config.use_mmap);
    }
}
