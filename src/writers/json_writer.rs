use crate::error::Result;
use crate::views::Dashboard;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the renderer-independent chart specs as pretty-printed JSON
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, dashboard: &Dashboard) -> Result<String> {
        Ok(serde_json::to_string_pretty(dashboard)?)
    }

    pub fn write(&self, dashboard: &Dashboard, path: &Path) -> Result<()> {
        let json = self.render(dashboard)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json.as_bytes())?;

        info!(path = %path.display(), bytes = json.len(), "Wrote JSON dashboard");
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReadingTable;
    use crate::views::{build_dashboard, ViewSettings};
    use tempfile::TempDir;

    #[test]
    fn test_write_json() -> Result<()> {
        let dashboard = build_dashboard(&ReadingTable::default(), &ViewSettings::default());
        let dir = TempDir::new()?;
        let path = dir.path().join("dash.json");

        JsonWriter::new().write(&dashboard, &path)?;

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(value["record_count"], 0);
        assert_eq!(value["tabs"].as_array().map(Vec::len), Some(7));
        assert_eq!(value["tabs"][0]["charts"][0]["chart"]["type"], "bar");
        Ok(())
    }
}
