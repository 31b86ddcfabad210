pub mod html_writer;
pub mod json_writer;
pub mod plotly;

pub use html_writer::HtmlWriter;
pub use json_writer::JsonWriter;

use crate::error::{DashboardError, Result};
use crate::utils::constants::{FORMAT_HTML, FORMAT_JSON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format.trim().to_lowercase().as_str() {
            FORMAT_HTML => Ok(OutputFormat::Html),
            FORMAT_JSON => Ok(OutputFormat::Json),
            _ => Err(DashboardError::InvalidFormat(format!(
                "Unsupported output format: {} (expected html or json)",
                format
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => FORMAT_HTML,
            OutputFormat::Json => FORMAT_JSON,
        }
    }
}
