//! HTTP surface for the dashboard.
//!
//! Every request performs its own load-then-render pass against the CSV on
//! disk, so edits to the file show up on the next page load.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{error, info};

use crate::error::{DashboardError, Result};
use crate::readers::ReadingReader;
use crate::views::{build_dashboard, Dashboard, ViewSettings};
use crate::writers::HtmlWriter;

#[derive(Debug, Clone)]
pub struct ServerState {
    pub data_path: PathBuf,
    pub settings: ViewSettings,
    pub use_mmap: bool,
}

/// Error returned by a handler; rendered as a plain-text 500 page
#[derive(Debug)]
pub struct ServerError(DashboardError);

impl From<DashboardError> for ServerError {
    fn from(e: DashboardError) -> Self {
        ServerError(e)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/dashboard.json", get(dashboard_json))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn serve(state: ServerState, bind_addr: &str) -> Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| DashboardError::Server(format!("invalid bind addr {bind_addr}: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, data = %state.data_path.display(), "Serving dashboard");

    axum::serve(listener, router(state).into_make_service())
        .await
        .map_err(|e| DashboardError::Server(e.to_string()))
}

/// Load the CSV on the blocking pool, then build the views
async fn load_dashboard(state: &ServerState) -> Result<Dashboard> {
    let path = state.data_path.clone();
    let use_mmap = state.use_mmap;
    let table =
        tokio::task::spawn_blocking(move || ReadingReader::with_mmap(use_mmap).read_table(&path))
            .await??;

    Ok(build_dashboard(&table, &state.settings))
}

pub async fn dashboard_page(
    State(state): State<ServerState>,
) -> std::result::Result<Html<String>, ServerError> {
    let dashboard = load_dashboard(&state).await?;
    let html = HtmlWriter::new().render(&dashboard)?;
    Ok(Html(html))
}

pub async fn dashboard_json(
    State(state): State<ServerState>,
) -> std::result::Result<Json<Dashboard>, ServerError> {
    Ok(Json(load_dashboard(&state).await?))
}

pub async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
city,location_id,location_name,latitude,longitude,parameter,value,datetimeUtc
Delhi,8118,Anand Vihar,28.6469,77.3159,pm25,182.0,2024-01-15T06:00:00Z
Delhi,8118,Anand Vihar,28.6469,77.3159,no2,64.0,2024-01-15T06:00:00Z
Pune,5542,Karve Road,18.5018,73.8166,pm25,48.0,2024-01-15T06:00:00Z
Pune,5542,Karve Road,18.5018,73.8166,no2,21.0,2024-01-15T06:00:00Z
";

    fn state_for(path: PathBuf) -> ServerState {
        ServerState {
            data_path: path,
            settings: ViewSettings::default(),
            use_mmap: false,
        }
    }

    #[tokio::test]
    async fn test_dashboard_page_renders() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let Html(html) = dashboard_page(State(state_for(file.path().to_path_buf())))
            .await
            .unwrap();

        assert!(html.contains("Total Records per City"));
        assert!(html.contains("Sensor Locations in Delhi (2024)"));
    }

    #[tokio::test]
    async fn test_dashboard_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let Json(dashboard) = dashboard_json(State(state_for(file.path().to_path_buf())))
            .await
            .unwrap();

        assert_eq!(dashboard.record_count, 4);
        assert_eq!(dashboard.tabs.len(), 7);
    }

    #[tokio::test]
    async fn test_missing_file_is_a_500() {
        let result = dashboard_page(State(state_for(PathBuf::from("no/such/combined.csv")))).await;

        let err = result.unwrap_err();
        assert!(err.0.is_load_error());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_healthz() {
        assert_eq!(healthz().await, "ok");
    }
}
