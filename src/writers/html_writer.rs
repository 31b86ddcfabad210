use crate::error::{DashboardError, Result};
use crate::utils::constants::{
    DASHBOARD_FEATURES_HEADING, DASHBOARD_FEATURES_ITEMS, DATA_SOURCES_HEADING,
    DATA_SOURCES_ITEMS, DATA_SOURCES_LEAD, HEADER_INTRO, PLOTLY_CDN_URL,
};
use crate::views::{Dashboard, TabContent};
use crate::writers::plotly::figure;
use std::fmt::{self, Write};
use std::fs;
use std::path::Path;
use tracing::info;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #fafafa; color: #262730; }
header { padding: 1.5rem 2rem 0.5rem; }
header h1 { margin: 0; font-size: 1.8rem; }
header div.info { margin: 0.75rem 0; padding: 0.75rem 1rem; background: #e8f0fe; color: #1c3d7a; border-radius: 4px; }
header div.info p { margin: 0.25rem 0; }
header div.columns { display: flex; flex-wrap: wrap; gap: 2rem; }
header div.column { flex: 1 1 20rem; }
header h3 { margin: 0.5rem 0 0.25rem; font-size: 1.1rem; }
header ul { margin: 0.25rem 0; padding-left: 1.25rem; color: #3d4049; }
nav { display: flex; flex-wrap: wrap; gap: 0.25rem; padding: 0 2rem; border-bottom: 1px solid #ddd; }
nav button { border: none; background: none; padding: 0.75rem 1rem; cursor: pointer; font-size: 0.95rem; color: #6c6f7a; border-bottom: 2px solid transparent; }
nav button.active { color: #ff4b4b; border-bottom-color: #ff4b4b; }
section.tab { display: none; padding: 1rem 2rem; }
section.tab.active { display: block; }
div.chart { margin-bottom: 2rem; background: #fff; }
p.failed { color: #b00020; background: #fdecea; padding: 1rem; border-radius: 4px; }
"#;

// Charts in hidden tabs size themselves wrongly, so each tab plots on first show
const SCRIPT: &str = r#"
(function () {
  var figures = JSON.parse(document.getElementById("dashboard-figures").textContent);
  var drawn = {};
  function show(slug) {
    document.querySelectorAll("section.tab").forEach(function (s) {
      s.classList.toggle("active", s.id === "tab-" + slug);
    });
    document.querySelectorAll("nav button").forEach(function (b) {
      b.classList.toggle("active", b.dataset.tab === slug);
    });
    if (!drawn[slug]) {
      (figures[slug] || []).forEach(function (fig, i) {
        Plotly.newPlot("chart-" + slug + "-" + i, fig.data, fig.layout, { responsive: true });
      });
      drawn[slug] = true;
    }
  }
  document.querySelectorAll("nav button").forEach(function (b) {
    b.addEventListener("click", function () { show(b.dataset.tab); });
  });
  var first = document.querySelector("nav button");
  if (first) { show(first.dataset.tab); }
})();
"#;

/// Renders a dashboard as one self-contained HTML page driven by Plotly.js
pub struct HtmlWriter {
    plotly_url: String,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self {
            plotly_url: PLOTLY_CDN_URL.to_string(),
        }
    }

    pub fn with_plotly_url(mut self, url: impl Into<String>) -> Self {
        self.plotly_url = url.into();
        self
    }

    pub fn render(&self, dashboard: &Dashboard) -> Result<String> {
        let mut figures = serde_json::Map::new();
        for tab in &dashboard.tabs {
            let tab_figures: Vec<serde_json::Value> = tab.charts().iter().map(figure).collect();
            figures.insert(
                tab.view.slug().to_string(),
                serde_json::Value::Array(tab_figures),
            );
        }
        let figures_json = script_safe(&serde_json::to_string(&figures)?);

        let mut html = String::with_capacity(16 * 1024);
        self.write_page(&mut html, dashboard, &figures_json)
            .map_err(|e| DashboardError::InvalidFormat(format!("HTML rendering failed: {}", e)))?;

        Ok(html)
    }

    fn write_page(
        &self,
        out: &mut impl Write,
        dashboard: &Dashboard,
        figures_json: &str,
    ) -> fmt::Result {
        let title = escape_html(&dashboard.title);

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">\n<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(
            out,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(out, "<title>{}</title>", title)?;
        writeln!(
            out,
            "<script src=\"{}\" charset=\"utf-8\"></script>",
            escape_html(&self.plotly_url)
        )?;
        writeln!(out, "<style>{}</style>", STYLE)?;
        writeln!(out, "</head>\n<body>")?;

        write_header(out, &title, dashboard.record_count)?;
        write_tabs(out, dashboard)?;

        writeln!(
            out,
            "<script type=\"application/json\" id=\"dashboard-figures\">{}</script>",
            figures_json
        )?;
        writeln!(out, "<script>{}</script>", SCRIPT)?;
        writeln!(out, "</body>\n</html>")
    }

    /// Render and write to `path`, creating parent directories
    pub fn write(&self, dashboard: &Dashboard, path: &Path) -> Result<()> {
        let html = self.render(dashboard)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, html.as_bytes())?;

        info!(path = %path.display(), bytes = html.len(), "Wrote HTML dashboard");
        Ok(())
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Title, info panel and the two description columns
fn write_header(out: &mut impl Write, title: &str, record_count: usize) -> fmt::Result {
    writeln!(out, "<header>\n<h1>{}</h1>", title)?;
    writeln!(
        out,
        "<div class=\"info\"><p>{}</p><p>Built from {} readings.</p></div>",
        escape_html(HEADER_INTRO),
        record_count
    )?;

    writeln!(out, "<div class=\"columns\">")?;
    writeln!(out, "<div class=\"column\">\n<h3>{}</h3>", DATA_SOURCES_HEADING)?;
    writeln!(out, "<p>{}</p>", escape_html(DATA_SOURCES_LEAD))?;
    write_list(out, &DATA_SOURCES_ITEMS)?;
    writeln!(out, "</div>")?;
    writeln!(out, "<div class=\"column\">\n<h3>{}</h3>", DASHBOARD_FEATURES_HEADING)?;
    write_list(out, &DASHBOARD_FEATURES_ITEMS)?;
    writeln!(out, "</div>\n</div>")?;

    writeln!(out, "</header>")
}

fn write_list(out: &mut impl Write, items: &[&str]) -> fmt::Result {
    writeln!(out, "<ul>")?;
    for item in items {
        writeln!(out, "<li>{}</li>", escape_html(item))?;
    }
    writeln!(out, "</ul>")
}

/// Tab bar plus one section per view; failed views show their error
fn write_tabs(out: &mut impl Write, dashboard: &Dashboard) -> fmt::Result {
    writeln!(out, "<nav>")?;
    for tab in &dashboard.tabs {
        writeln!(
            out,
            "<button type=\"button\" data-tab=\"{}\">{}</button>",
            tab.view.slug(),
            escape_html(&tab.title)
        )?;
    }
    writeln!(out, "</nav>")?;

    for tab in &dashboard.tabs {
        let slug = tab.view.slug();
        writeln!(out, "<section class=\"tab\" id=\"tab-{}\">", slug)?;
        match &tab.content {
            TabContent::Rendered { charts } => {
                for i in 0..charts.len() {
                    writeln!(out, "<div class=\"chart\" id=\"chart-{}-{}\"></div>", slug, i)?;
                }
            }
            TabContent::Failed { error } => {
                writeln!(
                    out,
                    "<p class=\"failed\">This view could not be rendered: {}</p>",
                    escape_html(error)
                )?;
            }
        }
        writeln!(out, "</section>")?;
    }

    Ok(())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep embedded JSON from closing its `<script>` element early
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
