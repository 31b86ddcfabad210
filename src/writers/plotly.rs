//! Conversion of chart specs into Plotly.js figure objects.

use serde_json::{json, Map, Value};

use crate::models::{
    AreaChart, AxisValue, BarChart, Chart, ChartSpec, DonutChart, Heatmap, ScatterMap,
};

/// Build a `{ "data": [...], "layout": {...} }` figure for Plotly.newPlot
pub fn figure(spec: &ChartSpec) -> Value {
    let (data, mut layout) = match &spec.chart {
        Chart::Bar(bar) => bar_figure(bar),
        Chart::ScatterMap(map) => scatter_map_figure(map),
        Chart::Area(area) => area_figure(area),
        Chart::Heatmap(heatmap) => heatmap_figure(heatmap),
        Chart::Donut(donut) => donut_figure(donut),
    };

    layout.insert("title".to_string(), json!({ "text": spec.title }));
    if let Some(height) = spec.height {
        layout.insert("height".to_string(), json!(height));
    }

    json!({ "data": data, "layout": Value::Object(layout) })
}

fn axis_titles(x_label: &str, y_label: &str) -> Map<String, Value> {
    let mut layout = Map::new();
    layout.insert("xaxis".to_string(), json!({ "title": { "text": x_label } }));
    layout.insert("yaxis".to_string(), json!({ "title": { "text": y_label } }));
    layout
}

/// Bar label text: whole numbers without decimals, means with two
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn bar_figure(bar: &BarChart) -> (Value, Map<String, Value>) {
    let labels: Vec<&str> = bar.labels();
    let values: Vec<f64> = bar.bars.iter().map(|b| b.value).collect();
    let text: Vec<String> = values.iter().map(|v| format_value(*v)).collect();

    let data = json!([{
        "type": "bar",
        "x": labels,
        "y": values,
        "text": text,
        "textposition": "auto",
        "marker": {
            "color": values,
            "colorscale": bar.color_scale,
            "showscale": true,
            "colorbar": { "title": { "text": bar.y_label } }
        }
    }]);

    let mut layout = axis_titles(&bar.x_label, &bar.y_label);
    // Keep the ranked order instead of Plotly's category sorting
    layout.insert(
        "xaxis".to_string(),
        json!({
            "title": { "text": bar.x_label },
            "categoryorder": "array",
            "categoryarray": labels
        }),
    );
    (data, layout)
}

fn scatter_map_figure(map: &ScatterMap) -> (Value, Map<String, Value>) {
    let lat: Vec<f64> = map.points.iter().map(|p| p.latitude).collect();
    let lon: Vec<f64> = map.points.iter().map(|p| p.longitude).collect();
    let names: Vec<&str> = map.points.iter().map(|p| p.location_name.as_str()).collect();
    let ids: Vec<&str> = map.points.iter().map(|p| p.location_id.as_str()).collect();

    let data = json!([{
        "type": "scattermapbox",
        "mode": "markers",
        "name": map.series_name,
        "lat": lat,
        "lon": lon,
        "text": names,
        "customdata": ids,
        "marker": { "size": 10 },
        "hovertemplate": "<b>%{text}</b><br>location_id=%{customdata}<br>latitude=%{lat:.3f}<br>longitude=%{lon:.3f}<extra></extra>"
    }]);

    let mut layout = Map::new();
    layout.insert(
        "mapbox".to_string(),
        json!({
            "style": map.style,
            "center": { "lat": map.center.lat, "lon": map.center.lon },
            "zoom": map.zoom
        }),
    );
    layout.insert("showlegend".to_string(), json!(true));
    layout.insert(
        "margin".to_string(),
        json!({ "l": 0, "r": 0, "t": 48, "b": 0 }),
    );
    (data, layout)
}

fn area_figure(area: &AreaChart) -> (Value, Map<String, Value>) {
    let traces: Vec<Value> = area
        .series
        .iter()
        .map(|series| {
            let x: Vec<&AxisValue> = series.points.iter().map(|p| &p.x).collect();
            let y: Vec<f64> = series.points.iter().map(|p| p.y).collect();

            let mut trace = json!({
                "type": "scatter",
                "mode": "lines",
                "name": series.name,
                "x": x,
                "y": y,
                "line": { "color": series.color }
            });
            if let Value::Object(fields) = &mut trace {
                if area.stacked {
                    fields.insert("stackgroup".to_string(), json!("one"));
                } else {
                    fields.insert("fill".to_string(), json!("tozeroy"));
                }
            }
            trace
        })
        .collect();

    let mut layout = axis_titles(&area.x_label, &area.y_label);
    if !area.x_categories.is_empty() {
        layout.insert(
            "xaxis".to_string(),
            json!({
                "title": { "text": area.x_label },
                "type": "category",
                "categoryorder": "array",
                "categoryarray": area.x_categories
            }),
        );
    }
    (Value::Array(traces), layout)
}

fn heatmap_figure(heatmap: &Heatmap) -> (Value, Map<String, Value>) {
    let data = json!([{
        "type": "heatmap",
        "x": heatmap.labels,
        "y": heatmap.labels,
        "z": heatmap.values,
        "colorscale": heatmap.color_scale,
        "texttemplate": format!("%{{z:{}}}", heatmap.value_format),
        "xgap": 1,
        "ygap": 1,
        "colorbar": { "title": { "text": heatmap.colorbar_title } }
    }]);

    let mut layout = Map::new();
    layout.insert("xaxis".to_string(), json!({ "side": "bottom" }));
    layout.insert(
        "yaxis".to_string(),
        json!({ "autorange": "reversed", "scaleanchor": "x" }),
    );
    (data, layout)
}

fn donut_figure(donut: &DonutChart) -> (Value, Map<String, Value>) {
    let labels: Vec<&str> = donut.slices.iter().map(|s| s.label.as_str()).collect();
    let values: Vec<f64> = donut.slices.iter().map(|s| s.value).collect();
    let colors: Vec<&str> = donut.slices.iter().map(|s| s.color.as_str()).collect();

    let data = json!([{
        "type": "pie",
        "labels": labels,
        "values": values,
        "hole": donut.hole,
        "sort": false,
        "marker": { "colors": colors }
    }]);

    (data, Map::new())
}
