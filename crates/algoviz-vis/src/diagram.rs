//! Static diagrams: graph drawings and DP tables rendered in one pass.

use std::f64::consts::PI;
use std::fmt::Write as _;

use algoviz_trace::format::amount;
use algoviz_trace::MstEdge;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::render::PLACEHOLDER;

/// A position on the drawing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Sizes and colors used to draw a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStyle {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    pub radius: f64,
    pub node_radius: f64,
    pub node_fill: String,
    pub edge_stroke: String,
    pub weight_fill: String,
    /// Stroke of the edge added by the current step
    pub highlight_stroke: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            center: Point::new(300.0, 200.0),
            radius: 150.0,
            node_radius: 20.0,
            node_fill: "#2563eb".into(),
            edge_stroke: "#2563eb".into(),
            weight_fill: "#10b981".into(),
            highlight_stroke: "#f59e0b".into(),
        }
    }
}

/// Place every distinct endpoint evenly on a circle.
///
/// Nodes keep the order in which they first appear in `edges`; node `i` of
/// `N` sits at angle `2π·i/N`.
pub fn circle_layout(edges: &[MstEdge], center: Point, radius: f64) -> IndexMap<String, Point> {
    let mut nodes: IndexMap<String, Point> = IndexMap::new();
    for edge in edges {
        for label in [&edge.from, &edge.to] {
            nodes
                .entry(label.to_string())
                .or_insert(Point::new(0.0, 0.0));
        }
    }

    let count = nodes.len() as f64;
    for (i, point) in nodes.values_mut().enumerate() {
        let angle = 2.0 * PI * i as f64 / count;
        *point = Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        );
    }
    nodes
}

/// Draw the whole graph: edges, weight labels, then nodes on top.
pub fn render_graph_svg(edges: &[MstEdge], style: &GraphStyle) -> String {
    draw_graph(edges, edges.len(), style)
}

/// Draw the graph as it stands after the first `upto` edges were added.
///
/// Every node keeps its final position so the layout does not jump between
/// steps; the newest edge is highlighted.
pub fn render_graph_progress_svg(edges: &[MstEdge], upto: usize, style: &GraphStyle) -> String {
    draw_graph(edges, upto.min(edges.len()), style)
}

fn draw_graph(edges: &[MstEdge], upto: usize, style: &GraphStyle) -> String {
    let GraphStyle { width, height, .. } = *style;
    let mut svg = String::with_capacity(256 + edges.len() * 300);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="graph-svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#,
    );

    if edges.is_empty() {
        let _ = write!(
            svg,
            r##"<text x="{}" y="{}" text-anchor="middle" fill="#6b7280">{PLACEHOLDER}</text></svg>"##,
            style.center.x, style.center.y
        );
        return svg;
    }

    let layout = circle_layout(edges, style.center, style.radius);
    let newest = if upto < edges.len() { upto.checked_sub(1) } else { None };

    for (index, edge) in edges.iter().take(upto).enumerate() {
        let (Some(from), Some(to)) = (layout.get(edge.from.as_str()), layout.get(edge.to.as_str()))
        else {
            continue;
        };
        let stroke = if Some(index) == newest {
            &style.highlight_stroke
        } else {
            &style.edge_stroke
        };
        let _ = write!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2"/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            escape(stroke)
        );
        let mid = from.midpoint(to);
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="12" font-weight="bold">{}</text>"#,
            mid.x,
            mid.y - 5.0,
            escape(&style.weight_fill),
            amount(edge.weight)
        );
    }

    for (label, point) in &layout {
        let _ = write!(
            svg,
            r##"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="#fff" stroke-width="2"/>"##,
            point.x,
            point.y,
            style.node_radius,
            escape(&style.node_fill)
        );
        let _ = write!(
            svg,
            r##"<text x="{:.2}" y="{:.2}" fill="#fff" font-size="14" font-weight="bold" text-anchor="middle">{}</text>"##,
            point.x,
            point.y + 5.0,
            escape(label)
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Render a DP table with budget columns `0..W` and one row per project.
pub fn render_dp_table(table: &[Vec<f64>]) -> String {
    let columns = table.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return format!(r#"<p class="viz-placeholder">{PLACEHOLDER}</p>"#);
    }

    let mut html = String::from(r#"<table class="dp-table"><thead><tr><th>Proyecto\Presupuesto</th>"#);
    for w in 0..columns {
        let _ = write!(html, "<th>{w}</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for (i, row) in table.iter().enumerate() {
        let _ = write!(html, "<tr><th>Proyecto {i}</th>");
        for w in 0..columns {
            match row.get(w) {
                Some(cell) => {
                    let _ = write!(html, r#"<td class="dp-cell">{}</td>"#, amount(*cell));
                }
                None => html.push_str(r#"<td class="dp-cell"></td>"#),
            }
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

/// Escape text for XML and HTML content or attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
