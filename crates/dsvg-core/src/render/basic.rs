//! Small draw.io renderer: shapes, straight edges and labels.

use std::collections::HashMap;

use super::stylesheet::{CellStyle, Stylesheet};
use super::{RenderOptions, Renderer};
use crate::decode::GRAPH_MODEL_TAG;
use crate::error::RenderError;
use crate::parser::XmlParser;
use crate::tree::{Element, Node};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
const EXTENSIBILITY_FEATURE: &str = "http://www.w3.org/TR/SVG11/feature#Extensibility";

/// Margin around the drawing, in pixels.
const BORDER: f64 = 1.0;
/// Arrow head length, in pixels.
const ARROW_SIZE: f64 = 8.0;

/// Renders vertices as boxes, ellipses or rhombi and edges as polylines.
///
/// Labels with `html=1` become `foreignObject` content; their markup is kept,
/// so `<font>` and friends survive into the SVG. Other labels become `<text>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRenderer;

impl BasicRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for BasicRenderer {
    fn render(
        &self,
        model: &Element,
        stylesheet: &Stylesheet,
        options: &RenderOptions,
    ) -> Result<Element, RenderError> {
        if !model.is(GRAPH_MODEL_TAG) {
            return Err(RenderError(format!(
                "expected <{GRAPH_MODEL_TAG}>, found <{}>",
                model.name
            )));
        }

        let cells = model
            .find_child("root")
            .map(collect_cells)
            .unwrap_or_default();
        let layout = Layout::new(cells);
        let mut canvas = Canvas::new();

        for cell in &layout.cells {
            if !layout.is_visible(cell) {
                continue;
            }
            if cell.vertex {
                draw_vertex(&mut canvas, &layout, cell, stylesheet, options);
            } else if cell.edge {
                draw_edge(&mut canvas, &layout, cell, stylesheet, options);
            }
        }

        Ok(canvas.finish())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    fn offset(self, by: Point) -> Point {
        Point {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn center(self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

#[derive(Debug, Default)]
struct Geometry {
    bounds: Rect,
    source_point: Option<Point>,
    target_point: Option<Point>,
    points: Vec<Point>,
}

#[derive(Debug)]
struct Cell<'a> {
    id: &'a str,
    parent: Option<&'a str>,
    value: &'a str,
    style: Option<&'a str>,
    vertex: bool,
    edge: bool,
    visible: bool,
    source: Option<&'a str>,
    target: Option<&'a str>,
    geometry: Option<Geometry>,
}

impl<'a> Cell<'a> {
    /// `wrapper` is the `object`/`UserObject` carrying id and label, or the
    /// cell itself.
    fn new(wrapper: &'a Element, cell: &'a Element, value: Option<&'a str>) -> Self {
        Self {
            id: wrapper.attr("id").unwrap_or_default(),
            parent: cell.attr("parent"),
            value: value.unwrap_or_default(),
            style: cell.attr("style"),
            vertex: cell.attr("vertex") == Some("1"),
            edge: cell.attr("edge") == Some("1"),
            visible: cell.attr("visible") != Some("0"),
            source: cell.attr("source"),
            target: cell.attr("target"),
            geometry: cell.find_child("mxGeometry").map(parse_geometry),
        }
    }
}

fn collect_cells(root: &Element) -> Vec<Cell<'_>> {
    root.elements()
        .filter_map(|el| match el.name.as_str() {
            "mxCell" => Some(Cell::new(el, el, el.attr("value"))),
            "object" | "UserObject" => el
                .find_child("mxCell")
                .map(|cell| Cell::new(el, cell, el.attr("label"))),
            _ => None,
        })
        .collect()
}

fn parse_geometry(el: &Element) -> Geometry {
    let mut geometry = Geometry {
        bounds: Rect {
            x: attr_num(el, "x"),
            y: attr_num(el, "y"),
            width: attr_num(el, "width"),
            height: attr_num(el, "height"),
        },
        ..Default::default()
    };
    for child in el.elements() {
        match (child.name.as_str(), child.attr("as")) {
            ("mxPoint", Some("sourcePoint")) => geometry.source_point = Some(parse_point(child)),
            ("mxPoint", Some("targetPoint")) => geometry.target_point = Some(parse_point(child)),
            ("Array", Some("points")) => {
                geometry.points = child
                    .elements()
                    .filter(|p| p.is("mxPoint"))
                    .map(parse_point)
                    .collect();
            }
            _ => {}
        }
    }
    geometry
}

fn parse_point(el: &Element) -> Point {
    Point {
        x: attr_num(el, "x"),
        y: attr_num(el, "y"),
    }
}

fn attr_num(el: &Element, name: &str) -> f64 {
    el.attr(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

/// Cells indexed by id, for parent-relative geometry.
struct Layout<'a> {
    cells: Vec<Cell<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Layout<'a> {
    fn new(cells: Vec<Cell<'a>>) -> Self {
        let index = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.id, i))
            .collect();
        Self { cells, index }
    }

    fn get(&self, id: &str) -> Option<&Cell<'a>> {
        self.index.get(id).map(|&i| &self.cells[i])
    }

    /// Ancestors of a cell, nearest first. Stops on cycles.
    fn ancestors(&self, cell: &Cell<'a>) -> impl Iterator<Item = &Cell<'a>> {
        let mut current = cell.parent;
        let mut remaining = self.cells.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let parent = self.get(current?)?;
            current = parent.parent;
            Some(parent)
        })
    }

    fn is_visible(&self, cell: &Cell<'a>) -> bool {
        cell.visible && self.ancestors(cell).all(|a| a.visible)
    }

    /// Absolute position that a cell's geometry is relative to.
    fn origin(&self, cell: &Cell<'a>) -> Point {
        self.ancestors(cell)
            .filter(|a| a.vertex)
            .filter_map(|a| a.geometry.as_ref())
            .fold(Point::default(), |acc, g| Point {
                x: acc.x + g.bounds.x,
                y: acc.y + g.bounds.y,
            })
    }

    fn absolute_bounds(&self, cell: &Cell<'a>) -> Option<Rect> {
        let bounds = cell.geometry.as_ref()?.bounds;
        let origin = self.origin(cell);
        Some(Rect {
            x: bounds.x + origin.x,
            y: bounds.y + origin.y,
            ..bounds
        })
    }

    fn terminal_center(&self, id: Option<&str>) -> Option<Point> {
        let cell = self.get(id?)?;
        self.absolute_bounds(cell).map(Rect::center)
    }
}

/// Drawing surface collecting groups and the extent of the drawing.
struct Canvas {
    layer: Element,
    extent: Option<(Point, Point)>,
}

impl Canvas {
    fn new() -> Self {
        Self {
            layer: Element::new("g"),
            extent: None,
        }
    }

    fn push(&mut self, element: Element) {
        self.layer.children.push(Node::Element(element));
    }

    fn include(&mut self, p: Point) {
        self.extent = Some(match self.extent {
            None => (p, p),
            Some((min, max)) => (
                Point {
                    x: min.x.min(p.x),
                    y: min.y.min(p.y),
                },
                Point {
                    x: max.x.max(p.x),
                    y: max.y.max(p.y),
                },
            ),
        });
    }

    fn include_rect(&mut self, r: Rect) {
        self.include(Point { x: r.x, y: r.y });
        self.include(Point {
            x: r.x + r.width,
            y: r.y + r.height,
        });
    }

    fn finish(self) -> Element {
        let (min, max) = self.extent.unwrap_or_default();
        let width = max.x - min.x + 2.0 * BORDER;
        let height = max.y - min.y + 2.0 * BORDER;

        Element::new("svg")
            .with_attr("xmlns", SVG_NS)
            .with_attr("xmlns:xlink", XLINK_NS)
            .with_attr("version", "1.1")
            .with_attr("width", format!("{}px", num(width.ceil())))
            .with_attr("height", format!("{}px", num(height.ceil())))
            .with_attr(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    num(min.x - BORDER),
                    num(min.y - BORDER),
                    num(width),
                    num(height)
                ),
            )
            .with_child(Element::new("defs"))
            .with_child(self.layer)
    }
}

fn draw_vertex(
    canvas: &mut Canvas,
    layout: &Layout<'_>,
    cell: &Cell<'_>,
    stylesheet: &Stylesheet,
    options: &RenderOptions,
) {
    let Some(bounds) = layout.absolute_bounds(cell) else {
        return;
    };
    let style = stylesheet.resolve(cell.style, false);
    canvas.include_rect(bounds);

    if let Some(shape) = vertex_shape(&style, bounds) {
        canvas.push(
            Element::new("g")
                .with_attr("data-cell-id", cell.id)
                .with_child(shape),
        );
    }
    if !cell.value.is_empty() {
        canvas.push(label(cell.value, &style, bounds, options));
    }
}

fn vertex_shape(style: &CellStyle, b: Rect) -> Option<Element> {
    let shape = match style.shape() {
        "text" => return None,
        "ellipse" => {
            let c = b.center();
            Element::new("ellipse")
                .with_attr("cx", num(c.x))
                .with_attr("cy", num(c.y))
                .with_attr("rx", num(b.width / 2.0))
                .with_attr("ry", num(b.height / 2.0))
        }
        "rhombus" => {
            let c = b.center();
            let d = format!(
                "M {} {} L {} {} L {} {} L {} {} Z",
                num(c.x),
                num(b.y),
                num(b.x + b.width),
                num(c.y),
                num(c.x),
                num(b.y + b.height),
                num(b.x),
                num(c.y)
            );
            Element::new("path").with_attr("d", d)
        }
        _ => {
            let mut rect = Element::new("rect")
                .with_attr("x", num(b.x))
                .with_attr("y", num(b.y))
                .with_attr("width", num(b.width))
                .with_attr("height", num(b.height));
            if style.flag("rounded") {
                let radius = b.width.min(b.height) * style.number("arcSize", 20.0) / 200.0;
                rect.set_attr("rx", num(radius));
                rect.set_attr("ry", num(radius));
            }
            rect
        }
    };
    let shape = paint(shape, style, style.get_or("fillColor", "none"));
    Some(shape.with_attr("pointer-events", "all"))
}

/// Apply fill, stroke, stroke width and opacity from a cell style.
fn paint(element: Element, style: &CellStyle, fill: &str) -> Element {
    let mut element = element
        .with_attr("fill", fill)
        .with_attr("stroke", style.get_or("strokeColor", "none"));
    let stroke_width = style.number("strokeWidth", 1.0);
    if (stroke_width - 1.0).abs() > f64::EPSILON {
        element.set_attr("stroke-width", num(stroke_width));
    }
    let opacity = style.number("opacity", 100.0);
    if opacity < 100.0 {
        element.set_attr("opacity", num(opacity / 100.0));
    }
    element
}

fn draw_edge(
    canvas: &mut Canvas,
    layout: &Layout<'_>,
    cell: &Cell<'_>,
    stylesheet: &Stylesheet,
    options: &RenderOptions,
) {
    let style = stylesheet.resolve(cell.style, true);
    let origin = layout.origin(cell);
    let geometry = cell.geometry.as_ref();

    let start = layout
        .terminal_center(cell.source)
        .or_else(|| geometry.and_then(|g| g.source_point).map(|p| p.offset(origin)));
    let end = layout
        .terminal_center(cell.target)
        .or_else(|| geometry.and_then(|g| g.target_point).map(|p| p.offset(origin)));
    let (Some(start), Some(end)) = (start, end) else {
        tracing::debug!(cell = cell.id, "Skipping edge without both terminals");
        return;
    };

    let mut points = vec![start];
    points.extend(geometry.iter().flat_map(|g| g.points.iter().map(move |p| p.offset(origin))));
    points.push(end);
    for &p in &points {
        canvas.include(p);
    }

    let line = Element::new("path")
        .with_attr("d", path_data(&points))
        .with_attr("stroke-miterlimit", "10");
    let mut group = Element::new("g")
        .with_attr("data-cell-id", cell.id)
        .with_child(paint(line, &style, "none").with_attr("pointer-events", "stroke"));

    if style.get_or("endArrow", "none") != "none"
        && let [.., from, to] = points.as_slice()
        && let Some(arrow) = arrow_head(*from, *to, &style)
    {
        group = group.with_child(arrow);
    }
    canvas.push(group);

    if !cell.value.is_empty() {
        let mid = midpoint(&points);
        let anchor = Rect {
            x: mid.x,
            y: mid.y,
            width: 0.0,
            height: 0.0,
        };
        canvas.push(label(cell.value, &style, anchor, options));
    }
}

fn path_data(points: &[Point]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let cmd = if i == 0 { "M" } else { "L" };
            format!("{cmd} {} {}", num(p.x), num(p.y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn arrow_head(from: Point, to: Point, style: &CellStyle) -> Option<Element> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    if len < f64::EPSILON {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let base = Point {
        x: to.x - ux * ARROW_SIZE,
        y: to.y - uy * ARROW_SIZE,
    };
    let half = ARROW_SIZE / 2.0;
    let d = format!(
        "M {} {} L {} {} L {} {} Z",
        num(to.x),
        num(to.y),
        num(base.x - uy * half),
        num(base.y + ux * half),
        num(base.x + uy * half),
        num(base.y - ux * half)
    );
    let stroke = style.get_or("strokeColor", "#000000");
    Some(
        paint(Element::new("path").with_attr("d", d), style, stroke)
            .with_attr("stroke-miterlimit", "10")
            .with_attr("pointer-events", "all"),
    )
}

/// Point halfway along a polyline.
fn midpoint(points: &[Point]) -> Point {
    let lengths: Vec<f64> = points
        .windows(2)
        .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
        .collect();
    let mut remaining = lengths.iter().sum::<f64>() / 2.0;
    for (w, len) in points.windows(2).zip(&lengths) {
        if remaining <= *len && *len > 0.0 {
            let t = remaining / len;
            return Point {
                x: w[0].x + (w[1].x - w[0].x) * t,
                y: w[0].y + (w[1].y - w[0].y) * t,
            };
        }
        remaining -= len;
    }
    points.first().copied().unwrap_or_default()
}

fn label(value: &str, style: &CellStyle, bounds: Rect, options: &RenderOptions) -> Element {
    if !style.flag("html") {
        return text_label(value, style, bounds.center());
    }

    let content = html_content(value);
    let mut foreign = html_label(content.clone(), style, bounds);
    if !options.alternate_content {
        return Element::new("g").with_child(foreign);
    }

    foreign.set_attr("requiredFeatures", EXTENSIBILITY_FEATURE);
    let fallback = Element {
        children: content,
        ..Element::new("div")
    }
    .text_content();
    Element::new("g").with_child(
        Element::new("switch")
            .with_child(foreign)
            .with_child(text_label(&fallback, style, bounds.center())),
    )
}

/// Parse an HTML label into nodes, falling back to plain text.
fn html_content(value: &str) -> Vec<Node> {
    let xml = format!("<div>{}</div>", value.replace("<br>", "<br/>"));
    match XmlParser::new().preserve_whitespace(true).parse(&xml) {
        Ok(div) => div.children,
        Err(err) => {
            tracing::debug!(error = %err, "Label is not well-formed markup, using text");
            vec![Node::Text(value.to_owned())]
        }
    }
}

fn html_label(content: Vec<Node>, style: &CellStyle, b: Rect) -> Element {
    let font_size = style.number("fontSize", 12.0);
    let font_family = style.get_or("fontFamily", "Helvetica");
    let font_color = style.get_or("fontColor", "#000000");
    let center = b.center();

    let inner = Element {
        children: content,
        ..Element::new("div").with_attr(
            "style",
            format!(
                "display: inline-block; font-size: {}px; font-family: {font_family}; \
                 color: {font_color}; line-height: 1.2; pointer-events: all; \
                 white-space: normal; overflow-wrap: normal;",
                num(font_size)
            ),
        )
    };
    let middle = Element::new("div")
        .with_attr("style", "box-sizing: border-box; font-size: 0px; text-align: center;")
        .with_attr("data-drawio-colors", format!("color: {font_color}; "))
        .with_child(inner);
    let outer = Element::new("div")
        .with_attr("xmlns", XHTML_NS)
        .with_attr(
            "style",
            format!(
                "display: flex; align-items: unsafe center; justify-content: unsafe center; \
                 width: {}px; height: 1px; padding-top: {}px; margin-left: {}px;",
                num((b.width - 2.0).max(1.0)),
                num(center.y),
                num(b.x + 1.0)
            ),
        )
        .with_child(middle);

    Element::new("foreignObject")
        .with_attr("style", "overflow: visible; text-align: left;")
        .with_attr("pointer-events", "none")
        .with_attr("width", "100%")
        .with_attr("height", "100%")
        .with_child(outer)
}

fn text_label(text: &str, style: &CellStyle, at: Point) -> Element {
    let font_size = style.number("fontSize", 12.0);
    Element::new("g")
        .with_attr("fill", style.get_or("fontColor", "#000000"))
        .with_attr("font-family", style.get_or("fontFamily", "Helvetica"))
        .with_attr("text-anchor", "middle")
        .with_attr("font-size", format!("{}px", num(font_size)))
        .with_child(
            Element::new("text")
                .with_attr("x", num(at.x))
                .with_attr("y", num(at.y + font_size * 0.35))
                .with_text(text),
        )
}

/// Format a coordinate with at most two decimals.
fn num(value: f64) -> String {
    // Adding 0.0 turns -0 into 0.
    ((value * 100.0).round() / 100.0 + 0.0).to_string()
}
