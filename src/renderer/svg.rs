//! SVG generation from layout results

use indexmap::IndexMap;

use crate::fonts::{self, FontDescriptor};
use crate::layout::{Bounds, LayoutKind, LayoutNode, Point};
use crate::node::HostKind;
use crate::props::{PropValue, Props};
use crate::resource::load_svg_resource;

use super::SvgConfig;

/// SVG attributes whose camelCase spelling is the real attribute name
const SVG_CAMEL_CASE_ATTRIBUTES: &[&str] = &[
    "viewBox",
    "preserveAspectRatio",
    "patternUnits",
    "patternContentUnits",
    "patternTransform",
    "gradientUnits",
    "gradientTransform",
    "spreadMethod",
    "clipPathUnits",
    "maskUnits",
    "maskContentUnits",
    "markerUnits",
    "markerWidth",
    "markerHeight",
    "refX",
    "refY",
    "pathLength",
    "textLength",
    "lengthAdjust",
    "startOffset",
    "stdDeviation",
    "filterUnits",
    "primitiveUnits",
    "baseFrequency",
    "numOctaves",
];

/// Text props consumed when placing the text run, and the attributes the
/// placement writes itself
const TEXT_LAYOUT_KEYS: &[&str] = &[
    "alignHorizontal",
    "alignVertical",
    "lineHeight",
    "text-anchor",
    "dominant-baseline",
];

/// Attributes the ellipse writes from its bounds
const ELLIPSE_KEYS: &[&str] = &["cx", "cy", "rx", "ry"];

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    styles: Vec<String>,
    elements: Vec<String>,
    /// Normalized resource markup to the id of its symbol
    symbols: IndexMap<String, String>,
    root_attrs: Vec<(String, String)>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            styles: vec![],
            elements: vec![],
            symbols: IndexMap::new(),
            root_attrs: vec![],
            indent: 1,
        }
    }

    /// Declare the document font: an `@font-face` rule per loadable source and
    /// a `font-family` style for the whole document
    pub fn add_font(&mut self, font: &FontDescriptor) {
        let family = css_string(&font.font_family);
        let sources: Vec<String> = font
            .sources
            .iter()
            .map(|source| {
                format!(
                    "url({}) format(\"{}\")",
                    css_string(&fonts::source_url(font, source)),
                    source.format.css_format()
                )
            })
            .collect();

        if !sources.is_empty() {
            self.styles.push(format!(
                "@font-face {{ font-family: {}; src: {}; }}",
                family,
                sources.join(", ")
            ));
        }
        self.styles
            .push(format!("svg {{ font-family: {}; }}", family));
        self.root_attrs
            .push(("data-font-family".to_string(), font.encoded_family()));
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push_line(&mut self, line: String) {
        let indented = format!("{}{}", self.indent_str(), line);
        self.elements.push(indented);
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, bounds: &Bounds, attrs: &str) {
        self.push_line(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
            bounds.x, bounds.y, bounds.width, bounds.height, attrs
        ));
    }

    /// Add an ellipse inscribed in `bounds`
    pub fn add_ellipse(&mut self, bounds: &Bounds, attrs: &str) {
        let center = bounds.center();
        self.push_line(format!(
            r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
            center.x,
            center.y,
            bounds.width / 2.0,
            bounds.height / 2.0,
            attrs
        ));
    }

    /// Add a polygon whose points are relative to `origin`
    pub fn add_polygon(&mut self, origin: Point, points: &[Point], attrs: &str) {
        let points_str: String = points
            .iter()
            .map(|p| format!("{},{}", origin.x + p.x, origin.y + p.y))
            .collect::<Vec<_>>()
            .join(" ");

        self.push_line(format!(r#"<polygon points="{}"{}/>"#, points_str, attrs));
    }

    /// Add a text run placed inside `bounds` per its alignment props
    pub fn add_text(&mut self, content: &str, bounds: &Bounds, props: &Props, attrs: &str) {
        let horizontal = props
            .get("alignHorizontal")
            .and_then(PropValue::as_str)
            .unwrap_or("left");
        let vertical = props
            .get("alignVertical")
            .and_then(PropValue::as_str)
            .unwrap_or("top");

        let (x, anchor) = match horizontal {
            "center" | "middle" => (bounds.x + bounds.width / 2.0, "middle"),
            "right" | "end" => (bounds.right(), "end"),
            _ => (bounds.x, "start"),
        };
        let (y, baseline) = match vertical {
            "center" | "middle" => (bounds.y + bounds.height / 2.0, "central"),
            "bottom" | "end" => (bounds.bottom(), "text-after-edge"),
            _ => (bounds.y, "text-before-edge"),
        };

        let lines: Vec<&str> = content.lines().collect();
        let body = if lines.len() > 1 {
            let font_size = props.get("fontSize").and_then(PropValue::as_f64).unwrap_or(14.0);
            let line_height = props.get("lineHeight").and_then(PropValue::as_f64).unwrap_or(1.4);
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let dy = if i == 0 { 0.0 } else { font_size * line_height };
                    format!(r#"<tspan x="{}" dy="{}">{}</tspan>"#, x, dy, escape_xml(line))
                })
                .collect::<String>()
        } else {
            escape_xml(content)
        };

        self.push_line(format!(
            r#"<text x="{}" y="{}" text-anchor="{}" dominant-baseline="{}"{}>{}</text>"#,
            x, y, anchor, baseline, attrs, body
        ));
    }

    /// Add external content: recognized SVG becomes a shared `<symbol>`
    /// referenced by `<use>`, anything else an `<image>` reference
    pub fn add_resource(&mut self, source: &str, bounds: &Bounds, attrs: &str) {
        let geometry = format!(
            r#" x="{}" y="{}" width="{}" height="{}""#,
            bounds.x, bounds.y, bounds.width, bounds.height
        );

        let Some(resource) = load_svg_resource(source) else {
            self.push_line(format!(
                r#"<image href="{}"{}{}/>"#,
                escape_xml(source),
                geometry,
                attrs
            ));
            return;
        };

        let id = match self.symbols.get(&resource.markup) {
            Some(id) => id.clone(),
            None => {
                let id = format!("{}resource-{}", self.prefix(), self.symbols.len());
                self.defs.push(resource.root.to_markup_with_id(&id));
                self.symbols.insert(resource.markup.clone(), id.clone());
                id
            }
        };
        self.push_line(format!(r##"<use href="#{}"{}{}/>"##, id, geometry, attrs));
    }

    /// Open a group element; a `class` prop is appended to the generated one
    pub fn start_group(&mut self, class: &str, props: &Props) {
        let mut classes = format!("{}{}", self.prefix(), class);
        if let Some(extra) = props.get("class") {
            let extra = extra.to_string();
            if !extra.trim().is_empty() {
                classes.push(' ');
                classes.push_str(extra.trim());
            }
        }
        self.push_line(format!(
            r#"<g class="{}"{}>"#,
            escape_xml(&classes),
            format_attrs(props, &["class"])
        ));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push_line("</g>".to_string());
    }

    /// Add a paint definition and its nested definitions with attributes as declared
    pub fn add_definition(&mut self, node: &LayoutNode) {
        let LayoutKind::Host(HostKind::Definition { tag }) = &node.kind else {
            return;
        };
        let attrs = format_attrs(&node.attrs, &[]);
        if node.children.is_empty() {
            self.push_line(format!("<{}{}/>", tag, attrs));
            return;
        }
        self.push_line(format!("<{}{}>", tag, attrs));
        self.indent += 1;
        for child in &node.children {
            self.add_definition(child);
        }
        self.indent = self.indent.saturating_sub(1);
        self.push_line(format!("</{}>", tag));
    }

    fn start_defs(&mut self) {
        self.push_line("<defs>".to_string());
        self.indent += 1;
    }

    fn end_defs(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push_line("</defs>".to_string());
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: Bounds) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();

        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        let root_attrs: String = self
            .root_attrs
            .iter()
            .map(|(k, v)| format!(r#" {}="{}""#, k, escape_xml(v)))
            .collect();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}"{}>"#,
            vb_w, vb_h, vb_x, vb_y, vb_w, vb_h, root_attrs
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(&escape_style(style));
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        // Shared resource symbols
        if !self.defs.is_empty() {
            svg.push_str("  <defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str("    ");
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str("  </defs>");
            svg.push_str(nl);
        }

        if let Some(background) = &self.config.background {
            svg.push_str(&format!(
                r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                vb_x,
                vb_y,
                vb_w,
                vb_h,
                escape_xml(background)
            ));
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a laid-out tree to an SVG string
pub fn render_svg(result: &LayoutNode, config: &SvgConfig) -> String {
    let builder = SvgBuilder::new(config.clone());
    finish(builder, result)
}

/// Render a laid-out tree to an SVG string using the given document font
pub fn render_svg_with_font(result: &LayoutNode, config: &SvgConfig, font: &FontDescriptor) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_font(font);
    finish(builder, result)
}

fn finish(mut builder: SvgBuilder, result: &LayoutNode) -> String {
    render_node(result, &mut builder);
    builder.build(result.bounds)
}

/// Render a single node and its children to the builder, in paint order
fn render_node(node: &LayoutNode, builder: &mut SvgBuilder) {
    match &node.kind {
        LayoutKind::Gap => {}
        LayoutKind::Flex(_) | LayoutKind::Align(_) => {
            let class = if matches!(node.kind, LayoutKind::Flex(_)) {
                "flex"
            } else {
                "align"
            };
            builder.start_group(class, &node.attrs);
            render_children(node, builder);
            builder.end_group();
        }
        LayoutKind::Host(host) => render_host(host, node, builder),
    }
}

fn render_children(node: &LayoutNode, builder: &mut SvgBuilder) {
    for child in &node.children {
        render_node(child, builder);
    }
}

fn render_host(host: &HostKind, node: &LayoutNode, builder: &mut SvgBuilder) {
    match host {
        HostKind::Group => {
            builder.start_group("group", &node.attrs);
            render_children(node, builder);
            builder.end_group();
        }
        HostKind::Rect => {
            builder.add_rect(&node.bounds, &format_attrs(&node.attrs, &[]));
            render_children(node, builder);
        }
        HostKind::Ellipse => {
            builder.add_ellipse(&node.bounds, &format_attrs(&node.attrs, ELLIPSE_KEYS));
            render_children(node, builder);
        }
        HostKind::Polygon { points } => {
            builder.add_polygon(
                node.bounds.origin(),
                points,
                &format_attrs(&node.attrs, &["points"]),
            );
            render_children(node, builder);
        }
        HostKind::Text { content } => {
            builder.add_text(
                content,
                &node.bounds,
                &node.attrs,
                &format_attrs(&node.attrs, TEXT_LAYOUT_KEYS),
            );
        }
        HostKind::Resource { source } => {
            builder.add_resource(source, &node.bounds, &format_attrs(&node.attrs, &["href"]));
        }
        HostKind::Defs => {
            builder.start_defs();
            for child in &node.children {
                builder.add_definition(child);
            }
            builder.end_defs();
        }
        HostKind::Definition { .. } => builder.add_definition(node),
    }
}

/// Format forwarded props as SVG attributes, skipping any whose prop or
/// attribute name is in `skip`
fn format_attrs(attrs: &Props, skip: &[&str]) -> String {
    attrs
        .iter()
        .filter_map(|(key, value)| {
            let name = attribute_name(key);
            if skip.contains(&key.as_str()) || skip.contains(&name.as_str()) {
                return None;
            }
            let value = match (key.as_str(), value) {
                ("fontWeight", PropValue::Str(w)) if w == "regular" => "normal".to_string(),
                _ => value.to_string(),
            };
            Some(format!(r#" {}="{}""#, name, escape_xml(&value)))
        })
        .collect()
}

/// Map a camelCase prop name to its SVG attribute name
pub fn attribute_name(key: &str) -> String {
    if SVG_CAMEL_CASE_ATTRIBUTES.contains(&key) || !key.chars().any(|c| c.is_ascii_uppercase()) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Quote a string for use in CSS
fn css_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Escape the characters that would end a `<style>` text block early
fn escape_style(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;")
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
