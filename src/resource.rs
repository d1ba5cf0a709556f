//! Normalization of raw SVG assets into reusable symbol definitions
//!
//! A recognized `<svg>` document is rewritten to a `<symbol>` so that one
//! definition can be referenced by several `<use>` elements. Detection is
//! permissive: anything that does not look like SVG is simply "not
//! recognized" and the caller passes it through unchanged.

use std::sync::OnceLock;

use regex::Regex;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

fn svg_root_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:<\?xml[^>]*>\s*)?<svg").expect("valid regex"))
}

fn svg_open_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<svg(\s|>)").expect("valid regex"))
}

fn svg_close_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</svg>").expect("valid regex"))
}

/// Whether the text looks like an SVG document or an existing symbol
pub fn is_svg_resource(text: &str) -> bool {
    let trimmed = text.trim();
    svg_root_pattern().is_match(trimmed) || trimmed.starts_with("<symbol")
}

/// Rename the root `<svg>` to `<symbol>`, leaving every other byte intact.
///
/// Returns `None` when the text is empty or not recognized.
pub fn normalize_svg_resource(text: &str) -> Option<String> {
    if text.is_empty() || !is_svg_resource(text) {
        return None;
    }
    let opened = svg_open_tag().replace(text, "<symbol$1");
    let closed = svg_close_tag().replace(&opened, "</symbol>");
    Some(closed.into_owned())
}

/// Parsed `viewBox` attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse `"min-x min-y width height"` (whitespace or comma separated)
    pub fn parse(value: &str) -> Option<Self> {
        let parts: Vec<f64> = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().ok())
            .collect::<Option<Vec<f64>>>()?;
        match parts.as_slice() {
            [min_x, min_y, width, height] => Some(Self {
                min_x: *min_x,
                min_y: *min_y,
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }
}

/// One element of a parsed resource
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<SvgElement>,
    /// Concatenated text content directly inside this element
    pub text: Option<String>,
}

impl SvgElement {
    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Only prefixes every XML document binds survive: `xlink:href` becomes
    /// plain `href` (which wins when both are present) and attributes in
    /// any other foreign namespace are dropped.
    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let has_href = node
            .attributes()
            .any(|attr| attr.name() == "href" && matches!(attr.namespace(), None | Some(SVG_NS)));

        let attributes = node
            .attributes()
            .filter_map(|attr| {
                let name = match attr.namespace() {
                    None | Some(SVG_NS) => attr.name().to_string(),
                    Some(XML_NS) => format!("xml:{}", attr.name()),
                    Some(XLINK_NS) if attr.name() == "href" && !has_href => "href".to_string(),
                    Some(ns) => {
                        log::debug!("dropping resource attribute {{{}}}{}", ns, attr.name());
                        return None;
                    }
                };
                Some((name, attr.value().to_string()))
            })
            .collect();

        let mut children = Vec::new();
        let mut text = String::new();
        for child in node.children() {
            if child.is_element() {
                children.push(Self::from_node(child));
            } else if child.is_text() {
                text.push_str(child.text().unwrap_or_default());
            }
        }
        let text = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };

        Self {
            tag: node.tag_name().name().to_string(),
            attributes,
            children,
            text,
        }
    }

    /// Serialize this element, replacing (or adding) its `id` attribute.
    ///
    /// Ids of nested elements are left as they are.
    pub fn to_markup_with_id(&self, id: &str) -> String {
        let mut out = String::new();
        out.push('<');
        out.push_str(&self.tag);
        out.push_str(&format!(r#" id="{}""#, escape_attr(id)));
        for (name, value) in self.attributes.iter().filter(|(k, _)| k != "id") {
            out.push_str(&format!(r#" {}="{}""#, name, escape_attr(value)));
        }
        self.write_content(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push_str(&format!(r#" {}="{}""#, name, escape_attr(value)));
        }
        self.write_content(out);
    }

    fn write_content(&self, out: &mut String) {
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        out.push_str(&format!("</{}>", self.tag));
    }
}

/// A raw asset normalized into a reusable symbol
#[derive(Debug, Clone, PartialEq)]
pub struct SvgResource {
    /// The normalized `<symbol>` text
    pub markup: String,
    pub view_box: Option<ViewBox>,
    pub root: SvgElement,
}

/// Normalize and parse a raw SVG asset.
///
/// Returns `None` for text that is not SVG, and also for SVG-looking text that
/// fails to parse; neither case is an error.
pub fn load_svg_resource(text: &str) -> Option<SvgResource> {
    let markup = normalize_svg_resource(text)?;
    let doc = match roxmltree::Document::parse(&markup) {
        Ok(doc) => doc,
        Err(e) => {
            log::debug!("svg resource not recognized: {}", e);
            return None;
        }
    };
    let root = SvgElement::from_node(doc.root_element());
    let view_box = root.attribute("viewBox").and_then(ViewBox::parse);
    Some(SvgResource {
        markup,
        view_box,
        root,
    })
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_svg_root() {
        assert!(is_svg_resource(r#"<svg viewBox="0 0 10 10"></svg>"#));
        assert!(is_svg_resource("  <SVG></SVG>"));
        assert!(is_svg_resource(r#"<symbol id="x"></symbol>"#));
        assert!(!is_svg_resource("not svg at all"));
        assert!(!is_svg_resource("<div><svg></svg></div>"));
    }

    #[test]
    fn test_recognizes_xml_prolog() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#;
        assert!(is_svg_resource(text));
    }

    #[test]
    fn test_normalize_renames_root_only() {
        let text = r#"<svg viewBox="0 0 10 10" fill="none"><rect width="1"/></svg>"#;
        assert_eq!(
            normalize_svg_resource(text).as_deref(),
            Some(r#"<symbol viewBox="0 0 10 10" fill="none"><rect width="1"/></symbol>"#)
        );
    }

    #[test]
    fn test_normalize_keeps_symbol_untouched() {
        let text = r#"<symbol viewBox="0 0 4 4"><path d="M0 0"/></symbol>"#;
        assert_eq!(normalize_svg_resource(text).as_deref(), Some(text));
    }

    #[test]
    fn test_normalize_rejects_other_text() {
        assert_eq!(normalize_svg_resource(""), None);
        assert_eq!(normalize_svg_resource("https://example.com/a.png"), None);
    }

    #[test]
    fn test_load_parses_view_box_and_children() {
        let resource = load_svg_resource(r#"<svg viewBox="0 0 10 10"><rect/></svg>"#)
            .expect("should be recognized");
        assert_eq!(resource.root.tag, "symbol");
        assert_eq!(
            resource.view_box,
            Some(ViewBox {
                min_x: 0.0,
                min_y: 0.0,
                width: 10.0,
                height: 10.0
            })
        );
        assert_eq!(resource.root.children.len(), 1);
        assert_eq!(resource.root.children[0].tag, "rect");
    }

    #[test]
    fn test_load_with_prolog() {
        let text = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle r="4"/></svg>"#;
        let resource = load_svg_resource(text).expect("prolog should be accepted");
        assert_eq!(resource.root.tag, "symbol");
        assert!(resource.markup.starts_with("<?xml"));
    }

    #[test]
    fn test_load_malformed_is_not_recognized() {
        assert_eq!(load_svg_resource("<svg><rect></svg>"), None);
        assert_eq!(load_svg_resource("not svg at all"), None);
    }

    #[test]
    fn test_to_markup_with_id() {
        let resource = load_svg_resource(
            r#"<svg id="orig" viewBox="0 0 2 2"><text>a &amp; b</text><path d="M0 0"/></svg>"#,
        )
        .unwrap();
        let markup = resource.root.to_markup_with_id("icon-0");
        assert_eq!(
            markup,
            r#"<symbol id="icon-0" viewBox="0 0 2 2"><text>a &amp; b</text><path d="M0 0"/></symbol>"#
        );
    }

    #[test]
    fn test_xlink_href_becomes_plain_href() {
        let resource = load_svg_resource(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" viewBox="0 0 4 4"><circle id="c" r="1" inkscape:label="dot"/><use xlink:href="#c" xlink:title="again"/><use href="#c" xlink:href="#old"/></svg>"##,
        )
        .unwrap();
        let children = &resource.root.children;
        assert_eq!(
            children[0].attributes,
            vec![
                ("id".to_string(), "c".to_string()),
                ("r".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(children[1].attributes, vec![("href".to_string(), "#c".to_string())]);
        assert_eq!(children[2].attributes, vec![("href".to_string(), "#c".to_string())]);
    }

    #[test]
    fn test_view_box_parse() {
        assert_eq!(
            ViewBox::parse("0,0,24,12").map(|v| (v.width, v.height)),
            Some((24.0, 12.0))
        );
        assert_eq!(ViewBox::parse("0 0 24"), None);
        assert_eq!(ViewBox::parse("a b c d"), None);
    }
}
