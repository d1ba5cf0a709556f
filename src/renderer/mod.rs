//! SVG renderer for generating output from layout results
//!
//! This module takes a laid-out [`crate::layout::LayoutNode`] tree and
//! produces an SVG string, forwarding each node's attributes.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, render_svg_with_font};
