// src/render.rs

//! The one draw routine behind every output surface.
//!
//! `draw_network` only talks to the `Canvas` trait in screen pixels, so the
//! raster and SVG exports (and the recorder used in tests) see exactly the
//! same sequence of primitives. The page script's `drawNetwork` follows the
//! same order and constants.

use palette::Srgb;

use crate::colors::{black, central_color, gray, white};
use crate::network::{Network, NodeKind};
use crate::view::ViewState;

pub const EDGE_ALPHA: f64 = 0.2;
pub const EDGE_BASE_WIDTH: f64 = 0.5;
pub const TISSUE_STROKE_WIDTH: f64 = 1.0;
pub const CENTRAL_STROKE_WIDTH: f64 = 2.0;
pub const LABEL_FONT_PX: f64 = 12.0;
pub const LABEL_PADDING: f64 = 5.0;
pub const LABEL_HEIGHT: f64 = 16.0;

const TITLE_FONT_PX: f64 = 20.0;
const LEGEND_X: f64 = 30.0;
const LEGEND_Y: f64 = 60.0;
const LEGEND_WIDTH: f64 = 220.0;
const LEGEND_LINE_HEIGHT: f64 = 25.0;
const LEGEND_DOT_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Srgb<u8>,
    pub alpha: f64,
}

impl Paint {
    pub fn opaque(color: Srgb<u8>) -> Self {
        Paint { color, alpha: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Srgb<u8>,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A 2-D drawing surface addressed in screen pixels. Surfaces with a pixel
/// density above one scale internally.
pub trait Canvas {
    fn clear(&mut self, color: Srgb<u8>);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: Paint);
    fn circle(&mut self, center: (f64, f64), radius: f64, fill: Srgb<u8>, stroke: Option<Stroke>);
    fn rect(&mut self, origin: (f64, f64), size: (f64, f64), fill: Srgb<u8>, stroke: Option<Stroke>);
    /// Text vertically centred on `anchor.1`.
    fn text(&mut self, anchor: (f64, f64), text: &str, font_px: f64, color: Srgb<u8>, align: TextAlign);

    /// Advance width of `text`. Surfaces without font metrics use an average
    /// glyph width of 0.6 em.
    fn measure_text(&self, text: &str, font_px: f64) -> f64 {
        text.chars().count() as f64 * font_px * 0.6
    }
}

/// Stroke width of an edge in plane units.
pub fn edge_width(weight: f64) -> f64 {
    EDGE_BASE_WIDTH * (weight / 3.0).clamp(0.5, 2.0)
}

/// Full repaint of `network` as seen through `view`: edges, genes, tissues,
/// the central node, then label plates for tissues and the central node.
pub fn draw_network<C: Canvas + ?Sized>(canvas: &mut C, view: &ViewState, network: &Network) {
    let k = view.scale;
    canvas.clear(white());

    let edge_paint = Paint {
        color: gray(150),
        alpha: EDGE_ALPHA,
    };
    for (edge, source, target) in network.edge_endpoints() {
        canvas.line(
            view.plane_to_screen(source.x, source.y),
            view.plane_to_screen(target.x, target.y),
            edge_width(edge.weight) * k,
            edge_paint,
        );
    }

    for node in network.genes() {
        canvas.circle(view.plane_to_screen(node.x, node.y), node.size * k, node.color, None);
    }

    let tissue_stroke = Stroke {
        color: black(),
        width: TISSUE_STROKE_WIDTH * k,
    };
    for node in network.tissues() {
        canvas.circle(
            view.plane_to_screen(node.x, node.y),
            node.size * k,
            node.color,
            Some(tissue_stroke),
        );
    }

    let central_stroke = Stroke {
        color: black(),
        width: CENTRAL_STROKE_WIDTH * k,
    };
    for node in network.nodes_of_kind(NodeKind::Central) {
        canvas.circle(
            view.plane_to_screen(node.x, node.y),
            node.size * k,
            node.color,
            Some(central_stroke),
        );
    }

    let font_px = LABEL_FONT_PX * k;
    let padding = LABEL_PADDING * k;
    let plate_height = LABEL_HEIGHT * k;
    for node in network.nodes.iter().filter(|n| n.kind != NodeKind::Gene) {
        let Some(label) = node.label.as_deref() else {
            continue;
        };
        let (x, y) = view.plane_to_screen(node.x, node.y);
        let text_width = canvas.measure_text(label, font_px);
        canvas.rect(
            (x - text_width / 2.0 - padding, y - plate_height / 2.0 - padding),
            (text_width + padding * 2.0, plate_height + padding * 2.0),
            white(),
            Some(Stroke {
                color: gray(0xaa),
                width: k,
            }),
        );
        let text_color = if node.kind == NodeKind::Central {
            central_color()
        } else {
            black()
        };
        canvas.text((x, y), label, font_px, text_color, TextAlign::Center);
    }
}

/// Title and legend in fixed screen positions, for exported images.
pub fn draw_overlay<C: Canvas + ?Sized>(canvas: &mut C, view: &ViewState, network: &Network, title: &str) {
    canvas.text((view.width / 2.0, 30.0), title, TITLE_FONT_PX, black(), TextAlign::Center);

    let tissues: Vec<_> = network.tissues().collect();
    let legend_height = (1 + tissues.len()) as f64 * LEGEND_LINE_HEIGHT + 20.0;
    canvas.rect(
        (LEGEND_X, LEGEND_Y),
        (LEGEND_WIDTH, legend_height),
        white(),
        Some(Stroke {
            color: gray(0xdd),
            width: 1.0,
        }),
    );

    let central = network.central();
    let dot_x = LEGEND_X + 15.0;
    let text_x = LEGEND_X + 30.0;
    let first_y = LEGEND_Y + 20.0;
    canvas.circle(
        (dot_x, first_y),
        LEGEND_DOT_RADIUS,
        central.color,
        Some(Stroke {
            color: black(),
            width: 1.0,
        }),
    );
    canvas.text(
        (text_x, first_y),
        &format!("{} (central)", central.name),
        14.0,
        black(),
        TextAlign::Left,
    );

    for (i, tissue) in tissues.iter().enumerate() {
        let y = first_y + (i + 1) as f64 * LEGEND_LINE_HEIGHT;
        canvas.circle(
            (dot_x, y),
            LEGEND_DOT_RADIUS,
            tissue.color,
            Some(Stroke {
                color: black(),
                width: 0.5,
            }),
        );
        canvas.text(
            (text_x, y),
            &format!("{} (n={})", tissue.name, tissue.gene_count.unwrap_or(0)),
            12.0,
            black(),
            TextAlign::Left,
        );
    }
}

/// What the download button produces: the network, then title and legend.
pub fn draw_export<C: Canvas + ?Sized>(canvas: &mut C, view: &ViewState, network: &Network, title: &str) {
    draw_network(canvas, view, network);
    draw_overlay(canvas, view, network, title);
}
