// src/svg.rs

//! SVG surface for `render::draw_network`. Unlike the raster surface it
//! keeps label text.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;
use palette::Srgb;

use crate::colors::to_hex;
use crate::error::Result;
use crate::render::{Canvas, Paint, Stroke, TextAlign};

pub struct SvgCanvas {
    width: f64,
    height: f64,
    density: f64,
    body: String,
}

impl SvgCanvas {
    /// `density` only scales the document's declared pixel size; drawing
    /// happens in the `width × height` view box.
    pub fn new(width: f64, height: f64, density: f64) -> Self {
        SvgCanvas {
            width,
            height,
            density,
            body: String::new(),
        }
    }

    pub fn finish(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"Arial, sans-serif\">\n{}</svg>\n",
            fmt_num(self.width * self.density),
            fmt_num(self.height * self.density),
            fmt_num(self.width),
            fmt_num(self.height),
            self.body
        )
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.finish())?;
        info!("Wrote SVG to {}", path.as_ref().display());
        Ok(())
    }

    fn stroke_attrs(stroke: Option<Stroke>) -> String {
        match stroke {
            Some(s) => format!(
                " stroke=\"{}\" stroke-width=\"{}\"",
                to_hex(s.color),
                fmt_num(s.width)
            ),
            None => String::new(),
        }
    }
}

/// Trim float noise so the markup stays small and stable.
fn fmt_num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Primitives with a non-finite coordinate or size are dropped.
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

impl Canvas for SvgCanvas {
    fn clear(&mut self, color: Srgb<u8>) {
        self.body.clear();
        let _ = writeln!(
            self.body,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            fmt_num(self.width),
            fmt_num(self.height),
            to_hex(color)
        );
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: Paint) {
        if !all_finite(&[from.0, from.1, to.0, to.1, width]) {
            return;
        }
        let _ = writeln!(
            self.body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"/>",
            fmt_num(from.0),
            fmt_num(from.1),
            fmt_num(to.0),
            fmt_num(to.1),
            to_hex(paint.color),
            fmt_num(paint.alpha),
            fmt_num(width)
        );
    }

    fn circle(&mut self, center: (f64, f64), radius: f64, fill: Srgb<u8>, stroke: Option<Stroke>) {
        if !all_finite(&[center.0, center.1, radius]) {
            return;
        }
        let _ = writeln!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"{}/>",
            fmt_num(center.0),
            fmt_num(center.1),
            fmt_num(radius),
            to_hex(fill),
            Self::stroke_attrs(stroke)
        );
    }

    fn rect(&mut self, origin: (f64, f64), size: (f64, f64), fill: Srgb<u8>, stroke: Option<Stroke>) {
        if !all_finite(&[origin.0, origin.1, size.0, size.1]) {
            return;
        }
        let _ = writeln!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"3\" fill=\"{}\"{}/>",
            fmt_num(origin.0),
            fmt_num(origin.1),
            fmt_num(size.0),
            fmt_num(size.1),
            to_hex(fill),
            Self::stroke_attrs(stroke)
        );
    }

    fn text(&mut self, anchor: (f64, f64), text: &str, font_px: f64, color: Srgb<u8>, align: TextAlign) {
        if !all_finite(&[anchor.0, anchor.1, font_px]) {
            return;
        }
        let text_anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
        };
        let _ = writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\" dominant-baseline=\"central\">{}</text>",
            fmt_num(anchor.0),
            fmt_num(anchor.1),
            fmt_num(font_px),
            to_hex(color),
            text_anchor,
            escape_xml(text)
        );
    }
}
