// src/raster.rs

//! PNG surface for `render::draw_network`.
//!
//! Primitives are recorded as SVG and rasterized with resvg, so the PNG
//! carries the same labels, title and legend text as the SVG export.

use std::path::Path;

use image::{Rgb, RgbImage};
use log::{debug, info};
use palette::Srgb;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::error::{NetworkError, Result};
use crate::render::{Canvas, Paint, Stroke, TextAlign};
use crate::svg::SvgCanvas;

/// Families tried, in order, for the generic `sans-serif` family.
const SANS_SERIF_CANDIDATES: [&str; 4] = ["Arial", "Liberation Sans", "DejaVu Sans", "Helvetica"];

pub struct RasterCanvas {
    svg: SvgCanvas,
    width: u32,
    height: u32,
}

impl RasterCanvas {
    /// A `width × height` screen-pixel surface stored at `density` device
    /// pixels per screen pixel.
    pub fn new(width: f64, height: f64, density: f64) -> Result<Self> {
        if !(density.is_finite() && density > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "pixel density must be positive, got {}",
                density
            )));
        }
        let w = (width * density).round();
        let h = (height * density).round();
        if !(w >= 1.0 && h >= 1.0 && w <= 32_768.0 && h <= 32_768.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "raster size {}x{} is out of range",
                w, h
            )));
        }
        Ok(RasterCanvas {
            svg: SvgCanvas::new(width, height, density),
            width: w as u32,
            height: h as u32,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rasterize everything drawn so far onto a white background.
    pub fn render(&self) -> Result<RgbImage> {
        let mut options = usvg::Options::default();
        let family = load_fonts(options.fontdb_mut());
        if let Some(family) = family {
            options.font_family = family;
        }

        let tree = usvg::Tree::from_str(&self.svg.finish(), &options)?;
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or_else(|| {
            NetworkError::InvalidConfig(format!(
                "cannot allocate a {}x{} surface",
                self.width, self.height
            ))
        })?;
        pixmap.fill(resvg::tiny_skia::Color::WHITE);

        let size = tree.size();
        let transform = Transform::from_scale(
            self.width as f32 / size.width(),
            self.height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let mut image = RgbImage::new(self.width, self.height);
        for (px, color) in image.pixels_mut().zip(pixmap.pixels()) {
            let c = color.demultiply();
            *px = Rgb([c.red(), c.green(), c.blue()]);
        }
        Ok(image)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.render()?;
        image.save_with_format(&path, image::ImageFormat::Png)?;
        info!(
            "Wrote {}x{} PNG to {}",
            self.width,
            self.height,
            path.as_ref().display()
        );
        Ok(())
    }
}

/// Load the system fonts and point `sans-serif` at a family that exists.
/// Returns that family.
fn load_fonts(db: &mut usvg::fontdb::Database) -> Option<String> {
    db.load_system_fonts();
    let has_family = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    let family = SANS_SERIF_CANDIDATES
        .iter()
        .find(|name| has_family(name))
        .map(|name| name.to_string())
        .or_else(|| {
            db.faces()
                .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
        })?;
    debug!("Rasterizing text with {} ({} faces loaded)", family, db.len());
    db.set_sans_serif_family(family.clone());
    Some(family)
}

impl Canvas for RasterCanvas {
    fn clear(&mut self, color: Srgb<u8>) {
        self.svg.clear(color);
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: Paint) {
        self.svg.line(from, to, width, paint);
    }

    fn circle(&mut self, center: (f64, f64), radius: f64, fill: Srgb<u8>, stroke: Option<Stroke>) {
        self.svg.circle(center, radius, fill, stroke);
    }

    fn rect(&mut self, origin: (f64, f64), size: (f64, f64), fill: Srgb<u8>, stroke: Option<Stroke>) {
        self.svg.rect(origin, size, fill, stroke);
    }

    fn text(&mut self, anchor: (f64, f64), text: &str, font_px: f64, color: Srgb<u8>, align: TextAlign) {
        self.svg.text(anchor, text, font_px, color, align);
    }

    fn measure_text(&self, text: &str, font_px: f64) -> f64 {
        self.svg.measure_text(text, font_px)
    }
}
