// src/html.rs

//! The self-contained HTML page: template, embedded data, file output and
//! browser launch.

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::layout::CloudParams;
use crate::network::{Edge, Network, Node};
use crate::render::{
    EDGE_ALPHA, EDGE_BASE_WIDTH, CENTRAL_STROKE_WIDTH, LABEL_FONT_PX, LABEL_HEIGHT, LABEL_PADDING,
    TISSUE_STROKE_WIDTH,
};
use crate::svg::escape_xml;
use crate::view::{MAX_SCALE, MIN_SCALE, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

const TEMPLATE: &str = include_str!("../templates/network.html");

/// Page-level knobs that are not part of the network itself.
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    pub seed: u64,
    pub relayout: CloudParams,
    pub relayout_on_load: bool,
    /// Extra multiplier on top of the device pixel ratio for PNG downloads.
    pub export_scale: f64,
    pub export_file_name: String,
}

impl PageOptions {
    pub fn new(title: impl Into<String>, seed: u64) -> Self {
        PageOptions {
            title: title.into(),
            seed,
            relayout: CloudParams::relayout(),
            relayout_on_load: true,
            export_scale: 3.0,
            export_file_name: "gene_association_network.png".to_string(),
        }
    }
}

#[derive(Serialize)]
struct NodeRecord<'a> {
    #[serde(flatten)]
    node: &'a Node,
    tooltip: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayoutSettings {
    base_distance: f64,
    distance_span: f64,
    noise_base: f64,
    noise_gain: f64,
    angle_gain: f64,
    distance_gain: f64,
    min_distance: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageSettings<'a> {
    title: &'a str,
    central: &'a str,
    seed: u32,
    min_scale: f64,
    max_scale: f64,
    zoom_in: f64,
    zoom_out: f64,
    edge_color: String,
    edge_base_width: f64,
    tissue_stroke_width: f64,
    central_stroke_width: f64,
    label_font_px: f64,
    label_padding: f64,
    label_height: f64,
    relayout: RelayoutSettings,
    relayout_on_load: bool,
    export_scale: f64,
    export_file_name: &'a str,
}

/// JSON that is safe to drop inside a `<script>` element. `<` only occurs
/// inside JSON strings, where `\u003c` reads back as the same character but
/// can never open `</script>` or `<!--`.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// Substitute every `(placeholder, value)` pair in one left-to-right pass,
/// so placeholder-like text inside a value is never expanded again.
fn fill_template(template: &str, pairs: &[(&str, &str)]) -> String {
    let extra: usize = pairs.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    loop {
        let next = pairs
            .iter()
            .filter_map(|(key, value)| rest.find(*key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);
        match next {
            Some((at, key, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// Fold the 64-bit generation seed into the 32-bit state of the page PRNG.
fn page_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

pub fn render_html(network: &Network, options: &PageOptions) -> Result<String> {
    let records: Vec<NodeRecord> = network
        .nodes
        .iter()
        .map(|node| NodeRecord {
            node,
            tooltip: node.tooltip_lines(),
        })
        .collect();
    let edges: &[Edge] = &network.edges;

    let r = &options.relayout;
    let settings = PageSettings {
        title: &options.title,
        central: &network.central().id,
        seed: page_seed(options.seed),
        min_scale: MIN_SCALE,
        max_scale: MAX_SCALE,
        zoom_in: ZOOM_IN_FACTOR,
        zoom_out: ZOOM_OUT_FACTOR,
        edge_color: format!("rgba(150, 150, 150, {})", EDGE_ALPHA),
        edge_base_width: EDGE_BASE_WIDTH,
        tissue_stroke_width: TISSUE_STROKE_WIDTH,
        central_stroke_width: CENTRAL_STROKE_WIDTH,
        label_font_px: LABEL_FONT_PX,
        label_padding: LABEL_PADDING,
        label_height: LABEL_HEIGHT,
        relayout: RelayoutSettings {
            base_distance: r.base_distance,
            distance_span: r.distance_span,
            noise_base: r.noise_base,
            noise_gain: r.noise_gain,
            angle_gain: r.angle_gain,
            distance_gain: r.distance_gain,
            min_distance: r.min_distance.unwrap_or(f64::MIN),
        },
        relayout_on_load: options.relayout_on_load,
        export_scale: options.export_scale,
        export_file_name: &options.export_file_name,
    };

    let title = escape_xml(&options.title);
    let nodes_json = script_json(&records)?;
    let links_json = script_json(edges)?;
    let settings_json = script_json(&settings)?;

    Ok(fill_template(
        TEMPLATE,
        &[
            ("__TITLE__", title.as_str()),
            ("__NODES_JSON__", nodes_json.as_str()),
            ("__LINKS_JSON__", links_json.as_str()),
            ("__SETTINGS_JSON__", settings_json.as_str()),
        ],
    ))
}

/// Write `html` to `path`, creating missing parent directories.
pub fn write_html<P: AsRef<Path>>(path: P, html: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(path, html)?;
    info!("Network visualization saved to {}", path.display());
    Ok(())
}

/// Open a written page in the default browser.
pub fn open_in_browser<P: AsRef<Path>>(path: P) -> Result<()> {
    let absolute = fs::canonicalize(path.as_ref())?;
    let url = format!("file://{}", absolute.display());
    webbrowser::open(&url)?;
    info!("Opened {} in the default browser", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_single_pass() {
        let out = fill_template("a __X__ b __Y__", &[("__X__", "__Y__"), ("__Y__", "y")]);
        assert_eq!(out, "a __Y__ b y");
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let json = script_json(&"</script>").unwrap();
        assert_eq!(json, "\"\\u003c/script>\"");
    }

    #[test]
    fn test_script_json_escapes_comment_openers() {
        let json = script_json(&vec!["<!--<script>"]).unwrap();
        assert!(!json.contains('<'));
        let back: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec!["<!--<script>"]);
    }

    #[test]
    fn test_page_seed_folds_high_bits() {
        assert_eq!(page_seed(7), 7);
        assert_eq!(page_seed(1 << 32), 1);
    }
}
