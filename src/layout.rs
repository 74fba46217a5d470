// src/layout.rs

//! Deterministic tissue anchors and correlation-weighted gene clouds.
//!
//! Tissues sit on a circle around the central gene, one golden angle apart,
//! in the order they first appear in the table. The genes of a tissue are
//! scattered around its anchor: strongly correlated genes sit close and
//! tight, weak ones further out and looser. All randomness comes from the
//! caller's `Rng`, so a seeded generator gives a reproducible layout.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::{info, warn};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::colors::{central_color, tissue_color};
use crate::error::{NetworkError, Result};
use crate::network::{Edge, Network, Node, NodeKind, GENE_EDGE_FACTOR, TISSUE_EDGE_WEIGHT};
use crate::table::CorrelationRow;

/// `π(3 − √5)`, about 137.5°.
pub fn golden_angle() -> f64 {
    PI * (3.0 - 5f64.sqrt())
}

/// Anchor of the `index`-th tissue on the circle of `radius` around the
/// origin.
pub fn tissue_anchor(index: usize, radius: f64) -> (f64, f64) {
    let angle = index as f64 * golden_angle();
    (radius * angle.cos(), radius * angle.sin())
}

/// How jitter is drawn around the base polar position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jitter {
    /// `N(0, s)·angle_gain` radians and `N(0, s)·distance_gain` units.
    Gaussian,
    /// `(u − ½)·s·angle_gain` radians and `(2u − 1)·s·distance_gain` units.
    Uniform,
}

/// Parameters of one cloud placement pass, `s` being the noise scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParams {
    pub base_distance: f64,
    pub distance_span: f64,
    pub noise_base: f64,
    pub noise_gain: f64,
    pub angle_gain: f64,
    pub distance_gain: f64,
    pub min_distance: Option<f64>,
    pub jitter: Jitter,
}

impl CloudParams {
    /// Placement used when the network is generated.
    pub fn initial() -> Self {
        CloudParams {
            base_distance: 50.0,
            distance_span: 150.0,
            noise_base: 0.3,
            noise_gain: 0.6,
            angle_gain: 0.5,
            distance_gain: 50.0,
            min_distance: None,
            jitter: Jitter::Gaussian,
        }
    }

    /// Tighter placement behind the page's "Optimize Layout" button.
    pub fn relayout() -> Self {
        CloudParams {
            base_distance: 40.0,
            distance_span: 100.0,
            noise_base: 0.2,
            noise_gain: 0.5,
            angle_gain: PI,
            distance_gain: 60.0,
            min_distance: Some(20.0),
            jitter: Jitter::Uniform,
        }
    }

    /// Distance from the anchor before noise; decreasing in `pcc`.
    pub fn base_distance(&self, pcc: f64) -> f64 {
        self.base_distance + (1.0 - pcc) * self.distance_span
    }

    pub fn noise_scale(&self, pcc: f64) -> f64 {
        self.noise_base + self.noise_gain * (1.0 - pcc)
    }

    /// Position of the `index`-th of `count` genes around `anchor`.
    pub fn place<R: Rng + ?Sized>(
        &self,
        anchor: (f64, f64),
        index: usize,
        count: usize,
        pcc: f64,
        rng: &mut R,
    ) -> (f64, f64) {
        let angle = index as f64 / count.max(1) as f64 * 2.0 * PI;
        let distance = self.base_distance(pcc);
        let scale = self.noise_scale(pcc);

        let (angle_noise, distance_noise) = match self.jitter {
            Jitter::Gaussian => {
                let a: f64 = StandardNormal.sample(rng);
                let d: f64 = StandardNormal.sample(rng);
                (a * scale * self.angle_gain, d * scale * self.distance_gain)
            }
            Jitter::Uniform => {
                let a: f64 = rng.gen();
                let d: f64 = rng.gen();
                (
                    (a - 0.5) * scale * self.angle_gain,
                    (d * 2.0 - 1.0) * scale * self.distance_gain,
                )
            }
        };

        let cloud_angle = angle + angle_noise;
        let mut cloud_distance = distance + distance_noise;
        if let Some(floor) = self.min_distance {
            cloud_distance = cloud_distance.max(floor);
        }
        (
            anchor.0 + cloud_distance * cloud_angle.cos(),
            anchor.1 + cloud_distance * cloud_angle.sin(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub threshold: f64,
    pub tissue_radius: f64,
    pub max_genes_per_tissue: usize,
    pub cloud: CloudParams,
    pub relayout: CloudParams,
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams {
            threshold: 0.8,
            tissue_radius: 400.0,
            max_genes_per_tissue: 150,
            cloud: CloudParams::initial(),
            relayout: CloudParams::relayout(),
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(NetworkError::InvalidConfig(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        if self.max_genes_per_tissue == 0 {
            return Err(NetworkError::InvalidConfig(
                "at least one gene per tissue must be kept".to_string(),
            ));
        }
        if !(self.tissue_radius.is_finite() && self.tissue_radius > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "tissue radius must be positive, got {}",
                self.tissue_radius
            )));
        }
        Ok(())
    }
}

/// Rows at or above `threshold` with a tissue and a gene name. Only
/// correlations in `[-1, 1]` can pass, so `NaN` and infinities never do.
pub fn filter_rows(rows: &[CorrelationRow], threshold: f64) -> Vec<&CorrelationRow> {
    rows.iter()
        .filter(|r| {
            is_valid_pcc(r.pcc) && r.pcc >= threshold && !r.tissue.is_empty() && !r.gene.is_empty()
        })
        .collect()
}

fn is_valid_pcc(pcc: f64) -> bool {
    (-1.0..=1.0).contains(&pcc)
}

/// Distinct tissue labels in first-seen order.
pub fn tissue_order<'a>(rows: &[&'a CorrelationRow]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for row in rows {
        if seen.insert(row.tissue.as_str()) {
            order.push(row.tissue.as_str());
        }
    }
    order
}

/// The `cap` best-correlated rows of `tissue`. The sort is stable, so equal
/// correlations keep their table order.
pub fn select_genes<'a>(
    rows: &[&'a CorrelationRow],
    tissue: &str,
    cap: usize,
) -> Vec<&'a CorrelationRow> {
    let mut selected: Vec<&CorrelationRow> =
        rows.iter().copied().filter(|r| r.tissue == tissue).collect();
    selected.sort_by(|a, b| b.pcc.total_cmp(&a.pcc));
    if selected.len() > cap {
        info!("Limiting {} genes from {} to {}", tissue, selected.len(), cap);
        selected.truncate(cap);
    }
    selected
}

/// Build the full network for `central` from raw table rows.
pub fn build_network<R: Rng + ?Sized>(
    rows: &[CorrelationRow],
    central: &str,
    params: &LayoutParams,
    rng: &mut R,
) -> Result<Network> {
    params.validate()?;
    if central.is_empty() {
        return Err(NetworkError::InvalidConfig("central node id is empty".to_string()));
    }

    let out_of_range = rows
        .iter()
        .filter(|r| !r.pcc.is_nan() && !is_valid_pcc(r.pcc))
        .count();
    if out_of_range > 0 {
        warn!(
            "Ignoring {} rows whose correlation lies outside [-1, 1]",
            out_of_range
        );
    }

    let passing = filter_rows(rows, params.threshold);
    let tissues = tissue_order(&passing);
    info!("Found {} tissue types with {} genes", tissues.len(), passing.len());

    let mut network = Network::new(Node::central(central, central_color()));

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in &passing {
        *counts.entry(row.tissue.as_str()).or_default() += 1;
    }

    for (i, tissue) in tissues.iter().enumerate() {
        if *tissue == central {
            return Err(NetworkError::InvalidConfig(format!(
                "tissue '{}' has the same name as the central node",
                tissue
            )));
        }
        let anchor = tissue_anchor(i, params.tissue_radius);
        let gene_count = counts.get(tissue).copied().unwrap_or(0);
        network.push_node(Node::tissue(tissue, tissue_color(i), gene_count, anchor));
        network.push_edge(Edge::new(central, tissue, TISSUE_EDGE_WEIGHT));
    }

    let mut genes_added = 0usize;
    for (i, tissue) in tissues.iter().enumerate() {
        let anchor = tissue_anchor(i, params.tissue_radius);
        let color = tissue_color(i);
        let selected = select_genes(&passing, tissue, params.max_genes_per_tissue);
        let count = selected.len();

        for (idx, row) in selected.iter().enumerate() {
            match network.node(&row.gene).map(|n| n.kind) {
                Some(NodeKind::Central) | Some(NodeKind::Tissue) => {
                    warn!(
                        "Skipping gene '{}' in {}: the name is already used by a non-gene node",
                        row.gene, tissue
                    );
                    continue;
                }
                Some(NodeKind::Gene) => {}
                None => {
                    let position = params.cloud.place(anchor, idx, count, row.pcc, rng);
                    network.push_node(Node::gene(&row.gene, tissue, row.pcc, color, position));
                    genes_added += 1;
                }
            }
            network.push_edge(Edge::new(tissue, &row.gene, row.pcc * GENE_EDGE_FACTOR));
        }
    }
    info!("Added {} gene nodes to graph", genes_added);

    if tissues.is_empty() {
        warn!(
            "No rows reach PCC >= {}; the network only holds {}",
            params.threshold, central
        );
    }

    Ok(network)
}

/// Re-scatter every gene around the current position of its tissue, best
/// correlated first. Tissue and central nodes stay where they are.
pub fn relayout<R: Rng + ?Sized>(network: &mut Network, params: &CloudParams, rng: &mut R) {
    let tissues: Vec<(String, (f64, f64))> = network
        .tissues()
        .map(|t| (t.id.clone(), t.position()))
        .collect();

    for (tissue, anchor) in tissues {
        let mut genes = network.gene_indices_of(&tissue);
        genes.sort_by(|&a, &b| {
            let pa = network.nodes[a].pcc.unwrap_or(0.0);
            let pb = network.nodes[b].pcc.unwrap_or(0.0);
            pb.total_cmp(&pa)
        });
        let count = genes.len();
        for (idx, node_idx) in genes.into_iter().enumerate() {
            let pcc = network.nodes[node_idx].pcc.unwrap_or(0.0);
            let (x, y) = params.place(anchor, idx, count, pcc, rng);
            let node = &mut network.nodes[node_idx];
            node.x = x;
            node.y = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_angle_value() {
        assert!((golden_angle().to_degrees() - 137.507_764).abs() < 1e-5);
    }

    #[test]
    fn test_first_anchor_on_positive_x_axis() {
        let (x, y) = tissue_anchor(0, 400.0);
        assert_eq!((x, y), (400.0, 0.0));
    }

    #[test]
    fn test_base_distance_is_decreasing() {
        let cloud = CloudParams::initial();
        assert_eq!(cloud.base_distance(1.0), 50.0);
        assert!((cloud.base_distance(0.8) - 80.0).abs() < 1e-9);
        let relayout = CloudParams::relayout();
        assert_eq!(relayout.base_distance(1.0), 40.0);
        assert!((relayout.noise_scale(0.8) - 0.3).abs() < 1e-9);
    }
}
