// src/network.rs

//! Node and edge model shared by the layout engine, the native renderers and
//! the page script.

use std::collections::HashMap;

use palette::Srgb;
use serde::Serialize;

use crate::colors::serialize_hex;

pub const CENTRAL_SIZE: f64 = 50.0;
pub const TISSUE_SIZE: f64 = 25.0;
pub const GENE_SIZE: f64 = 3.0;

/// Weight of every central–tissue edge.
pub const TISSUE_EDGE_WEIGHT: f64 = 5.0;
/// Gene edges weigh `pcc * GENE_EDGE_FACTOR`.
pub const GENE_EDGE_FACTOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Central,
    Tissue,
    Gene,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "node_type")]
    pub kind: NodeKind,
    pub size: f64,
    #[serde(serialize_with = "serialize_hex")]
    pub color: Srgb<u8>,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gene_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tissue: Option<String>,
}

impl Node {
    pub fn central(id: &str, color: Srgb<u8>) -> Self {
        Node {
            id: id.to_string(),
            name: id.to_string(),
            kind: NodeKind::Central,
            size: CENTRAL_SIZE,
            color,
            x: 0.0,
            y: 0.0,
            label: Some(format!("{} (central)", id)),
            gene_count: None,
            pcc: None,
            tissue: None,
        }
    }

    pub fn tissue(id: &str, color: Srgb<u8>, gene_count: usize, (x, y): (f64, f64)) -> Self {
        Node {
            id: id.to_string(),
            name: id.to_string(),
            kind: NodeKind::Tissue,
            size: TISSUE_SIZE,
            color,
            x,
            y,
            label: Some(format!("{} (n={})", id, gene_count)),
            gene_count: Some(gene_count),
            pcc: None,
            tissue: None,
        }
    }

    pub fn gene(id: &str, tissue: &str, pcc: f64, color: Srgb<u8>, (x, y): (f64, f64)) -> Self {
        Node {
            id: id.to_string(),
            name: id.to_string(),
            kind: NodeKind::Gene,
            size: GENE_SIZE,
            color,
            x,
            y,
            label: None,
            gene_count: None,
            pcc: Some(pcc),
            tissue: Some(tissue.to_string()),
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Hover text, one entry per line.
    pub fn tooltip_lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        match self.kind {
            NodeKind::Central => lines.push("Central node".to_string()),
            NodeKind::Tissue => {
                lines.push(format!("Gene count: {}", self.gene_count.unwrap_or(0)))
            }
            NodeKind::Gene => {
                lines.push(format!("PCC: {:.3}", self.pcc.unwrap_or(0.0)));
                lines.push(format!("Tissue: {}", self.tissue.as_deref().unwrap_or("")));
            }
        }
        lines
    }
}

/// Undirected link between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "value")]
    pub weight: f64,
}

impl Edge {
    pub fn new(source: &str, target: &str, weight: f64) -> Self {
        Edge {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        }
    }
}

/// The complete node/edge set. Nodes are stored in draw order: central,
/// tissues, then genes.
#[derive(Debug, Clone)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index: HashMap<String, usize>,
}

impl Network {
    pub fn new(central: Node) -> Self {
        let mut network = Network {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
        };
        network.push_node(central);
        network
    }

    /// Append a node unless its id is already taken. Returns whether the node
    /// was added.
    pub fn push_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn central(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn tissues(&self) -> impl Iterator<Item = &Node> {
        self.nodes_of_kind(NodeKind::Tissue)
    }

    pub fn genes(&self) -> impl Iterator<Item = &Node> {
        self.nodes_of_kind(NodeKind::Gene)
    }

    /// Indices of the gene nodes attached to `tissue`, in node order.
    pub fn gene_indices_of(&self, tissue: &str) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Gene && n.tissue.as_deref() == Some(tissue))
            .map(|(i, _)| i)
            .collect()
    }

    /// Both endpoints of every edge, skipping edges whose ids are unknown.
    pub fn edge_endpoints(&self) -> impl Iterator<Item = (&Edge, &Node, &Node)> {
        self.edges.iter().filter_map(move |e| {
            let source = self.node(&e.source)?;
            let target = self.node(&e.target)?;
            Some((e, source, target))
        })
    }
}
