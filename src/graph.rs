use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Edge, RawNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Levels and positions are computed from the prerequisite structure.
    Auto,
    /// Every node carries explicit coordinates; they pass through unchanged.
    Manual,
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub group: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub prerequisites: Vec<String>,
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GraphModel {
    pub mode: LayoutMode,
    pub nodes: BTreeMap<String, GraphNode>,
    /// Node ids in first-seen input order. Layout and rendering iterate this,
    /// never the map, so output order is stable for a fixed input order.
    pub order: Vec<String>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error(
        "node `{0}` has partial coordinates; supply x/y on every node (manual layout) or on none (auto layout)"
    )]
    MixedCoordinates(String),
}

/// Normalizes raw node records into an id-keyed graph with derived edges.
///
/// Unknown prerequisite ids are dropped silently. Duplicate node ids are
/// last-write-wins, keeping the first occurrence's position in the input
/// order. Cycles are not detected here; they surface in layout.
pub fn build_graph(raw: &[RawNode]) -> Result<GraphModel, GraphError> {
    let mode = detect_mode(raw)?;

    let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();
    for node in raw {
        if !nodes.contains_key(&node.id) {
            order.push(node.id.clone());
        }
        nodes.insert(
            node.id.clone(),
            GraphNode {
                id: node.id.clone(),
                title: node.title.clone(),
                content: node.content.clone(),
                group: node.group.clone(),
                x: node.x,
                y: node.y,
                prerequisites: node.prerequisites.clone().unwrap_or_default(),
                parents: Vec::new(),
                children: Vec::new(),
            },
        );
    }

    let mut edges: Vec<Edge> = Vec::new();
    for id in &order {
        let prereqs = match nodes.get(id) {
            Some(node) => node.prerequisites.clone(),
            None => continue,
        };
        for prereq in &prereqs {
            if !nodes.contains_key(prereq) {
                continue;
            }
            edges.push(Edge::new(prereq, id));
            if let Some(parent) = nodes.get_mut(prereq) {
                parent.children.push(id.clone());
            }
            if let Some(child) = nodes.get_mut(id) {
                child.parents.push(prereq.clone());
            }
        }
    }

    Ok(GraphModel {
        mode,
        nodes,
        order,
        edges,
    })
}

// Coordinate presence must be uniform across the whole set. The first node
// fixes the expectation; the first node disagreeing with it is reported.
fn detect_mode(raw: &[RawNode]) -> Result<LayoutMode, GraphError> {
    let Some(first) = raw.first() else {
        return Ok(LayoutMode::Auto);
    };
    for node in raw {
        if node.x.is_some() != node.y.is_some() {
            return Err(GraphError::MixedCoordinates(node.id.clone()));
        }
    }
    let expect_coords = first.x.is_some();
    for node in raw {
        if node.x.is_some() != expect_coords {
            return Err(GraphError::MixedCoordinates(node.id.clone()));
        }
    }
    if expect_coords {
        Ok(LayoutMode::Manual)
    } else {
        Ok(LayoutMode::Auto)
    }
}
