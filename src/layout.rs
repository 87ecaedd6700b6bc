use std::collections::HashMap;

use thiserror::Error;

use crate::config::LayoutConfig;
use crate::graph::{GraphModel, LayoutMode};

/// A positioned node. Coordinates are node centers. `level` is populated in
/// auto mode only; manual-mode positions pass through without one.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub group: Option<String>,
    pub level: Option<usize>,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub mode: LayoutMode,
    /// Nodes in first-seen input order.
    pub nodes: Vec<LayoutNode>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("prerequisite cycle detected involving node `{0}`")]
    CycleDetected(String),
}

pub fn compute_layout(graph: &GraphModel, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    match graph.mode {
        LayoutMode::Manual => Ok(manual_layout(graph)),
        LayoutMode::Auto => auto_layout(graph, config),
    }
}

// Identity transform: mode validation already guaranteed both coordinates
// on every node.
fn manual_layout(graph: &GraphModel) -> Layout {
    let nodes = graph
        .order
        .iter()
        .filter_map(|id| graph.nodes.get(id))
        .map(|node| LayoutNode {
            id: node.id.clone(),
            title: node.title.clone(),
            content: node.content.clone(),
            group: node.group.clone(),
            level: None,
            x: node.x.unwrap_or(0.0),
            y: node.y.unwrap_or(0.0),
        })
        .collect();
    Layout {
        mode: LayoutMode::Manual,
        nodes,
    }
}

fn auto_layout(graph: &GraphModel, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    let levels = assign_levels(graph)?;

    // Group by level preserving first-seen order within each row.
    let mut rows: Vec<Vec<&str>> = Vec::new();
    for id in &graph.order {
        let level = levels.get(id.as_str()).copied().unwrap_or(0);
        if rows.len() <= level {
            rows.resize(level + 1, Vec::new());
        }
        rows[level].push(id.as_str());
    }

    let mut positions: HashMap<&str, (usize, usize)> = HashMap::new();
    for row in &rows {
        for (idx, id) in row.iter().enumerate() {
            positions.insert(id, (idx, row.len()));
        }
    }

    let gap = config.sibling_gap;
    let nodes = graph
        .order
        .iter()
        .filter_map(|id| graph.nodes.get(id))
        .map(|node| {
            let level = levels.get(node.id.as_str()).copied().unwrap_or(0);
            let (idx, count) = positions.get(node.id.as_str()).copied().unwrap_or((0, 1));
            let row_width = count as f32 * gap;
            LayoutNode {
                id: node.id.clone(),
                title: node.title.clone(),
                content: node.content.clone(),
                group: node.group.clone(),
                level: Some(level),
                x: idx as f32 * gap - row_width / 2.0 + gap / 2.0,
                y: level as f32 * config.level_gap,
            }
        })
        .collect();

    Ok(Layout {
        mode: LayoutMode::Auto,
        nodes,
    })
}

// Iterative longest-path relaxation: each node settles at
// 1 + max(level of parents), roots stay at 0. A DAG reaches the fixed point
// within |nodes| passes; one extra pass that still changes something means
// the prerequisite graph has a cycle.
fn assign_levels(graph: &GraphModel) -> Result<HashMap<String, usize>, LayoutError> {
    let mut levels: HashMap<String, usize> =
        graph.order.iter().map(|id| (id.clone(), 0)).collect();

    let max_passes = graph.order.len() + 1;
    let mut last_changed: Option<String> = None;
    for _ in 0..max_passes {
        let mut changed = false;
        for id in &graph.order {
            let Some(node) = graph.nodes.get(id) else {
                continue;
            };
            if node.parents.is_empty() {
                continue;
            }
            let max_parent = node
                .parents
                .iter()
                .filter_map(|parent| levels.get(parent))
                .copied()
                .max()
                .unwrap_or(0);
            let entry = levels.entry(id.clone()).or_insert(0);
            if *entry < max_parent + 1 {
                *entry = max_parent + 1;
                changed = true;
                last_changed = Some(id.clone());
            }
        }
        if !changed {
            return Ok(levels);
        }
    }

    Err(LayoutError::CycleDetected(last_changed.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::RawNode;

    fn abc() -> GraphModel {
        build_graph(&[
            RawNode::new("A", "Alpha"),
            RawNode::new("B", "Beta").with_prerequisites(&["A"]),
            RawNode::new("C", "Gamma").with_prerequisites(&["A", "B"]),
        ])
        .unwrap()
    }

    #[test]
    fn longest_path_levels() {
        let layout = compute_layout(&abc(), &LayoutConfig::default()).unwrap();
        let level = |id: &str| layout.node(id).unwrap().level.unwrap();
        assert_eq!(level("A"), 0);
        assert_eq!(level("B"), 1);
        assert_eq!(level("C"), 2);
    }

    #[test]
    fn roots_are_level_zero() {
        let graph = build_graph(&[
            RawNode::new("solo", "Solo"),
            RawNode::new("other", "Other"),
        ])
        .unwrap();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        assert!(layout.nodes.iter().all(|node| node.level == Some(0)));
    }

    #[test]
    fn edges_point_downward() {
        let graph = abc();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        for edge in &graph.edges {
            let from = layout.node(&edge.from).unwrap().level.unwrap();
            let to = layout.node(&edge.to).unwrap().level.unwrap();
            assert!(from < to, "edge {}->{} not monotone", edge.from, edge.to);
        }
    }

    #[test]
    fn unresolved_prerequisite_keeps_node_at_root() {
        let graph = build_graph(&[RawNode::new("D", "Delta").with_prerequisites(&["Z"])]).unwrap();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.node("D").unwrap().level, Some(0));
    }

    #[test]
    fn rows_center_on_zero() {
        let config = LayoutConfig::default();
        let graph = build_graph(&[
            RawNode::new("root", "Root"),
            RawNode::new("left", "Left").with_prerequisites(&["root"]),
            RawNode::new("right", "Right").with_prerequisites(&["root"]),
        ])
        .unwrap();
        let layout = compute_layout(&graph, &config).unwrap();
        assert_eq!(layout.node("root").unwrap().x, 0.0);
        let left = layout.node("left").unwrap();
        let right = layout.node("right").unwrap();
        assert_eq!(left.x, -config.sibling_gap / 2.0);
        assert_eq!(right.x, config.sibling_gap / 2.0);
        assert_eq!(left.y, config.level_gap);
        assert_eq!(left.x + right.x, 0.0);
    }

    #[test]
    fn layout_is_deterministic() {
        let config = LayoutConfig::default();
        let first = compute_layout(&abc(), &config).unwrap();
        let second = compute_layout(&abc(), &config).unwrap();
        assert_eq!(first.nodes, second.nodes);
    }

    #[test]
    fn manual_mode_passes_coordinates_through() {
        let graph = build_graph(&[
            RawNode::new("A", "Alpha").at(-17.5, 4.0),
            RawNode::new("B", "Beta")
                .with_prerequisites(&["A"])
                .at(88.0, 410.25),
        ])
        .unwrap();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        let a = layout.node("A").unwrap();
        assert_eq!((a.x, a.y), (-17.5, 4.0));
        assert!(a.level.is_none());
        let b = layout.node("B").unwrap();
        assert_eq!((b.x, b.y), (88.0, 410.25));
        assert!(b.level.is_none());
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn cycle_is_detected_not_hung() {
        let graph = build_graph(&[
            RawNode::new("A", "Alpha").with_prerequisites(&["B"]),
            RawNode::new("B", "Beta").with_prerequisites(&["A"]),
        ])
        .unwrap();
        let err = compute_layout(&graph, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::CycleDetected(_)));
    }

    #[test]
    fn diamond_takes_longest_path() {
        // A -> B -> D plus A -> D directly: D sits below B, not beside it.
        let graph = build_graph(&[
            RawNode::new("A", "Alpha"),
            RawNode::new("B", "Beta").with_prerequisites(&["A"]),
            RawNode::new("D", "Delta").with_prerequisites(&["A", "B"]),
        ])
        .unwrap();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.node("D").unwrap().level, Some(2));
    }
}
