use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::layout::{Layout, LayoutNode};
use crate::model::Edge;

/// One drawable element per node, addressable by id so a completion toggle
/// can update it without touching anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub id: String,
    pub label: String,
    pub group: String,
    /// Center coordinates, as produced by layout.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub completed: bool,
}

/// A cubic curve from the source's lower boundary to the target's upper
/// boundary. Near-horizontal edges anchor on the facing sides instead so the
/// path does not cross either node shape.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub from: String,
    pub to: String,
    pub start: (f32, f32),
    pub c1: (f32, f32),
    pub c2: (f32, f32),
    pub end: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug)]
pub struct Scene {
    pub nodes: BTreeMap<String, NodeVisual>,
    /// Node ids in draw order (first-seen input order).
    pub draw_order: Vec<String>,
    pub edges: Vec<EdgePath>,
    damage: Vec<String>,
}

impl Scene {
    pub fn build(
        layout: &Layout,
        edges: &[Edge],
        config: &LayoutConfig,
        done: impl Fn(&str) -> bool,
    ) -> Scene {
        let mut nodes = BTreeMap::new();
        let mut draw_order = Vec::with_capacity(layout.nodes.len());
        for node in &layout.nodes {
            draw_order.push(node.id.clone());
            nodes.insert(
                node.id.clone(),
                NodeVisual {
                    id: node.id.clone(),
                    label: truncate_title(&node.title, config.max_title_chars),
                    group: node.group.clone().unwrap_or_else(|| "core".to_string()),
                    x: node.x,
                    y: node.y,
                    width: config.node_width,
                    height: config.node_height,
                    completed: done(&node.id),
                },
            );
        }

        let edges = edges
            .iter()
            .filter_map(|edge| {
                let from = nodes.get(&edge.from)?;
                let to = nodes.get(&edge.to)?;
                Some(edge_path(edge, from, to, config))
            })
            .collect();

        Scene {
            nodes,
            draw_order,
            edges,
            damage: Vec::new(),
        }
    }

    /// Targeted update after a completion toggle: exactly one visual changes
    /// and is recorded as damaged. O(map lookup), independent of graph size.
    pub fn sync_node(&mut self, id: &str, done: bool) -> bool {
        let Some(visual) = self.nodes.get_mut(id) else {
            return false;
        };
        visual.completed = done;
        self.damage.push(id.to_string());
        true
    }

    /// Drains the ids touched since the last drain. Consumers redraw only
    /// these.
    pub fn take_damage(&mut self) -> Vec<String> {
        std::mem::take(&mut self.damage)
    }

    pub fn node(&self, id: &str) -> Option<&NodeVisual> {
        self.nodes.get(id)
    }

    /// Bounding box over node extents, padded enough to cover edge curves.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for visual in self.nodes.values() {
            min_x = min_x.min(visual.x - visual.width / 2.0);
            min_y = min_y.min(visual.y - visual.height / 2.0);
            max_x = max_x.max(visual.x + visual.width / 2.0);
            max_y = max_y.max(visual.y + visual.height / 2.0);
        }
        for edge in &self.edges {
            for (x, y) in [edge.start, edge.c1, edge.c2, edge.end] {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
        if min_x > max_x {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (min_x, min_y, max_x, max_y)
        }
    }
}

fn edge_path(edge: &Edge, from: &NodeVisual, to: &NodeVisual, config: &LayoutConfig) -> EdgePath {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = (dx * dx + dy * dy).sqrt();
    let offset = (dist * config.curve_ratio).min(config.curve_max_offset);

    let mut start = (from.x, from.y + from.height / 2.0);
    let mut end = (to.x, to.y - to.height / 2.0);
    if dx.abs() > dy.abs() {
        // Mostly-horizontal edge: leave through the facing sides.
        if dx > 0.0 {
            start = (from.x + from.width / 2.0, from.y);
            end = (to.x - to.width / 2.0, to.y);
        } else {
            start = (from.x - from.width / 2.0, from.y);
            end = (to.x + to.width / 2.0, to.y);
        }
    }

    EdgePath {
        from: edge.from.clone(),
        to: edge.to.clone(),
        start,
        c1: (start.0, start.1 + offset),
        c2: (end.0, end.1 - offset),
        end,
    }
}

pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = title.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Aggregate completion over the laid-out nodes. `percent` is 0 on an empty
/// set, never NaN.
pub fn recompute_stats(nodes: &[LayoutNode], done: impl Fn(&str) -> bool) -> Stats {
    let total = nodes.len();
    let completed = nodes.iter().filter(|node| done(&node.id)).count();
    let percent = if total == 0 {
        0
    } else {
        (100.0 * completed as f64 / total as f64).round() as u32
    };
    Stats {
        completed,
        total,
        percent,
    }
}
