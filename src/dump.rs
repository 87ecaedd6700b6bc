use crate::graph::LayoutMode;
use crate::layout::Layout;
use crate::model::Edge;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Debugging snapshot of a computed layout, stable enough to diff across
/// runs.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub mode: String,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    pub x: f32,
    pub y: f32,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, edges: &[Edge], done: impl Fn(&str) -> bool) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                title: node.title.clone(),
                level: node.level,
                x: node.x,
                y: node.y,
                completed: done(&node.id),
            })
            .collect();

        let edges = edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
            })
            .collect();

        LayoutDump {
            mode: match layout.mode {
                LayoutMode::Auto => "auto".to_string(),
                LayoutMode::Manual => "manual".to_string(),
            },
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &Layout,
    edges: &[Edge],
    done: impl Fn(&str) -> bool,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, edges, done);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
