use thiserror::Error;

use crate::config::LayoutConfig;
use crate::graph::{self, GraphModel};
use crate::layout::{self, Layout};
use crate::model::RoadmapDoc;
use crate::panel::{self, PanelView};
use crate::scene::{Scene, Stats, recompute_stats};
use crate::store::ProgressStore;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Graph(#[from] graph::GraphError),
    #[error(transparent)]
    Layout(#[from] layout::LayoutError),
    #[error("unknown node `{0}`")]
    UnknownNode(String),
    #[error("no panel is open")]
    NoPanel,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// The whole application state, passed explicitly to every operation. The
/// progress store stays outside so persistence remains a collaborator, not a
/// hidden global.
pub struct App {
    pub roadmap_id: String,
    pub title: String,
    pub graph: GraphModel,
    pub layout: Layout,
    pub scene: Scene,
    config: LayoutConfig,
    panel: Option<String>,
}

impl App {
    /// Runs the full pipeline on a loaded document. Construction is the only
    /// entry point, so no operation can ever observe a half-loaded roadmap.
    pub fn init(
        doc: &RoadmapDoc,
        roadmap_id: &str,
        store: &ProgressStore,
        config: &LayoutConfig,
    ) -> Result<App, AppError> {
        let graph = graph::build_graph(&doc.nodes)?;
        let layout = layout::compute_layout(&graph, config)?;
        let scene = Scene::build(&layout, &graph.edges, config, |id| {
            store.is_done(roadmap_id, id)
        });
        Ok(App {
            roadmap_id: roadmap_id.to_string(),
            title: doc.title.clone().unwrap_or_else(|| "Roadmap".to_string()),
            graph,
            layout,
            scene,
            config: config.clone(),
            panel: None,
        })
    }

    /// Opens (or re-targets) the detail panel. The previous target is simply
    /// replaced; there is no per-open handler to leak.
    pub fn open_panel(
        &mut self,
        store: &ProgressStore,
        id: &str,
    ) -> Result<PanelView, AppError> {
        let node = self
            .layout
            .node(id)
            .ok_or_else(|| AppError::UnknownNode(id.to_string()))?;
        self.panel = Some(node.id.clone());
        let content = match &node.content {
            Some(content) => panel::render_content(content),
            None => panel::render_content(&panel::placeholder_content(&node.title)),
        };
        Ok(PanelView {
            id: node.id.clone(),
            title: node.title.clone(),
            content_html: content,
            completed: store.is_done(&self.roadmap_id, &node.id),
        })
    }

    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    pub fn panel_target(&self) -> Option<&str> {
        self.panel.as_deref()
    }

    /// One toggle flips the store exactly once, then updates exactly one
    /// visual. Returns the new completion state.
    pub fn toggle(&mut self, store: &mut ProgressStore, id: &str) -> Result<bool, AppError> {
        if self.layout.node(id).is_none() {
            return Err(AppError::UnknownNode(id.to_string()));
        }
        let done = store.toggle(&self.roadmap_id, id)?;
        self.scene.sync_node(id, done);
        Ok(done)
    }

    /// The panel's toggle control: resolves the target id from current state
    /// at invocation time.
    pub fn toggle_current(&mut self, store: &mut ProgressStore) -> Result<bool, AppError> {
        let Some(id) = self.panel.clone() else {
            return Err(AppError::NoPanel);
        };
        self.toggle(store, &id)
    }

    /// Wipes this roadmap's progress and rebuilds the scene from scratch; a
    /// full reset is the one mutation that redraws everything.
    pub fn clear_progress(&mut self, store: &mut ProgressStore) -> Result<(), AppError> {
        store.clear(&self.roadmap_id)?;
        self.scene = Scene::build(&self.layout, &self.graph.edges, &self.config, |_| false);
        Ok(())
    }

    pub fn stats(&self, store: &ProgressStore) -> Stats {
        recompute_stats(&self.layout.nodes, |id| {
            store.is_done(&self.roadmap_id, id)
        })
    }
}
