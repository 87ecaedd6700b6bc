pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dump;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod model;
pub mod panel;
pub mod render;
pub mod scene;
pub mod store;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;

pub use app::App;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use graph::{GraphModel, LayoutMode, build_graph};
pub use layout::{Layout, LayoutNode, compute_layout};
pub use model::{Edge, RawNode, RoadmapDoc};
pub use render::render_svg;
pub use scene::{Scene, Stats, recompute_stats};
pub use store::{FileStore, KvStore, MemStore, ProgressStore};
pub use theme::Theme;
