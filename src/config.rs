use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between sibling centers within a level.
    pub sibling_gap: f32,
    /// Vertical distance between level rows.
    pub level_gap: f32,
    pub node_width: f32,
    pub node_height: f32,
    /// Character budget for node labels; longer titles get an ellipsis.
    pub max_title_chars: usize,
    pub curve_ratio: f32,
    pub curve_max_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sibling_gap: 320.0,
            level_gap: 280.0,
            node_width: 200.0,
            node_height: 90.0,
            max_title_chars: 24,
            curve_ratio: 0.4,
            curve_max_offset: 150.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Blank margin around the diagram bounds.
    pub padding: f32,
    pub corner_radius: f32,
    pub arrow_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            corner_radius: 14.0,
            arrow_size: 8.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

// Override file: every field optional, unspecified ones keep their default.
// Parsed with json5 so hand-written config may carry comments and trailing
// commas.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    node_fill: Option<String>,
    node_border: Option<String>,
    node_text: Option<String>,
    completed_fill: Option<String>,
    completed_border: Option<String>,
    completed_text: Option<String>,
    line_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    sibling_gap: Option<f32>,
    level_gap: Option<f32>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    max_title_chars: Option<usize>,
    curve_ratio: Option<f32>,
    curve_max_offset: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    padding: Option<f32>,
    corner_radius: Option<f32>,
    arrow_size: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "light" {
            config.theme = Theme::light();
        } else if theme_name == "dark" {
            config.theme = Theme::dark();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.node_text {
            config.theme.node_text = v;
        }
        if let Some(v) = vars.completed_fill {
            config.theme.completed_fill = v;
        }
        if let Some(v) = vars.completed_border {
            config.theme.completed_border = v;
        }
        if let Some(v) = vars.completed_text {
            config.theme.completed_text = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.sibling_gap {
            config.layout.sibling_gap = v;
        }
        if let Some(v) = layout.level_gap {
            config.layout.level_gap = v;
        }
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.max_title_chars {
            config.layout.max_title_chars = v;
        }
        if let Some(v) = layout.curve_ratio {
            config.layout.curve_ratio = v;
        }
        if let Some(v) = layout.curve_max_offset {
            config.layout.curve_max_offset = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.corner_radius {
            config.render.corner_radius = v;
        }
        if let Some(v) = render.arrow_size {
            config.render.arrow_size = v;
        }
    }
}
