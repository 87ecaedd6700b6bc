use serde::{Deserialize, Serialize};

use crate::store::{KvStore, THEME_KEY};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub node_fill: String,
    pub node_border: String,
    pub node_text: String,
    pub completed_fill: String,
    pub completed_border: String,
    pub completed_text: String,
    pub line_color: String,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#0F1115".to_string(),
            node_fill: "#1C2128".to_string(),
            node_border: "#30363D".to_string(),
            node_text: "#E6EDF3".to_string(),
            completed_fill: "#12382B".to_string(),
            completed_border: "#10B981".to_string(),
            completed_text: "#D1FAE5".to_string(),
            line_color: "#4B5563".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            node_fill: "#F8FAFC".to_string(),
            node_border: "#CBD5E1".to_string(),
            node_text: "#1E293B".to_string(),
            completed_fill: "#D1FAE5".to_string(),
            completed_border: "#10B981".to_string(),
            completed_text: "#065F46".to_string(),
            line_color: "#94A3B8".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            Self::Dark => Theme::dark(),
            Self::Light => Theme::light(),
        }
    }
}

/// Saved preference, if any. Unknown stored values read as no preference.
pub fn theme_pref(kv: &dyn KvStore) -> Option<ThemeChoice> {
    kv.get(THEME_KEY)
        .and_then(|value| ThemeChoice::parse(&value))
}

/// Persists the preference; written on every explicit theme switch.
pub fn set_theme_pref(kv: &mut dyn KvStore, choice: ThemeChoice) -> anyhow::Result<()> {
    kv.set(THEME_KEY, choice.as_str())
}
