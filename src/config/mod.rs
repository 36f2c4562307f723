use crate::tree::ProjectionRoot;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons";
pub(crate) const DEFAULT_FAVICON_SIZE: u32 = 16;
pub(crate) const DEFAULT_INDENT_STEP_PX: u32 = 16;
pub(crate) const DEFAULT_BASE_INDENT_PX: u32 = 16;

/// Panel settings. Read once at startup from `window.PANEL_CONFIG` (optional).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PanelConfig {
    pub favicon_endpoint: String,
    pub favicon_size: u32,
    pub indent_step_px: u32,
    pub base_indent_px: u32,
    /// Show the top-level collections ("Bookmarks bar", "Other bookmarks") as folders.
    #[serde(default)]
    pub show_collections: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            favicon_endpoint: DEFAULT_FAVICON_ENDPOINT.to_string(),
            favicon_size: DEFAULT_FAVICON_SIZE,
            indent_step_px: DEFAULT_INDENT_STEP_PX,
            base_indent_px: DEFAULT_BASE_INDENT_PX,
            show_collections: false,
        }
    }
}

impl PanelConfig {
    pub fn from_window() -> Self {
        let mut config = Self::default();

        let Some(window) = web_sys::window() else {
            return config;
        };
        let Some(env) = window.get("PANEL_CONFIG") else {
            return config;
        };
        if env.is_undefined() || !env.is_object() {
            return config;
        }

        // Both the upper-case keys (page script style) and the field names are accepted.
        let read = |upper: &str, lower: &str| {
            [upper, lower].into_iter().find_map(|k| {
                js_sys::Reflect::get(&env, &k.into())
                    .ok()
                    .filter(|v| !v.is_undefined() && !v.is_null())
            })
        };

        if let Some(endpoint) = read("FAVICON_ENDPOINT", "favicon_endpoint").and_then(|v| v.as_string()) {
            config.favicon_endpoint = endpoint;
        }
        if let Some(size) = read("FAVICON_SIZE", "favicon_size").and_then(|v| v.as_f64()) {
            config.favicon_size = px(size, DEFAULT_FAVICON_SIZE);
        }
        if let Some(step) = read("INDENT_STEP_PX", "indent_step_px").and_then(|v| v.as_f64()) {
            config.indent_step_px = px(step, DEFAULT_INDENT_STEP_PX);
        }
        if let Some(base) = read("BASE_INDENT_PX", "base_indent_px").and_then(|v| v.as_f64()) {
            config.base_indent_px = px(base, DEFAULT_BASE_INDENT_PX);
        }
        if let Some(show) = read("SHOW_COLLECTIONS", "show_collections").and_then(|v| v.as_bool()) {
            config.show_collections = show;
        }

        config
    }

    /// Left padding for an item at `depth` (top-level items are depth 0).
    pub fn indent_px(&self, depth: usize) -> u32 {
        self.base_indent_px + depth as u32 * self.indent_step_px
    }

    pub fn projection_root(&self) -> ProjectionRoot {
        if self.show_collections {
            ProjectionRoot::RootChildren
        } else {
            ProjectionRoot::TopLevelCollections
        }
    }
}

fn px(raw: f64, fallback: u32) -> u32 {
    if raw.is_finite() && raw >= 0.0 {
        raw.round() as u32
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_indent_matches_panel_layout() {
        let c = PanelConfig::default();
        assert_eq!(c.indent_px(0), 16);
        assert_eq!(c.indent_px(1), 32);
        assert_eq!(c.indent_px(3), 64);
    }

    #[test]
    fn test_px_rejects_negative_and_nan() {
        assert_eq!(px(12.4, 16), 12);
        assert_eq!(px(-1.0, 16), 16);
        assert_eq!(px(f64::NAN, 16), 16);
    }

    #[test]
    fn test_config_deserializes_from_field_names() {
        let c: PanelConfig = serde_json::from_str(
            r#"{"favicon_endpoint":"https://icons.example/ico","favicon_size":32,"indent_step_px":12,"base_indent_px":8}"#,
        )
        .expect("config should parse");
        assert_eq!(c.indent_px(2), 32);
        assert_eq!(c.favicon_size, 32);
        assert!(!c.show_collections);
    }

    #[test]
    fn test_show_collections_selects_projection_root() {
        let mut c = PanelConfig::default();
        assert_eq!(c.projection_root(), ProjectionRoot::TopLevelCollections);
        c.show_collections = true;
        assert_eq!(c.projection_root(), ProjectionRoot::RootChildren);
    }
}
