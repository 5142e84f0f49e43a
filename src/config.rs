//! Demo configuration
//!
//! Asset locations, window settings and the displayed text. Defaults match the
//! stock demo layout; [`DemoConfig::from_env`] applies environment overrides.

use std::path::{Path, PathBuf};

/// Environment variable overriding the asset root directory
pub const ASSETS_ENV: &str = "TEXTSCAPE_ASSETS";
/// Environment variable overriding the displayed text
pub const TEXT_ENV: &str = "TEXTSCAPE_TEXT";
/// Environment variable toggling the parameter panel (`0`/`false` hides it)
pub const PANEL_ENV: &str = "TEXTSCAPE_PANEL";

/// Text shown when nothing else is configured
pub const DEFAULT_TEXT: &str = "HELLO WORLD :) \nMade with Rust";

/// Runtime configuration for the demo
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Root directory all asset paths are resolved against
    pub assets_dir: PathBuf,
    /// Typeface description, relative to `assets_dir`
    pub font_path: PathBuf,
    /// Matcap textures, relative to `assets_dir`. The panel offers one entry per path.
    pub matcap_paths: Vec<PathBuf>,
    /// Multi-line string turned into text geometry
    pub text: String,
    /// Whether the live parameter panel is shown
    pub show_panel: bool,
    pub window_title: String,
    pub window_size: (u32, u32),
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            font_path: PathBuf::from("fonts/helvetiker_regular.typeface.json"),
            matcap_paths: (1..=5)
                .map(|i| PathBuf::from(format!("textures/matcaps/{}.png", i)))
                .collect(),
            text: DEFAULT_TEXT.to_string(),
            show_panel: true,
            window_title: "textscape".to_string(),
            window_size: (1200, 800),
        }
    }
}

impl DemoConfig {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a key lookup (environment or otherwise)
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ASSETS_ENV) {
            self.assets_dir = PathBuf::from(dir);
        }
        if let Some(text) = lookup(TEXT_ENV) {
            // Allow literal "\n" in shells that cannot pass newlines easily
            self.text = text.replace("\\n", "\n");
        }
        if let Some(flag) = lookup(PANEL_ENV) {
            self.show_panel = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }
        self
    }

    /// Builder pattern: set the asset root
    pub fn with_assets_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.assets_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Builder pattern: set the displayed text
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Builder pattern: show or hide the parameter panel
    pub fn with_panel(mut self, show_panel: bool) -> Self {
        self.show_panel = show_panel;
        self
    }

    /// Absolute (or cwd-relative) path of the typeface file
    pub fn font_file(&self) -> PathBuf {
        self.assets_dir.join(&self.font_path)
    }

    /// Resolved paths of all matcap textures, in panel order
    pub fn matcap_files(&self) -> Vec<PathBuf> {
        self.matcap_paths
            .iter()
            .map(|p| self.assets_dir.join(p))
            .collect()
    }

    /// Number of selectable matcap textures
    pub fn matcap_count(&self) -> usize {
        self.matcap_paths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_stock_layout() {
        let config = DemoConfig::default();
        assert_eq!(config.matcap_count(), 5);
        assert_eq!(
            config.font_file(),
            PathBuf::from("assets/fonts/helvetiker_regular.typeface.json")
        );
        assert_eq!(
            config.matcap_files()[4],
            PathBuf::from("assets/textures/matcaps/5.png")
        );
        assert!(config.show_panel);
        assert!(config.text.contains('\n'));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ASSETS_ENV, "/srv/demo"),
            (TEXT_ENV, "ONE\\nTWO"),
            (PANEL_ENV, "0"),
        ]
        .into_iter()
        .collect();

        let config =
            DemoConfig::default().with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.assets_dir, PathBuf::from("/srv/demo"));
        assert_eq!(config.text, "ONE\nTWO");
        assert!(!config.show_panel);
    }

    #[test]
    fn test_panel_flag_truthy_values_keep_panel() {
        let config = DemoConfig::default()
            .with_panel(false)
            .with_overrides(|key| (key == PANEL_ENV).then(|| "yes".to_string()));
        assert!(config.show_panel);
    }
}
