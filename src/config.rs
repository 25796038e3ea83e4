use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    pub theme: ThemeConfig,
    pub sidebar: SidebarConfig,
    pub font: FontConfig,
    pub ui: UiConfig,
}

/// Theme configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ThemeConfig {
    /// "dark" or "light"
    pub mode: String,
}

/// Sidebar layout and fold configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SidebarConfig {
    /// Width of the table-of-contents pane (in pixels)
    pub width: f32,
    /// Collapse chapters below `fold_level` instead of showing the
    /// whole tree expanded
    pub fold_enable: bool,
    /// Nesting depth that stays expanded when folding is enabled
    /// (0 folds everything)
    pub fold_level: usize,
}

/// Font and text rendering configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FontConfig {
    /// Size of the main interface font (in points)
    pub font_size: f32,
    /// Size of code blocks and inline code (in points)
    pub code_font_size: f32,
}

/// UI behavior configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UiConfig {
    /// Show draft chapters (entries without a page) in the sidebar
    pub show_drafts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            theme: ThemeConfig {
                mode: "dark".to_string(),
            },
            sidebar: SidebarConfig {
                width: 260.0,
                fold_enable: false,
                fold_level: 0,
            },
            font: FontConfig {
                font_size: 14.0,
                code_font_size: 12.0,
            },
            ui: UiConfig { show_drafts: true },
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        // Use directories crate to find config directory
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "shiori") {
            let config_dir = proj_dirs.config_dir();
            return Some(config_dir.join("config.toml"));
        }
        None
    }

    /// Load configuration from file, or return defaults if file doesn't exist
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<Config>(&contents) {
                        Ok(config) => return config,
                        Err(e) => {
                            eprintln!("Failed to parse config file: {}", e);
                            eprintln!("Using default configuration");
                        }
                    },
                    Err(e) => {
                        eprintln!("Failed to read config file: {}", e);
                        eprintln!("Using default configuration");
                    }
                }
            }
        }
        Config::default()
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(path) = Self::config_path() {
            // Create config directory if it doesn't exist
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            let contents = toml::to_string_pretty(self)?;
            fs::write(&path, contents)?;
            return Ok(());
        }

        Err("Could not determine config directory".into())
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default() -> Result<(), Box<dyn std::error::Error>> {
        if let Some(path) = Self::config_path() {
            if !path.exists() {
                let config = Config::default();
                config.save()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme.mode, "dark");
        assert_eq!(config.sidebar.width, 260.0);
        assert!(!config.sidebar.fold_enable);
        assert_eq!(config.sidebar.fold_level, 0);
        assert_eq!(config.font.font_size, 14.0);
        assert!(config.ui.show_drafts);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        let deserialized: Config = toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(config.theme.mode, deserialized.theme.mode);
        assert_eq!(config.sidebar.fold_level, deserialized.sidebar.fold_level);
    }

    #[test]
    fn test_fold_settings_parse() {
        let toml_str = r#"
            [theme]
            mode = "light"

            [sidebar]
            width = 300.0
            fold_enable = true
            fold_level = 1

            [font]
            font_size = 15.0
            code_font_size = 13.0

            [ui]
            show_drafts = false
        "#;
        let config: Config = toml::from_str(toml_str).expect("Failed to parse");
        assert_eq!(config.theme.mode, "light");
        assert!(config.sidebar.fold_enable);
        assert_eq!(config.sidebar.fold_level, 1);
        assert!(!config.ui.show_drafts);
    }
}
