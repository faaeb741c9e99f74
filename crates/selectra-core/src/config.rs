use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Visual sizing token. Presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeVariant {
    Sm,
    #[default]
    Md,
    Lg,
}

/// Widget configuration, loaded from `~/.config/selectra/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboboxConfig {
    // ─── Features ──────────────────────────────────────────
    pub searchable: bool,
    pub creatable: bool,
    pub disabled: bool,
    pub clearable: bool,
    /// Host is still fetching options; shown as a spinner on the trigger.
    pub loading: bool,
    pub initial_open: bool,

    // ─── Labels & text ─────────────────────────────────────
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub creatable_text: String,
    pub search_placeholder: String,
    pub select_or_create_message: String,
    pub loading_message: String,

    // ─── Timing & layout ───────────────────────────────────
    pub debounce_ms: u64,
    pub focus_delay_ms: u64,
    pub size: SizeVariant,
    pub max_visible_rows: usize,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            searchable: true,
            creatable: false,
            disabled: false,
            clearable: false,
            loading: false,
            initial_open: false,
            placeholder: "Select an option".to_string(),
            label: None,
            creatable_text: "Create".to_string(),
            search_placeholder: "Search or create".to_string(),
            select_or_create_message: "Select an item or create new".to_string(),
            loading_message: "Loading options...".to_string(),
            debounce_ms: 1000,
            focus_delay_ms: 100,
            size: SizeVariant::Md,
            max_visible_rows: 8,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl ComboboxConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    /// Standard config file path: `~/.config/selectra/config.toml`
    pub fn config_path() -> PathBuf {
        // Allow override via env var
        if let Ok(path) = std::env::var("SELECTRA_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("selectra")
            .join("config.toml")
    }

    /// Load from the standard path, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
