use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ComboboxError, Result};

/// One selectable candidate.
///
/// `value` is expected to be unique within a candidate list; the widget does
/// not deduplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl ComboOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark this option as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// On-disk shape of an option list in TOML, which has no top-level arrays.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OptionFile {
    #[serde(default)]
    options: Vec<ComboOption>,
}

/// Load a candidate list from a `.json` (array of options) or `.toml`
/// (`[[options]]` tables) file.
pub fn load_options(path: &Path) -> Result<Vec<ComboOption>> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") => Ok(toml::from_str::<OptionFile>(&content)?.options),
        other => Err(ComboboxError::ConfigError(format!(
            "unsupported option file extension: {}",
            other.unwrap_or("<none>")
        ))),
    }
}

/// Write a candidate list back to disk in the format implied by `path`.
pub fn save_options(path: &Path, options: &[ComboOption]) -> Result<()> {
    let content = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::to_string_pretty(options)?,
        Some("toml") => toml::to_string_pretty(&OptionFile {
            options: options.to_vec(),
        })?,
        other => {
            return Err(ComboboxError::ConfigError(format!(
                "unsupported option file extension: {}",
                other.unwrap_or("<none>")
            )));
        }
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
