use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use selectra_core::{save_options, ComboOption, CreateHandler, CreationError};

/// Owner of the candidate set for the interactive picker.
///
/// Acts as the create handler: new options are appended here (and written
/// back to the option file when one is attached), and the app re-supplies
/// the snapshot to the widget once a create call settles.
pub struct Catalog {
    options: Mutex<Vec<ComboOption>>,
    latency: Duration,
    path: Option<PathBuf>,
}

impl Catalog {
    pub fn new(options: Vec<ComboOption>) -> Self {
        Self {
            options: Mutex::new(options),
            latency: Duration::ZERO,
            path: None,
        }
    }

    /// Simulated round-trip time of the create call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Persist created options to `path`.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn snapshot(&self) -> Vec<ComboOption> {
        self.options
            .lock()
            .map(|options| options.clone())
            .unwrap_or_default()
    }
}

/// Lowercase, dash-separated value derived from a label.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[async_trait]
impl CreateHandler for Catalog {
    async fn create_option(&self, text: &str) -> Result<Option<String>, CreationError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let label = text.trim();
        let value = slugify(label);
        if value.is_empty() {
            return Err(CreationError::rejected(text, "label has no usable characters"));
        }

        let mut options = self
            .options
            .lock()
            .map_err(|_| CreationError::Aborted(text.to_string()))?;
        if options
            .iter()
            .any(|o| o.value == value || o.label.eq_ignore_ascii_case(label))
        {
            return Err(CreationError::rejected(text, "an option with that name already exists"));
        }

        options.push(ComboOption::new(value.clone(), label));
        if let Some(ref path) = self.path {
            if let Err(e) = save_options(path, &options) {
                options.pop();
                return Err(CreationError::rejected(text, e.to_string()));
            }
        }
        tracing::info!(value = %value, "catalog extended");
        Ok(Some(value))
    }
}
