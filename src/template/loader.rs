//! Template loader module.
//!
//! Loads every view in a directory when the process starts.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{Result, TemplateEngine, TemplateError};

/// File extension of view templates.
pub const VIEW_EXTENSION: &str = "html";

impl TemplateEngine {
    /// Parse every `*.html` file in `dir`. Each view is named by its file stem.
    ///
    /// Fails on the first unreadable or malformed file.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| {
            TemplateError::Load(format!("failed to read directory {}: {e}", dir.display()))
        })?;

        let mut engine = TemplateEngine::new();

        for entry in entries {
            let entry = entry.map_err(|e| TemplateError::Load(e.to_string()))?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(VIEW_EXTENSION)
            {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path).map_err(|e| {
                TemplateError::Load(format!("failed to read {}: {e}", path.display()))
            })?;
            engine.load(name, &content)?;

            debug!(view = name, "Loaded view template");
        }

        Ok(engine)
    }

    /// Fail unless every named view is loaded.
    pub fn ensure_views(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.has_template(name)) {
            Some(missing) => Err(TemplateError::NotFound((*missing).to_string())),
            None => Ok(()),
        }
    }
}
