use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::{ModelMap, StyleMap};

/// Load the model reference document (model name → attributes).
///
/// Returns the parse or I/O failure instead of swallowing it; the caller
/// decides whether to degrade to an empty catalog. Called once per run.
pub fn load_models(path: impl AsRef<Path>) -> Result<ModelMap> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Load the style reference document (style name → overrides), preserving
/// document order so reports list styles the way the catalog does.
pub fn load_styles(path: impl AsRef<Path>) -> Result<StyleMap> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
