use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry from the model reference document.
///
/// Only the baseline matters here: it is the architecture family string
/// used to decide compatibility rules when building requests. Every other
/// attribute of the document is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelReference {
    #[serde(default)]
    pub baseline: String,
}

/// A LoRA adjustment attached to a style, forwarded to the Horde verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lora {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inject_trigger: Option<String>,
}

/// A textual-inversion adjustment attached to a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextualInversion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inject_ti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

/// One entry from the style reference document. Every field is an optional
/// override on top of the base request template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleDefinition {
    pub model: Option<String>,
    pub steps: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub cfg_scale: Option<f64>,
    pub sampler_name: Option<String>,
    pub loras: Option<Vec<Lora>>,
    pub tis: Option<Vec<TextualInversion>>,
    /// Prompt template with a `{p}` positive slot and a `{np}` negative slot.
    pub prompt: Option<String>,
}

/// Model reference, keyed by model name. Lookup only.
pub type ModelMap = HashMap<String, ModelReference>;

/// Style reference, keyed by style name. Document order is preserved so the
/// reports list styles the way the catalog does.
pub type StyleMap = IndexMap<String, StyleDefinition>;

/// Per-style, per-prompt success map accumulated by the run.
pub type RunStatus = IndexMap<String, IndexMap<String, bool>>;

/// Sparse style → prompt label → absolute asset URL index.
pub type PreviewIndex = IndexMap<String, IndexMap<String, String>>;

/// Response to submitting a generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct QueuedGeneration {
    pub id: String,
    #[serde(default)]
    pub kudos: f64,
}

/// Snapshot of a queued generation's progress.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationCheck {
    #[serde(default)]
    pub queue_position: u32,
    #[serde(default)]
    pub waiting: u32,
    #[serde(default)]
    pub processing: u32,
    #[serde(default)]
    pub finished: u32,
    #[serde(default)]
    pub done: bool,
}

/// One usable (non-censored) generation result.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
}

/// Outcome of running one generation to completion.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// The Horde finished the job; censored results are already filtered
    /// out, so the list may be empty.
    Finished(Vec<GeneratedImage>),
    /// The poll deadline elapsed before the job finished.
    TimedOut,
}
