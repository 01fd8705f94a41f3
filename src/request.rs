use serde::Serialize;

use crate::error::{PreviewError, Result};
use crate::types::{Lora, ModelMap, StyleDefinition, TextualInversion};

/// Baseline marker for models that cannot run the hires fix pass.
const SDXL_BASELINE_MARKER: &str = "stable_diffusion_xl";

/// Positive-prompt placeholder in style templates.
const POSITIVE_SLOT: &str = "{p}";
/// Negative-prompt placeholder in style templates; always cleared.
const NEGATIVE_SLOT: &str = "{np}";

/// Sampler parameters block of a generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub sampler_name: String,
    pub cfg_scale: f64,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub n: u32,
    pub karras: bool,
    pub hires_fix: bool,
    pub clip_skip: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub loras: Vec<Lora>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tis: Vec<TextualInversion>,
}

/// A fully-resolved async image generation request.
///
/// Built fresh per (style, prompt) pair: [`GenerationRequest::for_style`]
/// deep-copies the base template and applies the style's overrides onto it,
/// so the result never aliases the style definition or the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
    pub nsfw: bool,
    pub censor_nsfw: bool,
    pub trusted_workers: bool,
    pub slow_workers: bool,
    pub shared: bool,
    pub r2: bool,
    pub models: Vec<String>,
}

impl GenerationRequest {
    /// The immutable base template every request starts from.
    pub fn base() -> Self {
        Self {
            prompt: POSITIVE_SLOT.to_string(),
            params: GenerationParams {
                sampler_name: "k_euler_a".to_string(),
                cfg_scale: 7.5,
                width: 512,
                height: 512,
                steps: 30,
                n: 1,
                karras: true,
                hires_fix: true,
                clip_skip: 1,
                loras: Vec::new(),
                tis: Vec::new(),
            },
            nsfw: true,
            censor_nsfw: false,
            trusted_workers: false,
            slow_workers: true,
            shared: true,
            r2: true,
            models: vec!["stable_diffusion".to_string()],
        }
    }

    /// Resolve a request for one (style, prompt sample) pair.
    ///
    /// Refuses the build with [`PreviewError::InvalidModel`] when the style
    /// references a model absent from the model reference (or names none at
    /// all). Overrides are applied in a fixed order on top of the base
    /// template; the SDXL hires-fix rule is applied last, after all
    /// overrides, so nothing can re-enable it.
    ///
    /// Template substitution replaces every occurrence of `{p}` and `{np}`,
    /// not just the first. Catalog templates hold one slot each, where the
    /// two behaviors agree.
    pub fn for_style(
        style: &StyleDefinition,
        models: &ModelMap,
        sample: &str,
    ) -> Result<Self> {
        let model_name = style
            .model
            .as_deref()
            .ok_or_else(|| PreviewError::InvalidModel("(none)".to_string()))?;
        let reference = models
            .get(model_name)
            .ok_or_else(|| PreviewError::InvalidModel(model_name.to_string()))?;

        let mut request = Self::base();
        request.models = vec![model_name.to_string()];
        if let Some(steps) = style.steps {
            request.params.steps = steps;
        }
        if let Some(width) = style.width {
            request.params.width = width;
        }
        if let Some(height) = style.height {
            request.params.height = height;
        }
        if let Some(cfg_scale) = style.cfg_scale {
            request.params.cfg_scale = cfg_scale;
        }
        if let Some(ref sampler_name) = style.sampler_name {
            request.params.sampler_name = sampler_name.clone();
        }
        if let Some(ref loras) = style.loras {
            request.params.loras = loras.clone();
        }
        if let Some(ref tis) = style.tis {
            request.params.tis = tis.clone();
        }
        if reference.baseline.contains(SDXL_BASELINE_MARKER) {
            request.params.hires_fix = false;
        }
        if let Some(ref template) = style.prompt {
            request.prompt = template
                .replace(POSITIVE_SLOT, sample)
                .replace(NEGATIVE_SLOT, "");
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelReference;
    use std::collections::HashMap;

    fn model_map() -> ModelMap {
        let mut models = HashMap::new();
        models.insert(
            "Deliberate".to_string(),
            ModelReference {
                baseline: "stable diffusion 1".to_string(),
            },
        );
        models.insert(
            "AlbedoBase XL (SDXL)".to_string(),
            ModelReference {
                baseline: "stable_diffusion_xl".to_string(),
            },
        );
        models
    }

    fn style_for(model: &str) -> StyleDefinition {
        StyleDefinition {
            model: Some(model.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_overrides_uses_base_values() {
        let request =
            GenerationRequest::for_style(&style_for("Deliberate"), &model_map(), "a dragon")
                .unwrap();
        let base = GenerationRequest::base();
        assert_eq!(request.params, base.params);
        assert_eq!(request.prompt, base.prompt);
        assert_eq!(request.models, ["Deliberate"]);
    }

    #[test]
    fn test_partial_override_law() {
        let style = StyleDefinition {
            sampler_name: Some("k_dpmpp_2m".to_string()),
            ..style_for("Deliberate")
        };
        let request = GenerationRequest::for_style(&style, &model_map(), "a dragon").unwrap();
        let base = GenerationRequest::base();
        assert_eq!(request.params.sampler_name, "k_dpmpp_2m");
        // Everything without an override keeps the template value.
        assert_eq!(request.params.steps, base.params.steps);
        assert_eq!(request.params.width, base.params.width);
        assert_eq!(request.params.height, base.params.height);
        assert_eq!(request.params.cfg_scale, base.params.cfg_scale);
        assert_eq!(request.params.hires_fix, base.params.hires_fix);
    }

    #[test]
    fn test_all_overrides_applied() {
        let style = StyleDefinition {
            model: Some("Deliberate".to_string()),
            steps: Some(40),
            width: Some(1024),
            height: Some(576),
            cfg_scale: Some(4.0),
            sampler_name: Some("k_dpm_2".to_string()),
            loras: Some(vec![Lora {
                name: "add-detail".to_string(),
                model: Some(0.7),
                clip: None,
                inject_trigger: None,
            }]),
            tis: Some(vec![TextualInversion {
                name: "bad-hands".to_string(),
                inject_ti: Some("negprompt".to_string()),
                strength: None,
            }]),
            prompt: None,
        };
        let request = GenerationRequest::for_style(&style, &model_map(), "a dragon").unwrap();
        assert_eq!(request.params.steps, 40);
        assert_eq!(request.params.width, 1024);
        assert_eq!(request.params.height, 576);
        assert_eq!(request.params.cfg_scale, 4.0);
        assert_eq!(request.params.sampler_name, "k_dpm_2");
        assert_eq!(request.params.loras.len(), 1);
        assert_eq!(request.params.tis.len(), 1);
    }

    #[test]
    fn test_sdxl_baseline_disables_hires_fix() {
        let request = GenerationRequest::for_style(
            &style_for("AlbedoBase XL (SDXL)"),
            &model_map(),
            "a dragon",
        )
        .unwrap();
        assert!(!request.params.hires_fix);
    }

    #[test]
    fn test_prompt_template_substitution() {
        let style = StyleDefinition {
            prompt: Some("masterpiece, {p}, sharp focus###{np}lowres, blurry".to_string()),
            ..style_for("Deliberate")
        };
        let request = GenerationRequest::for_style(&style, &model_map(), "a dragon").unwrap();
        assert_eq!(
            request.prompt,
            "masterpiece, a dragon, sharp focus###lowres, blurry"
        );
    }

    #[test]
    fn test_repeated_placeholders_all_substituted() {
        let style = StyleDefinition {
            prompt: Some("{p}, detailed, {p}###{np}blurry{np}".to_string()),
            ..style_for("Deliberate")
        };
        let request = GenerationRequest::for_style(&style, &model_map(), "a dragon").unwrap();
        assert_eq!(request.prompt, "a dragon, detailed, a dragon###blurry");
    }

    #[test]
    fn test_unknown_model_refused() {
        let err = GenerationRequest::for_style(
            &style_for("nonexistent-model"),
            &model_map(),
            "a dragon",
        )
        .unwrap_err();
        assert!(matches!(err, PreviewError::InvalidModel(name) if name == "nonexistent-model"));
    }

    #[test]
    fn test_style_without_model_refused() {
        let err =
            GenerationRequest::for_style(&StyleDefinition::default(), &model_map(), "a dragon")
                .unwrap_err();
        assert!(matches!(err, PreviewError::InvalidModel(_)));
    }

    #[test]
    fn test_request_does_not_alias_style() {
        let mut style = style_for("Deliberate");
        style.steps = Some(12);
        let request = GenerationRequest::for_style(&style, &model_map(), "a dragon").unwrap();
        style.steps = Some(99);
        assert_eq!(request.params.steps, 12);
    }

    #[test]
    fn test_empty_adjustment_lists_not_serialized() {
        let json =
            serde_json::to_value(GenerationRequest::base()).unwrap();
        assert!(json["params"].get("loras").is_none());
        assert!(json["params"].get("tis").is_none());
        assert_eq!(json["params"]["sampler_name"], "k_euler_a");
    }
}
