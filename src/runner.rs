use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::client::{HordeClient, PollConfig};
use crate::error::Result;
use crate::request::GenerationRequest;
use crate::samples::{preview_filename, slugify, PROMPT_SAMPLES};
use crate::types::{GenerationOutcome, ModelMap, RunStatus, StyleDefinition, StyleMap};

/// One full preview run over the style × prompt-sample cross-product.
///
/// Catalogs are passed in as values, not read from ambient state, so a run
/// can be constructed against fixtures in tests. Pairs are processed one at
/// a time in nested style → prompt order; a pair whose asset file already
/// exists on disk is recorded successful without any remote call, which
/// makes reruns resume where the last one stopped.
pub struct PreviewRun {
    client: HordeClient,
    models: ModelMap,
    styles: StyleMap,
    images_dir: PathBuf,
    poll: PollConfig,
    samples: &'static [(&'static str, &'static str)],
}

impl PreviewRun {
    pub fn new(
        client: HordeClient,
        models: ModelMap,
        styles: StyleMap,
        images_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            models,
            styles,
            images_dir: images_dir.into(),
            poll: PollConfig::default(),
            samples: PROMPT_SAMPLES,
        }
    }

    /// Override the polling cadence/deadline.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Override the prompt sample set (used by tests).
    pub fn with_samples(mut self, samples: &'static [(&'static str, &'static str)]) -> Self {
        self.samples = samples;
        self
    }

    /// Prompt labels in run order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.samples.iter().map(|(label, _)| *label).collect()
    }

    /// Walk every (style, prompt sample) pair sequentially and accumulate
    /// the success map. Per-pair failures (invalid model, censored-out or
    /// empty results, poll timeout) are logged and recorded as `false`;
    /// transport errors propagate and abort the run.
    pub async fn execute(&self) -> Result<RunStatus> {
        fs::create_dir_all(&self.images_dir)?;
        let mut status = RunStatus::new();

        for (style_name, style) in &self.styles {
            let slug = slugify(style_name);
            let mut prompt_status = IndexMap::new();
            for (label, sample) in self.samples.iter().copied() {
                let ok = self
                    .generate_pair(style_name, style, &slug, label, sample)
                    .await?;
                prompt_status.insert(label.to_string(), ok);
            }
            status.insert(style_name.clone(), prompt_status);
        }
        Ok(status)
    }

    async fn generate_pair(
        &self,
        style_name: &str,
        style: &StyleDefinition,
        slug: &str,
        label: &str,
        sample: &str,
    ) -> Result<bool> {
        // Model validity gates everything, including the resume path: a
        // pair counts as successful only when its file exists AND its model
        // reference is valid.
        match style.model.as_deref() {
            Some(model) if self.models.contains_key(model) => {}
            other => {
                error!(
                    "invalid model for style {}: {}",
                    style_name,
                    other.unwrap_or("(none)")
                );
                return Ok(false);
            }
        }

        let filename = preview_filename(slug, label);
        let target = self.images_dir.join(&filename);
        if target.exists() {
            debug!("{} already exists, skipping generation", filename);
            return Ok(true);
        }

        let request = GenerationRequest::for_style(style, &self.models, sample)?;

        info!("generating {} / {}", style_name, label);
        let images = match self.client.generate(&request, &self.poll).await? {
            GenerationOutcome::Finished(images) => images,
            GenerationOutcome::TimedOut => {
                warn!("generation for {} / {} timed out", style_name, label);
                return Ok(false);
            }
        };

        // First non-discarded result wins; any siblings are ignored.
        let Some(image) = images.into_iter().next() else {
            warn!("no usable results for {} / {}", style_name, label);
            return Ok(false);
        };

        let bytes = self.client.download(&image.url).await?;
        fs::write(&target, &bytes)?;
        info!("saved {}", filename);
        Ok(true)
    }
}
