//! # horde-previews
//!
//! Batch style preview generator for the [AI Horde](https://aihorde.net).
//!
//! Walks a catalog of visual styles against a fixed set of prompt samples,
//! submits one image generation request per pair, polls until the Horde
//! finishes, downloads the result, and compiles everything into three flat
//! report artifacts (a Markdown table, an HTML table, and a JSON index).
//! Images already on disk are never regenerated, so interrupted runs resume
//! where they stopped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use horde_previews::{catalog, report, HordeClient, PreviewRun};
//!
//! # async fn example() -> horde_previews::Result<()> {
//! let models = catalog::load_models("stable_diffusion.json")?;
//! let styles = catalog::load_styles("styles.json")?;
//!
//! let client = HordeClient::new("0000000000", "horde-previews:0.1.0:(ci)");
//! let run = PreviewRun::new(client, models, styles, "images");
//!
//! let labels = run.labels();
//! let status = run.execute().await?;
//! report::write_reports(&status, &labels, "https://cdn.example/previews", ".")?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod request;
pub mod runner;
pub mod samples;
pub mod types;

pub use client::{HordeClient, PollConfig, DEFAULT_ENDPOINT};
pub use config::RunConfig;
pub use error::{PreviewError, Result};
pub use request::{GenerationParams, GenerationRequest};
pub use runner::PreviewRun;
pub use types::{
    GeneratedImage, GenerationCheck, GenerationOutcome, Lora, ModelMap, ModelReference,
    PreviewIndex, QueuedGeneration, RunStatus, StyleDefinition, StyleMap, TextualInversion,
};
