use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{PreviewError, Result};
use crate::request::GenerationRequest;
use crate::types::{GeneratedImage, GenerationCheck, GenerationOutcome, QueuedGeneration};

/// Default public AI Horde endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://aihorde.net/api";

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// How to poll a queued generation.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed interval between status checks.
    pub interval: Duration,
    /// Give up after this long. `None` polls until the Horde reports done.
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            deadline: None,
        }
    }
}

/// Raw `/v2/generate/status` payload.
#[derive(Debug, Deserialize)]
struct GenerationStatus {
    #[serde(default)]
    generations: Vec<RawGeneration>,
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    #[serde(default)]
    id: String,
    #[serde(default)]
    img: String,
    #[serde(default)]
    censored: bool,
}

/// Drop censored results, keep (id, url) for the rest in order.
fn usable_generations(status: GenerationStatus) -> Vec<GeneratedImage> {
    let mut images = Vec::new();
    for generation in status.generations {
        if generation.censored {
            warn!("censored image detected, discarding result {}", generation.id);
        } else {
            images.push(GeneratedImage {
                id: generation.id,
                url: generation.img,
            });
        }
    }
    images
}

/// Async client for the AI Horde image generation API.
///
/// Speaks the three v2 endpoints this tool needs: submit, check, status.
/// The API key travels in the `apikey` header and the client-agent string
/// in `Client-Agent`, on every call.
///
/// # Example
/// ```no_run
/// use horde_previews::{HordeClient, PollConfig, GenerationRequest, GenerationOutcome};
///
/// # async fn example() -> horde_previews::Result<()> {
/// let client = HordeClient::new("0000000000", "horde-previews:0.1.0:(ci)");
/// let outcome = client
///     .generate(&GenerationRequest::base(), &PollConfig::default())
///     .await?;
/// if let GenerationOutcome::Finished(images) = outcome {
///     for image in &images {
///         let bytes = client.download(&image.url).await?;
///         std::fs::write(format!("{}.webp", image.id), &bytes)?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HordeClient {
    http: Client,
    endpoint: String,
    api_key: String,
    client_agent: String,
}

impl HordeClient {
    /// Create a client against the public Horde endpoint.
    pub fn new(api_key: impl Into<String>, client_agent: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            client_agent: client_agent.into(),
        }
    }

    /// Point the client at a different Horde instance.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = normalize(endpoint.into());
        self
    }

    /// Use a custom `reqwest::Client` (for connection pooling, timeouts, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // ── Submit ──────────────────────────────────────────────────────

    /// Submit an async generation request. Returns the job id and kudos cost.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<QueuedGeneration> {
        let url = format!("{}/v2/generate/async", self.endpoint);
        let resp = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(30))
            .header("apikey", &self.api_key)
            .header("Client-Agent", &self.client_agent)
            .json(request)
            .send()
            .await
            .map_err(|e| PreviewError::Network {
                context: format!("Cannot reach the AI Horde at {}", self.endpoint),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(PreviewError::Http { status, body });
        }

        let queued: QueuedGeneration = resp.json().await.map_err(|e| PreviewError::Network {
            context: "Failed to parse generate/async response".into(),
            source: e,
        })?;
        if queued.id.is_empty() {
            return Err(PreviewError::InvalidResponse(
                "generate/async response missing job id".into(),
            ));
        }
        Ok(queued)
    }

    // ── Poll ────────────────────────────────────────────────────────

    /// Query a queued job's progress.
    pub async fn check(&self, id: &str) -> Result<GenerationCheck> {
        let url = format!("{}/v2/generate/check/{}", self.endpoint, id);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(10))
            .header("apikey", &self.api_key)
            .header("Client-Agent", &self.client_agent)
            .send()
            .await
            .map_err(|e| PreviewError::Network {
                context: format!("Failed to check generation {}", id),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(PreviewError::Http { status, body });
        }

        resp.json().await.map_err(|e| PreviewError::Network {
            context: "Failed to parse generate/check response".into(),
            source: e,
        })
    }

    /// Poll `check` on a fixed interval until the job is done.
    ///
    /// Returns `Ok(true)` when the Horde reports completion and `Ok(false)`
    /// when the configured deadline elapsed first. Without a deadline this
    /// polls indefinitely.
    pub async fn wait_for_done(&self, id: &str, poll: &PollConfig) -> Result<bool> {
        let start = std::time::Instant::now();
        loop {
            let check = self.check(id).await?;
            info!(
                "Q#:{} W:{} P:{} F:{}",
                check.queue_position, check.waiting, check.processing, check.finished
            );
            if check.done {
                info!("generation {} complete", id);
                return Ok(true);
            }
            if let Some(deadline) = poll.deadline {
                if start.elapsed() >= deadline {
                    return Ok(false);
                }
            }
            tokio::time::sleep(poll.interval).await;
        }
    }

    // ── Results ─────────────────────────────────────────────────────

    /// Fetch the final results for a job, discarding censored outputs.
    pub async fn results(&self, id: &str) -> Result<Vec<GeneratedImage>> {
        let url = format!("{}/v2/generate/status/{}", self.endpoint, id);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(30))
            .header("apikey", &self.api_key)
            .header("Client-Agent", &self.client_agent)
            .send()
            .await
            .map_err(|e| PreviewError::Network {
                context: format!("Failed to fetch results for generation {}", id),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(PreviewError::Http { status, body });
        }

        let status: GenerationStatus = resp.json().await.map_err(|e| PreviewError::Network {
            context: "Failed to parse generate/status response".into(),
            source: e,
        })?;
        Ok(usable_generations(status))
    }

    /// Run one request end to end: submit, poll until done, fetch results.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        poll: &PollConfig,
    ) -> Result<GenerationOutcome> {
        let queued = self.submit(request).await?;
        info!(
            "generation submitted, id: {}, kudos cost: {}",
            queued.id, queued.kudos
        );
        if !self.wait_for_done(&queued.id, poll).await? {
            return Ok(GenerationOutcome::TimedOut);
        }
        Ok(GenerationOutcome::Finished(self.results(&queued.id).await?))
    }

    // ── Asset download ──────────────────────────────────────────────

    /// Fetch a generated asset's raw bytes from its delivery URL.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PreviewError::Network {
                context: format!("Failed to fetch image from {}", url),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(PreviewError::Http {
                status: resp.status().as_u16(),
                body: format!("Failed to fetch image from {}", url),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| PreviewError::Network {
            context: "Failed to read image bytes".into(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}
