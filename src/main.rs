use tracing::{error, info};

use horde_previews::{catalog, config, report, HordeClient, PreviewRun, RunConfig};

const CONFIG_PATH: &str = "config.json";
const MODELS_PATH: &str = "stable_diffusion.json";
const STYLES_PATH: &str = "styles.json";
const IMAGES_DIR: &str = "images";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::setup_logging().map_err(|e| anyhow::anyhow!("logging setup failed: {}", e))?;

    let run_config = match RunConfig::load(CONFIG_PATH) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load {}: {}", CONFIG_PATH, e);
            return Ok(());
        }
    };
    let Some(api_key) = run_config.api_key() else {
        error!("an AI Horde API key is required to generate previews");
        return Ok(());
    };

    let models = catalog::load_models(MODELS_PATH).unwrap_or_else(|e| {
        error!("failed to load model reference {}: {}", MODELS_PATH, e);
        Default::default()
    });
    let styles = catalog::load_styles(STYLES_PATH).unwrap_or_else(|e| {
        error!("failed to load style reference {}: {}", STYLES_PATH, e);
        Default::default()
    });
    info!(
        "loaded {} models and {} styles",
        models.len(),
        styles.len()
    );

    let client = HordeClient::new(api_key, run_config.client_agent.clone());
    let run = PreviewRun::new(client, models, styles, IMAGES_DIR);

    let labels = run.labels();
    let status = run.execute().await?;
    report::write_reports(&status, &labels, &run_config.cdn_url_prefix, ".")?;

    let generated = status
        .values()
        .flat_map(|prompts| prompts.values())
        .filter(|ok| **ok)
        .count();
    info!(
        "run complete: {} of {} previews available; wrote {}, {} and {}",
        generated,
        status.len() * labels.len(),
        report::MARKDOWN_REPORT,
        report::HTML_REPORT,
        report::INDEX_REPORT
    );
    Ok(())
}
