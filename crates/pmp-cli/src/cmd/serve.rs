use anyhow::Context;
use claude_client::{AnthropicClient, ClientConfig};
use pmp_core::config::{Config, NarrativeConfig, WarnLevel};
use pmp_server::AppState;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub fn run(config_path: &Path, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    config.apply_env();
    if let Some(p) = port {
        config.server.port = p;
    }

    let warnings = config.validate();
    for w in &warnings {
        match w.level {
            WarnLevel::Warning => tracing::warn!("{}", w.message),
            WarnLevel::Error => tracing::error!("{}", w.message),
        }
    }
    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    let client = AnthropicClient::new(client_config(&config.narrative, ClientConfig::from_env()))
        .context("ANTHROPIC_API_KEY must be set to serve")?;
    tracing::info!(model = client.model(), "narrative client ready");

    let app_state = AppState::new(config, Arc::new(client));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(pmp_server::serve(app_state))
}

/// Layer the narrative section over `base`. Unset model and API base keep the
/// client's own defaults.
fn client_config(narrative: &NarrativeConfig, base: ClientConfig) -> ClientConfig {
    ClientConfig {
        model: narrative.model.clone().unwrap_or(base.model),
        api_base: narrative.api_base.clone().unwrap_or(base.api_base),
        max_tokens: narrative.max_tokens,
        timeout: Duration::from_secs(narrative.timeout_seconds),
        max_retries: narrative.max_retries,
        ..base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claude_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

    #[test]
    fn unset_model_and_base_use_client_defaults() {
        let cfg = client_config(&NarrativeConfig::default(), ClientConfig::default());
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.max_tokens, 1500);
        assert_eq!(cfg.timeout, Duration::from_secs(60));
    }

    #[test]
    fn named_model_and_base_override() {
        let narrative = NarrativeConfig {
            model: Some("claude-3-5-haiku-latest".into()),
            api_base: Some("http://127.0.0.1:9999/v1".into()),
            max_retries: 0,
            ..NarrativeConfig::default()
        };
        let base = ClientConfig {
            api_key: "sk-test".into(),
            ..ClientConfig::default()
        };
        let cfg = client_config(&narrative, base);
        assert_eq!(cfg.model, "claude-3-5-haiku-latest");
        assert_eq!(cfg.api_base, "http://127.0.0.1:9999/v1");
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.api_key, "sk-test");
    }
}
