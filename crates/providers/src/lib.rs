//! Gateway backend implementations for Cogwork.
//!
//! All backends implement the `cogwork_core::Gateway` trait. Use
//! [`gateway_from_config`] to build the backend selected by configuration.

use std::sync::Arc;

use cogwork_core::{Gateway, GatewayError};
use cogwork_config::AppConfig;

pub mod anthropic;
pub mod mock;
pub mod openai;

pub use anthropic::AnthropicGateway;
pub use mock::MockGateway;
pub use openai::OpenAiGateway;

/// Build the gateway backend selected by `config.default_provider`.
///
/// A missing API key is not an error here: the backend is constructed and
/// authentication fails at call time, which keeps offline commands (status,
/// tool listing) usable without credentials.
pub fn gateway_from_config(config: &AppConfig) -> Result<Arc<dyn Gateway>, GatewayError> {
    let name = config.default_provider.as_str();

    match name {
        "openai" => {
            let api_key = config.api_key_for("openai").unwrap_or_default();
            let mut gateway = OpenAiGateway::new(api_key)
                .with_model(config.model_for("openai"))
                .with_temperature(config.default_temperature)
                .with_max_tokens(config.default_max_tokens);
            if let Some(url) = config.api_url_for("openai") {
                gateway = gateway.with_base_url(url);
            }
            Ok(Arc::new(gateway))
        }
        "anthropic" => {
            let api_key = config.api_key_for("anthropic").unwrap_or_default();
            let mut gateway = AnthropicGateway::new(api_key)
                .with_model(config.model_for("anthropic"))
                .with_temperature(config.default_temperature)
                .with_max_tokens(config.default_max_tokens);
            if let Some(url) = config.api_url_for("anthropic") {
                gateway = gateway.with_base_url(url);
            }
            Ok(Arc::new(gateway))
        }
        "mock" => Ok(Arc::new(MockGateway::new())),
        other => Err(GatewayError::NotConfigured(format!(
            "unknown gateway backend '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_openai_by_default() {
        let config = AppConfig::default();
        let gateway = gateway_from_config(&config).unwrap();
        assert_eq!(gateway.name(), "openai");
    }

    #[test]
    fn factory_builds_anthropic() {
        let config = AppConfig {
            default_provider: "anthropic".into(),
            ..AppConfig::default()
        };
        let gateway = gateway_from_config(&config).unwrap();
        assert_eq!(gateway.name(), "anthropic");
    }

    #[test]
    fn factory_builds_mock() {
        let config = AppConfig {
            default_provider: "mock".into(),
            ..AppConfig::default()
        };
        let gateway = gateway_from_config(&config).unwrap();
        assert_eq!(gateway.name(), "mock");
    }

    #[test]
    fn factory_rejects_unknown_backend() {
        let config = AppConfig {
            default_provider: "llamafarm".into(),
            ..AppConfig::default()
        };
        let err = gateway_from_config(&config).unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured(_)));
        assert!(err.to_string().contains("llamafarm"));
    }
}
