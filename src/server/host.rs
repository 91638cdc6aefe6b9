//! Server host for transport-agnostic API exposure
//!
//! `ServerHost` holds all application state: the configuration, the resource
//! handlers with their stores, and the token machinery. Exposures (only REST
//! today) consume it to build their routers.

use crate::config::AppConfig;
use crate::core::auth::Credentials;
use crate::core::error::ConfigError;
use crate::core::token::TokenIssuer;
use crate::server::resource_registry::ResourceRegistry;
use chrono::Duration;
use std::sync::Arc;

/// Host context containing all application state
pub struct ServerHost {
    /// Validated application configuration
    pub config: Arc<AppConfig>,

    /// Resource handlers, keyed by plural name
    pub resource_registry: ResourceRegistry,

    /// Signs and verifies bearer tokens
    pub issuer: Arc<TokenIssuer>,

    /// Logins accepted by the token endpoint
    pub credentials: Arc<Credentials>,

    /// Lifetime of tokens minted by the token endpoint
    pub token_ttl: Duration,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(
        config: AppConfig,
        resource_registry: ResourceRegistry,
    ) -> Result<Self, ConfigError> {
        let token_ttl = config.auth.token_ttl()?;
        let issuer = Arc::new(TokenIssuer::new(&config.auth.secret));
        let credentials = Arc::new(Credentials::new(config.auth.users.clone()));

        Ok(Self {
            config: Arc::new(config),
            resource_registry,
            issuer,
            credentials,
            token_ttl,
        })
    }

    /// Get resource names registered in the host
    pub fn resource_names(&self) -> Vec<&str> {
        self.resource_registry.resource_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_from_default_config() {
        let host =
            ServerHost::from_builder_components(AppConfig::default_config(), ResourceRegistry::new())
                .unwrap();

        assert_eq!(host.token_ttl, Duration::seconds(300));
        assert_eq!(host.credentials.verify("ttg", "password"), Some(667));
        assert!(host.resource_names().is_empty());
    }

    #[test]
    fn test_host_rejects_unusable_ttl() {
        let mut config = AppConfig::default_config();
        config.auth.token_ttl_secs = 100_000_000_000_000_000;

        let result = ServerHost::from_builder_components(config, ResourceRegistry::new());
        assert!(matches!(result, Err(ConfigError::InvalidTokenTtl { .. })));
    }
}
