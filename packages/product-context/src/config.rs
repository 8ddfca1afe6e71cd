use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::graphql::GraphQLClient;
use crate::types::search::RuntimeContext;

/// Storefront configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub graphql_url: String,
    pub account: String,
    pub server_render: bool,
    pub auth_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            graphql_url: env::var("STORE_GRAPHQL_URL")
                .unwrap_or_else(|_| "http://localhost:8080/graphql".to_string()),
            account: env::var("STORE_ACCOUNT").context("STORE_ACCOUNT must be set")?,
            server_render: env::var("STORE_SERVER_RENDER")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("STORE_SERVER_RENDER must be true or false")?,
            auth_token: env::var("STORE_AUTH_TOKEN").ok(),
        })
    }

    pub fn graphql_client(&self) -> GraphQLClient {
        let client = GraphQLClient::new(&self.graphql_url).server_render(self.server_render);
        match &self.auth_token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    /// Runtime context for analytics payloads on the given page.
    pub fn runtime_context(&self, page_title: &str, page_url: &str) -> RuntimeContext {
        RuntimeContext::new(&self.account).with_page(page_title, page_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_context_uses_account() {
        let config = Config {
            graphql_url: "http://localhost:8080/graphql".to_string(),
            account: "storefront".to_string(),
            server_render: false,
            auth_token: None,
        };

        let runtime = config.runtime_context("Shoes", "https://shop.test/shoes/p");
        assert_eq!(runtime.account, "storefront");
        assert_eq!(runtime.page_title, "Shoes");
        assert_eq!(config.graphql_client().endpoint(), "http://localhost:8080/graphql");
    }
}
