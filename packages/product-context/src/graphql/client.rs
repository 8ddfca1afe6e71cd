//! GraphQL client for making requests to the storefront API

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::traits::QueryExecutor;
use crate::types::query::{ErrorPolicy, QueryError, QueryRequest, QueryResult};

/// GraphQL request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest<'a, V: Serialize> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error
#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    pub locations: Option<Vec<GraphQLErrorLocation>>,
    /// Path segments are field names or list indices
    pub path: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLErrorLocation {
    pub line: i32,
    pub column: i32,
}

impl From<&GraphQLError> for QueryError {
    fn from(error: &GraphQLError) -> Self {
        QueryError {
            message: error.message.clone(),
            path: error.path.as_ref().map(|segments| {
                segments
                    .iter()
                    .map(|segment| match segment {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            }),
        }
    }
}

/// Turn a raw response into a settled snapshot under `policy`.
///
/// Only the first error is kept; under `ErrorPolicy::All` it travels next to
/// whatever data came back.
pub fn into_query_result(response: GraphQLResponse<Value>, policy: ErrorPolicy) -> QueryResult {
    let error = response
        .errors
        .as_ref()
        .and_then(|errors| errors.first())
        .map(QueryError::from);
    let data = response.data.filter(|data| !data.is_null());

    match (policy, data, error) {
        (_, Some(data), None) => QueryResult::ready(data),
        (ErrorPolicy::All, Some(data), Some(error)) => QueryResult::partial(data, error),
        (ErrorPolicy::None, Some(_), Some(error)) => QueryResult::failed(error),
        (_, None, Some(error)) => QueryResult::failed(error),
        (_, None, None) => QueryResult::failed(QueryError::new(ClientError::NoData.to_string())),
    }
}

/// GraphQL client for making requests
#[derive(Clone)]
pub struct GraphQLClient {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
    server_render: bool,
}

impl GraphQLClient {
    /// Create a new GraphQL client
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            auth_token: None,
            server_render: false,
        }
    }

    /// Create a client with authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Mark this client as serving a server-render pass.
    ///
    /// Queries that opt out of server rendering are then left loading
    /// instead of being sent.
    pub fn server_render(mut self, enabled: bool) -> Self {
        self.server_render = enabled;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send<V, R>(
        &self,
        query: &str,
        variables: Option<V>,
        operation_name: Option<&str>,
    ) -> Result<GraphQLResponse<R>>
    where
        V: Serialize,
        R: DeserializeOwned,
    {
        let request = GraphQLRequest {
            query,
            variables,
            operation_name,
        };

        let mut req = self.client.post(&self.endpoint).json(&request);

        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl QueryExecutor for GraphQLClient {
    async fn execute(&self, request: &QueryRequest) -> QueryResult {
        let name = request.display_name();

        if self.server_render && !request.options.ssr {
            tracing::debug!(query = name, "Deferring client-only query during server render");
            return QueryResult::loading();
        }

        tracing::debug!(query = name, endpoint = %self.endpoint, "Executing query");

        match self
            .send::<_, Value>(request.document, Some(&request.variables), Some(name))
            .await
        {
            Ok(response) => {
                let result = into_query_result(response, request.options.error_policy);
                if let Some(error) = &result.error {
                    tracing::warn!(
                        query = name,
                        has_data = result.data.is_some(),
                        error = %error,
                        "Query returned errors"
                    );
                }
                result
            }
            Err(e) => {
                tracing::warn!(query = name, error = %e, "Query failed");
                QueryResult::failed(QueryError::new(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::query::QueryOptions;
    use serde_json::json;

    fn response(value: Value) -> GraphQLResponse<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_error_policy_all_keeps_partial_data() {
        let result = into_query_result(
            response(json!({
                "data": {"product": {"name": "Runner"}},
                "errors": [{"message": "benefits unavailable", "path": ["product", "benefits", 0]}]
            })),
            ErrorPolicy::All,
        );

        assert!(!result.loading);
        assert_eq!(result.data, Some(json!({"product": {"name": "Runner"}})));
        let error = result.error.unwrap();
        assert_eq!(error.message, "benefits unavailable");
        assert_eq!(
            error.path,
            Some(vec!["product".to_string(), "benefits".to_string(), "0".to_string()])
        );
    }

    #[test]
    fn test_error_policy_none_discards_data() {
        let result = into_query_result(
            response(json!({
                "data": {"product": {"name": "Runner"}},
                "errors": [{"message": "boom"}]
            })),
            ErrorPolicy::None,
        );
        assert!(result.data.is_none());
        assert_eq!(result.error.unwrap().message, "boom");
    }

    #[test]
    fn test_null_data_without_errors_is_no_data() {
        let result = into_query_result(response(json!({"data": null})), ErrorPolicy::All);
        assert!(result.data.is_none());
        assert_eq!(result.error.unwrap().message, "No data returned");
    }

    #[test]
    fn test_request_body_shape() {
        let body = GraphQLRequest {
            query: "query Q { x }",
            variables: Some(json!({"slug": "shoes"})),
            operation_name: Some("ProductQuery"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "query": "query Q { x }",
                "variables": {"slug": "shoes"},
                "operationName": "ProductQuery"
            })
        );
    }

    #[tokio::test]
    async fn test_server_render_defers_client_only_queries() {
        // Unroutable endpoint: the query must not be sent at all.
        let client = GraphQLClient::new("http://127.0.0.1:9/graphql").server_render(true);
        let request = QueryRequest::new(
            "query Q { x }",
            json!({}),
            QueryOptions::new("DeferredQuery").client_only(),
        );

        let result = client.execute(&request).await;
        assert!(result.loading);
        assert!(result.data.is_none());
        assert!(result.error.is_none());
    }
}
