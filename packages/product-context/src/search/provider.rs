use std::sync::Arc;

use serde_json::{Map, Value};

use crate::graphql::{SEARCH_QUERY, SEARCH_QUERY_NAME};
use crate::traits::{DataLayer, QueryExecutor};
use crate::types::query::{QueryError, QueryOptions, QueryRequest, QueryResult};
use crate::types::search::{
    ContextVariables, RuntimeContext, SearchArgs, SearchPayload, SearchQueryVariables,
    SearchRouteParams,
};

use super::data_layer::search_data_layer_events;
use super::variables::search_variables;

/// Context handed to search page content.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    /// Provider loading: true until content reports its variables
    pub loading: bool,
    pub variables: SearchQueryVariables,
    /// Parsed `search` payload, when the query returned one
    pub search: Option<SearchPayload>,
    /// Query result fields merged with the `search` payload members
    pub search_query: Map<String, Value>,
}

/// Runs the search query for a search page.
///
/// Starts loading with one item per page; content reports its real page
/// size through [`set_context_variables`](Self::set_context_variables).
pub struct SearchContextProvider {
    params: SearchRouteParams,
    args: SearchArgs,
    runtime: RuntimeContext,
    executor: Arc<dyn QueryExecutor>,
    data_layer: Arc<dyn DataLayer>,
    variables: ContextVariables,
    loading: bool,
    last_pushed: Option<SearchQueryVariables>,
}

impl SearchContextProvider {
    pub fn new(
        params: SearchRouteParams,
        args: SearchArgs,
        runtime: RuntimeContext,
        executor: Arc<dyn QueryExecutor>,
        data_layer: Arc<dyn DataLayer>,
    ) -> Self {
        Self {
            params,
            args,
            runtime,
            executor,
            data_layer,
            variables: ContextVariables::default(),
            loading: true,
            last_pushed: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the context variables and stop waiting for them.
    pub fn set_context_variables(&mut self, variables: ContextVariables) {
        self.variables = variables;
        self.loading = false;
    }

    pub fn query_variables(&self) -> SearchQueryVariables {
        search_variables(&self.params, &self.args, &self.variables)
    }

    pub fn request(&self) -> QueryRequest {
        QueryRequest::new(
            SEARCH_QUERY,
            self.query_variables().to_json(),
            QueryOptions::new(SEARCH_QUERY_NAME),
        )
    }

    /// Execute the search query and build the context.
    pub async fn render(&mut self) -> SearchContext {
        let result = self.executor.execute(&self.request()).await;
        self.render_with(result)
    }

    /// Build the context from an already-observed search query result.
    ///
    /// Pushes the data-layer payload once per set of query variables, after
    /// both the provider and the query stopped loading.
    pub fn render_with(&mut self, result: QueryResult) -> SearchContext {
        let variables = self.query_variables();

        let raw_search = result
            .data
            .as_ref()
            .and_then(|data| data.get("search"))
            .and_then(Value::as_object)
            .cloned();

        let search = raw_search.as_ref().and_then(|raw| {
            serde_json::from_value::<SearchPayload>(Value::Object(raw.clone()))
                .map_err(|e| tracing::warn!(error = %e, "Malformed search payload"))
                .ok()
        });

        let settled = !self.loading && !result.loading;
        if settled && self.last_pushed.as_ref() != Some(&variables) {
            if let Some(search) = &search {
                tracing::debug!(
                    query = %variables.query,
                    products = search.products.len(),
                    "Pushing search impressions"
                );
                self.data_layer.push(search_data_layer_events(
                    search,
                    &self.params,
                    &self.runtime,
                ));
                self.last_pushed = Some(variables.clone());
            }
        }

        let mut search_query = Map::new();
        search_query.insert("loading".to_string(), Value::Bool(result.loading));
        search_query.insert(
            "error".to_string(),
            result.error.as_ref().map_or(Value::Null, QueryError::to_json),
        );
        search_query.insert("data".to_string(), result.data.clone().unwrap_or_default());
        if let Some(raw) = raw_search {
            search_query.extend(raw);
        }

        SearchContext {
            loading: self.loading,
            variables,
            search,
            search_query,
        }
    }
}
