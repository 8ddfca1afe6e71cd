//! Query requests and the result snapshots a query execution produces.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How errors returned next to data are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Any error discards the data.
    None,
    /// Partial data is kept and returned alongside the errors.
    #[default]
    All,
}

/// Options attached to one query execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    pub error_policy: ErrorPolicy,
    /// `false` when the query is not needed for server-rendered output and
    /// may resolve after first paint.
    pub ssr: bool,
    pub display_name: String,
}

impl QueryOptions {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            error_policy: ErrorPolicy::All,
            ssr: true,
            display_name: display_name.into(),
        }
    }

    pub fn client_only(mut self) -> Self {
        self.ssr = false;
        self
    }
}

/// One query to hand to a [`QueryExecutor`](crate::traits::QueryExecutor).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub document: &'static str,
    pub variables: Value,
    pub options: QueryOptions,
}

impl QueryRequest {
    pub fn new(document: &'static str, variables: Value, options: QueryOptions) -> Self {
        Self {
            document,
            variables,
            options,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.options.display_name
    }
}

/// Error carried by a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut error = json!({ "message": self.message });
        if let Some(path) = &self.path {
            error["path"] = json!(path);
        }
        error
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Snapshot of a query at one instant.
///
/// While `loading` is true, `data` is not authoritative even if present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult<T = Value> {
    pub loading: bool,
    pub data: Option<T>,
    pub error: Option<QueryError>,
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self::loading()
    }
}

impl<T> QueryResult<T> {
    pub fn loading() -> Self {
        Self {
            loading: true,
            data: None,
            error: None,
        }
    }

    pub fn ready(data: T) -> Self {
        Self {
            loading: false,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: QueryError) -> Self {
        Self {
            loading: false,
            data: None,
            error: Some(error),
        }
    }

    /// Partial data returned with an error (`ErrorPolicy::All`).
    pub fn partial(data: T, error: QueryError) -> Self {
        Self {
            loading: false,
            data: Some(data),
            error: Some(error),
        }
    }

    /// Mark a held result as refetching. Stale data stays attached.
    pub fn refetching(mut self) -> Self {
        self.loading = true;
        self
    }

    /// Data usable right now: `None` while loading.
    pub fn settled_data(&self) -> Option<&T> {
        if self.loading {
            None
        } else {
            self.data.as_ref()
        }
    }
}
