use async_trait::async_trait;

use crate::types::query::{QueryRequest, QueryResult};

/// Executes one query and returns its settled snapshot.
///
/// Implementations absorb transport failures into `QueryResult::error`;
/// nothing is raised. A query that is deferred (e.g. not needed for a
/// server-render pass) comes back with `loading = true`.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, request: &QueryRequest) -> QueryResult;
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for std::sync::Arc<T> {
    async fn execute(&self, request: &QueryRequest) -> QueryResult {
        (**self).execute(request).await
    }
}
