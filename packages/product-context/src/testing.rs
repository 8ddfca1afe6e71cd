//! Testing utilities including mock implementations.
//!
//! These are useful for exercising the resolver, the product wrapper and
//! the search provider without a GraphQL server.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::context::ChildProps;
use crate::traits::{DataLayer, NavigationRequest, Navigator, ProductPageRenderer, QueryExecutor};
use crate::types::product::ResolvedProduct;
use crate::types::query::{QueryError, QueryRequest, QueryResult};

// =============================================================================
// Mock Query Executor
// =============================================================================

/// A mock executor answering by query display name.
///
/// Responses are queued per query; the last queued response keeps being
/// returned once the queue is down to one. Delays let tests control the
/// order in which queries settle.
#[derive(Default)]
pub struct MockQueryExecutor {
    responses: RwLock<HashMap<String, VecDeque<QueryResult>>>,
    delays: RwLock<HashMap<String, Duration>>,
    calls: Arc<Mutex<Vec<QueryRequest>>>,
}

impl MockQueryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the query with `display_name`.
    pub fn with_response(self, display_name: impl Into<String>, result: QueryResult) -> Self {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(display_name.into())
            .or_default()
            .push_back(result);
        self
    }

    /// Delay every execution of the query with `display_name`.
    pub fn with_delay(self, display_name: impl Into<String>, delay: Duration) -> Self {
        self.delays
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(display_name.into(), delay);
        self
    }

    /// Get all requests made to this mock.
    pub fn calls(&self) -> Vec<QueryRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Count executions of one query.
    pub fn call_count(&self, display_name: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|request| request.display_name() == display_name)
            .count()
    }

    fn next_response(&self, display_name: &str) -> QueryResult {
        let mut responses = self
            .responses
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match responses.get_mut(display_name) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => QueryResult::failed(QueryError::new(format!(
                "no mock response for {}",
                display_name
            ))),
        }
    }
}

#[async_trait]
impl QueryExecutor for MockQueryExecutor {
    async fn execute(&self, request: &QueryRequest) -> QueryResult {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let delay = self
            .delays
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request.display_name())
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.next_response(request.display_name())
    }
}

// =============================================================================
// Recording Navigator
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<NavigationRequest>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<NavigationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, request: NavigationRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

// =============================================================================
// Recording Data Layer
// =============================================================================

#[derive(Default)]
pub struct RecordingDataLayer {
    pushes: Mutex<Vec<Vec<Value>>>,
}

impl RecordingDataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every push, in order.
    pub fn pushes(&self) -> Vec<Vec<Value>> {
        self.pushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DataLayer for RecordingDataLayer {
    fn push(&self, events: Vec<Value>) {
        self.pushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(events);
    }
}

// =============================================================================
// Recording Renderer
// =============================================================================

/// Record of a call made to the recording renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    TitleAndPixel {
        has_product: bool,
        selected_item: Option<Value>,
        loading: bool,
    },
    OpenGraph,
    StructuredData {
        selected_item: Value,
    },
    Children {
        slug: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductPageRenderer for RecordingRenderer {
    fn title_and_pixel(
        &mut self,
        product: Option<&ResolvedProduct>,
        selected_item: Option<&Value>,
        loading: bool,
    ) {
        self.calls.push(RenderCall::TitleAndPixel {
            has_product: product.is_some(),
            selected_item: selected_item.cloned(),
            loading,
        });
    }

    fn open_graph(&mut self, _product: &ResolvedProduct) {
        self.calls.push(RenderCall::OpenGraph);
    }

    fn structured_data(&mut self, _product: &ResolvedProduct, selected_item: &Value) {
        self.calls.push(RenderCall::StructuredData {
            selected_item: selected_item.clone(),
        });
    }

    fn children(&mut self, props: &ChildProps) {
        self.calls.push(RenderCall::Children {
            slug: props.slug.clone(),
        });
    }
}
