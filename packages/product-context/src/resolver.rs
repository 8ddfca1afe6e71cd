//! Composite product resolution.
//!
//! Three independent queries (catalog, category tree, benefits) are keyed
//! by the same identifier. Each settled, non-empty result is merged into one
//! composite product with positional precedence:
//! benefits > category tree > catalog.
//!
//! - The composite is withheld while the catalog query is loading.
//! - Aggregate `loading` is `catalog.loading || benefits.loading`; the
//!   category tree never gates it.
//! - A loading query contributes nothing, even when it holds stale data.
//! - With no composite, the cached preview fragment for `Product:<slug>` is
//!   used; cache failures count as a miss.
//!
//! [`resolve_snapshots`] is the pure per-render computation.
//! [`ProductResolver`] drives the queries, recomputes after each one
//! settles and runs the not-found effect on every recomputation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::ProductNotFound;
use crate::graphql::{
    PRODUCT_BENEFITS_QUERY, PRODUCT_BENEFITS_QUERY_NAME, PRODUCT_CATEGORY_TREE_QUERY,
    PRODUCT_CATEGORY_TREE_QUERY_NAME, PRODUCT_PREVIEW_FRAGMENT, PRODUCT_QUERY, PRODUCT_QUERY_NAME,
};
use crate::not_found::NotFoundEffect;
use crate::traits::{FragmentCache, Navigator, QueryExecutor};
use crate::types::identifier::{ProductIdentifier, ProductVariables};
use crate::types::product::{product_payload, CompositeEntity, ResolvedProduct};
use crate::types::query::{QueryError, QueryOptions, QueryRequest, QueryResult};

const DEFAULT_UPDATE_CAPACITY: usize = 64;

/// The three product queries, in merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductQueryKind {
    Catalog,
    CategoryTree,
    Benefits,
}

impl ProductQueryKind {
    /// Merge order: later entries win.
    pub const ALL: [ProductQueryKind; 3] = [
        ProductQueryKind::Catalog,
        ProductQueryKind::CategoryTree,
        ProductQueryKind::Benefits,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductQueryKind::Catalog => PRODUCT_QUERY_NAME,
            ProductQueryKind::CategoryTree => PRODUCT_CATEGORY_TREE_QUERY_NAME,
            ProductQueryKind::Benefits => PRODUCT_BENEFITS_QUERY_NAME,
        }
    }

    /// Build the request for this query.
    ///
    /// Only the catalog query is needed for server-rendered output.
    pub fn request(&self, identifier: &ProductIdentifier) -> QueryRequest {
        let variables = ProductVariables::for_product(identifier);
        let (document, variables, options) = match self {
            ProductQueryKind::Catalog => (
                PRODUCT_QUERY,
                variables.skipping_category_tree(),
                QueryOptions::new(self.display_name()),
            ),
            ProductQueryKind::CategoryTree => (
                PRODUCT_CATEGORY_TREE_QUERY,
                variables,
                QueryOptions::new(self.display_name()).client_only(),
            ),
            ProductQueryKind::Benefits => (
                PRODUCT_BENEFITS_QUERY,
                variables,
                QueryOptions::new(self.display_name()).client_only(),
            ),
        };

        QueryRequest::new(document, variables.to_json(), options)
    }
}

/// Snapshot of all three queries at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySnapshots {
    pub catalog: QueryResult,
    pub category_tree: QueryResult,
    pub benefits: QueryResult,
}

impl QuerySnapshots {
    pub fn get(&self, kind: ProductQueryKind) -> &QueryResult {
        match kind {
            ProductQueryKind::Catalog => &self.catalog,
            ProductQueryKind::CategoryTree => &self.category_tree,
            ProductQueryKind::Benefits => &self.benefits,
        }
    }

    pub fn set(&mut self, kind: ProductQueryKind, result: QueryResult) {
        match kind {
            ProductQueryKind::Catalog => self.catalog = result,
            ProductQueryKind::CategoryTree => self.category_tree = result,
            ProductQueryKind::Benefits => self.benefits = result,
        }
    }

    /// Aggregate loading flag. The category tree does not gate it.
    pub fn loading(&self) -> bool {
        self.catalog.loading || self.benefits.loading
    }
}

/// An error a settled query returned next to (or instead of) its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFailure {
    pub query: ProductQueryKind,
    pub error: QueryError,
}

/// Outcome of one resolution cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub product: Option<ResolvedProduct>,
    pub loading: bool,
    /// Set once loading has finished with nothing to show
    pub error: Option<ProductNotFound>,
    /// Errors of settled queries. Data that came with an error is merged
    /// like clean data; this list is how callers tell the two apart.
    pub query_errors: Vec<QueryFailure>,
}

impl Resolution {
    pub fn merged_cleanly(&self) -> bool {
        self.query_errors.is_empty()
    }
}

/// Merge settled product payloads, or `None` while the catalog is loading.
///
/// An empty merge is reported as `None`.
pub fn merge_products(snapshots: &QuerySnapshots) -> Option<CompositeEntity> {
    if snapshots.catalog.loading {
        return None;
    }

    let composite = CompositeEntity::merged(
        ProductQueryKind::ALL
            .iter()
            .filter_map(|kind| snapshots.get(*kind).settled_data())
            .filter_map(product_payload),
    );

    (!composite.is_empty()).then_some(composite)
}

/// Resolve one snapshot into a product, falling back to the cached preview.
pub fn resolve_snapshots(
    snapshots: &QuerySnapshots,
    identifier: &ProductIdentifier,
    cache: &dyn FragmentCache,
) -> Resolution {
    let loading = snapshots.loading();

    let product = match merge_products(snapshots) {
        Some(composite) => Some(ResolvedProduct::Composite(composite)),
        None => cache
            .lookup(&identifier.cache_key(), &PRODUCT_PREVIEW_FRAGMENT)
            .filter(|fragment| !fragment.is_empty())
            .map(ResolvedProduct::Cached),
    };

    let error = (!loading && product.is_none()).then(ProductNotFound::default);

    let query_errors = ProductQueryKind::ALL
        .iter()
        .filter_map(|kind| {
            let result = snapshots.get(*kind);
            match (&result.error, result.loading) {
                (Some(error), false) => Some(QueryFailure {
                    query: *kind,
                    error: error.clone(),
                }),
                _ => None,
            }
        })
        .collect();

    Resolution {
        product,
        loading,
        error,
        query_errors,
    }
}

/// Re-executes the catalog query with the variables it was first run with.
#[derive(Clone)]
pub struct Refetch {
    executor: Arc<dyn QueryExecutor>,
    request: QueryRequest,
}

impl Refetch {
    pub fn new(executor: Arc<dyn QueryExecutor>, request: QueryRequest) -> Self {
        Self { executor, request }
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub async fn run(&self) -> QueryResult {
        self.executor.execute(&self.request).await
    }
}

impl std::fmt::Debug for Refetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refetch")
            .field("query", &self.request.display_name())
            .field("variables", &self.request.variables)
            .finish()
    }
}

impl PartialEq for Refetch {
    fn eq(&self, other: &Self) -> bool {
        self.request == other.request
    }
}

/// Final state of a driven resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOutput {
    pub identifier: ProductIdentifier,
    pub resolution: Resolution,
    pub refetch: Refetch,
}

/// A recomputation published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionUpdate {
    pub generation: u64,
    pub identifier: ProductIdentifier,
    pub resolution: Resolution,
}

struct Current {
    identifier: ProductIdentifier,
    snapshots: QuerySnapshots,
}

/// Generation, latest snapshots and the not-found effect share one lock.
struct State {
    generation: u64,
    current: Option<Current>,
    not_found: NotFoundEffect,
}

/// Drives the product queries and recomputes the resolution as they settle.
pub struct ProductResolver {
    executor: Arc<dyn QueryExecutor>,
    cache: Arc<dyn FragmentCache>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<State>,
    updates: broadcast::Sender<ResolutionUpdate>,
}

impl ProductResolver {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        cache: Arc<dyn FragmentCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (updates, _) = broadcast::channel(DEFAULT_UPDATE_CAPACITY);
        Self {
            executor,
            cache,
            navigator,
            state: Mutex::new(State {
                generation: 0,
                current: None,
                not_found: NotFoundEffect::new(),
            }),
            updates,
        }
    }

    /// Receive every recomputation from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ResolutionUpdate> {
        self.updates.subscribe()
    }

    pub fn refetch_handle(&self, identifier: &ProductIdentifier) -> Refetch {
        Refetch::new(
            self.executor.clone(),
            ProductQueryKind::Catalog.request(identifier),
        )
    }

    /// Latest resolution of the current identifier, if any.
    pub fn current(&self) -> Option<Resolution> {
        let state = self.state();
        state
            .current
            .as_ref()
            .map(|c| resolve_snapshots(&c.snapshots, &c.identifier, self.cache.as_ref()))
    }

    /// Run all three queries for `identifier` until they settle.
    ///
    /// Returns `None` when a newer call superseded this one before it
    /// finished; results arriving after that are dropped unpublished.
    pub async fn resolve(&self, identifier: &ProductIdentifier) -> Option<ResolverOutput> {
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.generation
        };
        debug!(slug = %identifier.slug, generation, "Resolving product");

        let mut snapshots = QuerySnapshots::default();
        self.publish(generation, identifier, &snapshots)?;

        let requests: Vec<(ProductQueryKind, QueryRequest)> = ProductQueryKind::ALL
            .iter()
            .map(|kind| (*kind, kind.request(identifier)))
            .collect();

        let mut pending: FuturesUnordered<_> = requests
            .iter()
            .map(|(kind, request)| async move { (*kind, self.executor.execute(request).await) })
            .collect();

        let mut resolution = None;
        while let Some((kind, result)) = pending.next().await {
            if self.is_superseded(generation) {
                debug!(slug = %identifier.slug, generation, query = kind.display_name(), "Dropping stale query result");
                return None;
            }
            snapshots.set(kind, result);
            resolution = Some(self.publish(generation, identifier, &snapshots)?);
        }

        Some(ResolverOutput {
            identifier: identifier.clone(),
            resolution: resolution?,
            refetch: self.refetch_handle(identifier),
        })
    }

    /// Refetch the catalog query of the current identifier.
    ///
    /// While the refetch is in flight the catalog counts as loading and its
    /// stale data is not merged.
    pub async fn refetch(&self) -> Option<Resolution> {
        let (generation, identifier, mut snapshots) = {
            let state = self.state();
            let current = state.current.as_ref()?;
            (
                state.generation,
                current.identifier.clone(),
                current.snapshots.clone(),
            )
        };

        snapshots.catalog = snapshots.catalog.refetching();
        self.publish(generation, &identifier, &snapshots)?;

        let result = self.refetch_handle(&identifier).run().await;
        if self.is_superseded(generation) {
            return None;
        }
        snapshots.catalog = result;
        self.publish(generation, &identifier, &snapshots)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.state().generation != generation
    }

    /// Recompute, run the not-found effect and broadcast.
    ///
    /// Everything after the recomputation happens under the state lock, so
    /// a superseded generation never redirects or publishes.
    fn publish(
        &self,
        generation: u64,
        identifier: &ProductIdentifier,
        snapshots: &QuerySnapshots,
    ) -> Option<Resolution> {
        let resolution = resolve_snapshots(snapshots, identifier, self.cache.as_ref());

        let mut state = self.state();
        if state.generation != generation {
            debug!(slug = %identifier.slug, generation, "Dropping superseded resolution");
            return None;
        }
        state.current = Some(Current {
            identifier: identifier.clone(),
            snapshots: snapshots.clone(),
        });

        debug!(
            slug = %identifier.slug,
            generation,
            loading = resolution.loading,
            has_product = resolution.product.is_some(),
            cached = resolution.product.as_ref().is_some_and(ResolvedProduct::is_cached),
            "Recomputed product resolution"
        );

        state.not_found.observe(
            resolution.loading,
            resolution.product.as_ref(),
            &identifier.slug,
            self.navigator.as_ref(),
        );

        // No subscribers is fine
        let _ = self.updates.send(ResolutionUpdate {
            generation,
            identifier: identifier.clone(),
            resolution: resolution.clone(),
        });

        Some(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryFragmentCache;
    use crate::testing::{MockQueryExecutor, RecordingNavigator};
    use serde_json::{json, Value};

    fn product(fields: Value) -> QueryResult {
        QueryResult::ready(json!({ "product": fields }))
    }

    fn identifier() -> ProductIdentifier {
        ProductIdentifier::new("x")
    }

    #[test]
    fn test_precedence_is_positional() {
        let snapshots = QuerySnapshots {
            catalog: product(json!({"a": 1, "b": 1})),
            category_tree: product(json!({"b": 2, "c": 2})),
            benefits: product(json!({"c": 3})),
        };

        let composite = merge_products(&snapshots).unwrap();
        assert_eq!(
            Value::Object(composite.into_fields()),
            json!({"a": 1, "b": 2, "c": 3})
        );
    }

    #[test]
    fn test_catalog_loading_withholds_composite() {
        let snapshots = QuerySnapshots {
            catalog: QueryResult::loading(),
            category_tree: product(json!({"b": 2})),
            benefits: product(json!({"c": 3})),
        };
        assert!(merge_products(&snapshots).is_none());

        let resolution = resolve_snapshots(&snapshots, &identifier(), &MemoryFragmentCache::new());
        assert!(resolution.product.is_none());
        assert!(resolution.loading);
        assert!(resolution.error.is_none());
    }

    #[test]
    fn test_benefits_loading_gates_aggregate() {
        let snapshots = QuerySnapshots {
            catalog: product(json!({"a": 1})),
            category_tree: product(json!({"b": 2})),
            benefits: QueryResult::loading(),
        };
        let resolution = resolve_snapshots(&snapshots, &identifier(), &MemoryFragmentCache::new());
        assert!(resolution.loading);
    }

    #[test]
    fn test_category_tree_loading_excluded() {
        let snapshots = QuerySnapshots {
            catalog: product(json!({"a": 1})),
            category_tree: product(json!({"categoryTree": ["stale"]})).refetching(),
            benefits: product(json!({"c": 3})),
        };
        let resolution = resolve_snapshots(&snapshots, &identifier(), &MemoryFragmentCache::new());

        assert!(!resolution.loading);
        let product = resolution.product.unwrap();
        assert!(product.get("categoryTree").is_none());
        assert_eq!(product.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_partial_data_merged_and_error_reported() {
        let snapshots = QuerySnapshots {
            catalog: product(json!({"a": 1})),
            category_tree: QueryResult::ready(json!({"product": null})),
            benefits: QueryResult::partial(
                json!({"product": {"benefits": []}}),
                QueryError::new("benefits timeout"),
            ),
        };
        let resolution = resolve_snapshots(&snapshots, &identifier(), &MemoryFragmentCache::new());

        assert_eq!(
            resolution.product.as_ref().unwrap().get("benefits"),
            Some(&json!([]))
        );
        assert!(!resolution.merged_cleanly());
        assert_eq!(resolution.query_errors[0].query, ProductQueryKind::Benefits);
    }

    #[test]
    fn test_catalog_request_variables() {
        let request = ProductQueryKind::Catalog.request(&ProductIdentifier::new("shoes"));
        assert_eq!(
            request.variables,
            json!({
                "slug": "shoes",
                "skipCategoryTree": true,
                "identifier": {"field": "id", "value": ""}
            })
        );
        assert!(request.options.ssr);
        assert_eq!(request.display_name(), "ProductQuery");
    }

    #[test]
    fn test_secondary_requests_are_client_only() {
        let identifier = ProductIdentifier::new("shoes").with_id("7");
        for kind in [ProductQueryKind::CategoryTree, ProductQueryKind::Benefits] {
            let request = kind.request(&identifier);
            assert!(!request.options.ssr);
            assert!(request.variables.get("skipCategoryTree").is_none());
            assert_eq!(request.variables["identifier"]["value"], json!("7"));
        }
    }

    #[test]
    fn test_superseded_publish_has_no_effects() {
        let navigator = Arc::new(RecordingNavigator::new());
        let resolver = ProductResolver::new(
            Arc::new(MockQueryExecutor::new()),
            Arc::new(MemoryFragmentCache::new()),
            navigator.clone(),
        );
        let mut updates = resolver.subscribe();
        resolver.state().generation = 2;

        let settled = QuerySnapshots {
            catalog: product(json!({})),
            category_tree: product(json!({})),
            benefits: product(json!({})),
        };
        assert!(resolver.publish(1, &ProductIdentifier::new("old"), &settled).is_none());

        assert!(navigator.requests().is_empty());
        assert!(updates.try_recv().is_err());
        assert!(resolver.current().is_none());

        let resolution = resolver.publish(2, &ProductIdentifier::new("new"), &settled).unwrap();
        assert!(resolution.product.is_none());
        assert_eq!(navigator.requests().len(), 1);
        assert_eq!(updates.try_recv().unwrap().identifier.slug, "new");
    }
}
