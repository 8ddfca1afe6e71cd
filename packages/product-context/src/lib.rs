//! Product page and product search context resolution.
//!
//! A product page issues three independent queries keyed by the same
//! product identifier: the catalog query, the category tree query and the
//! benefits query. This crate merges whatever has settled into one product,
//! falls back to a cached preview while nothing has, reports and redirects
//! on "not found", and hands the result to page content.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use product_context::{
//!     GraphQLClient, MemoryFragmentCache, ProductContext, ProductIdentifier, ProductResolver,
//! };
//!
//! let resolver = ProductResolver::new(
//!     Arc::new(GraphQLClient::new("https://shop.test/graphql")),
//!     Arc::new(MemoryFragmentCache::new()),
//!     navigator,
//! );
//! let context = ProductContext::new(Arc::new(resolver));
//!
//! if let Some(props) = context.render(&ProductIdentifier::new("running-shoes")).await {
//!     product_context::render_product_page(&props, &Default::default(), &mut renderer);
//! }
//! ```
//!
//! # Modules
//!
//! - [`resolver`] - Composite resolution and the query driver
//! - [`context`] - Product context props for page content
//! - [`wrapper`] - Downstream renderer selection
//! - [`not_found`] - Redirect to search on unresolvable products
//! - [`search`] - Product-search context provider
//! - [`graphql`] - Storefront GraphQL client and documents
//! - [`traits`] - Collaborator seams (executor, cache, navigator, data layer)
//! - [`stores`] - Fragment cache implementations
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod context;
pub mod error;
pub mod graphql;
pub mod not_found;
pub mod resolver;
pub mod search;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod wrapper;

pub use config::Config;
pub use context::{ChildProps, ProductContext, ProductQuery};
pub use error::{CacheError, ClientError, ProductNotFound, Result};
pub use graphql::GraphQLClient;
pub use not_found::{not_found_request, NotFoundEffect};
pub use resolver::{
    merge_products, resolve_snapshots, ProductQueryKind, ProductResolver, QueryFailure,
    QuerySnapshots, Refetch, Resolution, ResolutionUpdate, ResolverOutput,
};
pub use search::{SearchContext, SearchContextProvider};
pub use stores::MemoryFragmentCache;
pub use traits::{
    DataLayer, Fragment, FragmentCache, NavigationRequest, Navigator, ProductPageRenderer,
    QueryExecutor,
};
pub use types::{
    identifier::{IdentifierFilter, ProductIdentifier, ProductVariables},
    product::{CompositeEntity, ResolvedProduct},
    query::{ErrorPolicy, QueryError, QueryOptions, QueryRequest, QueryResult},
    search::{ContextVariables, RuntimeContext, SearchArgs, SearchPayload, SearchRouteParams},
};
pub use wrapper::{render_product_page, select_item, UrlQuery};
