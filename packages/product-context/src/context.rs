//! Product context: the composition root of the product page.
//!
//! Resolves the product for the route params and returns the props the
//! page content is rendered with. Which renderer receives them is the
//! caller's decision (see [`crate::wrapper`]).

use std::sync::Arc;

use crate::error::ProductNotFound;
use crate::resolver::{ProductResolver, Refetch, Resolution};
use crate::types::identifier::ProductIdentifier;
use crate::types::product::ResolvedProduct;

/// What page content sees of the product queries.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub loading: bool,
    pub product: Option<ResolvedProduct>,
    pub refetch: Refetch,
    pub error: Option<ProductNotFound>,
}

impl ProductQuery {
    pub fn from_resolution(resolution: &Resolution, refetch: Refetch) -> Self {
        let error = match (&resolution.product, resolution.loading) {
            (None, false) => Some(ProductNotFound::default()),
            _ => None,
        };

        Self {
            loading: resolution.loading,
            product: resolution.product.clone(),
            refetch,
            error,
        }
    }
}

/// Props handed to page content.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildProps {
    pub product_query: ProductQuery,
    pub slug: String,
    pub params: ProductIdentifier,
}

impl ChildProps {
    pub fn new(product_query: ProductQuery, params: ProductIdentifier) -> Self {
        Self {
            product_query,
            slug: params.slug.clone(),
            params,
        }
    }
}

pub struct ProductContext {
    resolver: Arc<ProductResolver>,
}

impl ProductContext {
    pub fn new(resolver: Arc<ProductResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve `params` and build the child props.
    ///
    /// `None` when a newer render superseded this one.
    pub async fn render(&self, params: &ProductIdentifier) -> Option<ChildProps> {
        let output = self.resolver.resolve(params).await?;
        let product_query = ProductQuery::from_resolution(&output.resolution, output.refetch);
        Some(ChildProps::new(product_query, output.identifier))
    }
}
