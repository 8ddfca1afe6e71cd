//! Redirect to search when a product cannot be resolved.
//!
//! The effect re-runs whenever `loading`, `product` or `slug` changes, and
//! navigates on a run where loading has finished with no product. It never
//! navigates while loading, whatever the product is.

use crate::traits::{NavigationRequest, Navigator};
use crate::types::product::ResolvedProduct;

/// Page the not-found redirect lands on.
pub const SEARCH_PAGE: &str = "store.search";

/// Query parameter carrying the slug that failed to resolve.
pub const NOT_FOUND_QUERY_PARAM: &str = "productLinkNotFound";

/// Redirect for a slug that resolved to nothing.
pub fn not_found_request(slug: &str) -> NavigationRequest {
    NavigationRequest {
        page: SEARCH_PAGE.to_string(),
        params: vec![("term".to_string(), slug.to_string())],
        query: format!("{}={}", NOT_FOUND_QUERY_PARAM, slug),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Dependencies {
    loading: bool,
    product: Option<ResolvedProduct>,
    slug: String,
}

/// Dependency-tracked not-found effect.
#[derive(Debug, Default)]
pub struct NotFoundEffect {
    last: Option<Dependencies>,
}

impl NotFoundEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one render's inputs. Returns `true` when a redirect fired.
    pub fn observe(
        &mut self,
        loading: bool,
        product: Option<&ResolvedProduct>,
        slug: &str,
        navigator: &dyn Navigator,
    ) -> bool {
        let deps = Dependencies {
            loading,
            product: product.cloned(),
            slug: slug.to_string(),
        };
        if self.last.as_ref() == Some(&deps) {
            return false;
        }
        self.last = Some(deps);

        if loading || product.is_some() {
            return false;
        }

        tracing::info!(slug, "Product not found, redirecting to search");
        navigator.navigate(not_found_request(slug));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNavigator;
    use serde_json::json;

    fn product() -> ResolvedProduct {
        ResolvedProduct::Cached(json!({"slug": "shoes"}).as_object().cloned().unwrap())
    }

    #[test]
    fn test_redirect_request_shape() {
        let request = not_found_request("shoes");
        assert_eq!(request.page, "store.search");
        assert_eq!(request.param("term"), Some("shoes"));
        assert_eq!(request.query, "productLinkNotFound=shoes");
    }

    #[test]
    fn test_no_redirect_while_loading() {
        let navigator = RecordingNavigator::new();
        let mut effect = NotFoundEffect::new();

        assert!(!effect.observe(true, None, "shoes", &navigator));
        assert!(navigator.requests().is_empty());
    }

    #[test]
    fn test_redirects_once_per_dependency_change() {
        let navigator = RecordingNavigator::new();
        let mut effect = NotFoundEffect::new();

        effect.observe(true, None, "shoes", &navigator);
        assert!(effect.observe(false, None, "shoes", &navigator));
        assert!(!effect.observe(false, None, "shoes", &navigator));
        assert_eq!(navigator.requests().len(), 1);

        // A new slug re-runs the effect
        assert!(effect.observe(false, None, "boots", &navigator));
        assert_eq!(navigator.requests().len(), 2);
        assert_eq!(navigator.requests()[1].param("term"), Some("boots"));
    }

    #[test]
    fn test_no_redirect_with_product() {
        let navigator = RecordingNavigator::new();
        let mut effect = NotFoundEffect::new();
        let product = product();

        assert!(!effect.observe(false, Some(&product), "shoes", &navigator));
        assert!(navigator.requests().is_empty());
    }
}
