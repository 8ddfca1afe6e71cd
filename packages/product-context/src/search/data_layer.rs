//! Data-layer payload for search result impressions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::search::{RuntimeContext, SearchPayload, SearchRouteParams};

/// List name every search impression is attributed to.
pub const SEARCH_RESULTS_LIST: &str = "Search Results";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impression {
    pub id: String,
    pub name: String,
    pub list: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 1-based
    pub position: usize,
}

/// Impressions event followed by the page-info event.
///
/// A product's category is the category tree at the same index, falling
/// back to the route's `category` param.
pub fn search_data_layer_events(
    search: &SearchPayload,
    params: &SearchRouteParams,
    runtime: &RuntimeContext,
) -> Vec<Value> {
    let route_category = params.get("category");

    let impressions: Vec<Impression> = search
        .products
        .iter()
        .enumerate()
        .map(|(index, product)| Impression {
            id: product.product_id.clone(),
            name: product.product_name.clone(),
            list: SEARCH_RESULTS_LIST.to_string(),
            brand: product.brand.clone(),
            category: search
                .facets
                .categories_trees
                .get(index)
                .map(|tree| tree.name.clone())
                .or_else(|| route_category.map(str::to_string)),
            position: index + 1,
        })
        .collect();

    vec![
        json!({
            "ecommerce": {
                "impressions": impressions,
            }
        }),
        json!({
            "accountName": runtime.account,
            "pageCategory": route_category,
            "pageDepartment": params.get("department"),
            "pageFacets": [],
            "pageTitle": runtime.page_title,
            "pageUrl": runtime.page_url,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::search::{CategoryTree, SearchFacets, SearchProduct};

    fn payload() -> SearchPayload {
        SearchPayload {
            products: vec![
                SearchProduct {
                    product_id: "1".to_string(),
                    product_name: "Runner".to_string(),
                    brand: Some("Acme".to_string()),
                    link_text: None,
                },
                SearchProduct {
                    product_id: "2".to_string(),
                    product_name: "Trail".to_string(),
                    brand: None,
                    link_text: None,
                },
            ],
            facets: SearchFacets {
                categories_trees: vec![CategoryTree {
                    name: "Running".to_string(),
                }],
            },
            records_filtered: Some(2),
        }
    }

    #[test]
    fn test_impressions_fall_back_to_route_category() {
        let params = SearchRouteParams::new()
            .with("department", "apparel")
            .with("category", "shoes");
        let runtime = RuntimeContext::new("storefront").with_page("Shoes", "https://shop.test/apparel/shoes");

        let events = search_data_layer_events(&payload(), &params, &runtime);
        let impressions = &events[0]["ecommerce"]["impressions"];

        assert_eq!(impressions[0]["category"], json!("Running"));
        assert_eq!(impressions[0]["position"], json!(1));
        assert_eq!(impressions[0]["list"], json!("Search Results"));
        assert_eq!(impressions[1]["category"], json!("shoes"));
        assert_eq!(impressions[1]["position"], json!(2));
        assert!(impressions[1].get("brand").is_none());

        assert_eq!(
            events[1],
            json!({
                "accountName": "storefront",
                "pageCategory": "shoes",
                "pageDepartment": "apparel",
                "pageFacets": [],
                "pageTitle": "Shoes",
                "pageUrl": "https://shop.test/apparel/shoes",
            })
        );
    }
}
