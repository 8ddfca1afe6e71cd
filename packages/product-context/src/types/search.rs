//! Types for the product-search context provider.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Route params of a search page, in route order
/// (e.g. department, category, subcategory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRouteParams(Vec<(String, String)>);

impl SearchRouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Non-empty param values joined by `/`, in route order.
    pub fn query_path(&self) -> String {
        self.0
            .iter()
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// URL-level search arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Variables a search child reports back to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextVariables {
    pub max_items_per_page: u32,
}

impl Default for ContextVariables {
    fn default() -> Self {
        Self {
            max_items_per_page: 1,
        }
    }
}

/// Variables of the search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryVariables {
    pub query: String,
    pub map: Option<String>,
    pub rest: Option<String>,
    pub order_by: Option<String>,
    pub from: u32,
    pub to: u32,
}

impl SearchQueryVariables {
    pub fn to_json(&self) -> Value {
        json!({
            "query": self.query,
            "map": self.map,
            "rest": self.rest,
            "orderBy": self.order_by,
            "from": self.from,
            "to": self.to,
        })
    }
}

/// `search` member of the search query response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub products: Vec<SearchProduct>,
    #[serde(default)]
    pub facets: SearchFacets,
    #[serde(default, rename = "recordsFiltered", skip_serializing_if = "Option::is_none")]
    pub records_filtered: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProduct {
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFacets {
    #[serde(default, rename = "CategoriesTrees")]
    pub categories_trees: Vec<CategoryTree>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTree {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Page and account facts analytics payloads need.
///
/// Passed explicitly to whichever component builds a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeContext {
    pub account: String,
    pub page_title: String,
    pub page_url: String,
}

impl RuntimeContext {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.page_title = title.into();
        self.page_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_path_skips_empty_params() {
        let params = SearchRouteParams::new()
            .with("department", "apparel")
            .with("category", "")
            .with("subcategory", "shoes");
        assert_eq!(params.query_path(), "apparel/shoes");
    }

    #[test]
    fn test_payload_parses_category_trees() {
        let payload: SearchPayload = serde_json::from_value(json!({
            "products": [
                {"productId": "1", "productName": "Runner", "brand": "Acme"}
            ],
            "facets": {"CategoriesTrees": [{"Name": "Shoes"}]}
        }))
        .unwrap();
        assert_eq!(payload.products[0].brand.as_deref(), Some("Acme"));
        assert_eq!(payload.facets.categories_trees[0].name, "Shoes");
    }

    #[test]
    fn test_query_variables_wire_form() {
        let vars = SearchQueryVariables {
            query: "apparel/shoes".to_string(),
            map: Some("c,c".to_string()),
            rest: None,
            order_by: Some("OrderByPriceASC".to_string()),
            from: 10,
            to: 19,
        };
        assert_eq!(vars.to_json(), serde_json::to_value(&vars).unwrap());
        assert_eq!(vars.to_json()["orderBy"], json!("OrderByPriceASC"));
    }
}
