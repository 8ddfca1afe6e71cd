//! Product identity and the variables every product query is keyed by.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Field name products are looked up by.
pub const IDENTIFIER_FIELD: &str = "id";

/// The `{slug, id}` pair addressing one product across all product queries.
///
/// `id` is the stable identity when `slug` changes. `slug` is also the key
/// of the cached preview fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductIdentifier {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ProductIdentifier {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Identifier filter sent with every product query.
    ///
    /// A missing id is sent as an explicit empty value, never omitted.
    pub fn filter(&self) -> IdentifierFilter {
        IdentifierFilter {
            field: IDENTIFIER_FIELD.to_string(),
            value: self.id.clone().unwrap_or_default(),
        }
    }

    /// Key of the cached preview fragment for this product.
    pub fn cache_key(&self) -> String {
        format!("Product:{}", self.slug)
    }
}

/// `{field: "id", value}` filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierFilter {
    pub field: String,
    pub value: String,
}

/// Variables shared by the catalog, category tree and benefits queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariables {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_category_tree: Option<bool>,
    pub identifier: IdentifierFilter,
}

impl ProductVariables {
    pub fn for_product(identifier: &ProductIdentifier) -> Self {
        Self {
            slug: identifier.slug.clone(),
            skip_category_tree: None,
            identifier: identifier.filter(),
        }
    }

    pub fn skipping_category_tree(mut self) -> Self {
        self.skip_category_tree = Some(true);
        self
    }

    /// Wire form of the variables. Same shape as the serde encoding.
    pub fn to_json(&self) -> Value {
        let mut vars = json!({
            "slug": self.slug,
            "identifier": {
                "field": self.identifier.field,
                "value": self.identifier.value,
            },
        });
        if let Some(skip) = self.skip_category_tree {
            vars["skipCategoryTree"] = Value::Bool(skip);
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_is_sent_as_empty_value() {
        let vars = ProductVariables::for_product(&ProductIdentifier::new("shoes"));
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({
                "slug": "shoes",
                "identifier": { "field": "id", "value": "" }
            })
        );
    }

    #[test]
    fn test_catalog_variables_skip_category_tree() {
        let identifier = ProductIdentifier::new("shoes").with_id("42");
        let vars = ProductVariables::for_product(&identifier).skipping_category_tree();
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({
                "slug": "shoes",
                "skipCategoryTree": true,
                "identifier": { "field": "id", "value": "42" }
            })
        );
    }

    #[test]
    fn test_wire_form_matches_serde_encoding() {
        let identifier = ProductIdentifier::new("shoes").with_id("42");
        let plain = ProductVariables::for_product(&identifier);
        let catalog = plain.clone().skipping_category_tree();

        for vars in [plain, catalog] {
            assert_eq!(vars.to_json(), serde_json::to_value(&vars).unwrap());
        }
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(ProductIdentifier::new("shoes").cache_key(), "Product:shoes");
    }
}
