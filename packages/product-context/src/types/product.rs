//! Composite product entity and the resolved product handed to consumers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field-name to value mapping built by shallow right-biased merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeEntity(Map<String, Value>);

impl CompositeEntity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold sources left to right; later sources overwrite earlier fields.
    pub fn merged<'a>(sources: impl IntoIterator<Item = &'a Map<String, Value>>) -> Self {
        let mut entity = Self::new();
        for source in sources {
            entity.merge(source);
        }
        entity
    }

    /// Shallow merge: every field of `source` replaces the field of `self`.
    pub fn merge(&mut self, source: &Map<String, Value>) {
        for (field, value) in source {
            self.0.insert(field.clone(), value.clone());
        }
    }

    /// An empty composite is falsy downstream.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// The product a resolution cycle ends with.
///
/// `None` at the use site stands for "nothing available".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "fields", rename_all = "camelCase")]
pub enum ResolvedProduct {
    /// Freshly merged from settled queries
    Composite(CompositeEntity),
    /// Preview fragment read from the local cache
    Cached(Map<String, Value>),
}

impl ResolvedProduct {
    pub fn fields(&self) -> &Map<String, Value> {
        match self {
            ResolvedProduct::Composite(entity) => entity.fields(),
            ResolvedProduct::Cached(fields) => fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields().get(field)
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, ResolvedProduct::Cached(_))
    }

    /// Items (SKUs) of the product, empty when the field is absent.
    pub fn items(&self) -> &[Value] {
        self.get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Extract the `product` member of a product query response.
///
/// Returns `None` for null, non-object and empty payloads.
pub fn product_payload(data: &Value) -> Option<&Map<String, Value>> {
    data.get("product")
        .and_then(Value::as_object)
        .filter(|product| !product.is_empty())
}
