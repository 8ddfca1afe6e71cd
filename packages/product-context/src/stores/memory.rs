//! In-memory fragment cache for testing and development.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::error::CacheError;
use crate::traits::{Fragment, FragmentCache};

/// Normalized entities keyed by cache id (e.g. `Product:shoes`).
///
/// Reading a fragment projects the stored entity onto the fragment's
/// fields; every selected field must be present.
#[derive(Default)]
pub struct MemoryFragmentCache {
    entities: RwLock<HashMap<String, Value>>,
}

impl MemoryFragmentCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity, replacing any previous one under `id`.
    pub fn write_entity(&self, id: impl Into<String>, entity: Value) {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), entity);
    }

    pub fn with_entity(self, id: impl Into<String>, entity: Value) -> Self {
        self.write_entity(id, entity);
        self
    }

    /// Evict an entity.
    pub fn evict(&self, id: &str) -> Option<Value> {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Get the number of stored entities.
    pub fn entity_count(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl FragmentCache for MemoryFragmentCache {
    fn read_fragment(
        &self,
        id: &str,
        fragment: &Fragment,
    ) -> Result<Option<Map<String, Value>>, CacheError> {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);
        let Some(entity) = entities.get(id) else {
            return Ok(None);
        };
        let entity = entity.as_object().ok_or_else(|| CacheError::NotAnObject {
            id: id.to_string(),
        })?;

        fragment
            .fields
            .iter()
            .map(|field| {
                entity
                    .get(*field)
                    .map(|value| (field.to_string(), value.clone()))
                    .ok_or_else(|| CacheError::MissingField {
                        id: id.to_string(),
                        fragment: fragment.name.to_string(),
                        field: field.to_string(),
                    })
            })
            .collect::<Result<Map<String, Value>, CacheError>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREVIEW: Fragment = Fragment {
        name: "Preview",
        fields: &["slug", "name"],
    };

    #[test]
    fn test_read_projects_fragment_fields() {
        let cache = MemoryFragmentCache::new().with_entity(
            "Product:x",
            json!({"slug": "x", "name": "Cached", "price": 10}),
        );

        let fragment = cache.read_fragment("Product:x", &PREVIEW).unwrap().unwrap();
        assert_eq!(Value::Object(fragment), json!({"slug": "x", "name": "Cached"}));
    }

    #[test]
    fn test_miss_is_none() {
        let cache = MemoryFragmentCache::new();
        assert_eq!(cache.read_fragment("Product:x", &PREVIEW), Ok(None));
    }

    #[test]
    fn test_missing_field_is_error_and_lookup_swallows_it() {
        let cache = MemoryFragmentCache::new().with_entity("Product:x", json!({"slug": "x"}));

        let err = cache.read_fragment("Product:x", &PREVIEW).unwrap_err();
        assert!(matches!(err, CacheError::MissingField { ref field, .. } if field == "name"));
        assert!(cache.lookup("Product:x", &PREVIEW).is_none());
    }

    #[test]
    fn test_non_object_entity() {
        let cache = MemoryFragmentCache::new().with_entity("Product:x", json!("oops"));
        assert!(matches!(
            cache.read_fragment("Product:x", &PREVIEW),
            Err(CacheError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_evict() {
        let cache = MemoryFragmentCache::new().with_entity("Product:x", json!({}));
        assert_eq!(cache.entity_count(), 1);
        assert!(cache.evict("Product:x").is_some());
        assert_eq!(cache.entity_count(), 0);
    }
}
