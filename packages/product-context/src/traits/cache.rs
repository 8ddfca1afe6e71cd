//! Local fragment cache.

use serde_json::{Map, Value};

use crate::error::CacheError;

/// Selection of fields read out of a cached entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

/// Synchronous, best-effort store of previously observed entities.
pub trait FragmentCache: Send + Sync {
    /// Read `fragment` off the entity stored under `id`.
    ///
    /// `Ok(None)` is a cache miss; `Err` means the entity is stored but
    /// cannot satisfy the fragment.
    fn read_fragment(
        &self,
        id: &str,
        fragment: &Fragment,
    ) -> Result<Option<Map<String, Value>>, CacheError>;

    /// Read a fragment, collapsing misses and failures into `None`.
    fn lookup(&self, id: &str, fragment: &Fragment) -> Option<Map<String, Value>> {
        match self.read_fragment(id, fragment) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(id, error = %e, "Fragment read failed, treating as cache miss");
                None
            }
        }
    }
}

impl<T: FragmentCache + ?Sized> FragmentCache for std::sync::Arc<T> {
    fn read_fragment(
        &self,
        id: &str,
        fragment: &Fragment,
    ) -> Result<Option<Map<String, Value>>, CacheError> {
        (**self).read_fragment(id, fragment)
    }
}
