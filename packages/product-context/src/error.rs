//! Typed errors for the product context library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). `anyhow` only shows
//! up at the edges: configuration loading and the binary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the GraphQL client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("No data returned")]
    NoData,
}

/// Errors produced when reading a fragment out of the local cache.
///
/// The resolver never propagates these: any cache failure is treated as
/// "no cached value".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Entity stored but a field the fragment selects is absent
    #[error("fragment {fragment} missing field {field} on {id}")]
    MissingField {
        id: String,
        fragment: String,
        field: String,
    },

    /// Stored value is not an object
    #[error("entity {id} is not an object")]
    NotAnObject { id: String },
}

/// The not-found domain condition.
///
/// Reported next to `product = None`, never raised as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductNotFound {
    pub message: String,
}

impl ProductNotFound {
    pub const MESSAGE: &'static str = "Product not found!";
}

impl Default for ProductNotFound {
    fn default() -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
