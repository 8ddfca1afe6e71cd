//! GraphQL client for the storefront API and the documents it sends.

mod client;
mod queries;

pub use client::*;
pub use queries::*;
