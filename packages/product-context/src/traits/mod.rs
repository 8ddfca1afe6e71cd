//! Collaborator seams.
//!
//! These are infrastructure traits only. Resolution, merge precedence and
//! payload shaping live in the modules that use them.

pub mod cache;
pub mod data_layer;
pub mod executor;
pub mod navigator;
pub mod renderer;

pub use cache::{Fragment, FragmentCache};
pub use data_layer::DataLayer;
pub use executor::QueryExecutor;
pub use navigator::{NavigationRequest, Navigator};
pub use renderer::ProductPageRenderer;
