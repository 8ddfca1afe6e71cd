//! Product-search context provider.
//!
//! Derives the search query variables from the route, runs the search
//! query, pushes search impressions to the data layer once results settle
//! and hands the merged search context to page content.

pub mod data_layer;
pub mod provider;
pub mod variables;

pub use data_layer::{search_data_layer_events, Impression, SEARCH_RESULTS_LIST};
pub use provider::{SearchContext, SearchContextProvider};
pub use variables::{search_variables, DEFAULT_PAGE};
