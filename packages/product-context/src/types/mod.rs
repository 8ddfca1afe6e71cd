//! Data types shared by the resolver, the GraphQL client and the search
//! context provider.

pub mod identifier;
pub mod product;
pub mod query;
pub mod search;
