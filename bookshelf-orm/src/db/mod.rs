//! The `db` module provides functionality for interacting with the database.
//!
//! It holds the `Model` trait implemented by `#[derive(Model)]`, the keyword
//! condition builder, lazily evaluated query sets and the paginator.

pub mod model;
pub mod pagination;
pub mod query;

pub use crate::Connection;

#[cfg(not(feature = "postgres"))]
pub const PLACEHOLDER: &str = "?";

#[cfg(feature = "postgres")]
pub const PLACEHOLDER: &str = "$";

/// Target type of `cast(column as ...)` when a column is compared or listed as text.
#[cfg(not(feature = "mysql"))]
pub const TEXT_CAST: &str = "text";

#[cfg(feature = "mysql")]
pub const TEXT_CAST: &str = "char";
