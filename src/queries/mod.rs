//! Query modules for the collection SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods
//! returning `Result<T>` with typed models.

pub mod cards;
pub mod collection;
pub mod sets;

pub use cards::{CardQuery, SearchCardsParams};
pub use collection::CollectionQuery;
pub use sets::{SearchSetsParams, SetQuery};
