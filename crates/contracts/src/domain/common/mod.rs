//! Common types and traits shared by all client-side entities

pub mod identified;
pub mod pagination;
pub mod wire;

// Re-exports
pub use identified::Identified;
pub use pagination::{Paginated, PaginationMeta};
pub use wire::null_as_default;
