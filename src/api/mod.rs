//! Shared request parameter types for list endpoints

pub mod pagination;

pub use pagination::ListParams;
