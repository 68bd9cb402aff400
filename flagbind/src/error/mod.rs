//! Errors reported by [`crate::bind`].

mod constructors;
mod types;

pub use types::BindError;
