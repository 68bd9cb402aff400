//! Primary error enum for binding flows.

use thiserror::Error;

use crate::registry::RegistryError;
use crate::tag::TagError;
use crate::value::ValueError;

/// Errors that can occur while binding a struct to a flag registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// The target was missing or does not describe a struct.
    #[error("{}", invalid_type_message(.type_name, .nil))]
    InvalidType {
        /// Rust type name of the target.
        type_name: &'static str,
        /// Whether the target was absent rather than a non-struct value.
        nil: bool,
    },

    /// The registry exposes neither a standard nor an extended flag set.
    #[error("registry must provide a standard or extended flag set")]
    InvalidFlagSet,

    /// Binding a nested struct failed.
    ///
    /// Enclosing structs extend `field_path` instead of wrapping again, so
    /// `source` is always the leaf error.
    #[error("{field_path}: {source}")]
    NestedStruct {
        /// Dot-joined path from the root struct to the nested struct.
        field_path: String,
        /// The leaf failure.
        #[source]
        source: Box<BindError>,
    },

    /// A tag default could not be converted to the field's type.
    #[error("{field_name}: cannot assign default value from tag: {value:?}")]
    DefaultValue {
        /// Field whose default failed.
        field_name: String,
        /// Default literal from the tag.
        value: String,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },

    /// An override tag names a flag that is not registered.
    #[error("cannot override undefined flag: {flag_name:?}")]
    FlagOverrideUndefined {
        /// Flag name from the override tag.
        flag_name: String,
    },

    /// A field's tag text is malformed.
    #[error("{field_name}: malformed flag tag: {source}")]
    Tag {
        /// Field carrying the tag.
        field_name: String,
        /// Parse failure.
        #[source]
        source: TagError,
    },

    /// The registry refused the flag, typically a name collision.
    #[error("{field_name}: {source}")]
    Register {
        /// Field being registered.
        field_name: String,
        /// Registry failure.
        #[source]
        source: RegistryError,
    },
}

fn invalid_type_message(type_name: &str, nil: &bool) -> String {
    if *nil {
        format!("cannot bind flags to nil {type_name}")
    } else {
        format!("type {type_name} is not a struct")
    }
}
