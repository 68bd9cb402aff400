//! Constructors and inspection helpers for `BindError`.

use std::error::Error as StdError;

use super::BindError;
use crate::registry::RegistryError;
use crate::tag::TagError;
use crate::value::ValueError;

impl BindError {
    /// Target error for `T`.
    #[must_use]
    pub fn invalid_type<T: ?Sized>(nil: bool) -> Self {
        Self::InvalidType {
            type_name: std::any::type_name::<T>(),
            nil,
        }
    }

    /// Wrap a failure from the nested struct stored in field `segment`.
    ///
    /// An error that is already [`BindError::NestedStruct`] gains `segment`
    /// as a path prefix rather than a second layer of wrapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagbind::BindError;
    ///
    /// let leaf = BindError::FlagOverrideUndefined { flag_name: "v".into() };
    /// let err = BindError::nested("outer", BindError::nested("inner", leaf));
    /// match &err {
    ///     BindError::NestedStruct { field_path, source } => {
    ///         assert_eq!(field_path, "outer.inner");
    ///         assert!(matches!(**source, BindError::FlagOverrideUndefined { .. }));
    ///     }
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    #[must_use]
    pub fn nested(segment: &str, err: Self) -> Self {
        match err {
            Self::NestedStruct { field_path, source } => Self::NestedStruct {
                field_path: format!("{segment}.{field_path}"),
                source,
            },
            leaf => Self::NestedStruct {
                field_path: segment.to_owned(),
                source: Box::new(leaf),
            },
        }
    }

    pub(crate) fn default_value(field_name: &str, value: &str, source: ValueError) -> Self {
        Self::DefaultValue {
            field_name: field_name.to_owned(),
            value: value.to_owned(),
            source,
        }
    }

    pub(crate) fn tag(field_name: &str, source: TagError) -> Self {
        Self::Tag {
            field_name: field_name.to_owned(),
            source,
        }
    }

    pub(crate) fn register(field_name: &str, source: RegistryError) -> Self {
        Self::Register {
            field_name: field_name.to_owned(),
            source,
        }
    }

    /// Fully qualified dotted path of the field that failed, when the error
    /// concerns a specific field.
    ///
    /// Override failures name a flag rather than a field, so their path
    /// stops at the enclosing struct.
    #[must_use]
    pub fn field_path(&self) -> Option<String> {
        match self {
            Self::NestedStruct { field_path, source } => Some(match source.field_path() {
                Some(leaf) => format!("{field_path}.{leaf}"),
                None => field_path.clone(),
            }),
            Self::DefaultValue { field_name, .. }
            | Self::Tag { field_name, .. }
            | Self::Register { field_name, .. } => Some(field_name.clone()),
            Self::InvalidType { .. } | Self::InvalidFlagSet | Self::FlagOverrideUndefined { .. } => {
                None
            }
        }
    }

    /// The innermost error in the `source` chain, or `self` if there is none.
    #[must_use]
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}
