//! Typed storage for bound flags.
//!
//! [`FlagValue`] is implemented by the field types a flag can be bound to.
//! [`Value`] is its type-erased counterpart held by registries; every
//! registry entry owns a [`Slot`] that borrows the field it writes into.

use std::error::Error as StdError;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Failure converting a literal into a flag's concrete type.
#[derive(Debug, Error)]
#[error("invalid {type_name} value {value:?}: {source}")]
pub struct ValueError {
    /// Flag type name, as reported by [`FlagValue::type_name`].
    pub type_name: &'static str,
    /// Literal that failed to convert.
    pub value: String,
    /// Underlying conversion failure.
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl ValueError {
    /// Build a conversion error for `value`.
    pub fn new<E>(type_name: &'static str, value: &str, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            type_name,
            value: value.to_owned(),
            source: source.into(),
        }
    }
}

/// A field type that can back a command-line flag.
///
/// Implemented for the built-in scalars and for `Vec<T>` and `Option<T>` of
/// any [`Scalar`]. Custom types implement this trait together with
/// [`crate::Bindable`]:
///
/// ```
/// use flagbind::{Bindable, FlagValue, Reflect, ValueError};
///
/// #[derive(Default)]
/// struct Level(u8);
///
/// impl FlagValue for Level {
///     fn type_name(&self) -> &'static str {
///         "level"
///     }
///
///     fn assign(&mut self, raw: &str, _replace: bool) -> Result<(), ValueError> {
///         self.0 = match raw {
///             "low" => 1,
///             "high" => 9,
///             other => return Err(ValueError::new("level", other, "expected low or high")),
///         };
///         Ok(())
///     }
///
///     fn render(&self) -> String {
///         if self.0 > 5 { "high".into() } else { "low".into() }
///     }
/// }
///
/// impl Bindable for Level {
///     fn reflect(&mut self) -> Reflect<'_> {
///         Reflect::leaf(self)
///     }
/// }
/// ```
pub trait FlagValue {
    /// Short name of the value type, used in usage output.
    fn type_name(&self) -> &'static str;

    /// Parse `raw` and store it.
    ///
    /// `replace` is `true` for the first assignment after binding. List
    /// types discard their previous contents when it is set and append
    /// otherwise; scalars always overwrite.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `raw` does not convert.
    fn assign(&mut self, raw: &str, replace: bool) -> Result<(), ValueError>;

    /// Render the current value in the literal form `assign` accepts.
    fn render(&self) -> String;

    /// Whether the flag may be given without a value.
    fn is_bool(&self) -> bool {
        false
    }

    /// Whether repeated assignments accumulate.
    fn is_list(&self) -> bool {
        false
    }
}

/// A single-valued type that also gains `Vec<T>` and `Option<T>` support.
pub trait Scalar: Sized {
    /// Type name reported for the scalar itself.
    const TYPE_NAME: &'static str;
    /// Type name reported for `Vec<Self>`.
    const LIST_TYPE_NAME: &'static str;
    /// Whether a bare flag sets the value to `true`.
    const IS_BOOL: bool = false;

    /// Parse one literal.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `raw` does not convert.
    fn parse_flag(raw: &str) -> Result<Self, ValueError>;

    /// Render one value.
    fn render_flag(&self) -> String;
}

/// Type-erased flag storage held by a registry.
pub trait Value {
    /// Store a value given on the command line.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `raw` does not convert.
    fn set(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Store a default. The next [`Value::set`] call still replaces lists.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `raw` does not convert.
    fn set_default(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Current value rendered as a literal.
    fn render(&self) -> String;

    /// Short name of the value type.
    fn type_name(&self) -> &'static str;

    /// Whether the flag may be given without a value.
    fn is_bool(&self) -> bool;

    /// Whether repeated assignments accumulate.
    fn is_list(&self) -> bool;
}

/// Registry storage that writes through to a borrowed field.
pub struct Slot<'a, T: ?Sized> {
    target: &'a mut T,
    changed: bool,
}

impl<'a, T: FlagValue + ?Sized> Slot<'a, T> {
    /// Wrap `target` so a registry can update it.
    pub const fn new(target: &'a mut T) -> Self {
        Self {
            target,
            changed: false,
        }
    }
}

impl<T: FlagValue + ?Sized> Value for Slot<'_, T> {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        self.target.assign(raw, !self.changed)?;
        self.changed = true;
        Ok(())
    }

    fn set_default(&mut self, raw: &str) -> Result<(), ValueError> {
        self.target.assign(raw, true)?;
        self.changed = false;
        Ok(())
    }

    fn render(&self) -> String {
        self.target.render()
    }

    fn type_name(&self) -> &'static str {
        self.target.type_name()
    }

    fn is_bool(&self) -> bool {
        self.target.is_bool()
    }

    fn is_list(&self) -> bool {
        self.target.is_list()
    }
}

fn parse_from_str<T>(type_name: &'static str, raw: &str) -> Result<T, ValueError>
where
    T: FromStr,
    T::Err: Into<Box<dyn StdError + Send + Sync>>,
{
    raw.parse::<T>()
        .map_err(|err| ValueError::new(type_name, raw, err))
}

/// Boolean literals in the spellings shells and config files commonly use.
fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "False" => Ok(false),
        other => parse_from_str("bool", other),
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

macro_rules! display_scalars {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const TYPE_NAME: &'static str = $name;
                const LIST_TYPE_NAME: &'static str = concat!($name, "s");

                fn parse_flag(raw: &str) -> Result<Self, ValueError> {
                    parse_from_str($name, raw)
                }

                fn render_flag(&self) -> String {
                    ToString::to_string(self)
                }
            }
        )*
        scalar_flag_values!($($ty),*);
    };
}

macro_rules! scalar_flag_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FlagValue for $ty {
                fn type_name(&self) -> &'static str {
                    <$ty as Scalar>::TYPE_NAME
                }

                fn assign(&mut self, raw: &str, _replace: bool) -> Result<(), ValueError> {
                    *self = <$ty as Scalar>::parse_flag(raw)?;
                    Ok(())
                }

                fn render(&self) -> String {
                    self.render_flag()
                }

                fn is_bool(&self) -> bool {
                    <$ty as Scalar>::IS_BOOL
                }
            }

            impl crate::Bindable for $ty {
                fn reflect(&mut self) -> crate::Reflect<'_> {
                    crate::Reflect::leaf(self)
                }
            }
        )*
    };
}

display_scalars! {
    String => "string",
    char => "char",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    i128 => "int128",
    isize => "int",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    u128 => "uint128",
    usize => "uint",
    f32 => "float32",
    f64 => "float64",
}

impl Scalar for bool {
    const TYPE_NAME: &'static str = "bool";
    const LIST_TYPE_NAME: &'static str = "bools";
    const IS_BOOL: bool = true;

    fn parse_flag(raw: &str) -> Result<Self, ValueError> {
        parse_bool(raw)
    }

    fn render_flag(&self) -> String {
        self.to_string()
    }
}

impl Scalar for PathBuf {
    const TYPE_NAME: &'static str = "path";
    const LIST_TYPE_NAME: &'static str = "paths";

    fn parse_flag(raw: &str) -> Result<Self, ValueError> {
        parse_from_str(Self::TYPE_NAME, raw)
    }

    fn render_flag(&self) -> String {
        self.display().to_string()
    }
}

scalar_flag_values!(bool, PathBuf);

impl<T: Scalar> FlagValue for Vec<T> {
    fn type_name(&self) -> &'static str {
        T::LIST_TYPE_NAME
    }

    fn assign(&mut self, raw: &str, replace: bool) -> Result<(), ValueError> {
        let items = split_list(raw)
            .map(T::parse_flag)
            .collect::<Result<Vec<_>, _>>()?;
        if replace {
            self.clear();
        }
        self.extend(items);
        Ok(())
    }

    fn render(&self) -> String {
        self.iter()
            .map(Scalar::render_flag)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn is_list(&self) -> bool {
        true
    }
}

impl<T: Scalar> FlagValue for Option<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn assign(&mut self, raw: &str, _replace: bool) -> Result<(), ValueError> {
        *self = if raw.is_empty() {
            None
        } else {
            Some(T::parse_flag(raw)?)
        };
        Ok(())
    }

    fn render(&self) -> String {
        self.as_ref().map(Scalar::render_flag).unwrap_or_default()
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }
}

impl<T: Scalar> crate::Bindable for Vec<T> {
    fn reflect(&mut self) -> crate::Reflect<'_> {
        crate::Reflect::leaf(self)
    }
}

impl<T: Scalar> crate::Bindable for Option<T> {
    fn reflect(&mut self) -> crate::Reflect<'_> {
        crate::Reflect::leaf(self)
    }
}

#[cfg(test)]
mod tests;
