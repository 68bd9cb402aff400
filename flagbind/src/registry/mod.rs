//! Flag registries and the capability surface the binder depends on.
//!
//! The binder never names a concrete registry type. It asks a [`Registry`]
//! for a [`Capability`]: either a [`StdFlagSet`], which knows only long flag
//! names, or an [`ExtFlagSet`], which also supports single-character
//! shorthands and hidden flags. [`FlagSet`] and [`ClapFlagSet`] are the two
//! shapes shipped with the crate.

mod clap_set;
mod flag_set;

use std::ffi::OsString;

use thiserror::Error;

use crate::value::{Value, ValueError};

pub use clap_set::ClapFlagSet;
pub use flag_set::FlagSet;

/// Reasons a registry refuses to register a flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A flag with this name already exists.
    #[error("flag redefined: {0}")]
    DuplicateName(String),
    /// The shorthand is already taken by another flag.
    #[error("shorthand -{shorthand} for flag {name:?} is already used by {existing:?}")]
    DuplicateShorthand {
        /// Contested shorthand.
        shorthand: char,
        /// Flag being registered.
        name: String,
        /// Flag that owns the shorthand.
        existing: String,
    },
    /// The registry reserves this name or shorthand for itself.
    #[error("flag {0:?} is reserved")]
    Reserved(String),
    /// The name cannot be spelled on a command line.
    #[error("invalid flag name {0:?}")]
    InvalidName(String),
    /// No flag with this name is registered.
    #[error("no such flag: {0}")]
    UnknownFlag(String),
}

/// Errors raised while a registry parses arguments.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The argument names a flag that is not registered.
    #[error("flag provided but not defined: {0}")]
    UnknownFlag(String),
    /// A non-boolean flag was last on the command line.
    #[error("flag needs an argument: {0}")]
    MissingValue(String),
    /// A value failed to convert.
    #[error("invalid value for flag {name}: {source}")]
    InvalidValue {
        /// Flag that received the value.
        name: String,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },
    /// An argument was not valid UTF-8.
    #[error("argument is not valid UTF-8: {0:?}")]
    NonUtf8(OsString),
    /// An argument looked like a flag but could not be read as one.
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    /// Argument parsing delegated to `clap` failed.
    #[error(transparent)]
    Clap(#[from] Box<clap::Error>),
}

/// A registered flag and the storage it writes into.
pub struct Flag<'a> {
    name: String,
    shorthand: Option<char>,
    usage: String,
    default: String,
    hidden: bool,
    changed: bool,
    value: Box<dyn Value + 'a>,
}

impl<'a> Flag<'a> {
    /// New flag whose recorded default is `value`'s current rendering.
    pub fn new(name: &str, usage: &str, value: Box<dyn Value + 'a>) -> Self {
        Self {
            name: name.to_owned(),
            shorthand: None,
            usage: usage.to_owned(),
            default: value.render(),
            hidden: false,
            changed: false,
            value,
        }
    }

    /// Long name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Single-character alias, if any.
    #[must_use]
    pub const fn shorthand(&self) -> Option<char> {
        self.shorthand
    }

    /// Usage text.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Default rendered at registration time.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Whether the flag is left out of usage output.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the flag was set since registration.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.changed
    }

    /// Backing storage.
    #[must_use]
    pub fn value(&self) -> &(dyn Value + 'a) {
        self.value.as_ref()
    }

    /// Assign `raw` through the backing storage.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `raw` does not convert.
    pub fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        self.value.set(raw)?;
        self.changed = true;
        Ok(())
    }

    /// Replace the backing storage, returning the previous one.
    ///
    /// The recorded default becomes the new storage's current value.
    pub fn rebind(&mut self, value: Box<dyn Value + 'a>) -> Box<dyn Value + 'a> {
        self.default = value.render();
        std::mem::replace(&mut self.value, value)
    }

    /// Replace the usage text.
    pub fn set_usage(&mut self, usage: &str) {
        usage.clone_into(&mut self.usage);
    }

    pub(crate) fn with_shorthand(mut self, shorthand: Option<char>) -> Self {
        self.shorthand = shorthand;
        self
    }

    pub(crate) fn hide(&mut self) {
        self.hidden = true;
    }
}

impl std::fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("shorthand", &self.shorthand)
            .field("usage", &self.usage)
            .field("default", &self.default)
            .field("hidden", &self.hidden)
            .field("value", &self.value.render())
            .finish()
    }
}

/// A registry that knows only long flag names.
pub trait StdFlagSet<'a> {
    /// Register `value` under `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] when the name is taken or unusable.
    fn var(&mut self, value: Box<dyn Value + 'a>, name: &str, usage: &str)
    -> Result<(), RegistryError>;

    /// Registered flag by exact name.
    fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag<'a>>;
}

/// A registry with shorthand aliases and hidden flags.
pub trait ExtFlagSet<'a> {
    /// Register `value` under `name` with an optional shorthand.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] when the name or shorthand is taken or
    /// unusable.
    fn var_p(
        &mut self,
        value: Box<dyn Value + 'a>,
        name: &str,
        shorthand: Option<char>,
        usage: &str,
    ) -> Result<(), RegistryError>;

    /// Keep `name` out of usage output.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownFlag`] when `name` is not registered.
    fn mark_hidden(&mut self, name: &str) -> Result<(), RegistryError>;

    /// Registered flag by exact name.
    fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag<'a>>;
}

/// The registry shape a [`Registry`] exposes to the binder.
pub enum Capability<'r, 'a> {
    /// Long names only.
    Standard(&'r mut dyn StdFlagSet<'a>),
    /// Long names, shorthands and hidden flags.
    Extended(&'r mut dyn ExtFlagSet<'a>),
}

/// Anything that may be handed to [`crate::bind`] as a flag registry.
pub trait Registry<'a> {
    /// The flag-set capability, or `None` if this value cannot hold flags.
    fn capability(&mut self) -> Option<Capability<'_, 'a>>;
}

/// Registration request resolved from a field.
pub(crate) struct FlagSpec<'s> {
    pub name: &'s str,
    pub shorthand: Option<char>,
    pub usage: &'s str,
    pub hidden: bool,
}

impl<'a> Capability<'_, 'a> {
    pub(crate) fn register(
        &mut self,
        value: Box<dyn Value + 'a>,
        spec: &FlagSpec<'_>,
    ) -> Result<(), RegistryError> {
        match self {
            Self::Standard(set) => {
                if spec.shorthand.is_some() || spec.hidden {
                    tracing::debug!(
                        flag = spec.name,
                        "standard flag set ignores shorthand and hidden markers"
                    );
                }
                set.var(value, spec.name, spec.usage)
            }
            Self::Extended(set) => {
                set.var_p(value, spec.name, spec.shorthand, spec.usage)?;
                if spec.hidden {
                    set.mark_hidden(spec.name)?;
                }
                Ok(())
            }
        }
    }

    pub(crate) fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag<'a>> {
        match self {
            Self::Standard(set) => set.lookup_mut(name),
            Self::Extended(set) => set.lookup_mut(name),
        }
    }
}

/// Rejects names that cannot be spelled as `--name`.
pub(crate) fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.starts_with('-') || name.contains(['=', ' ']) {
        return Err(RegistryError::InvalidName(name.to_owned()));
    }
    Ok(())
}
