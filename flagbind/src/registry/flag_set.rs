//! Minimal registry with long flag names only.

use std::ffi::OsString;

use super::{
    Capability, Flag, ParseError, Registry, RegistryError, StdFlagSet, validate_name,
};
use crate::value::Value;

/// A flag set in the style of a classic `-name value` parser.
///
/// Flags are spelled `-name` or `--name`, with the value either attached
/// (`-name=value`) or in the next argument. Boolean flags take no separate
/// argument. Parsing stops at `--` or at the first argument that is not a
/// flag; the rest is available from [`FlagSet::args`].
///
/// ```
/// use flagbind::{FlagSet, Flags, bind};
///
/// #[derive(Flags, Default)]
/// struct Opts {
///     #[flag(default = 3)]
///     pub retries: u32,
/// }
///
/// let mut opts = Opts::default();
/// {
///     let mut flags = FlagSet::new("demo");
///     bind(&mut opts, &mut flags).unwrap();
///     flags.parse(["-retries=5", "input.txt"]).unwrap();
///     assert_eq!(flags.args(), ["input.txt"]);
/// }
/// assert_eq!(opts.retries, 5);
/// ```
#[derive(Debug)]
pub struct FlagSet<'a> {
    name: String,
    flags: Vec<Flag<'a>>,
    args: Vec<String>,
    parsed: bool,
}

impl<'a> FlagSet<'a> {
    /// Empty flag set named after the program or subcommand.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: Vec::new(),
            args: Vec::new(),
            parsed: false,
        }
    }

    /// Name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered flag by exact name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.flags.iter().find(|flag| flag.name() == name)
    }

    /// Flags in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag<'a>> {
        self.flags.iter()
    }

    /// Assign `raw` to the flag called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownFlag`] or [`ParseError::InvalidValue`].
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), ParseError> {
        let flag = StdFlagSet::lookup_mut(self, name)
            .ok_or_else(|| ParseError::UnknownFlag(name.to_owned()))?;
        flag.set(raw).map_err(|source| ParseError::InvalidValue {
            name: name.to_owned(),
            source,
        })
    }

    /// Parse `args`, which must not include the program name.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown flags, missing or invalid values,
    /// malformed flags and non UTF-8 arguments.
    pub fn parse<I, S>(&mut self, args: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.parsed = true;
        let mut rargs: Vec<OsString> = args.into_iter().map(Into::into).collect();
        rargs.reverse();
        while let Some(next) = rargs.pop() {
            let arg = next.into_string().map_err(ParseError::NonUtf8)?;
            if arg == "--" {
                break;
            }
            if arg.len() < 2 || !arg.starts_with('-') {
                rargs.push(arg.into());
                break;
            }
            self.parse_one(&arg, &mut rargs)?;
        }
        self.args = rargs
            .into_iter()
            .rev()
            .map(|arg| arg.into_string().map_err(ParseError::NonUtf8))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn parse_one(&mut self, arg: &str, rargs: &mut Vec<OsString>) -> Result<(), ParseError> {
        let body = arg
            .strip_prefix("--")
            .or_else(|| arg.strip_prefix('-'))
            .unwrap_or(arg);
        if body.is_empty() || body.starts_with(['-', '=']) {
            return Err(ParseError::BadSyntax(arg.to_owned()));
        }
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let flag = StdFlagSet::lookup_mut(self, name)
            .ok_or_else(|| ParseError::UnknownFlag(name.to_owned()))?;
        let raw = match inline {
            Some(value) => value.to_owned(),
            None if flag.value().is_bool() => String::from("true"),
            None => rargs
                .pop()
                .ok_or_else(|| ParseError::MissingValue(name.to_owned()))?
                .into_string()
                .map_err(ParseError::NonUtf8)?,
        };
        flag.set(&raw).map_err(|source| ParseError::InvalidValue {
            name: name.to_owned(),
            source,
        })
    }

    /// Positional arguments left over after [`FlagSet::parse`].
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether [`FlagSet::parse`] has been called.
    #[must_use]
    pub const fn parsed(&self) -> bool {
        self.parsed
    }

    /// Usage listing, one entry per flag, sorted by name.
    #[must_use]
    pub fn usage(&self) -> String {
        let mut flags: Vec<&Flag<'a>> = self.flags.iter().collect();
        flags.sort_by(|a, b| a.name().cmp(b.name()));
        let entries: Vec<String> = flags
            .into_iter()
            .map(|flag| {
                let value = flag.value();
                let type_hint = if value.is_bool() {
                    String::new()
                } else {
                    format!(" {}", value.type_name())
                };
                let default_hint = if is_zero_default(flag.default_value()) {
                    String::new()
                } else {
                    format!(" (default {})", flag.default_value())
                };
                format!(
                    "  -{}{type_hint}\n    \t{}{default_hint}\n",
                    flag.name(),
                    flag.usage()
                )
            })
            .collect();
        format!("Usage of {}:\n{}", self.name, entries.concat())
    }
}

fn is_zero_default(default: &str) -> bool {
    matches!(default, "" | "false" | "0")
}

impl<'a> StdFlagSet<'a> for FlagSet<'a> {
    fn var(
        &mut self,
        value: Box<dyn Value + 'a>,
        name: &str,
        usage: &str,
    ) -> Result<(), RegistryError> {
        validate_name(name)?;
        if self.lookup(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_owned()));
        }
        self.flags.push(Flag::new(name, usage, value));
        Ok(())
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag<'a>> {
        self.flags.iter_mut().find(|flag| flag.name() == name)
    }
}

impl<'a> Registry<'a> for FlagSet<'a> {
    fn capability(&mut self) -> Option<Capability<'_, 'a>> {
        Some(Capability::Standard(self))
    }
}
