//! Extended registry that delegates argument parsing to `clap`.

use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::{
    Capability, ExtFlagSet, Flag, ParseError, Registry, RegistryError, validate_name,
};
use crate::value::Value;

/// Argument id collecting positional arguments.
const POSITIONAL_ID: &str = "__flagbind_positional";

/// A flag set with shorthands and hidden flags, parsed by [`clap`].
///
/// Every flag becomes a `clap` [`Arg`] with `--name` and optional `-s`
/// spellings. After `clap` accepts the command line, each value that came
/// from the command line is written into the bound storage in order, so the
/// last occurrence wins for scalars and lists accumulate.
///
/// ```
/// use flagbind::{ClapFlagSet, Flags, bind};
///
/// #[derive(Flags, Default)]
/// struct Opts {
///     /// Print more output.
///     #[flag(short = 'v')]
///     pub verbose: bool,
///     #[flag(default = "a,b")]
///     pub tags: Vec<String>,
/// }
///
/// let mut opts = Opts::default();
/// {
///     let mut flags = ClapFlagSet::new("demo");
///     bind(&mut opts, &mut flags).unwrap();
///     flags.parse_from(["demo", "-v", "--tags", "c", "--tags=d"]).unwrap();
/// }
/// assert!(opts.verbose);
/// assert_eq!(opts.tags, ["c", "d"]);
/// ```
#[derive(Debug)]
pub struct ClapFlagSet<'a> {
    command: Command,
    flags: Vec<Flag<'a>>,
    args: Vec<String>,
}

impl<'a> ClapFlagSet<'a> {
    /// Empty flag set for a command called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_command(Command::new(name.into()))
    }

    /// Empty flag set layered onto an existing command definition, which
    /// keeps its `about`, version and other settings.
    #[must_use]
    pub const fn with_command(command: Command) -> Self {
        Self {
            command,
            flags: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Registered flag by exact name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.flags.iter().find(|flag| flag.name() == name)
    }

    /// Registered flag by shorthand.
    #[must_use]
    pub fn shorthand_lookup(&self, shorthand: char) -> Option<&Flag<'a>> {
        self.flags
            .iter()
            .find(|flag| flag.shorthand() == Some(shorthand))
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
        let flag = ExtFlagSet::lookup_mut(self, name)
            .ok_or_else(|| ParseError::UnknownFlag(name.to_owned()))?;
        flag.set(raw).map_err(|source| ParseError::InvalidValue {
            name: name.to_owned(),
            source,
        })
    }

    /// The `clap` command describing every registered flag.
    #[must_use]
    pub fn command(&self) -> Command {
        let args = self.flags.iter().map(flag_arg).chain(std::iter::once(
            Arg::new(POSITIONAL_ID)
                .value_name("ARGS")
                .num_args(0..)
                .trailing_var_arg(true),
        ));
        self.command.clone().args(args)
    }

    /// Parse a full command line, program name first.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Clap`] when `clap` rejects the command line
    /// (including `--help` requests), or a conversion error when a value does
    /// not fit the bound field.
    pub fn parse_from<I, T>(&mut self, args: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args).map_err(Box::new)?;
        self.apply_matches(&matches)
    }

    /// Write the command-line values from `matches` into the bound storage.
    ///
    /// Useful when the caller runs `clap` itself on [`ClapFlagSet::command`].
    ///
    /// # Errors
    ///
    /// Returns a conversion error when a value does not fit the bound field.
    pub fn apply_matches(&mut self, matches: &ArgMatches) -> Result<(), ParseError> {
        for flag in &mut self.flags {
            if matches.value_source(flag.name()) != Some(ValueSource::CommandLine) {
                continue;
            }
            for raw in matches.get_raw(flag.name()).into_iter().flatten() {
                let text = raw
                    .to_str()
                    .ok_or_else(|| ParseError::NonUtf8(raw.to_os_string()))?;
                flag.set(text).map_err(|source| ParseError::InvalidValue {
                    name: flag.name().to_owned(),
                    source,
                })?;
            }
        }
        self.args = matches
            .get_raw(POSITIONAL_ID)
            .into_iter()
            .flatten()
            .map(|raw| {
                raw.to_str()
                    .map(str::to_owned)
                    .ok_or_else(|| ParseError::NonUtf8(raw.to_os_string()))
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Positional arguments from the last parse.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn has_version_flag(&self) -> bool {
        !self.command.is_disable_version_flag_set()
            && (self.command.get_version().is_some() || self.command.get_long_version().is_some())
    }

    /// Whether `clap` or the wrapped command already owns `name` as an id or
    /// long spelling.
    fn claims_long(&self, name: &str) -> bool {
        name == POSITIONAL_ID
            || (name == "help" && !self.command.is_disable_help_flag_set())
            || (name == "version" && self.has_version_flag())
            || self
                .command
                .get_arguments()
                .any(|arg| arg.get_id() == name || arg.get_long() == Some(name))
    }

    /// Whether `clap` or the wrapped command already owns `-c`.
    fn claims_short(&self, c: char) -> bool {
        (c == 'h' && !self.command.is_disable_help_flag_set())
            || (c == 'V' && self.has_version_flag())
            || self
                .command
                .get_arguments()
                .any(|arg| arg.get_short() == Some(c))
    }
}

fn flag_arg(flag: &Flag<'_>) -> Arg {
    let value = flag.value();
    let help = if value.is_bool() || flag.default_value().is_empty() {
        flag.usage().to_owned()
    } else {
        format!("{} [default: {}]", flag.usage(), flag.default_value())
    };
    let mut arg = Arg::new(flag.name().to_owned())
        .long(flag.name().to_owned())
        .help(help)
        .hide(flag.is_hidden())
        .action(ArgAction::Append);
    if let Some(shorthand) = flag.shorthand() {
        arg = arg.short(shorthand);
    }
    if value.is_bool() {
        arg.num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
    } else {
        arg.value_name(value.type_name().to_uppercase())
            .allow_negative_numbers(true)
    }
}

impl<'a> ExtFlagSet<'a> for ClapFlagSet<'a> {
    fn var_p(
        &mut self,
        value: Box<dyn Value + 'a>,
        name: &str,
        shorthand: Option<char>,
        usage: &str,
    ) -> Result<(), RegistryError> {
        validate_name(name)?;
        if self.claims_long(name) {
            return Err(RegistryError::Reserved(name.to_owned()));
        }
        if self.lookup(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_owned()));
        }
        if let Some(c) = shorthand {
            if self.claims_short(c) {
                return Err(RegistryError::Reserved(c.to_string()));
            }
            if let Some(existing) = self.shorthand_lookup(c) {
                return Err(RegistryError::DuplicateShorthand {
                    shorthand: c,
                    name: name.to_owned(),
                    existing: existing.name().to_owned(),
                });
            }
        }
        self.flags
            .push(Flag::new(name, usage, value).with_shorthand(shorthand));
        Ok(())
    }

    fn mark_hidden(&mut self, name: &str) -> Result<(), RegistryError> {
        let flag = ExtFlagSet::lookup_mut(self, name)
            .ok_or_else(|| RegistryError::UnknownFlag(name.to_owned()))?;
        flag.hide();
        Ok(())
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag<'a>> {
        self.flags.iter_mut().find(|flag| flag.name() == name)
    }
}

impl<'a> Registry<'a> for ClapFlagSet<'a> {
    fn capability(&mut self) -> Option<Capability<'_, 'a>> {
        Some(Capability::Extended(self))
    }
}
