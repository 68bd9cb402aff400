//! Parsing of per-field flag tags.
//!
//! A tag is a comma-separated list of entries, each a key optionally
//! followed by `=` and a value:
//!
//! ```text
//! name = "log-level", short = 'l', default = "info", usage = "Verbosity."
//! ```
//!
//! Values are double-quoted strings, single-quoted characters, or a bare run
//! of characters up to the next comma. `skip` and `hidden` are markers and
//! take no value. `#[derive(Flags)]` renders its `#[flag(...)]` attributes
//! into this form; hand-written [`crate::Field`] lists use it directly.

use std::iter::Peekable;
use std::str::CharIndices;

use heck::ToKebabCase;
use thiserror::Error;

/// Structurally malformed tag text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TagError {
    /// A key outside the recognised set.
    #[error("unknown tag key `{0}`")]
    UnknownKey(String),
    /// A valued key appeared without `= value`.
    #[error("tag key `{0}` requires a value")]
    MissingValue(&'static str),
    /// A marker key was given a value.
    #[error("tag key `{0}` does not take a value")]
    UnexpectedValue(&'static str),
    /// The same key appeared twice.
    #[error("tag key `{0}` given more than once")]
    DuplicateKey(&'static str),
    /// A quoted literal was not closed.
    #[error("unterminated literal starting at byte {0}")]
    Unterminated(usize),
    /// The shorthand is not a single ASCII alphanumeric character.
    #[error("shorthand must be a single ASCII letter or digit, got {0:?}")]
    InvalidShorthand(String),
    /// `name = ""`.
    #[error("flag name must not be empty")]
    EmptyName,
    /// Something other than a key where one was expected.
    #[error("unexpected {found:?} at byte {at}")]
    Unexpected {
        /// Offending character.
        found: char,
        /// Byte offset into the tag.
        at: usize,
    },
}

/// Flag metadata resolved from one field's tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDescriptor {
    /// Explicit flag name.
    pub name: Option<String>,
    /// Single-character alias.
    pub shorthand: Option<char>,
    /// Default literal, converted when the field is bound.
    pub default: Option<String>,
    /// Usage text.
    pub usage: Option<String>,
    /// Name of an already registered flag to bind to instead of creating one.
    pub overrides: Option<String>,
    /// Name prefix applied to the flags of a nested struct.
    pub prefix: Option<String>,
    /// Leave the field unbound.
    pub skip: bool,
    /// Keep the flag out of usage output.
    pub hidden: bool,
}

#[derive(Clone, Copy)]
enum Key {
    Name,
    Short,
    Default,
    Usage,
    Overrides,
    Prefix,
    Skip,
    Hidden,
}

impl Key {
    fn lookup(ident: &str) -> Option<Self> {
        Some(match ident {
            "name" => Self::Name,
            "short" => Self::Short,
            "default" => Self::Default,
            "usage" => Self::Usage,
            "overrides" => Self::Overrides,
            "prefix" => Self::Prefix,
            "skip" => Self::Skip,
            "hidden" => Self::Hidden,
            _ => return None,
        })
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Short => "short",
            Self::Default => "default",
            Self::Usage => "usage",
            Self::Overrides => "overrides",
            Self::Prefix => "prefix",
            Self::Skip => "skip",
            Self::Hidden => "hidden",
        }
    }

    const fn is_marker(self) -> bool {
        matches!(self, Self::Skip | Self::Hidden)
    }
}

impl TagDescriptor {
    /// Parse raw tag text.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagbind::TagDescriptor;
    ///
    /// let tag = TagDescriptor::parse(r#"short = 'p', default = 8080"#).unwrap();
    /// assert_eq!(tag.shorthand, Some('p'));
    /// assert_eq!(tag.default.as_deref(), Some("8080"));
    /// assert_eq!(tag.flag_name("listen_port"), "listen-port");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`TagError`] when the text is structurally malformed.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut out = Self::default();
        let mut seen: Vec<&'static str> = Vec::new();
        let mut lexer = Lexer::new(raw);
        while let Some(ident) = lexer.ident()? {
            let key = Key::lookup(ident).ok_or_else(|| TagError::UnknownKey(ident.to_owned()))?;
            if seen.contains(&key.as_str()) {
                return Err(TagError::DuplicateKey(key.as_str()));
            }
            seen.push(key.as_str());
            let value = lexer.value()?;
            out.apply(key, value)?;
            lexer.separator()?;
        }
        Ok(out)
    }

    fn apply(&mut self, key: Key, value: Option<String>) -> Result<(), TagError> {
        if key.is_marker() {
            if value.is_some() {
                return Err(TagError::UnexpectedValue(key.as_str()));
            }
            match key {
                Key::Skip => self.skip = true,
                _ => self.hidden = true,
            }
            return Ok(());
        }
        let value = value.ok_or(TagError::MissingValue(key.as_str()))?;
        match key {
            Key::Name if value.is_empty() => return Err(TagError::EmptyName),
            Key::Name => self.name = Some(value),
            Key::Short => self.shorthand = Some(parse_shorthand(&value)?),
            Key::Default => self.default = Some(value),
            Key::Usage => self.usage = Some(value),
            Key::Overrides => self.overrides = Some(value),
            Key::Prefix => self.prefix = Some(value),
            Key::Skip | Key::Hidden => {}
        }
        Ok(())
    }

    /// Flag name for a field: the explicit name, or the field name in
    /// kebab-case (`log_level` and `LogLevel` both become `log-level`).
    #[must_use]
    pub fn flag_name(&self, field_name: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| field_name.to_kebab_case())
    }
}

fn parse_shorthand(value: &str) -> Result<char, TagError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Ok(c),
        _ => Err(TagError::InvalidShorthand(value.to_owned())),
    }
}

struct Lexer<'t> {
    src: &'t str,
    chars: Peekable<CharIndices<'t>>,
}

impl<'t> Lexer<'t> {
    fn new(src: &'t str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn unexpected(&mut self) -> TagError {
        match self.chars.peek() {
            Some(&(at, found)) => TagError::Unexpected { found, at },
            None => TagError::Unterminated(self.src.len()),
        }
    }

    /// Next key, or `None` at the end of input.
    fn ident(&mut self) -> Result<Option<&'t str>, TagError> {
        self.skip_ws();
        let Some(&(start, first)) = self.chars.peek() else {
            return Ok(None);
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(TagError::Unexpected { found: first, at: start });
        }
        let mut end = start;
        while let Some((at, c)) = self
            .chars
            .next_if(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        {
            end = at + c.len_utf8();
        }
        Ok(self.src.get(start..end))
    }

    /// Optional `= value` following a key.
    fn value(&mut self) -> Result<Option<String>, TagError> {
        self.skip_ws();
        if self.chars.next_if(|(_, c)| *c == '=').is_none() {
            return Ok(None);
        }
        self.skip_ws();
        match self.chars.peek().copied() {
            Some((at, '"')) => self.quoted('"', at).map(Some),
            Some((at, '\'')) => self.quoted('\'', at).map(Some),
            Some(_) => Ok(Some(self.bare())),
            None => Ok(Some(String::new())),
        }
    }

    fn quoted(&mut self, delim: char, start: usize) -> Result<String, TagError> {
        self.chars.next();
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == delim => return Ok(out),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, escaped)) => out.push(escaped),
                    None => return Err(TagError::Unterminated(start)),
                },
                Some((_, c)) => out.push(c),
                None => return Err(TagError::Unterminated(start)),
            }
        }
    }

    fn bare(&mut self) -> String {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| *c != ',') {
            out.push(c);
        }
        out.trim_end().to_owned()
    }

    /// Comma between entries, or the end of input.
    fn separator(&mut self) -> Result<(), TagError> {
        self.skip_ws();
        if self.chars.peek().is_none() || self.chars.next_if(|(_, c)| *c == ',').is_some() {
            return Ok(());
        }
        Err(self.unexpected())
    }
}
