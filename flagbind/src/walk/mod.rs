//! Field descriptions and the walker that visits them.
//!
//! Rust has no runtime reflection, so a bindable struct describes its own
//! fields through [`Bindable::reflect`]. `#[derive(Flags)]` writes that
//! description; it can also be written by hand:
//!
//! ```
//! use flagbind::{Bindable, Field, FlagSet, Reflect, bind};
//!
//! #[derive(Default)]
//! struct Opts {
//!     port: u16,
//!     cache: Vec<String>,
//! }
//!
//! impl Bindable for Opts {
//!     fn reflect(&mut self) -> Reflect<'_> {
//!         Reflect::Struct(vec![
//!             Field::new("port", &mut self.port).tag("short = 'p', default = 8080"),
//!             Field::new("cache", &mut self.cache).tag("skip"),
//!         ])
//!     }
//! }
//!
//! let mut opts = Opts::default();
//! bind(&mut opts, &mut FlagSet::new("demo")).unwrap();
//! assert_eq!(opts.port, 8080);
//! ```

use crate::error::BindError;
use crate::tag::TagDescriptor;
use crate::value::{FlagValue, Slot, Value};

/// A value that can be bound: either a flag leaf or a struct of fields.
pub trait Bindable {
    /// Describe this value for binding.
    fn reflect(&mut self) -> Reflect<'_>;
}

/// What a [`Bindable`] value turned out to be.
pub enum Reflect<'a> {
    /// A single flag's storage.
    Leaf(Box<dyn Value + 'a>),
    /// A struct and its fields in declaration order.
    Struct(Vec<Field<'a>>),
}

impl<'a> Reflect<'a> {
    /// Leaf storage writing through to `value`.
    pub fn leaf<T: FlagValue + 'a>(value: &'a mut T) -> Self {
        Self::Leaf(Box::new(Slot::new(value)))
    }
}

/// One struct field: its name, tag text and a borrow of its value.
pub struct Field<'a> {
    name: &'static str,
    tag: &'static str,
    doc: Option<&'static str>,
    exported: bool,
    target: &'a mut dyn Bindable,
}

impl<'a> Field<'a> {
    /// Exported field `name` with an empty tag.
    pub fn new(name: &'static str, target: &'a mut dyn Bindable) -> Self {
        Self {
            name,
            tag: "",
            doc: None,
            exported: true,
            target,
        }
    }

    /// Raw tag text, see [`crate::tag`].
    #[must_use]
    pub const fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Documentation used as usage text when the tag has none.
    #[must_use]
    pub const fn doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Whether the walker may bind this field. Unexported fields are skipped.
    #[must_use]
    pub const fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Field name as declared.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// A bindable field produced by [`Walker`].
pub enum Visit<'a> {
    /// A field bound directly to a flag.
    Leaf {
        /// Field name as declared.
        name: &'static str,
        /// Resolved tag.
        tag: TagDescriptor,
        /// Doc text from the field, if any.
        doc: Option<&'static str>,
        /// Storage for the flag.
        value: Box<dyn Value + 'a>,
    },
    /// A struct field whose own fields are bound in turn.
    Nested {
        /// Field name as declared.
        name: &'static str,
        /// Resolved tag.
        tag: TagDescriptor,
        /// The nested struct's fields.
        fields: Vec<Field<'a>>,
    },
}

/// Single-pass iterator over the bindable fields of one struct level.
///
/// Unexported fields and fields tagged `skip` are dropped silently. A
/// malformed tag is reported as [`BindError::Tag`].
pub struct Walker<'a> {
    fields: std::vec::IntoIter<Field<'a>>,
}

impl<'a> Walker<'a> {
    /// Walk `fields` in declaration order.
    #[must_use]
    pub fn new(fields: Vec<Field<'a>>) -> Self {
        Self {
            fields: fields.into_iter(),
        }
    }
}

impl<'a> Iterator for Walker<'a> {
    type Item = Result<Visit<'a>, BindError>;

    fn next(&mut self) -> Option<Self::Item> {
        for field in self.fields.by_ref() {
            let Field {
                name,
                tag,
                doc,
                exported,
                target,
            } = field;
            if !exported {
                tracing::trace!(field = name, "skipping unexported field");
                continue;
            }
            let descriptor = match TagDescriptor::parse(tag) {
                Ok(descriptor) => descriptor,
                Err(err) => return Some(Err(BindError::tag(name, err))),
            };
            if descriptor.skip {
                tracing::trace!(field = name, "skipping field tagged skip");
                continue;
            }
            let visit = match target.reflect() {
                Reflect::Leaf(value) => Visit::Leaf {
                    name,
                    tag: descriptor,
                    doc,
                    value,
                },
                Reflect::Struct(fields) => Visit::Nested {
                    name,
                    tag: descriptor,
                    fields,
                },
            };
            return Some(Ok(visit));
        }
        None
    }
}
