//! The binding engine.
//!
//! [`bind`] walks a struct's fields, resolves each field's tag, and either
//! registers a new flag backed by the field or re-points an existing flag at
//! it. Nested structs are bound recursively into the same registry.
//!
//! Binding stops at the first failure. Flags registered before the failure
//! stay registered.

use crate::error::BindError;
use crate::registry::{Capability, FlagSpec, Registry};
use crate::tag::TagDescriptor;
use crate::value::Value;
use crate::walk::{Bindable, Field, Reflect, Visit, Walker};

/// Settings applied to a whole [`bind_with`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Prepended to every flag name as `prefix-name`. Override targets are
    /// looked up without it.
    pub prefix: Option<String>,
}

impl BindOptions {
    /// Options with no prefix.
    #[must_use]
    pub const fn new() -> Self {
        Self { prefix: None }
    }

    /// Prefix every registered flag name.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// A value that may be handed to [`bind`] as the struct to bind.
///
/// Implemented for `&mut T` and for `Option<&mut T>`, where `None` stands
/// for a missing target.
pub trait BindTarget<'a> {
    /// Type being bound.
    type Target: Bindable + ?Sized;

    /// The borrowed target, if present.
    fn into_target(self) -> Option<&'a mut Self::Target>;
}

impl<'a, T: Bindable + ?Sized> BindTarget<'a> for &'a mut T {
    type Target = T;

    fn into_target(self) -> Option<&'a mut T> {
        Some(self)
    }
}

impl<'a, T: Bindable + ?Sized> BindTarget<'a> for Option<&'a mut T> {
    type Target = T;

    fn into_target(self) -> Option<&'a mut T> {
        self
    }
}

/// Bind every exported field of `target` to a flag in `registry`.
///
/// After a successful call the registry holds borrows of the struct's
/// fields: parsing arguments through the registry writes straight into
/// them, and defaults from tags are already applied.
///
/// ```
/// use flagbind::{Flags, FlagSet, bind};
///
/// #[derive(Flags, Default)]
/// struct Opts {
///     /// Address to listen on.
///     #[flag(default = "127.0.0.1")]
///     pub host: String,
/// }
///
/// let mut opts = Opts::default();
/// let mut flags = FlagSet::new("demo");
/// bind(&mut opts, &mut flags).unwrap();
/// assert_eq!(flags.lookup("host").unwrap().usage(), "Address to listen on.");
/// drop(flags);
/// assert_eq!(opts.host, "127.0.0.1");
/// ```
///
/// # Errors
///
/// Returns [`BindError::InvalidFlagSet`] when `registry` exposes no flag-set
/// capability, [`BindError::InvalidType`] when the target is `None` or not
/// a struct, and a field-level error for the first field that fails.
pub fn bind<'a, T, R>(target: T, registry: &mut R) -> Result<(), BindError>
where
    T: BindTarget<'a> + 'a,
    R: Registry<'a> + ?Sized,
{
    bind_with(target, registry, &BindOptions::new())
}

/// [`bind`] with explicit [`BindOptions`].
///
/// # Errors
///
/// As for [`bind`].
pub fn bind_with<'a, T, R>(
    target: T,
    registry: &mut R,
    options: &BindOptions,
) -> Result<(), BindError>
where
    T: BindTarget<'a> + 'a,
    R: Registry<'a> + ?Sized,
{
    let Some(mut capability) = registry.capability() else {
        return Err(BindError::InvalidFlagSet);
    };
    let Some(root) = target.into_target() else {
        return Err(BindError::invalid_type::<T::Target>(true));
    };
    let Reflect::Struct(fields) = root.reflect() else {
        return Err(BindError::invalid_type::<T::Target>(false));
    };
    bind_fields(fields, &mut capability, options.prefix.as_deref())
}

fn bind_fields<'a>(
    fields: Vec<Field<'a>>,
    registry: &mut Capability<'_, 'a>,
    prefix: Option<&str>,
) -> Result<(), BindError> {
    for visit in Walker::new(fields) {
        match visit? {
            Visit::Leaf {
                name,
                tag,
                doc,
                value,
            } => bind_leaf(registry, prefix, name, &tag, doc, value)?,
            Visit::Nested { name, tag, fields } => {
                let nested = join_prefix(prefix, tag.prefix.as_deref());
                bind_fields(fields, registry, nested.as_deref())
                    .map_err(|err| BindError::nested(name, err))?;
            }
        }
    }
    Ok(())
}

fn bind_leaf<'a>(
    registry: &mut Capability<'_, 'a>,
    prefix: Option<&str>,
    field: &str,
    tag: &TagDescriptor,
    doc: Option<&str>,
    mut value: Box<dyn Value + 'a>,
) -> Result<(), BindError> {
    if let Some(target) = tag.overrides.as_deref() {
        let flag = registry
            .lookup_mut(target)
            .ok_or_else(|| BindError::FlagOverrideUndefined {
                flag_name: target.to_owned(),
            })?;
        let literal = tag
            .default
            .clone()
            .unwrap_or_else(|| flag.default_value().to_owned());
        value
            .set_default(&literal)
            .map_err(|err| BindError::default_value(field, &literal, err))?;
        if let Some(usage) = tag.usage.as_deref() {
            flag.set_usage(usage);
        }
        drop(flag.rebind(value));
        tracing::debug!(flag = target, field, "rebound existing flag");
        return Ok(());
    }

    if let Some(literal) = tag.default.as_deref() {
        value
            .set_default(literal)
            .map_err(|err| BindError::default_value(field, literal, err))?;
    }
    let name = match prefix {
        Some(outer) => format!("{outer}-{}", tag.flag_name(field)),
        None => tag.flag_name(field),
    };
    let spec = FlagSpec {
        name: &name,
        shorthand: tag.shorthand,
        usage: tag.usage.as_deref().or(doc).unwrap_or_default(),
        hidden: tag.hidden,
    };
    registry
        .register(value, &spec)
        .map_err(|err| BindError::register(field, err))?;
    tracing::debug!(flag = %name, field, "registered flag");
    Ok(())
}

fn join_prefix(parent: Option<&str>, child: Option<&str>) -> Option<String> {
    match (parent, child) {
        (Some(outer), Some(inner)) => Some(format!("{outer}-{inner}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
        (None, None) => None,
    }
}
