//! Bind struct fields to command-line flags declaratively.
//!
//! Derive [`Flags`] on a configuration struct, hand it to [`bind`] together
//! with a flag registry, and every public field becomes a flag whose storage
//! is the field itself. Field attributes pick the flag name, shorthand,
//! default, usage text and visibility, or point a field at a flag that is
//! already registered.
//!
//! ```
//! use flagbind::{ClapFlagSet, Flags, bind};
//!
//! #[derive(Flags, Default)]
//! struct Server {
//!     /// Port to listen on.
//!     #[flag(short = 'p', default = 8080)]
//!     pub port: u16,
//!     #[flag(prefix = "log")]
//!     pub logging: Logging,
//! }
//!
//! #[derive(Flags, Default)]
//! struct Logging {
//!     #[flag(default = "info", usage = "minimum level")]
//!     pub level: String,
//! }
//!
//! let mut server = Server::default();
//! {
//!     let mut flags = ClapFlagSet::new("server");
//!     bind(&mut server, &mut flags).unwrap();
//!     flags.parse_from(["server", "-p", "9000", "--log-level", "debug"]).unwrap();
//! }
//! assert_eq!(server.port, 9000);
//! assert_eq!(server.logging.level, "debug");
//! ```
//!
//! The registry borrows the struct's fields for as long as it lives. Read the
//! struct once the registry has been dropped.

pub use flagbind_macros::Flags;

mod binder;
mod error;
pub mod registry;
pub mod tag;
pub mod value;
pub mod walk;

pub use binder::{BindOptions, BindTarget, bind, bind_with};
pub use error::BindError;
pub use registry::{
    Capability, ClapFlagSet, ExtFlagSet, Flag, FlagSet, ParseError, Registry, RegistryError,
    StdFlagSet,
};
pub use tag::{TagDescriptor, TagError};
pub use value::{FlagValue, Scalar, Slot, Value, ValueError};
pub use walk::{Bindable, Field, Reflect, Visit, Walker};
