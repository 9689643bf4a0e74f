//! Backend registry.
//!
//! The registry is a plain table of backend descriptors per device class,
//! built once at startup and passed by reference into the pipelines. There
//! is no global state: tests build registries of fake drivers, the binary
//! uses [`BackendRegistry::builtin`].
//!
//! # Resolution
//!
//! A configured name is matched case-insensitively and exactly against the
//! identifiers of the requested class, in registration order:
//!
//! ```rust
//! use avdriver::registry::{BackendRegistry, DeviceClass};
//!
//! let registry = BackendRegistry::builtin();
//! let audio = registry.resolve(DeviceClass::Audio, "NULL").unwrap();
//! assert_eq!(audio.ident(), "null");
//!
//! let err = registry.resolve(DeviceClass::Video, "missing").unwrap_err();
//! assert!(err.available.contains(&"null".to_string()));
//! ```
//!
//! The registry never logs and never terminates the process; what to do
//! with a [`BackendNotFound`] is decided by the caller.

mod descriptor;
mod table;

pub use descriptor::{BackendDescriptor, Capabilities, DeviceClass};
pub use table::{BackendNotFound, BackendRegistry, BackendTable, Resolved};
