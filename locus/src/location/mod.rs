//! Location descriptors and their resolution.
//!
//! A config [`LocationEntry`](crate::config::LocationEntry) names a location
//! and its category; the category database supplies coordinates. [`resolve`]
//! merges the two into a [`LocationDescriptor`] with a typed
//! [`LocationKind`] and a canonical name that is unique within a run.

mod descriptor;
mod resolve;

pub use descriptor::{canonical_name, LocationDescriptor, LocationKind, CANONICAL_SEPARATOR};
pub use resolve::{check_unique, resolve, resolve_all, Resolution, ResolveError};
