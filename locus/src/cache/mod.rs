//! Persistent cache for provider results.
//!
//! Every network result (isochrone rings, elevation samples) is stored once
//! under a structured [`CacheKey`] and read back on later runs. There is no
//! expiry; entries are cleared out-of-band.
//!
//! # Example
//!
//! ```ignore
//! use locus::cache::{CacheKey, CacheStore};
//!
//! let store = CacheStore::new("data/cache");
//! let key = CacheKey::isochrone(&descriptor.canonical_name, origin.lat, origin.lon);
//! let rings = store.load_or_fetch(&key, || routing.isochrone(&request))?;
//! ```

mod key;
mod store;

pub use key::CacheKey;
pub use store::{CacheError, CacheStats, CacheStore};
