//! Cache Module
//!
//! Persists discovered command models so completions are available the
//! moment a session starts, before the background refresh finishes.
//!
//! ## Layout
//! ```text
//! {cache_dir}/
//!   ├── 10.0.0.112_25575.json
//!   └── mc.example.net_25575.json
//! ```

mod entry;
mod key;
mod store;

pub use entry::{CacheEntry, CachedCommand};
pub use key::ServerKey;
pub use store::CacheStore;
