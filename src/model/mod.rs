//! Command Model
//!
//! Structured view of a server's command surface and online players.
//!
//! ## Lifecycle
//! - Built by the discovery pipeline from parsed help text
//! - Persisted by the cache store
//! - Published as an immutable snapshot to completion readers
//!
//! A model is never edited after publication; a refresh replaces it.

mod argument;
mod command;
mod players;

pub use argument::Argument;
pub use command::{canonical_name, CommandDefinition, CommandModel, MODEL_VERSION};
pub use players::{PlayerGroup, PlayerList};
