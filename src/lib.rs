//! # mcrcon
//!
//! A Minecraft RCON client with:
//! - Binary packet codec with strict length validation
//! - Sentinel-based reassembly of fragmented responses
//! - Automatic reconnect with exponential backoff
//! - Command discovery from the server's help output
//! - Per-server command cache and background refresh for tab completion
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CLI / Interactive Shell                  │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ commands                     │ completions
//! ┌──────────────▼──────────────┐      ┌────────▼────────┐
//! │   ReconnectingConnection    │      │    Completer    │
//! │   (backoff, retry once)     │      └────────▲────────┘
//! └──────────────┬──────────────┘               │ load
//!                │                     ┌────────┴────────┐
//! ┌──────────────▼──────────────┐      │ CompletionState │◀──┐
//! │         Connection          │      │   (ArcSwap)     │   │ publish
//! │  (auth, sentinel assembly)  │      └─────────────────┘   │
//! └──────────────┬──────────────┘      ┌─────────────────────┴──┐
//!                │                     │  BackgroundRefresher   │
//! ┌──────────────▼──────────────┐      │  (own Connection)      │
//! │      Protocol Codec         │      │  Discovery → Parser    │
//! │  (len | id | type | body)   │      │  → CacheStore          │
//! └─────────────────────────────┘      └────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod model;
pub mod help;
pub mod format;
pub mod credentials;
pub mod cache;
pub mod discovery;
pub mod completer;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RconError, Result};
pub use config::{Backoff, Config};
pub use network::{CommandExecutor, Connection, ReconnectingConnection};
pub use model::{Argument, CommandDefinition, CommandModel, PlayerList};
pub use cache::{CacheStore, ServerKey};
pub use discovery::{BackgroundRefresher, CompletionState, Discovery};
pub use completer::Completer;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mcrcon
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
