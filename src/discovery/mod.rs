//! Discovery
//!
//! Learns a server's command set and online players so the shell can offer
//! completions.
//!
//! ## Components
//!
//! ```text
//! ┌──────────────────────┐   publish   ┌─────────────────┐   load   ┌───────────┐
//! │ BackgroundRefresher  │────────────▶│ CompletionState │◀─────────│ Completer │
//! │  (own thread + conn) │             │  (ArcSwap pair) │          └───────────┘
//! └──────────┬───────────┘             └─────────────────┘
//!            │ run
//!            ▼
//! ┌──────────────────────┐    save     ┌─────────────────┐
//! │ Discovery pipeline   │────────────▶│   CacheStore    │
//! └──────────────────────┘             └─────────────────┘
//! ```

mod pipeline;
mod refresher;
mod snapshot;

pub use pipeline::{fetch_player_list, group_by_canonical, Discovery, DiscoveryState};
pub use refresher::{BackgroundRefresher, RefreshEvent, EVENT_CAPACITY};
pub use snapshot::CompletionState;
