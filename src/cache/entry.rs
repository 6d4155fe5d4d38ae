//! Cache entry definitions
//!
//! The on-disk JSON form of a command model.
//!
//! ```json
//! {
//!   "version": 1,
//!   "fetched_at": 1760000000000,
//!   "commands": {
//!     "ban": {
//!       "aliases": ["minecraft:ban"],
//!       "arguments": [{"type": "Required", "name": "player"}],
//!       "usage": "/ban <player> [reason]"
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{Argument, CommandDefinition, CommandModel};

/// Just enough of a cache file to check its version
#[derive(Debug, Deserialize)]
pub struct VersionHeader {
    pub version: u32,
}

/// A whole cache file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Model layout version
    pub version: u32,

    /// When discovery finished (unix millis)
    #[serde(default)]
    pub fetched_at: u64,

    /// Commands keyed by canonical name
    pub commands: BTreeMap<String, CachedCommand>,
}

/// One command as stored on disk (the name is the map key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedCommand {
    #[serde(default)]
    pub aliases: BTreeSet<String>,

    #[serde(default)]
    pub arguments: Vec<Argument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl From<&CommandModel> for CacheEntry {
    fn from(model: &CommandModel) -> Self {
        let commands = model
            .commands
            .iter()
            .map(|(name, def)| {
                let cached = CachedCommand {
                    aliases: def.aliases.clone(),
                    arguments: def.arguments.clone(),
                    usage: def.usage.clone(),
                };
                (name.clone(), cached)
            })
            .collect();

        Self {
            version: model.version,
            fetched_at: model.fetched_at,
            commands,
        }
    }
}

impl From<CacheEntry> for CommandModel {
    fn from(entry: CacheEntry) -> Self {
        let commands = entry
            .commands
            .into_iter()
            .map(|(name, cached)| {
                let definition = CommandDefinition {
                    name: name.clone(),
                    aliases: cached.aliases,
                    arguments: cached.arguments,
                    usage: cached.usage,
                };
                (name, definition)
            })
            .collect();

        Self {
            version: entry.version,
            commands,
            fetched_at: entry.fetched_at,
        }
    }
}
