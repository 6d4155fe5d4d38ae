//! Published completion state
//!
//! The background refresher replaces these snapshots wholesale; readers take
//! an `Arc` to whichever snapshot is current and never see a half-built one.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::model::{CommandModel, PlayerList};

/// Latest command model and player list, shared across threads
///
/// Loads are lock-free; the interactive path never waits on the refresher.
pub struct CompletionState {
    commands: ArcSwap<CommandModel>,
    players: ArcSwap<PlayerList>,
}

impl Default for CompletionState {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionState {
    /// Start with an empty model and no players
    pub fn new() -> Self {
        Self::with_model(CommandModel::new())
    }

    /// Start from an existing model (usually one loaded from cache)
    pub fn with_model(model: CommandModel) -> Self {
        Self {
            commands: ArcSwap::from_pointee(model),
            players: ArcSwap::from_pointee(PlayerList::new()),
        }
    }

    /// Current command model
    pub fn commands(&self) -> Arc<CommandModel> {
        self.commands.load_full()
    }

    /// Current player list
    pub fn players(&self) -> Arc<PlayerList> {
        self.players.load_full()
    }

    /// Replace the command model
    pub fn publish_commands(&self, model: CommandModel) {
        self.commands.store(Arc::new(model));
    }

    /// Replace the player list
    pub fn publish_players(&self, players: PlayerList) {
        self.players.store(Arc::new(players));
    }
}
