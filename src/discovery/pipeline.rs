//! Discovery pipeline
//!
//! Walks the server's paginated help and builds a [`CommandModel`].
//!
//! ```text
//! Idle ──▶ FetchingIndex ──▶ FetchingDetails ──▶ Complete
//!               │                   │
//!               └───────────────────┴──────────▶ Failed
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;
use crate::error::Result;
use crate::format::strip_formatting;
use crate::help::{
    parse_command_help, parse_help_index, parse_page_count, parse_player_list, parse_usage_listing,
};
use crate::model::{canonical_name, CommandDefinition, CommandModel, PlayerList};
use crate::network::CommandExecutor;

/// Where a discovery run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    FetchingIndex,
    FetchingDetails,
    Complete,
    Failed,
}

/// One discovery run against one executor
#[derive(Debug)]
pub struct Discovery {
    /// `?` on Bukkit-family servers, `help` on vanilla
    help_command: String,

    state: DiscoveryState,
}

impl Discovery {
    /// Create an idle pipeline that queries `help_command`
    pub fn new(help_command: impl Into<String>) -> Self {
        Self {
            help_command: help_command.into(),
            state: DiscoveryState::Idle,
        }
    }

    /// Create an idle pipeline using the configured help command
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.help_command.clone())
    }

    /// Current state
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Fetch every help page and command detail, and build the model
    ///
    /// Any executor error moves the pipeline to `Failed` and is returned.
    pub fn run<E>(&mut self, executor: &mut E) -> Result<CommandModel>
    where
        E: CommandExecutor + ?Sized,
    {
        match self.fetch(executor) {
            Ok(model) => {
                self.state = DiscoveryState::Complete;
                tracing::debug!("Discovery complete: {} commands", model.len());
                Ok(model)
            }
            Err(e) => {
                self.state = DiscoveryState::Failed;
                tracing::debug!("Discovery failed: {}", e);
                Err(e)
            }
        }
    }

    fn fetch<E>(&mut self, executor: &mut E) -> Result<CommandModel>
    where
        E: CommandExecutor + ?Sized,
    {
        // Step 1: Index pages
        self.state = DiscoveryState::FetchingIndex;

        let first_page = query(executor, &self.help_command)?;
        let total_pages = parse_page_count(&first_page);
        let mut names = parse_help_index(&first_page);
        tracing::debug!("Help page 1/{}: {} commands", total_pages, names.len());

        for page in 2..=total_pages {
            let text = query(executor, &format!("{} {}", self.help_command, page))?;
            let page_names = parse_help_index(&text);
            tracing::debug!("Help page {}/{}: {} commands", page, total_pages, page_names.len());
            names.extend(page_names);
        }

        // Vanilla servers print one flat usage listing instead of an index
        if names.is_empty() && total_pages == 1 {
            let listing = parse_usage_listing(&first_page);
            if !listing.is_empty() {
                tracing::debug!("No help index; using {} usage listing entries", listing.len());
                let mut model = CommandModel::new();
                listing.into_iter().for_each(|def| model.insert(def));
                model.stamp();
                return Ok(model);
            }
        }

        // Step 2: One detail query per canonical name
        self.state = DiscoveryState::FetchingDetails;

        let grouped = group_by_canonical(&names);
        tracing::debug!("{} index entries, {} distinct commands", names.len(), grouped.len());

        let mut model = CommandModel::new();
        for (name, variants) in grouped {
            let text = query(executor, &format!("{} {}", self.help_command, name))?;
            model.insert(definition_from_help(&name, &variants, &text));
        }

        model.stamp();
        Ok(model)
    }
}

/// Group index names under their canonical (bare, lowercase) name
///
/// `teleport` and `minecraft:teleport` both land under `teleport`.
pub fn group_by_canonical(names: &[String]) -> BTreeMap<String, BTreeSet<String>> {
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for name in names {
        grouped
            .entry(canonical_name(name))
            .or_default()
            .insert(name.to_lowercase());
    }
    grouped
}

/// Build a definition from a detail page and the index names that map to it
fn definition_from_help(name: &str, variants: &BTreeSet<String>, text: &str) -> CommandDefinition {
    let help = parse_command_help(text);
    tracing::trace!(
        "{}: {} arguments, {} aliases",
        name,
        help.arguments.len(),
        help.aliases.len()
    );

    let mut definition = CommandDefinition::new(name).with_arguments(help.arguments);
    definition.usage = help.usage;
    for alias in variants.iter().chain(help.aliases.iter()) {
        definition.add_alias(alias);
    }
    definition
}

/// Fetch and parse the online player list
pub fn fetch_player_list<E>(executor: &mut E, command: &str) -> Result<PlayerList>
where
    E: CommandExecutor + ?Sized,
{
    let players = parse_player_list(&query(executor, command)?);
    tracing::debug!("Player list: {} players", players.len());
    Ok(players)
}

/// Run a command and strip formatting from its response
fn query<E>(executor: &mut E, command: &str) -> Result<String>
where
    E: CommandExecutor + ?Sized,
{
    Ok(strip_formatting(&executor.execute(command)?))
}
