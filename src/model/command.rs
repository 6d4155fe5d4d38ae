//! Command definitions
//!
//! Commands keyed by their canonical (bare, lowercase) name.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use super::Argument;

/// Version of the model layout; caches written under another version are ignored
pub const MODEL_VERSION: u32 = 1;

/// Strip a `namespace:` prefix and lowercase
///
/// `minecraft:Teleport` → `teleport`. Names without a namespace, or with
/// nothing after the colon, are only lowercased.
pub fn canonical_name(name: &str) -> String {
    let bare = match name.split_once(':') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => name,
    };
    bare.to_lowercase()
}

/// One command the server accepts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDefinition {
    /// Canonical name (lowercase, no namespace)
    pub name: String,

    /// Other tokens that invoke the same command, namespaced forms included
    pub aliases: BTreeSet<String>,

    /// Positional arguments in usage order
    pub arguments: Vec<Argument>,

    /// Raw usage text as the server printed it
    pub usage: Option<String>,
}

impl CommandDefinition {
    /// Create a definition with no arguments or aliases
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            ..Self::default()
        }
    }

    /// Set the argument list
    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Record an alternate invocation token
    ///
    /// Tokens are lowercased; the command's own name and empty tokens are
    /// ignored.
    pub fn add_alias(&mut self, alias: &str) {
        let alias = alias.trim().trim_start_matches('/').to_lowercase();
        if !alias.is_empty() && alias != self.name {
            self.aliases.insert(alias);
        }
    }

    /// Whether `token` invokes this command (case-insensitive)
    pub fn answers_to(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        token == self.name || self.aliases.contains(&token)
    }

    /// Fold another definition of the same command into this one
    ///
    /// Aliases are unioned. Arguments and usage are only taken from `other`
    /// when this definition has none.
    fn merge(&mut self, other: CommandDefinition) {
        self.aliases.extend(other.aliases);
        self.aliases.remove(&self.name);
        if self.arguments.is_empty() {
            self.arguments = other.arguments;
        }
        if self.usage.is_none() {
            self.usage = other.usage;
        }
    }
}

/// Every command discovered on one server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandModel {
    /// Layout version, see [`MODEL_VERSION`]
    pub version: u32,

    /// Definitions keyed by canonical name
    pub commands: BTreeMap<String, CommandDefinition>,

    /// When discovery finished (unix millis), 0 if never stamped
    pub fetched_at: u64,
}

impl Default for CommandModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandModel {
    /// Create an empty model at the current version
    pub fn new() -> Self {
        Self {
            version: MODEL_VERSION,
            commands: BTreeMap::new(),
            fetched_at: 0,
        }
    }

    /// Add a definition, merging with an existing one of the same name
    pub fn insert(&mut self, definition: CommandDefinition) {
        match self.commands.get_mut(&definition.name) {
            Some(existing) => existing.merge(definition),
            None => {
                self.commands.insert(definition.name.clone(), definition);
            }
        }
    }

    /// Look up by canonical name only
    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(&name.to_lowercase())
    }

    /// Look up by name, namespaced name, or alias (case-insensitive)
    ///
    /// Canonical names win over aliases when both match.
    pub fn resolve(&self, token: &str) -> Option<&CommandDefinition> {
        let token = token.trim_start_matches('/').to_lowercase();
        self.commands
            .get(&token)
            .or_else(|| self.commands.get(&canonical_name(&token)))
            .or_else(|| self.commands.values().find(|def| def.aliases.contains(&token)))
    }

    /// Canonical names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Every token that invokes some command: names and aliases
    pub fn invocations(&self) -> impl Iterator<Item = &str> {
        self.commands.values().flat_map(|def| {
            std::iter::once(def.name.as_str()).chain(def.aliases.iter().map(String::as_str))
        })
    }

    /// Number of distinct commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Record the current time as the fetch time
    pub fn stamp(&mut self) {
        self.fetched_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
    }
}
