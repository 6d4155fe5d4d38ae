//! Tab completion over the published snapshots
//!
//! The completer only reads [`CompletionState`]; it never talks to the server.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::discovery::CompletionState;
use crate::model::Argument;

/// Commands handled by the shell itself rather than sent to the server
pub const LOCAL_COMMANDS: [&str; 3] = ["exit", "quit", "reconnect"];

/// Completes the word under the cursor at the end of an input line
pub struct Completer {
    state: Arc<CompletionState>,
}

impl Completer {
    pub fn new(state: Arc<CompletionState>) -> Self {
        Self { state }
    }

    /// Candidates for the last word of `line`, sorted and deduplicated
    ///
    /// The first word completes against command names, aliases and local
    /// commands. Later words complete against the matching argument's
    /// options, or online players when the argument names a player.
    pub fn complete(&self, line: &str) -> Vec<String> {
        let line = line.trim_start();
        let mut words: Vec<&str> = line.split_whitespace().collect();

        let current = if line.is_empty() || line.ends_with(char::is_whitespace) {
            ""
        } else {
            words.pop().unwrap_or("")
        };

        match words.split_first() {
            None => self.complete_command(current),
            Some((command, previous)) => self.complete_argument(command, previous.len(), current),
        }
    }

    fn complete_command(&self, word: &str) -> Vec<String> {
        let (slash, prefix) = match word.strip_prefix('/') {
            Some(rest) => ("/", rest),
            None => ("", word),
        };
        let prefix = prefix.to_lowercase();

        let model = self.state.commands();
        let mut candidates: BTreeSet<String> = model
            .invocations()
            .filter(|name| name.starts_with(&prefix))
            .map(|name| format!("{}{}", slash, name))
            .collect();

        if slash.is_empty() {
            candidates.extend(
                LOCAL_COMMANDS
                    .iter()
                    .filter(|name| name.starts_with(&prefix))
                    .map(|name| name.to_string()),
            );
        }

        candidates.into_iter().collect()
    }

    fn complete_argument(&self, command: &str, position: usize, word: &str) -> Vec<String> {
        let model = self.state.commands();
        let Some(argument) = model
            .resolve(command)
            .and_then(|def| def.arguments.get(position))
        else {
            return Vec::new();
        };

        let prefix = word.to_lowercase();

        let candidates: BTreeSet<String> = if let Some(options) = argument.options() {
            options
                .iter()
                .filter(|option| has_prefix(option, &prefix))
                .cloned()
                .collect()
        } else if names_player(argument) {
            let players = self.state.players();
            players
                .players()
                .filter(|name| has_prefix(name, &prefix))
                .map(str::to_string)
                .collect()
        } else {
            BTreeSet::new()
        };

        candidates.into_iter().collect()
    }
}

/// Case-insensitive prefix match; `prefix` is already lowercase
fn has_prefix(candidate: &str, prefix: &str) -> bool {
    candidate.to_lowercase().starts_with(prefix)
}

/// `<player>`, `[target]`, `<targets>` and the like
fn names_player(argument: &Argument) -> bool {
    let name = argument.name().to_lowercase();
    name.contains("player") || name.contains("target")
}
