//! Pipeline Tests
//!
//! Discovery against a scripted executor.

use std::collections::HashMap;

use mcrcon::discovery::{fetch_player_list, group_by_canonical, Discovery, DiscoveryState};
use mcrcon::{Argument, CommandExecutor, RconError, Result};

/// Answers from a fixed table and records what was asked
#[derive(Default)]
struct ScriptedExecutor {
    responses: HashMap<String, String>,
    fail_on: Option<String>,
    executed: Vec<String>,
}

impl ScriptedExecutor {
    fn respond(mut self, command: &str, text: &str) -> Self {
        self.responses.insert(command.to_string(), text.to_string());
        self
    }

    fn fail_on(mut self, command: &str) -> Self {
        self.fail_on = Some(command.to_string());
        self
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(&mut self, command: &str) -> Result<String> {
        self.executed.push(command.to_string());
        if self.fail_on.as_deref() == Some(command) {
            return Err(RconError::Connection("link dropped".to_string()));
        }
        Ok(self
            .responses
            .get(command)
            .cloned()
            .unwrap_or_else(|| "Unknown command".to_string()))
    }
}

fn two_page_server() -> ScriptedExecutor {
    ScriptedExecutor::default()
        .respond(
            "?",
            "--------- Help: Index (1/2) ---------\n\
             Bukkit: All commands for Bukkit\n\
             /tp: Teleports a player\n\
             /minecraft:tp: A Mojang provided command.\n",
        )
        .respond(
            "? 2",
            "--------- Help: Index (2/2) ---------\n\
             /ban: Bans a player\n",
        )
        .respond(
            "? tp",
            "--------- Help: /tp ---------\n\
             Description: Teleports a player\n\
             Usage: /tp <player> [target]\n\
             Aliases: tele, etele\n",
        )
        .respond("? ban", "Usage: /ban <player> [reason]")
}

// =============================================================================
// Discovery Tests
// =============================================================================

#[test]
fn test_new_pipeline_is_idle() {
    assert_eq!(Discovery::new("?").state(), DiscoveryState::Idle);
}

#[test]
fn test_discovers_all_pages_and_details() {
    let mut executor = two_page_server();
    let mut discovery = Discovery::new("?");

    let model = discovery.run(&mut executor).unwrap();

    assert_eq!(discovery.state(), DiscoveryState::Complete);
    assert_eq!(model.names().collect::<Vec<_>>(), vec!["ban", "tp"]);
    assert_eq!(executor.executed, vec!["?", "? 2", "? ban", "? tp"]);
    assert!(model.fetched_at > 0);

    let tp = model.get("tp").unwrap();
    assert!(tp.aliases.contains("minecraft:tp"));
    assert!(tp.aliases.contains("tele"));
    assert!(tp.aliases.contains("etele"));
    assert_eq!(
        tp.arguments,
        vec![
            Argument::Required {
                name: "player".to_string()
            },
            Argument::Optional {
                name: "target".to_string()
            },
        ]
    );
    assert_eq!(tp.usage.as_deref(), Some("/tp <player> [target]"));
}

#[test]
fn test_namespaced_only_entry_queries_bare_name() {
    let mut executor = ScriptedExecutor::default()
        .respond("?", "/minecraft:kill: Kills entities")
        .respond("? kill", "Usage: /kill [<targets>]");
    let mut discovery = Discovery::new("?");

    let model = discovery.run(&mut executor).unwrap();

    assert_eq!(executor.executed, vec!["?", "? kill"]);
    let kill = model.resolve("minecraft:kill").unwrap();
    assert_eq!(kill.name, "kill");
    assert_eq!(kill.arguments.len(), 1);
}

#[test]
fn test_formatting_codes_are_stripped() {
    let mut executor = ScriptedExecutor::default()
        .respond("?", "\u{a7}e--------- \u{a7}fHelp: Index (1/1)\n\u{a7}6/seed\u{a7}f: Shows the seed")
        .respond("? seed", "\u{a7}6Usage: \u{a7}f/seed");
    let mut discovery = Discovery::new("?");

    let model = discovery.run(&mut executor).unwrap();

    assert_eq!(model.names().collect::<Vec<_>>(), vec!["seed"]);
}

#[test]
fn test_failure_moves_to_failed() {
    let mut executor = two_page_server().fail_on("? 2");
    let mut discovery = Discovery::new("?");

    let result = discovery.run(&mut executor);

    assert!(matches!(result, Err(RconError::Connection(_))));
    assert_eq!(discovery.state(), DiscoveryState::Failed);
    assert_eq!(executor.executed, vec!["?", "? 2"]);
}

#[test]
fn test_vanilla_listing_fallback() {
    let mut executor = ScriptedExecutor::default().respond(
        "help",
        "/ban <targets> [<reason>]/banlist (ips|players)/tell <targets> <message>/msg -> tell",
    );
    let mut discovery = Discovery::new("help");

    let model = discovery.run(&mut executor).unwrap();

    assert_eq!(executor.executed, vec!["help"]);
    assert_eq!(model.len(), 3);
    assert_eq!(model.resolve("msg").unwrap().name, "tell");
    assert_eq!(discovery.state(), DiscoveryState::Complete);
}

#[test]
fn test_server_without_help_gives_empty_model() {
    let mut executor = ScriptedExecutor::default();
    let mut discovery = Discovery::new("?");

    let model = discovery.run(&mut executor).unwrap();

    assert!(model.is_empty());
    assert_eq!(discovery.state(), DiscoveryState::Complete);
}

#[test]
fn test_group_by_canonical() {
    let names: Vec<String> = ["tp", "minecraft:tp", "essentials:TP", "ban"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let grouped = group_by_canonical(&names);

    assert_eq!(grouped.len(), 2);
    let tp: Vec<&str> = grouped["tp"].iter().map(String::as_str).collect();
    assert_eq!(tp, vec!["essentials:tp", "minecraft:tp", "tp"]);
}

// =============================================================================
// Player List Tests
// =============================================================================

#[test]
fn test_fetch_player_list() {
    let mut executor = ScriptedExecutor::default().respond(
        "list",
        "There are 2 of a max of 20 players online: \u{a7}aAlice\u{a7}r, Bob",
    );

    let players = fetch_player_list(&mut executor, "list").unwrap();

    assert_eq!(players.players().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
}
