//! Parser Tests
//!
//! Help index, command detail, usage listing and player list parsing.

use mcrcon::help::{
    parse_arguments, parse_command_help, parse_help_index, parse_page_count, parse_player_list,
    parse_usage_listing, split_concatenated_usage,
};
use mcrcon::Argument;

fn required(name: &str) -> Argument {
    Argument::Required {
        name: name.to_string(),
    }
}

fn optional(name: &str) -> Argument {
    Argument::Optional {
        name: name.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const INDEX_PAGE: &str = "\
--------- Help: Index (1/3) --------------------
Use /help [n] to get page n of help.
Aliases: Lists command aliases
Bukkit: All commands for Bukkit
/advancement: A Mojang provided command.
/minecraft:advancement: A Mojang provided command.
/ban: Bans a player.
//calculate: Evaluate a mathematical expression
/list:
";

// =============================================================================
// Index Tests
// =============================================================================

#[test]
fn test_page_count_from_header() {
    assert_eq!(parse_page_count(INDEX_PAGE), 3);
    assert_eq!(parse_page_count("--- Help: Index (12/58) ---"), 58);
}

#[test]
fn test_page_count_defaults_to_one() {
    assert_eq!(parse_page_count("no header here"), 1);
    assert_eq!(parse_page_count(""), 1);
    assert_eq!(parse_page_count("--- Help: Index (0/0) ---"), 1);
}

#[test]
fn test_help_index_skips_headers_categories_and_meta() {
    assert_eq!(
        parse_help_index(INDEX_PAGE),
        strings(&["advancement", "minecraft:advancement", "ban", "/calculate", "list"])
    );
}

#[test]
fn test_help_index_ignores_garbage() {
    assert!(parse_help_index("").is_empty());
    assert!(parse_help_index("Unknown command. Type \"/help\" for help.").is_empty());
}

// =============================================================================
// Argument Tests
// =============================================================================

#[test]
fn test_arguments_mixed_shapes_in_order() {
    assert_eq!(
        parse_arguments("<x> [y] (a|b)"),
        vec![
            required("x"),
            optional("y"),
            Argument::RequiredChoice {
                name: "a|b".to_string(),
                options: strings(&["a", "b"]),
            },
        ]
    );
}

#[test]
fn test_arguments_bracketed_angle_is_optional() {
    assert_eq!(
        parse_arguments("<targets> [<reason>]"),
        vec![required("targets"), optional("reason")]
    );
}

#[test]
fn test_arguments_nested_optionals_stay_optional() {
    assert_eq!(
        parse_arguments("<player> [<targets> [<reason>]]"),
        vec![required("player"), optional("targets"), optional("reason")]
    );
    assert_eq!(
        parse_arguments("[player [amount]]"),
        vec![optional("player"), optional("amount")]
    );
    assert_eq!(
        parse_arguments("[<item> [(add|remove) [<count>]]]"),
        vec![
            optional("item"),
            Argument::optional_choice(strings(&["add", "remove"])),
            optional("count"),
        ]
    );
}

#[test]
fn test_arguments_choices_inside_brackets() {
    assert_eq!(
        parse_arguments("[on|off] <survival|creative>"),
        vec![
            Argument::optional_choice(strings(&["on", "off"])),
            Argument::required_choice(strings(&["survival", "creative"])),
        ]
    );
}

#[test]
fn test_arguments_empty_and_unbracketed() {
    assert!(parse_arguments("").is_empty());
    assert!(parse_arguments("plain words only").is_empty());
    assert!(parse_arguments("<> []").is_empty());
}

// =============================================================================
// Detail Tests
// =============================================================================

#[test]
fn test_command_help_bukkit_detail() {
    let text = "\
--------- Help: /teleport -----------------------------
Alias for /tp
Description: Teleports a player.
Usage: /tp <player> [otherplayer]
Aliases: tele, etele, /eteleport
";

    let help = parse_command_help(text);

    assert_eq!(help.arguments, vec![required("player"), optional("otherplayer")]);
    assert_eq!(help.aliases, strings(&["tele", "etele", "eteleport"]));
    assert_eq!(help.usage.as_deref(), Some("/tp <player> [otherplayer]"));
}

#[test]
fn test_command_help_placeholder_command_token() {
    let help = parse_command_help("Usage: /<command> [kit] [player]");
    assert_eq!(help.arguments, vec![optional("kit"), optional("player")]);
}

#[test]
fn test_command_help_wrapped_usage_and_alternate_forms() {
    let text = "\
Usage: /give <player> <item>
[amount]
/give <player> <item> <amount> <data>
Description: Gives an item.
";

    let help = parse_command_help(text);

    assert_eq!(
        help.arguments,
        vec![required("player"), required("item"), optional("amount")]
    );
    assert_eq!(
        help.usage.as_deref(),
        Some("/give <player> <item>\n[amount]\n/give <player> <item> <amount> <data>")
    );
}

#[test]
fn test_command_help_without_usage_label() {
    let help = parse_command_help("<x> [y] (a|b)");

    assert_eq!(help.arguments.len(), 3);
    assert_eq!(help.arguments[0], required("x"));
    assert_eq!(help.usage.as_deref(), Some("<x> [y] (a|b)"));
}

#[test]
fn test_command_help_vanilla_detail() {
    let help = parse_command_help("/gamemode <gamemode> [<target>]");
    assert_eq!(help.arguments, vec![required("gamemode"), optional("target")]);
}

#[test]
fn test_command_help_nothing_recognised() {
    let help = parse_command_help("Unknown command. Type \"/help\" for help.");

    assert!(help.is_empty());
    assert!(help.usage.is_none());
}

// =============================================================================
// Usage Listing Tests
// =============================================================================

#[test]
fn test_split_concatenated_usage() {
    assert_eq!(
        split_concatenated_usage("/ban <targets> [<reason>]/banlist (ips|players)/list"),
        "/ban <targets> [<reason>]\n/banlist (ips|players)\n/list"
    );
    // Worldedit-style double slash stays together
    assert_eq!(split_concatenated_usage("//calc <expr>"), "//calc <expr>");
}

#[test]
fn test_usage_listing_with_alias_arrow() {
    let text = "/ban <targets> [<reason>]/banlist (ips|players)/tell <targets> <message>/msg -> tell/w -> tell";

    let definitions = parse_usage_listing(text);
    let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["ban", "banlist", "tell"]);

    let tell = &definitions[2];
    assert!(tell.aliases.contains("msg"));
    assert!(tell.aliases.contains("w"));
    assert_eq!(tell.arguments, vec![required("targets"), required("message")]);

    let banlist = &definitions[1];
    assert_eq!(banlist.arguments[0].options(), Some(&strings(&["ips", "players"])[..]));
}

#[test]
fn test_usage_listing_alias_without_target() {
    let definitions = parse_usage_listing("/tm -> teammsg");
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].name, "tm");
}

// =============================================================================
// Player List Tests
// =============================================================================

#[test]
fn test_player_list_grouped() {
    let text = "\
There are 3 out of maximum 20 players online.
default: Player1, Player2
admin: [AFK]Player3
";

    let list = parse_player_list(text);

    assert_eq!(list.len(), 3);
    assert_eq!(list.group("default"), Some(&strings(&["Player1", "Player2"])[..]));
    assert_eq!(list.group("admin"), Some(&strings(&["Player3"])[..]));
}

#[test]
fn test_player_list_vanilla_summary() {
    let list = parse_player_list("There are 2 of a max of 20 players online: Alice, Bob");

    assert_eq!(list.group("online"), Some(&strings(&["Alice", "Bob"])[..]));
    assert_eq!(list.players().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
}

#[test]
fn test_player_list_ignores_lines_that_are_not_groups() {
    let text = "\
[12:00] server: hello
<Steve> note: bring iron
Mods: Alex
";

    let list = parse_player_list(text);

    assert_eq!(list.len(), 1);
    assert_eq!(list.group("Mods"), Some(&strings(&["Alex"])[..]));
    assert!(parse_player_list("[12:00] server: hello").is_empty());
}

#[test]
fn test_player_list_nobody_online() {
    assert!(parse_player_list("There are 0 of a max of 20 players online: ").is_empty());
    assert!(parse_player_list("").is_empty());
}
