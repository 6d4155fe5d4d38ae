//! Help text parser
//!
//! Turns the paginated, human-oriented help output of Bukkit-family servers
//! (and the flat usage listing of vanilla servers) into command models.
//!
//! Every function here is total: unrecognised lines are skipped and
//! malformed input yields partial or empty results. Callers strip
//! formatting codes first.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Argument, CommandDefinition, PlayerList};

// =============================================================================
// Patterns
// =============================================================================

/// `--------- Help: Index (1/58) ------`
static HELP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-+\s*Help:").expect("valid header pattern"));

/// `(page/total)`
static PAGE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)/(\d+)\)").expect("valid page count pattern"));

/// `/command: description` and `/namespace:command: description`
static INDEX_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?P<cmd>[^:\s]+(?::[^:\s]+)*):(?:\s+.*)?$").expect("valid index pattern")
});

/// `Minecraft: All commands for Minecraft`, `Aliases: Lists command aliases`
static CATEGORY_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w[\w-]*:\s*(?:All commands for |Lists )").expect("valid category pattern")
});

/// `Use /help [n] to get page n of help.`
static META_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Use /help ").expect("valid meta pattern"));

/// `Description: ...`, `Alias for /tp`
static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][\w ]*:|Alias for )").expect("valid label pattern")
});

/// Leading command token of a usage line, including the `/<command>` placeholder
static USAGE_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?(?:<command>|[^\s<\[(]+)(?:\s+(?P<args>.*))?$").expect("valid usage pattern")
});

/// `/msg -> tell`
static ALIAS_ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?P<alias>[\w:.-]+)\s*->\s*/?(?P<target>[\w:.-]+)\s*$")
        .expect("valid alias pattern")
});

/// `/command args...` in a vanilla listing
static LISTING_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?P<cmd>[\w:.-]+)(?P<args>.*)$").expect("valid listing pattern")
});

/// Leading status tags on player names: `[AFK]Steve`
static PLAYER_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[[^\]]*\]\s*)+").expect("valid tag pattern"));

/// Group name before the colon of a player-list line: `default`, `Mods`
static GROUP_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w .-]+$").expect("valid group pattern"));

/// All argument shapes in one alternation, scanned left to right
///
/// Alternatives are ordered most specific first:
/// - `(a|b)`            required choice
/// - `[<name>]`         optional (choice when it contains `|`)
/// - `[name]`, `[a|b]`  optional / optional choice
/// - `<name>`, `<a|b>`  required / required choice
static ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\((?P<paren>[^()]*\|[^()]*)\)",
        r"|\[<(?P<opt_angle>[^<>\[\]]+)>\]",
        r"|\[(?P<opt>[^<>\[\]]+)\]",
        r"|<(?P<req>[^<>]+)>",
    ))
    .expect("valid argument pattern")
});

// =============================================================================
// Parsed Fragments
// =============================================================================

/// What one command's detail page says about it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHelp {
    /// Positional arguments, in usage order
    pub arguments: Vec<Argument>,

    /// Alternate invocation tokens from the `Aliases:` line
    pub aliases: Vec<String>,

    /// Raw usage text; wrapped or alternate forms joined by newlines
    pub usage: Option<String>,
}

impl CommandHelp {
    /// Whether nothing useful was recognised
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty() && self.aliases.is_empty()
    }
}

// =============================================================================
// Help Index
// =============================================================================

/// Total page count from a `(page/total)` header; 1 when absent
pub fn parse_page_count(text: &str) -> u32 {
    PAGE_COUNT
        .captures(text)
        .and_then(|caps| caps[2].parse::<u32>().ok())
        .filter(|&total| total > 0)
        .unwrap_or(1)
}

/// Command names listed on one help index page
///
/// Namespaced names (`minecraft:tell`) are returned verbatim.
pub fn parse_help_index(text: &str) -> Vec<String> {
    let mut commands = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty()
            || HELP_HEADER.is_match(line)
            || CATEGORY_ENTRY.is_match(line)
            || META_LINE.is_match(line)
        {
            continue;
        }

        match INDEX_ENTRY.captures(line) {
            Some(caps) => commands.push(caps["cmd"].to_string()),
            None => tracing::debug!("Unmatched index line: {:?}", line),
        }
    }

    commands
}

// =============================================================================
// Command Detail
// =============================================================================

/// Usage text collected while scanning a detail page
#[derive(Default)]
struct UsageScan {
    /// Raw usage lines
    raw: Vec<String>,

    /// Argument text of the first usage form, wrapped lines appended
    arguments: String,

    /// Whether the next unlabeled line may continue the usage
    open: bool,
}

impl UsageScan {
    /// A usage form: the first one supplies the arguments
    fn push_form(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if self.raw.is_empty() {
            self.arguments = strip_command_token(line).to_string();
        }
        self.raw.push(line.to_string());
    }

    /// Try to treat an unlabeled line as part of the open usage block
    fn continue_with(&mut self, line: &str) -> bool {
        if !self.open {
            return false;
        }
        if line.starts_with('/') {
            self.push_form(line);
            return true;
        }
        if ARGUMENT.is_match(line) {
            self.raw.push(line.to_string());
            self.arguments.push(' ');
            self.arguments.push_str(line);
            return true;
        }
        self.open = false;
        false
    }
}

/// Arguments, aliases and usage from a `? <command>` detail page
///
/// ```text
/// --------- Help: /teleport -----------------------------
/// Alias for /tp
/// Description: Teleport to a player.
/// Usage: /tp <player> [otherplayer]
/// Aliases: tele, etele, teleport, eteleport
/// ```
///
/// Without a `Usage:` line, the first line that starts with `/` or with an
/// argument bracket is taken as the usage (vanilla detail format).
pub fn parse_command_help(text: &str) -> CommandHelp {
    let mut usage = UsageScan::default();
    let mut fallback: Option<&str> = None;
    let mut aliases = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || HELP_HEADER.is_match(line) {
            usage.open = false;
            continue;
        }

        if let Some(rest) = line.strip_prefix("Usage:") {
            usage.push_form(rest.trim());
            usage.open = true;
            continue;
        }

        if let Some(rest) = line.strip_prefix("Aliases:") {
            aliases.extend(
                rest.split(',')
                    .map(|a| a.trim().trim_start_matches('/'))
                    .filter(|a| !a.is_empty())
                    .map(str::to_string),
            );
            usage.open = false;
            continue;
        }

        if LABEL_LINE.is_match(line) {
            usage.open = false;
            continue;
        }

        if usage.continue_with(line) {
            continue;
        }

        if fallback.is_none() && line.starts_with(['/', '<', '[', '(']) {
            fallback = Some(line);
        }
    }

    if usage.raw.is_empty() {
        if let Some(line) = fallback {
            usage.push_form(line);
        }
    }

    let help = CommandHelp {
        arguments: parse_arguments(&usage.arguments),
        aliases,
        usage: (!usage.raw.is_empty()).then(|| usage.raw.join("\n")),
    };

    if help.is_empty() {
        tracing::debug!("parse_command_help: no usage or aliases found");
    }
    help
}

/// Drop the leading command token of a usage line
///
/// `/tp <player>` → `<player>`; `<player>` is returned unchanged.
fn strip_command_token(usage: &str) -> &str {
    match USAGE_COMMAND.captures(usage) {
        Some(caps) => caps.name("args").map_or("", |m| m.as_str()),
        None => usage,
    }
}

/// Typed arguments in left-to-right order
///
/// One combined pattern drives a single scan, so output order matches
/// input order without sorting. Nested optionals are flattened first, so
/// `[<targets> [<reason>]]` yields two optional arguments.
pub fn parse_arguments(text: &str) -> Vec<Argument> {
    let text = flatten_optionals(text);
    ARGUMENT
        .captures_iter(&text)
        .filter_map(|caps| {
            if let Some(m) = caps.name("paren") {
                let options = split_options(m.as_str());
                (!options.is_empty()).then(|| Argument::required_choice(options))
            } else if let Some(m) = caps.name("opt_angle").or_else(|| caps.name("opt")) {
                optional_argument(m.as_str())
            } else {
                caps.name("req").and_then(|m| required_argument(m.as_str()))
            }
        })
        .collect()
}

/// Rewrite nested brackets as a run of sibling groups
///
/// `[a [b] c]` → `[a] [b] [c]`. Text outside brackets is untouched.
fn flatten_optionals(text: &str) -> String {
    let mut flat = String::with_capacity(text.len() + 8);
    let mut depth = 0usize;
    // An inner group just closed; the outer group's remainder needs a new `[`
    let mut reopen = false;

    for ch in text.chars() {
        match ch {
            '[' if depth > 0 => {
                if !reopen {
                    flat.truncate(flat.trim_end().len());
                    flat.push_str("] ");
                }
                flat.push('[');
                depth += 1;
                reopen = false;
            }
            '[' => {
                flat.push('[');
                depth = 1;
            }
            ']' if depth > 0 => {
                if !reopen {
                    flat.push(']');
                }
                depth -= 1;
                reopen = depth > 0;
            }
            _ => {
                if reopen && !ch.is_whitespace() {
                    flat.push('[');
                    reopen = false;
                }
                flat.push(ch);
            }
        }
    }

    flat
}

fn optional_argument(inner: &str) -> Option<Argument> {
    // `[(add|remove)]`
    let inner = inner.trim();
    let inner = inner
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(inner);
    let mut options = split_options(inner);
    match options.len() {
        0 => None,
        1 => options.pop().map(|name| Argument::Optional { name }),
        _ => Some(Argument::optional_choice(options)),
    }
}

fn required_argument(inner: &str) -> Option<Argument> {
    let mut options = split_options(inner);
    match options.len() {
        0 => None,
        1 => options.pop().map(|name| Argument::Required { name }),
        _ => Some(Argument::required_choice(options)),
    }
}

fn split_options(inner: &str) -> Vec<String> {
    inner
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Vanilla Usage Listing
// =============================================================================

/// Put each `/command` of a run-together listing on its own line
///
/// Vanilla servers answer `help` with every usage concatenated:
/// `/ban <targets> [<reason>]/banlist (ips|players)`.
pub fn split_concatenated_usage(text: &str) -> String {
    let mut fixed = String::with_capacity(text.len() + 64);
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        if ch == '/' && !matches!(prev, None | Some('\n') | Some('/')) {
            fixed.push('\n');
        }
        fixed.push(ch);
        prev = Some(ch);
    }

    fixed.trim().to_string()
}

/// Definitions from a flat usage listing
///
/// `/msg -> tell` lines become aliases of their target; an alias whose
/// target is not listed becomes a command of its own.
pub fn parse_usage_listing(text: &str) -> Vec<CommandDefinition> {
    let mut definitions: Vec<CommandDefinition> = Vec::new();
    let mut aliases: Vec<(String, String)> = Vec::new();

    for line in split_concatenated_usage(text).lines().map(str::trim) {
        if let Some(caps) = ALIAS_ARROW.captures(line) {
            aliases.push((caps["alias"].to_string(), caps["target"].to_lowercase()));
            continue;
        }

        if let Some(caps) = LISTING_ENTRY.captures(line) {
            let mut definition =
                CommandDefinition::new(&caps["cmd"]).with_arguments(parse_arguments(&caps["args"]));
            definition.usage = Some(line.to_string());
            definitions.push(definition);
        }
    }

    for (alias, target) in aliases {
        match definitions.iter_mut().find(|d| d.name == target) {
            Some(definition) => definition.add_alias(&alias),
            None => definitions.push(CommandDefinition::new(&alias)),
        }
    }

    definitions
}

// =============================================================================
// Player List
// =============================================================================

/// Online players from a `list` response
///
/// ```text
/// There are 3 out of maximum 20 players online.
/// default: Player1, Player2
/// admin: [AFK]Player3
/// ```
///
/// A vanilla summary with a trailing name list (`There are 2 of a max of 20
/// players online: Alice, Bob`) becomes the group `online`.
pub fn parse_player_list(text: &str) -> PlayerList {
    let mut list = PlayerList::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        let (group, names) = match line.split_once(':') {
            Some((head, names)) if head.starts_with("There are ") || head.starts_with("There is ") => {
                ("online", names)
            }
            Some((group, names)) => (group.trim(), names),
            None => continue,
        };

        // Chat or log lines such as `[12:00] server: hello`
        if !GROUP_HEAD.is_match(group) {
            continue;
        }

        let players: Vec<String> = names
            .split(',')
            .map(|name| PLAYER_TAGS.replace(name.trim(), "").trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if !players.is_empty() {
            list.push_group(group, players);
        }
    }

    list
}
