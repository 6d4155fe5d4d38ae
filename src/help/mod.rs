//! Help Module
//!
//! Recognition of the server's free-text help and player list output.
//!
//! ## Formats
//! - Help index: `--- Help: Index (1/58) ---` header, `/name: description` entries
//! - Command detail: `Usage:`, `Aliases:` and `Description:` lines
//! - Vanilla listing: run-together `/name <args>` usages, `/a -> b` aliases
//! - Player list: `group: name, name` lines

mod parser;

pub use parser::{
    parse_arguments, parse_command_help, parse_help_index, parse_page_count, parse_player_list,
    parse_usage_listing, split_concatenated_usage, CommandHelp,
};
