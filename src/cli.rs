//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to targets and the store.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_create_summary, format_status_json, format_status_text};
pub use route::RunContext;
