//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, ResolveError};

/// Map domain errors to a string for CLI output.
///
/// Resolution failures also get the dependency chain that led to them.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Resolve(err) => format_resolve_error(err),
        _ => e.to_string(),
    }
}

fn format_resolve_error(err: &ResolveError) -> String {
    let chain = err.chain();
    if chain.len() < 2 {
        return err.report();
    }
    format!("{}\n  via: {}", err.report(), chain.join(" -> "))
}
