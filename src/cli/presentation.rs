//! CLI presentation: render command results as text or JSON.

use crate::store::{FileState, FileStatus};
use crate::targets::CreateSummary;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_create_summary(summary: &CreateSummary) -> String {
    let mut out = format!(
        "Created target {} ({} assets resolved)\n",
        summary.target,
        summary.resolved.len()
    );
    for asset in &summary.assets {
        out.push_str(&format!("\n{} ({})\n", asset.name, asset.origin.as_str()));
        if asset.files.is_empty() {
            out.push_str("  (no files)\n");
        }
        for file in &asset.files {
            out.push_str(&format!("  {}\n", file));
        }
    }
    out
}

pub fn format_status_text(statuses: &[FileStatus]) -> String {
    if statuses.is_empty() {
        return "No files recorded.\n".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Asset", "Path", "State"]);
    for status in statuses {
        table.add_row(vec![
            status.asset.clone(),
            status.path.clone(),
            status.state.as_str().to_string(),
        ]);
    }

    let modified = count(statuses, FileState::Modified);
    let missing = count(statuses, FileState::Missing);
    format!(
        "{}\n\nTotal: {} files, {} modified, {} missing.\n",
        table,
        statuses.len(),
        modified,
        missing
    )
}

pub fn format_status_json(statuses: &[FileStatus]) -> String {
    let value = json!({
        "files": statuses,
        "modified": count(statuses, FileState::Modified),
        "missing": count(statuses, FileState::Missing),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

fn count(statuses: &[FileStatus], state: FileState) -> usize {
    statuses.iter().filter(|s| s.state == state).count()
}
