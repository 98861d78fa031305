//! Import command: bulk-load activities from certificate manifests.

use std::path::Path;

use ac_db::Store;
use anyhow::{Context, Result};

/// Runs the import command. Scans `dir` for certificate JSON files and
/// appends the parsed activities to the store under fresh ids.
pub fn run(store: &Store, dir: &Path) -> Result<()> {
    let imported = ac_core::scan_certificates(dir)
        .with_context(|| format!("failed to scan {}", dir.display()))?;

    if imported.is_empty() {
        println!("No certificates found in {}", dir.display());
        return Ok(());
    }

    let mut activities = store.load_activities().context("failed to load activities")?;
    let mut next_id = activities.iter().map(|a| a.id).max().unwrap_or(0) + 1;

    let count = imported.len();
    for mut activity in imported {
        activity.id = next_id;
        next_id += 1;
        activities.push(activity);
    }

    store
        .save_activities(&activities)
        .context("failed to store imported activities")?;

    println!("Imported {count} activities from {}", dir.display());
    Ok(())
}
