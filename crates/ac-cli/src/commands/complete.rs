//! Complete command: record that a student finished an activity.

use ac_core::CompletedActivity;
use ac_db::Store;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

/// Runs the complete command.
pub fn run(
    store: &Store,
    registration: &str,
    activity_id: u64,
    proof: Option<String>,
    date: Option<&str>,
) -> Result<()> {
    let Some(student) = store
        .find_student(registration)
        .context("failed to load students")?
    else {
        bail!("no student with registration '{registration}'");
    };

    let activities = store.load_activities().context("failed to load activities")?;
    if !activities.iter().any(|a| a.id == activity_id) {
        bail!("no activity with id {activity_id}");
    }

    let completed_at = date
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .with_context(|| format!("invalid completion date '{d}' (expected YYYY-MM-DD)"))
        })
        .transpose()?;

    let inserted = store
        .add_completion(CompletedActivity {
            student_id: student.id,
            activity_id,
            proof,
            completed_at,
        })
        .context("failed to store completion")?;

    if inserted {
        println!("Recorded completion of activity {activity_id} for {registration}");
    } else {
        println!("Completion already recorded");
    }
    Ok(())
}
