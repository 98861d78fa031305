//! Report command: credited hours for one student.
//!
//! This module implements `ac report`, the CLI rendition of the student
//! dashboard: total credited hours plus the per-category breakdown, under
//! the student's curriculum policy (or an explicit override).

use std::fmt::Write;

use ac_core::{CreditCalculator, CurriculumPolicy, Student};
use ac_db::Store;
use anyhow::{Context, Result, bail};
use serde::Serialize;

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub student: String,
    pub registration: String,
    pub policy: CurriculumPolicy,
    pub categories: Vec<CategoryHours>,
    pub total_hours: f64,
}

/// Credited hours contributed by one category.
#[derive(Debug, Serialize)]
pub struct CategoryHours {
    pub category: String,
    pub hours: f64,
}

/// Formats credited hours, dropping a trailing `.0`.
pub fn format_hours(hours: f64) -> String {
    if (hours - hours.trunc()).abs() < 1e-9 {
        format!("{hours:.0}h")
    } else {
        format!("{hours:.1}h")
    }
}

/// Builds report data for a student from the stored collections.
pub fn generate_report_data(
    store: &Store,
    student: &Student,
    policy: CurriculumPolicy,
) -> Result<ReportData> {
    let activities = store.load_activities().context("failed to load activities")?;
    let completions = store
        .load_completions()
        .context("failed to load completions")?;

    let catalog = ac_core::CategoryCatalog::builtin();
    let calculator = CreditCalculator::new(&catalog);

    let categories = calculator
        .credited_by_category(student.id, &completions, &activities, policy)
        .into_iter()
        .map(|(category, hours)| CategoryHours { category, hours })
        .collect::<Vec<_>>();
    let total_hours =
        calculator.total_credited_hours(student.id, &completions, &activities, policy);

    Ok(ReportData {
        student: student.name.clone(),
        registration: student.registration.clone(),
        policy,
        categories,
        total_hours,
    })
}

/// Formats the report for human-readable output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "AC REPORT — {} ({}), curriculum: {}",
        data.student, data.registration, data.policy
    )
    .unwrap();
    writeln!(output).unwrap();

    if data.categories.is_empty() {
        writeln!(output, "No completed activities recorded.").unwrap();
        return output;
    }

    for entry in &data.categories {
        writeln!(
            output,
            "{:<28}  {:>8}",
            entry.category,
            format_hours(entry.hours)
        )
        .unwrap();
    }
    writeln!(output, "{:<28}  {:>8}", "", "────────").unwrap();
    writeln!(output, "{:<28}  {:>8}", "Total", format_hours(data.total_hours)).unwrap();

    output
}

/// Runs the report command.
pub fn run(
    store: &Store,
    registration: &str,
    policy_override: Option<CurriculumPolicy>,
    json: bool,
) -> Result<()> {
    let Some(student) = store
        .find_student(registration)
        .context("failed to load students")?
    else {
        bail!("no student with registration '{registration}'");
    };

    let policy = policy_override.unwrap_or(student.policy);
    let data = generate_report_data(store, &student, policy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print!("{}", format_report(&data));
    }
    Ok(())
}
