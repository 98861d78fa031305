//! Catalog command: list categories and their credit rules.

use std::fmt::Write;

use ac_core::{CalculationKind, Category, CategoryCatalog, CreditRule, CurriculumPolicy};
use anyhow::Result;

use super::report::format_hours;

/// One-line description of a credit rule.
fn format_rule(rule: &CreditRule) -> String {
    match rule.kind {
        CalculationKind::Fixed => format!(
            "{} flat, cap {}",
            format_hours(rule.credited_amount.unwrap_or(0.0)),
            format_hours(rule.max_credited_hours)
        ),
        CalculationKind::Proportional => {
            let base = rule.base_amount.unwrap_or(0.0);
            let unit = rule.base_unit.map_or("?", |u| u.as_str());
            format!(
                "{} per {base} {unit}, cap {}",
                format_hours(rule.credited_amount.unwrap_or(0.0)),
                format_hours(rule.max_credited_hours)
            )
        }
        CalculationKind::CommitteeDiscretion => {
            format!("committee discretion, cap {}", format_hours(rule.max_credited_hours))
        }
    }
}

/// Formats the catalog for human-readable output.
pub fn format_catalog(categories: &[Category], policy: Option<CurriculumPolicy>) -> String {
    let mut output = String::new();

    for category in categories {
        writeln!(output, "{}", category.name).unwrap();
        match policy {
            Some(p) => writeln!(output, "    {}", format_rule(category.rule_for(p))).unwrap(),
            None => {
                writeln!(output, "    old: {}", format_rule(&category.old)).unwrap();
                writeln!(output, "    new: {}", format_rule(&category.new)).unwrap();
            }
        }
    }

    output
}

/// Runs the catalog command.
pub fn run(policy: Option<CurriculumPolicy>, json: bool) -> Result<()> {
    let catalog = CategoryCatalog::builtin();

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.categories())?);
    } else {
        print!("{}", format_catalog(catalog.categories(), policy));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_catalog_shows_both_policies_by_default() {
        let catalog = CategoryCatalog::builtin();
        let output = format_catalog(catalog.categories(), None);
        assert!(output.contains("Hackathon"));
        assert!(output.contains("old: "));
        assert!(output.contains("new: "));
    }

    #[test]
    fn format_catalog_single_policy() {
        let catalog = CategoryCatalog::builtin();
        let output = format_catalog(catalog.categories(), Some(CurriculumPolicy::New));
        assert!(!output.contains("old: "));
        // Hackathon's new-curriculum rule: 2h per 4 hours, cap 34h.
        assert!(output.contains("2h per 4 hours, cap 34h"));
    }

    #[test]
    fn format_rule_committee() {
        let rule = CreditRule::committee(17.0);
        assert_eq!(format_rule(&rule), "committee discretion, cap 17h");
    }
}
