//! Credit calculation: activity + curriculum policy -> credited hours.
//!
//! The calculator never fails for data gaps. A missing category, a category
//! the catalog does not know, or a misconfigured rule all degrade to zero
//! credited hours with a diagnostic, keeping the dashboard available while
//! bad catalog data stays discoverable in the logs.

use std::collections::BTreeMap;

use crate::catalog::CategoryCatalog;
use crate::model::{Activity, CompletedActivity};
use crate::rule::CreditRule;
use crate::types::{CalculationKind, CurriculumPolicy};

/// Pure credit-hours calculator over an injected category catalog.
#[derive(Debug, Clone, Copy)]
pub struct CreditCalculator<'a> {
    catalog: &'a CategoryCatalog,
}

impl<'a> CreditCalculator<'a> {
    #[must_use]
    pub const fn new(catalog: &'a CategoryCatalog) -> Self {
        Self { catalog }
    }

    /// Credited hours for one activity under one curriculum policy.
    ///
    /// Deterministic and side-effect free; the result is always within
    /// `[0, rule.max_credited_hours]`.
    #[must_use]
    pub fn credited_hours(&self, activity: &Activity, policy: CurriculumPolicy) -> f64 {
        let Some(name) = activity.category.as_deref() else {
            tracing::debug!(activity = activity.name, "activity has no category, 0 credit");
            return 0.0;
        };
        let Some(category) = self.catalog.find(name) else {
            tracing::warn!(
                activity = activity.name,
                category = name,
                "category not found in catalog, 0 credit"
            );
            return 0.0;
        };

        let rule = category.rule_for(policy);
        let raw = match rule.kind {
            CalculationKind::Fixed => rule.credited_amount.unwrap_or(0.0),
            // A committee assigns the value out-of-band; the cap is display-only.
            CalculationKind::CommitteeDiscretion => 0.0,
            CalculationKind::Proportional => proportional_hours(activity, rule, &category.name),
        };

        // max() before min() so a (validated-against, but possible in stale
        // data) negative cap cannot produce a negative result.
        raw.max(0.0).min(rule.max_credited_hours.max(0.0))
    }

    /// Sum of credited hours over every activity the student completed.
    ///
    /// Completions pointing at activity ids that no longer exist are skipped
    /// with a diagnostic.
    #[must_use]
    pub fn total_credited_hours(
        &self,
        student_id: u64,
        completions: &[CompletedActivity],
        activities: &[Activity],
        policy: CurriculumPolicy,
    ) -> f64 {
        self.completed_activities(student_id, completions, activities)
            .map(|activity| self.credited_hours(activity, policy))
            .sum()
    }

    /// Credited hours per category for the student's completed activities,
    /// in category-name order. Feeds the dashboard breakdown.
    #[must_use]
    pub fn credited_by_category(
        &self,
        student_id: u64,
        completions: &[CompletedActivity],
        activities: &[Activity],
        policy: CurriculumPolicy,
    ) -> Vec<(String, f64)> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for activity in self.completed_activities(student_id, completions, activities) {
            let hours = self.credited_hours(activity, policy);
            let label = activity
                .category
                .as_deref()
                .and_then(|name| self.catalog.find(name))
                .map_or_else(|| "(sem categoria)".to_string(), |c| c.name.clone());
            *totals.entry(label).or_insert(0.0) += hours;
        }
        totals.into_iter().collect()
    }

    fn completed_activities<'b>(
        &self,
        student_id: u64,
        completions: &'b [CompletedActivity],
        activities: &'b [Activity],
    ) -> impl Iterator<Item = &'b Activity> {
        completions
            .iter()
            .filter(move |c| c.student_id == student_id)
            .filter_map(move |c| {
                let found = activities.iter().find(|a| a.id == c.activity_id);
                if found.is_none() {
                    tracing::warn!(
                        activity_id = c.activity_id,
                        student_id,
                        "completion references missing activity, skipping"
                    );
                }
                found
            })
    }
}

/// Proportional formula: units taken over the base amount, times the
/// credited amount per base.
fn proportional_hours(activity: &Activity, rule: &CreditRule, category: &str) -> f64 {
    let (Some(base), Some(unit), Some(credited)) =
        (rule.base_amount, rule.base_unit, rule.credited_amount)
    else {
        tracing::warn!(category, "proportional rule missing fields, 0 credit");
        return 0.0;
    };
    if base <= 0.0 {
        tracing::warn!(category, base, "proportional rule has non-positive base, 0 credit");
        return 0.0;
    }

    let units = if unit.is_hour_based() {
        activity.elapsed_hours()
    } else if unit == crate::types::BaseUnit::Unknown {
        tracing::warn!(category, "unrecognized base unit, 0 credit");
        return 0.0;
    } else {
        // Per-instance units (presentations, years, months, ...): one
        // activity record counts as exactly one base unit regardless of its
        // actual span.
        1.0
    };

    (units / base) * credited
}
