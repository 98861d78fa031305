//! Event search: a multi-criteria filter over the event collection.
//!
//! Filtering is a sequential narrowing pipeline (text, dates, location,
//! activity composition). Every stage is an independent predicate, so the
//! order only matches the natural evaluation order; the result set is the
//! same regardless. Input order is preserved and inputs are never mutated.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::calculator::CreditCalculator;
use crate::catalog::CategoryCatalog;
use crate::model::{Activity, Event};
use crate::types::CurriculumPolicy;

/// A fully parsed filter specification. Empty filter = match everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventFilter {
    /// Case-insensitive substring match against event name or description.
    pub search_term: Option<String>,
    /// Event matches when its own start date is on or after this day.
    pub start_date: Option<NaiveDate>,
    /// Event matches when its own end date is on or before this day.
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring match against event location.
    pub location: Option<String>,
    /// Per-activity credited-hours lower bound; absent means unbounded.
    pub min_hours: Option<f64>,
    /// Per-activity credited-hours upper bound; absent means unbounded.
    pub max_hours: Option<f64>,
    /// Lowercased category include-set; empty means no inclusion restriction.
    pub categories: HashSet<String>,
    /// Lowercased category exclude-set; an excluded activity can never
    /// contribute a match.
    pub exclude_categories: HashSet<String>,
    /// Which curriculum's rules govern the hour bounds.
    pub policy: CurriculumPolicy,
}

/// Unvalidated filter input as it arrives from a form or command line.
///
/// Conversion to [`EventFilter`] is lenient: a criterion that fails to parse
/// is dropped (with a diagnostic) rather than failing the whole query.
#[derive(Debug, Clone, Default)]
pub struct RawFilter {
    pub search_term: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub min_hours: Option<String>,
    pub max_hours: Option<String>,
    pub categories: Vec<String>,
    pub exclude_categories: Vec<String>,
    pub policy: CurriculumPolicy,
}

impl EventFilter {
    /// Builds a filter from raw text input, coercing malformed criteria to
    /// "not applied".
    #[must_use]
    pub fn from_raw(raw: RawFilter) -> Self {
        Self {
            search_term: raw.search_term.filter(|s| !s.is_empty()),
            start_date: raw.start_date.as_deref().and_then(parse_date_filter),
            end_date: raw.end_date.as_deref().and_then(parse_date_filter),
            location: raw.location.filter(|s| !s.is_empty()),
            min_hours: raw.min_hours.as_deref().and_then(parse_hours_filter),
            max_hours: raw.max_hours.as_deref().and_then(parse_hours_filter),
            categories: lowercase_set(raw.categories),
            exclude_categories: lowercase_set(raw.exclude_categories),
            policy: raw.policy,
        }
    }

    /// True when any activity-composition criterion is present.
    #[must_use]
    pub fn has_composition_criteria(&self) -> bool {
        !self.categories.is_empty()
            || !self.exclude_categories.is_empty()
            || self.min_hours.is_some()
            || self.max_hours.is_some()
    }
}

fn lowercase_set(names: Vec<String>) -> HashSet<String> {
    names
        .into_iter()
        .filter(|n| !n.is_empty())
        .map(|n| n.to_lowercase())
        .collect()
}

/// Parses a day-granularity date filter, `YYYY-MM-DD` or RFC 3339.
fn parse_date_filter(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    tracing::warn!(input, "unparseable date filter, ignoring");
    None
}

/// Parses an hour-bound filter; non-numeric input means "no bound".
fn parse_hours_filter(input: &str) -> Option<f64> {
    if input.is_empty() {
        return None;
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::warn!(input, "non-numeric hour bound, ignoring");
            None
        }
    }
}

/// Pure event filter over injected activity and catalog collections.
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine<'a> {
    calculator: CreditCalculator<'a>,
    activities: &'a [Activity],
}

impl<'a> FilterEngine<'a> {
    #[must_use]
    pub const fn new(catalog: &'a CategoryCatalog, activities: &'a [Activity]) -> Self {
        Self {
            calculator: CreditCalculator::new(catalog),
            activities,
        }
    }

    /// Returns the events matching the filter, preserving input order.
    #[must_use]
    pub fn filter_events(&self, events: &[Event], filter: &EventFilter) -> Vec<Event> {
        let mut matched: Vec<Event> = events.to_vec();

        if let Some(term) = filter.search_term.as_deref() {
            let needle = term.to_lowercase();
            matched.retain(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.description.to_lowercase().contains(&needle)
            });
        }

        if let Some(start) = filter.start_date {
            matched.retain(|e| e.start_date >= start);
        }

        if let Some(end) = filter.end_date {
            matched.retain(|e| e.end_date <= end);
        }

        if let Some(location) = filter.location.as_deref() {
            let needle = location.to_lowercase();
            matched.retain(|e| e.location.to_lowercase().contains(&needle));
        }

        if filter.has_composition_criteria() {
            matched.retain(|e| {
                e.activity_ids
                    .iter()
                    .filter_map(|id| self.activities.iter().find(|a| a.id == *id))
                    .any(|a| self.activity_matches(a, filter))
            });
        }

        matched
    }

    /// Whether one activity satisfies every composition criterion.
    ///
    /// The exclude check runs before the include check: an excluded activity
    /// is vetoed outright, never reconsidered for inclusion.
    fn activity_matches(&self, activity: &Activity, filter: &EventFilter) -> bool {
        let Some(category) = activity.category.as_deref() else {
            return false;
        };
        let lowered = category.to_lowercase();

        if filter.exclude_categories.contains(&lowered) {
            return false;
        }
        if !filter.categories.is_empty() && !filter.categories.contains(&lowered) {
            return false;
        }

        let hours = self.calculator.credited_hours(activity, filter.policy);
        let min = filter.min_hours.unwrap_or(f64::NEG_INFINITY);
        let max = filter.max_hours.unwrap_or(f64::INFINITY);
        hours >= min && hours <= max
    }
}
