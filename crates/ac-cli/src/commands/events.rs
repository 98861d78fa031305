//! Events commands: maintain and search the event catalog.

use std::fmt::Write;

use ac_core::{CategoryCatalog, Event, EventFilter, FilterEngine, RawFilter};
use ac_db::Store;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use super::report::format_hours;

/// Arguments for adding one event.
#[derive(Debug)]
pub struct AddEventArgs {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub start: String,
    pub end: String,
    pub activity_ids: Vec<u64>,
}

/// Runs the events add command. Prints the assigned event id.
pub fn add(store: &Store, args: AddEventArgs) -> Result<()> {
    if args.slug.is_empty() || args.name.is_empty() {
        bail!("event slug and name cannot be empty");
    }

    let parse_day = |label: &str, input: &str| {
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .with_context(|| format!("invalid {label} date '{input}' (expected YYYY-MM-DD)"))
    };
    let start_date = parse_day("start", &args.start)?;
    let end_date = parse_day("end", &args.end)?;
    if end_date < start_date {
        bail!("event end date precedes its start date");
    }

    // Dangling ids are not fatal (the filter engine just skips them), but
    // they usually mean a typo'd --activity flag.
    let activities = store.load_activities().context("failed to load activities")?;
    for id in &args.activity_ids {
        if !activities.iter().any(|a| a.id == *id) {
            tracing::warn!(activity_id = id, "event references unknown activity");
        }
    }

    let slug = args.slug.clone();
    let added = store
        .add_event(Event {
            id: 0,
            slug: args.slug,
            name: args.name,
            description: args.description,
            location: args.location,
            start_date,
            end_date,
            activity_ids: args.activity_ids,
        })
        .context("failed to store event")?;

    match added {
        Some(id) => println!("Added event {id} ('{slug}')"),
        None => bail!("an event with slug '{slug}' already exists"),
    }
    Ok(())
}

/// Formats matching events for human-readable output.
pub fn format_events(events: &[Event]) -> String {
    let mut output = String::new();

    if events.is_empty() {
        writeln!(output, "No events match the given filters.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<4}  {:<30}  {:<23}  {:<20}  Activities",
        "ID", "Name", "When", "Location"
    )
    .unwrap();
    writeln!(
        output,
        "────  ──────────────────────────────  ───────────────────────  ────────────────────  ──────────"
    )
    .unwrap();

    for event in events {
        // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
        let name = if event.name.chars().count() > 30 {
            format!("{}...", event.name.chars().take(27).collect::<String>())
        } else {
            event.name.clone()
        };
        let when = format!("{} – {}", event.start_date, event.end_date);
        let location = if event.location.chars().count() > 20 {
            format!("{}...", event.location.chars().take(17).collect::<String>())
        } else {
            event.location.clone()
        };

        writeln!(
            output,
            "{:<4}  {:<30}  {:<23}  {:<20}  {}",
            event.id,
            name,
            when,
            location,
            event.activity_ids.len()
        )
        .unwrap();
    }

    output
}

/// Runs the events command.
pub fn run(store: &Store, raw: RawFilter, json: bool) -> Result<()> {
    let filter = EventFilter::from_raw(raw);
    tracing::debug!(?filter, "searching events");

    let activities = store.load_activities().context("failed to load activities")?;
    let events = store.load_events().context("failed to load events")?;

    let catalog = CategoryCatalog::builtin();
    let engine = FilterEngine::new(&catalog, &activities);
    let matched = engine.filter_events(&events, &filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&matched)?);
    } else {
        print!("{}", format_events(&matched));
        if filter.has_composition_criteria() {
            let bounds = match (filter.min_hours, filter.max_hours) {
                (Some(min), Some(max)) => {
                    format!(" with {}–{} credited", format_hours(min), format_hours(max))
                }
                (Some(min), None) => format!(" with at least {} credited", format_hours(min)),
                (None, Some(max)) => format!(" with at most {} credited", format_hours(max)),
                (None, None) => String::new(),
            };
            println!();
            println!(
                "Matched on activity composition under the {} curriculum{bounds}.",
                filter.policy
            );
        }
    }
    Ok(())
}
