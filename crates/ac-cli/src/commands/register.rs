//! Register command: add a single activity record.

use ac_core::{Activity, CategoryCatalog};
use ac_db::Store;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};

/// Arguments for registering one activity.
#[derive(Debug)]
pub struct RegisterArgs {
    pub name: String,
    pub start: String,
    pub end: Option<String>,
    pub duration: f64,
    pub category: Option<String>,
    pub responsible: String,
    pub description: Option<String>,
}

/// Parses a timestamp: RFC 3339, or a bare date meaning midnight UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .context("invalid midnight timestamp")?);
    }
    bail!("unparseable timestamp '{input}' (expected RFC 3339 or YYYY-MM-DD)");
}

/// Runs the register command. Prints the assigned activity id.
pub fn run(store: &Store, args: RegisterArgs) -> Result<()> {
    if args.name.is_empty() {
        bail!("activity name cannot be empty");
    }

    let start = parse_timestamp(&args.start)?;
    let end = args.end.as_deref().map(parse_timestamp).transpose()?;

    // A typo'd category is not an error (it just earns 0 credit), but it is
    // worth flagging at registration time while the user can still fix it.
    if let Some(name) = args.category.as_deref() {
        if CategoryCatalog::builtin().find(name).is_none() {
            tracing::warn!(category = name, "category not found in catalog, activity will earn 0 credit");
        }
    }

    let id = store
        .upsert_activity(Activity {
            id: 0,
            name: args.name,
            description: args.description,
            start,
            end,
            responsible: args.responsible,
            duration: args.duration,
            category: args.category,
        })
        .context("failed to store activity")?;

    println!("Registered activity {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_timestamp_rfc3339() {
        let ts = parse_timestamp("2025-05-10T08:00:00Z").unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2025, 5, 10, 8, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn parse_timestamp_bare_date_is_midnight_utc() {
        let ts = parse_timestamp("2025-05-10").unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("next tuesday").is_err());
    }

    #[test]
    fn register_assigns_sequential_ids() {
        let store = Store::open_in_memory().unwrap();
        let args = |name: &str| RegisterArgs {
            name: name.to_string(),
            start: "2025-05-10".to_string(),
            end: None,
            duration: 2.0,
            category: Some("Palestra".to_string()),
            responsible: String::new(),
            description: None,
        };

        run(&store, args("first")).unwrap();
        run(&store, args("second")).unwrap();

        let activities = store.load_activities().unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].id, 1);
        assert_eq!(activities[1].id, 2);
    }

    #[test]
    fn register_rejects_empty_name() {
        let store = Store::open_in_memory().unwrap();
        let args = RegisterArgs {
            name: String::new(),
            start: "2025-05-10".to_string(),
            end: None,
            duration: 0.0,
            category: None,
            responsible: String::new(),
            description: None,
        };
        assert!(run(&store, args).is_err());
    }
}
