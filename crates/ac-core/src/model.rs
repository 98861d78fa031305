//! Domain records: activities, events, completions, students.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CurriculumPolicy;

/// A record of something a student did that may earn complementary-activity
/// credit.
///
/// `duration`'s semantics depend on the category's declared base unit: hours
/// for hour-denominated categories, an instance count otherwise. The credit
/// calculator measures elapsed time from `start`/`end` for hour-based rules
/// and counts the record itself as one instance for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Responsible party or institution, free text.
    #[serde(default)]
    pub responsible: String,
    /// Declared magnitude; see the type-level docs for semantics.
    #[serde(default)]
    pub duration: f64,
    /// Name of the category this activity falls under, resolved against the
    /// catalog at calculation time. Absent means the activity earns nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Activity {
    /// Elapsed duration in fractional hours, 0 when `end` is absent or
    /// precedes `start`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn elapsed_hours(&self) -> f64 {
        self.end.map_or(0.0, |end| {
            let seconds = (end - self.start).num_seconds();
            if seconds <= 0 {
                0.0
            } else {
                seconds as f64 / 3600.0
            }
        })
    }
}

/// A curated real-world happening grouping activities, with a unique slug
/// used for routing.
///
/// Activities are shared by id reference; an event never owns its activities
/// exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub activity_ids: Vec<u64>,
}

/// Links a student to an activity they completed.
///
/// At most one completion may exist per (student, activity) pair; the data
/// layer rejects duplicates as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedActivity {
    pub student_id: u64,
    pub activity_id: u64,
    /// Proof-of-completion reference (filename or URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDate>,
}

/// A student identity and the curriculum policy governing their credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    /// Institutional registration number (matrícula).
    pub registration: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub policy: CurriculumPolicy,
}
