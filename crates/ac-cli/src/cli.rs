//! Command-line argument definitions.

use std::path::PathBuf;

use ac_core::CurriculumPolicy;
use clap::{Parser, Subcommand};

/// Complementary-activity (AC) credit tracker.
///
/// Tracks student activities, converts them into credited hours under the
/// old and new curriculum rules, and searches the event catalog.
#[derive(Debug, Parser)]
#[command(name = "ac", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the category catalog and its credit rules.
    Catalog {
        /// Show rules for one curriculum policy only.
        #[arg(long)]
        policy: Option<CurriculumPolicy>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Register a single activity.
    Register {
        /// Activity name.
        #[arg(long)]
        name: String,

        /// Start timestamp (RFC 3339, or YYYY-MM-DD for midnight UTC).
        #[arg(long)]
        start: String,

        /// End timestamp (same formats as --start).
        #[arg(long)]
        end: Option<String>,

        /// Declared magnitude (hours or instance count, per category).
        #[arg(long, default_value_t = 0.0)]
        duration: f64,

        /// Category name, resolved against the catalog.
        #[arg(long)]
        category: Option<String>,

        /// Responsible party or institution.
        #[arg(long, default_value = "")]
        responsible: String,

        /// Free-text description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Bulk-import activities from a directory of certificate JSON files.
    Import {
        /// Directory containing certificate manifests.
        dir: PathBuf,
    },

    /// Record that a student completed an activity.
    Complete {
        /// Student registration number.
        #[arg(long)]
        student: String,

        /// Activity id.
        #[arg(long)]
        activity: u64,

        /// Proof-of-completion reference (filename or URL).
        #[arg(long)]
        proof: Option<String>,

        /// Completion date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },

    /// Manage and search the event catalog.
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },

    /// Credited-hours report for a student.
    Report {
        /// Student registration number.
        #[arg(long)]
        student: String,

        /// Override the student's curriculum policy.
        #[arg(long)]
        policy: Option<CurriculumPolicy>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage student records.
    Students {
        #[command(subcommand)]
        action: StudentsAction,
    },
}

/// Event catalog subcommands.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// Search events with optional filters.
    Search {
        /// Substring match against event name or description.
        #[arg(long)]
        search: Option<String>,

        /// Only events starting on or after this date.
        #[arg(long)]
        after: Option<String>,

        /// Only events ending on or before this date.
        #[arg(long)]
        before: Option<String>,

        /// Substring match against event location.
        #[arg(long)]
        location: Option<String>,

        /// Per-activity credited-hours lower bound.
        #[arg(long)]
        min_hours: Option<String>,

        /// Per-activity credited-hours upper bound.
        #[arg(long)]
        max_hours: Option<String>,

        /// Category include-set (repeatable).
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Category exclude-set (repeatable).
        #[arg(long = "exclude-category")]
        exclude_categories: Vec<String>,

        /// Curriculum policy governing the hour bounds.
        #[arg(long, default_value_t = CurriculumPolicy::New)]
        policy: CurriculumPolicy,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add an event grouping existing activities.
    Add {
        /// URL-safe slug, unique across events.
        #[arg(long)]
        slug: String,

        /// Event name.
        #[arg(long)]
        name: String,

        /// Free-text description.
        #[arg(long, default_value = "")]
        description: String,

        /// Venue or campus, free text.
        #[arg(long, default_value = "")]
        location: String,

        /// First day of the event (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// Last day of the event (YYYY-MM-DD).
        #[arg(long)]
        end: String,

        /// Ids of activities the event comprises (repeatable).
        #[arg(long = "activity")]
        activity_ids: Vec<u64>,
    },
}

/// Student management subcommands.
#[derive(Debug, Subcommand)]
pub enum StudentsAction {
    /// List registered students.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a student.
    Add {
        /// Full name.
        #[arg(long)]
        name: String,

        /// Registration number (matrícula).
        #[arg(long)]
        registration: String,

        /// Contact email.
        #[arg(long, default_value = "")]
        email: String,

        /// Curriculum policy governing the student's credits.
        #[arg(long, default_value_t = CurriculumPolicy::New)]
        policy: CurriculumPolicy,
    },
}
