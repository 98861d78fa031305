//! Core enums shared across the credit calculation rules.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for catalog reference data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The credited-hours cap was negative.
    #[error("max credited hours must be >= 0, got {value}")]
    NegativeCap { value: f64 },

    /// A proportional rule had a non-positive base amount.
    #[error("proportional base amount must be > 0, got {value}")]
    NonPositiveBase { value: f64 },

    /// A proportional rule was missing one of its required fields.
    #[error("proportional rule for '{category}' is missing {field}")]
    MissingProportionalField {
        category: String,
        field: &'static str,
    },
}

/// Which curriculum's conversion rules govern a student's credits.
///
/// Every category carries one rule per policy; a student's policy flag
/// selects which rule applies to all of their completed activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurriculumPolicy {
    Old,
    #[default]
    New,
}

impl CurriculumPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }
}

impl fmt::Display for CurriculumPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CurriculumPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "old" => Ok(Self::Old),
            "new" => Ok(Self::New),
            _ => Err(format!("invalid curriculum policy: {s}")),
        }
    }
}

/// How a rule converts raw activity data into credited hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    /// A flat credited amount, independent of the activity's duration.
    Fixed,
    /// Credited hours scale with base units taken (see [`BaseUnit`]).
    Proportional,
    /// A human committee assigns the value out-of-band; computed value is 0.
    CommitteeDiscretion,
}

impl CalculationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Proportional => "proportional",
            Self::CommitteeDiscretion => "committee_discretion",
        }
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit a proportional rule's base amount is denominated in.
///
/// Only [`BaseUnit::Hours`] measures actual elapsed time. Every other unit
/// counts whole activity instances: one activity record is one presentation,
/// one organized event, one year of a program, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseUnit {
    Hours,
    Years,
    Months,
    Presentations,
    OrganizedEvents,
    MiniCourses,
    Lectures,
    /// Catch-all for unit strings this version does not know about.
    ///
    /// Deserialized leniently so a stale catalog file degrades to
    /// zero-credit rules instead of failing to load.
    #[serde(other)]
    Unknown,
}

impl BaseUnit {
    /// True when the unit measures elapsed time rather than instances.
    #[must_use]
    pub const fn is_hour_based(&self) -> bool {
        matches!(self, Self::Hours)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Years => "years",
            Self::Months => "months",
            Self::Presentations => "presentations",
            Self::OrganizedEvents => "organized_events",
            Self::MiniCourses => "mini_courses",
            Self::Lectures => "lectures",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BaseUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hours" | "hour" => Ok(Self::Hours),
            "years" | "year" => Ok(Self::Years),
            "months" | "month" => Ok(Self::Months),
            "presentations" | "presentation" => Ok(Self::Presentations),
            "organized_events" | "organized_event" => Ok(Self::OrganizedEvents),
            "mini_courses" | "mini_course" => Ok(Self::MiniCourses),
            "lectures" | "lecture" => Ok(Self::Lectures),
            _ => Err(format!("invalid base unit: {s}")),
        }
    }
}
