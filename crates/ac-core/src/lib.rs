//! Core domain logic for the complementary-activity (AC) credit tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Credit calculation: converting activity records into credited hours
//!   under the old and new curriculum rules
//! - Event filtering: multi-criteria search over the event catalog
//! - Certificate import: bulk activity creation from certificate manifests

pub mod calculator;
pub mod catalog;
pub mod certificate;
pub mod filter;
pub mod model;
pub mod rule;
pub mod types;

pub use calculator::CreditCalculator;
pub use catalog::{Category, CategoryCatalog};
pub use certificate::{CertificateError, scan_certificates};
pub use filter::{EventFilter, FilterEngine, RawFilter};
pub use model::{Activity, CompletedActivity, Event, Student};
pub use rule::CreditRule;
pub use types::{BaseUnit, CalculationKind, CurriculumPolicy, ValidationError};
