//! Bulk certificate import.
//!
//! Scans a directory of certificate manifests (one JSON file per
//! certificate) and turns them into activity records. Malformed files are
//! skipped with a diagnostic so one bad certificate never blocks a batch.

use std::path::Path;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::model::Activity;

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One certificate manifest as uploaded.
#[derive(Debug, Deserialize)]
struct CertificateFile {
    name: String,
    #[serde(default)]
    description: Option<String>,
    start: DateTime<Utc>,
    #[serde(default)]
    end: Option<DateTime<Utc>>,
    #[serde(default)]
    responsible: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    category: Option<String>,
}

impl CertificateFile {
    fn into_activity(self) -> Activity {
        Activity {
            // Placeholder; the caller assigns the real id on insert.
            id: 0,
            name: self.name,
            description: self.description,
            start: self.start,
            end: self.end,
            responsible: self.responsible,
            duration: self.duration,
            category: self.category,
        }
    }
}

/// Scans a directory for `.json` certificate manifests and parses them in
/// parallel.
///
/// Returns activities sorted by start time, with placeholder ids (0) for the
/// caller to assign. A missing directory yields an empty batch.
pub fn scan_certificates(dir: &Path) -> Result<Vec<Activity>, CertificateError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<std::path::PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "json") {
            paths.push(path);
        }
    }

    let mut activities: Vec<Activity> = paths
        .par_iter()
        .filter_map(|path| {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "unreadable certificate, skipping");
                    return None;
                }
            };
            match serde_json::from_str::<CertificateFile>(&content) {
                Ok(cert) => Some(cert.into_activity()),
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "invalid certificate, skipping");
                    None
                }
            }
        })
        .collect();

    activities.sort_by_key(|a| a.start);
    Ok(activities)
}
