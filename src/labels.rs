//! Release label gate run on every pull request event in CI.
use log::*;
use std::collections::BTreeSet;

use crate::error::{Result, WardenError};

/// Closed set of release labels. A pull request must carry exactly one.
pub const RELEASE_LABELS: [&str; 5] = [
    "release:docs",
    "release:chore",
    "release:fix",
    "release:feature",
    "release:feature-breaking",
];

/// Check that exactly one release label is present, returning it.
///
/// Labels outside [`RELEASE_LABELS`] are ignored and repeated labels count
/// once.
pub fn check_labels<S: AsRef<str>>(labels: &[S]) -> Result<String> {
    let found = labels
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| RELEASE_LABELS.contains(l))
        .collect::<BTreeSet<_>>();

    debug!("release labels present: {:?}", found);

    if found.len() == 1
        && let Some(label) = found.first()
    {
        return Ok(label.to_string());
    }

    Err(WardenError::LabelCheck {
        allowed: RELEASE_LABELS.iter().map(|l| l.to_string()).collect(),
        found: found.into_iter().map(String::from).collect(),
    })
}
