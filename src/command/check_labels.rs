//! Implements the check-labels command
use log::*;

use crate::{labels::check_labels, result::Result};

/// Fail unless exactly one release label is present.
pub fn execute(labels: &[String]) -> Result<()> {
    debug!("checking labels: {:?}", labels);
    let label = check_labels(labels)?;
    info!("found release label: {label}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_release_label_passes() {
        assert!(execute(&["release:feature".to_string()]).is_ok());
    }

    #[test]
    fn conflicting_release_labels_fail() {
        let result = execute(&[
            "release:feature".to_string(),
            "release:feature-breaking".to_string(),
        ]);
        assert!(result.is_err());
    }
}
