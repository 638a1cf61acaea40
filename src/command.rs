//! Command execution for milestone-warden.
//!
//! - **check_labels**: the CI label gate. Passes when exactly one release
//!   label is attached to a pull request.
//! - **validate_milestones**: the operator-run milestone check. Guards
//!   against in-flight cherry-picks and partial milestone listings,
//!   classifies merged pull requests against local branch history and
//!   reconciles mismatches one pull request at a time.

/// Release label gate.
pub mod check_labels;

/// Milestone validation and reconciliation.
pub mod validate_milestones;
