//! GitHub access for milestone validation.
//!
//! The [`traits::Forge`] trait is the seam between reconciliation logic and
//! the hosting API; [`github::Github`] implements it with Octocrab GraphQL
//! calls.

/// Connection and authentication settings.
pub mod config;

/// GitHub GraphQL client implementation.
pub mod github;

/// GraphQL documents and their response payloads.
pub mod graphql;

/// Common trait for the hosting API.
pub mod traits;

/// Normalized milestones, pull requests and request types.
pub mod types;
