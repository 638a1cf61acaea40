//! Application-level result type.
//!
//! Library modules return [`crate::error::Result`] with a typed
//! [`crate::error::WardenError`]. Command entry points and `main` work with
//! the `color-eyre` report type defined here so that typed errors can be
//! wrapped with context as they propagate:
//!
//! ```rust,ignore
//! use color_eyre::eyre::WrapErr;
//!
//! fn run() -> Result<()> {
//!     load_config(path).wrap_err("failed to load configuration")?;
//!     Ok(())
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used by commands and the binary entry point.
pub type Result<T> = EyreResult<T>;
