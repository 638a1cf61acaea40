pub mod classify;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod labels;
pub mod reconcile;
pub mod repo;
pub mod result;

pub use cli::{Args, Command};
pub use error::WardenError;
