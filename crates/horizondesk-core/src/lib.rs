//! # horizondesk-core
//!
//! Core configuration, error types, and utilities for HorizonDesk.
//!
//! This crate provides shared functionality used across all HorizonDesk crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the config file
//! - **Paths**: Resolution of the data and config locations under `~/.horizondesk`
//! - **Utilities**: ID generation, hashing, and zeroizing secret strings

pub mod config;
pub mod error;
pub mod id;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use secret::SecretString;
