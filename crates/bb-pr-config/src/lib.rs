//! Configuration for the Bitbucket Server pull request decorator
//!
//! This crate provides:
//! - Config file lookup (CWD first, then the platform config directory)
//! - The decorator configuration (`DecoratorConfig`) with its feature flags
//! - The set of issue statuses that count as closed

pub mod config_file;
pub mod decorator_config;
pub mod error;
pub mod statuses;

pub use config_file::{find_config_file, CONFIG_FILE};
pub use decorator_config::{DecoratorConfig, FeatureFlags, TOKEN_ENV_VAR};
pub use error::ConfigError;
pub use statuses::ClosedStatuses;
