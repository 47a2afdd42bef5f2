//! AIDA configuration: serde models with defaults, JSON5 sources merged from
//! user, project, explicit and environment layers, and validation.

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{CONFIG_FILE_NAME, ConfigSource, LoadOptions, ResolvedConfig, SourceInfo};
pub use model::*;
