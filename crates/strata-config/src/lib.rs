//! Configuration for the Strata voxel sandbox.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and support reload detection. Every section uses
//! `#[serde(default)]` so older or partial files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, PhysicsConfig, WorldConfig};
pub use error::ConfigError;
