//! Command-line argument parsing for the Strata demo.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Sparse voxel world with ray casting and swept collision")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Collision margin kept between bodies and voxel faces.
    #[arg(long)]
    pub margin: Option<f32>,

    /// Maximum ray steps for reach queries.
    #[arg(long)]
    pub reach: Option<u32>,

    /// Number of simulation ticks to run.
    #[arg(long)]
    pub ticks: Option<u32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(margin) = args.margin {
            self.physics.voxel_margin = margin;
        }
        if let Some(reach) = args.reach {
            self.physics.reach_steps = reach;
        }
        if let Some(ticks) = args.ticks {
            self.physics.fall_ticks = ticks;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            margin: Some(0.05),
            ticks: Some(10),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.physics.voxel_margin, 0.05);
        assert_eq!(config.physics.fall_ticks, 10);
        // Non-overridden fields retain defaults
        assert_eq!(config.physics.reach_steps, 8);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "strata",
            "--reach",
            "12",
            "--log-level",
            "debug",
            "--config",
            "/tmp/strata",
        ]);
        assert_eq!(args.reach, Some(12));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/strata")));
        assert_eq!(args.margin, None);
    }
}
