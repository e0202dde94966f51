use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use forecast_logging::LogDestination;
use log::LevelFilter;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(
    name = "solar_forecast",
    about = "Scrape the regional solar forecast and publish it as states"
)]
pub struct Cli {
    /// RON config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// Postal-code region, overrides the config
    #[arg(short, long)]
    pub region: Option<String>,
    /// Rated power of the home system in kWp, overrides the config
    #[arg(short, long)]
    pub power_kw: Option<f64>,
    /// State file, overrides the config
    #[arg(long)]
    pub state_file: Option<PathBuf>,
    /// Print the states instead of writing the state file
    #[arg(long)]
    pub dry_run: bool,
    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,
    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Command-line values win over the config file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(region) = &self.region {
            config.region = Some(region.clone());
        }
        if let Some(power_kw) = self.power_kw {
            config.power_kw = power_kw;
        }
        if let Some(state_file) = &self.state_file {
            config.state_file = state_file.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_arguments() {
        let cli = Cli::try_parse_from(["solar_forecast"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(cli.log, LogTarget::Terminal);
        assert_eq!(cli.log_level(), LevelFilter::Info);
        assert!(!cli.dry_run);
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "solar_forecast",
            "--region",
            "785",
            "--power-kw",
            "7.2",
            "--state-file",
            "out/states.json",
            "-v",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.region.as_deref(), Some("785"));
        assert_eq!(config.power_kw, 7.2);
        assert_eq!(config.state_file, PathBuf::from("out/states.json"));
        assert_eq!(cli.log_level(), LevelFilter::Debug);
    }
}
