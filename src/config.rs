//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::state::{Settings, SettingsPatch};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-timer")]
#[command(about = "A Pomodoro countdown daemon with an HTTP and event-stream API")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Snapshot file (defaults to the platform data directory)
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Work phase length in minutes
    #[arg(long)]
    pub work_time: Option<u32>,

    /// Short break length in minutes
    #[arg(long)]
    pub break_time: Option<u32>,

    /// Long rest length in minutes
    #[arg(long)]
    pub rest_time: Option<u32>,

    /// Completed work blocks between long rests
    #[arg(long)]
    pub rest_periodicity: Option<u32>,

    /// Start counting down immediately
    #[arg(long)]
    pub autostart: bool,

    /// Ignore any saved snapshot on startup
    #[arg(long)]
    pub fresh: bool,

    /// Seconds between automatic saves (0 disables)
    #[arg(long, default_value = "60")]
    pub autosave_secs: u64,

    /// Shell command run whenever a phase begins (POMODORO_PHASE is set)
    #[arg(long)]
    pub notify_cmd: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial settings: defaults overridden by whichever flags were given
    pub fn settings(&self) -> Settings {
        SettingsPatch {
            work_time: self.work_time,
            break_time: self.break_time,
            rest_time: self.rest_time,
            rest_periodicity: self.rest_periodicity,
        }
        .apply(&Settings::default())
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(crate::storage::JsonFileStorage::default_path)
    }

    pub fn autosave_period(&self) -> Option<Duration> {
        (self.autosave_secs > 0).then(|| Duration::from_secs(self.autosave_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_default_settings() {
        let config = Config::try_parse_from([
            "pomodoro-timer",
            "--work-time",
            "50",
            "--rest-periodicity",
            "4",
        ])
        .unwrap();
        assert_eq!(config.settings(), Settings::new(50, 5, 25, 4));
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.autosave_period(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn zero_disables_autosave() {
        let config = Config::try_parse_from(["pomodoro-timer", "--autosave-secs", "0", "-v"]).unwrap();
        assert_eq!(config.autosave_period(), None);
        assert_eq!(config.log_level(), "debug");
    }
}
