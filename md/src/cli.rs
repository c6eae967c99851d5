//! CLI argument parsing for maindispatch

use clap::Parser;
use std::path::PathBuf;

/// maindispatch - worker threads reporting to a single main loop
///
/// With no arguments, runs 4 workers x 10 iterations after a 3 second delay.
#[derive(Parser, Debug)]
#[command(
    name = "md",
    author,
    version,
    about = "Worker threads signalling a single main loop",
    after_help = "Logs are written to: ~/.local/share/maindispatch/logs/maindispatch.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level override
    #[arg(short, long, help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,

    /// Log file override
    #[arg(long, help = "Write logs to this file instead of the default location")]
    pub log_file: Option<PathBuf>,
}

/// Default log file location
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("maindispatch")
        .join("logs")
        .join("maindispatch.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["md"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from(["md", "-c", "md.yml", "-l", "debug", "--log-file", "/tmp/md.log"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("md.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/md.log")));
    }

    #[test]
    fn test_log_path_ends_with_file_name() {
        assert!(get_log_path().ends_with("maindispatch/logs/maindispatch.log"));
    }
}
