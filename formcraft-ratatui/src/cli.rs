use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use formcraft_http::{DEFAULT_BASE_URL, HttpSubmitterConfig};

/// Formcraft - compose a survey in the terminal, preview it and save it to a forms backend
#[derive(Parser, Debug, Clone)]
#[command(name = "formcraft", version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the forms backend; forms are posted to <endpoint>/api/forms
    #[arg(short, long, env = "FORMCRAFT_ENDPOINT", default_value = DEFAULT_BASE_URL)]
    pub endpoint: String,

    /// Request timeout in seconds (waits indefinitely when unset)
    #[arg(long, env = "FORMCRAFT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// File the log is written to (the terminal is owned by the UI)
    #[arg(long, env = "FORMCRAFT_LOG_FILE", default_value = "formcraft.log")]
    pub log_file: PathBuf,

    /// Title shown at the top of the screen
    #[arg(long, default_value = "Form Builder")]
    pub title: String,
}

impl Cli {
    /// Submitter configuration derived from the command line.
    pub fn submitter_config(&self) -> HttpSubmitterConfig {
        let config = HttpSubmitterConfig::with_base_url(&self.endpoint);
        match self.timeout_secs {
            Some(secs) => config.timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["formcraft"]);
        assert_eq!(cli.endpoint, DEFAULT_BASE_URL);
        assert!(cli.timeout_secs.is_none());
        assert_eq!(cli.log_file, PathBuf::from("formcraft.log"));
        assert_eq!(cli.title, "Form Builder");

        let config = cli.submitter_config();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "formcraft",
            "--endpoint",
            "http://localhost:3000",
            "--timeout-secs",
            "15",
            "--log-file",
            "/tmp/fc.log",
            "--title",
            "Lunch survey",
        ]);
        assert_eq!(cli.endpoint, "http://localhost:3000");
        assert_eq!(cli.log_file, PathBuf::from("/tmp/fc.log"));
        assert_eq!(cli.title, "Lunch survey");

        let config = cli.submitter_config();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }
}
