mod platform;

use std::path::PathBuf;

use clap::Parser;

use platform::config::ConfigOverrides;
use platform::logging::LogDestination;
use platform::LaunchOptions;

/// Live status of a running file-conversion job.
#[derive(Debug, Parser)]
#[command(name = "monitor", version, about)]
struct Cli {
    /// Address of the status page, e.g. http://nas.local:8000/
    page_url: Option<String>,

    /// RON configuration file (default: ./monitor.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keepalive and reconnect interval in milliseconds
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Decimal places for per-file savings
    #[arg(long)]
    precision: Option<usize>,

    /// Where log records go
    #[arg(long, value_enum)]
    log: Option<LogDestination>,

    /// Print each update as plain lines instead of drawing the screen
    #[arg(long)]
    plain: bool,
}

impl From<Cli> for LaunchOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            overrides: ConfigOverrides {
                page_url: cli.page_url,
                tick_interval_ms: cli.tick_ms,
                percentage_precision: cli.precision,
                log_destination: cli.log,
            },
            plain: cli.plain,
        }
    }
}

fn main() -> anyhow::Result<()> {
    platform::run_app(Cli::parse().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::parse_from([
            "monitor",
            "http://nas.local:8000/",
            "--tick-ms",
            "250",
            "--precision",
            "2",
            "--log",
            "both",
            "--plain",
        ]);
        let options = LaunchOptions::from(cli);
        assert!(options.plain);
        assert_eq!(options.config, None);
        assert_eq!(
            options.overrides,
            ConfigOverrides {
                page_url: Some("http://nas.local:8000/".to_string()),
                tick_interval_ms: Some(250),
                percentage_precision: Some(2),
                log_destination: Some(LogDestination::Both),
            }
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
