mod client;
pub mod config;
mod effects;
mod input;
pub mod logging;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use monitor_link::TungsteniteTransport;
use monitor_logging::monitor_info;

use self::client::SyncClient;
use self::config::ConfigOverrides;
use self::input::{InputThread, TerminalGuard};
use self::ui::render::{RenderMode, TerminalSink};

/// What the command line asked for.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub plain: bool,
}

pub fn run_app(options: LaunchOptions) -> anyhow::Result<()> {
    let config = config::load(options.config.as_deref())
        .context("loading configuration")?
        .with_overrides(options.overrides);
    logging::initialize(config.log_destination, &config.log_file);

    let mut settings = config
        .client_settings()
        .context("resolving the status endpoint")?;
    monitor_info!("Monitoring {}", settings.endpoint);
    let transport = Arc::new(TungsteniteTransport::new());

    if options.plain {
        let sink = TerminalSink::new(io::stdout(), RenderMode::Plain);
        let mut client =
            SyncClient::new(settings, transport, sink).context("starting the link runtime")?;
        client.start();
        client.run();
        return Ok(());
    }

    let guard = TerminalGuard::enter().context("preparing the terminal")?;
    if let Ok((columns, _)) = crossterm::terminal::size() {
        settings.layout.width = usize::from(columns);
    }
    let sink = TerminalSink::new(io::stdout(), RenderMode::Screen);
    let mut client =
        SyncClient::new(settings, transport, sink).context("starting the link runtime")?;
    let input = InputThread::spawn(client.sender()).context("reading terminal input")?;

    client.start();
    client.run();
    input.stop();
    drop(guard);
    Ok(())
}
