// Binary entry point: items here are not public API.
#![allow(missing_docs)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use display::HeadlessRenderer;
use remote::cli::Args;
use remote::transport::tcp;
use remote::{ClientConfig, Session, SessionEnd};
use tracing::{error, info};

fn main() -> ExitCode {
    // Usage errors exit here with status 2.
    let args = Args::parse();
    remote::logging::init();

    match run(args) {
        Ok(SessionEnd::Closed) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<SessionEnd> {
    let config = args.into_config().context("invalid arguments")?;
    info!(
        host = %config.host,
        port = config.port,
        size = config.geometry.size(),
        decay = config.decay.get(),
        headless = config.headless,
        "starting VC8 remote display"
    );

    let (source, sink) = tcp::connect(&config.host, config.port, config.read_timeout)
        .with_context(|| format!("cannot reach {}", config.peer_label()))?;
    let session = Session::new(&config)?;

    let end = if config.headless {
        session.run(&mut HeadlessRenderer::new(), source, sink)?
    } else {
        run_windowed(&config, &session, source, sink)?
    };
    info!(frames = session.state().frames(), "session ended");
    Ok(end)
}

#[cfg(not(feature = "headless"))]
fn run_windowed(
    config: &ClientConfig,
    session: &Session,
    source: tcp::TcpSource,
    sink: tcp::TcpSink,
) -> Result<SessionEnd> {
    use display::{PhosphorWindow, WindowConfig};

    let window_config = WindowConfig::for_geometry(config.geometry);
    let mut window = PhosphorWindow::open(&window_config).context("cannot open display window")?;
    Ok(session.run(&mut window, source, sink)?)
}

#[cfg(feature = "headless")]
fn run_windowed(
    _config: &ClientConfig,
    session: &Session,
    source: tcp::TcpSource,
    sink: tcp::TcpSink,
) -> Result<SessionEnd> {
    Ok(session.run(&mut HeadlessRenderer::new(), source, sink)?)
}
