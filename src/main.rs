use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

mod actions;
mod app;
mod config;
mod error;
mod host;
mod protocol;
mod surface;
mod tracker;

use actions::Action;
use app::App;
use config::Config;
use host::BridgeHost;
use protocol::Outbound;
use surface::CommandSurface;
use tracker::{ChannelNotifier, SystemClock, TokioScheduler, Tracker};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let pattern = config.chat_host_pattern()?;
    tracing::info!(pattern = pattern.as_str(), "Watching chat tabs");

    // Create event channels
    let (tx, rx) = mpsc::unbounded_channel::<Action>();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Outbound>();

    // Spawn host bridge reader
    let input_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(message) = protocol::decode(&line) {
                        let _ = input_tx.send(Action::Inbound(message));
                    }
                }
                Ok(None) => {
                    let _ = input_tx.send(Action::Quit);
                    break;
                }
                Err(e) => {
                    let _ = input_tx.send(Action::Error(format!("Host bridge read: {}", e)));
                    let _ = input_tx.send(Action::Quit);
                    break;
                }
            }
        }
    });

    // Spawn host bridge writer
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = out_rx.recv().await {
            let mut line = match protocol::encode(&message) {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode outbound message");
                    continue;
                }
            };
            line.push('\n');
            if let Err(e) = stdout.write_all(line.as_bytes()).await {
                tracing::error!(error = %e, "Host bridge write failed");
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    // Create app state
    let tracker = Tracker::new(
        config.tracker_settings(),
        Box::new(SystemClock),
        Box::new(TokioScheduler::new(tx.clone())),
        Box::new(ChannelNotifier::new(out_tx.clone())),
    );
    let surface = CommandSurface::new(pattern, config.placeholder_title.clone());
    let app = App::new(tracker, BridgeHost::new(out_tx.clone()), surface, out_tx);
    drop(tx);

    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        tracing::info!("Interrupted");
    };
    // Dropping the app closes the outbound channel
    let result = app.run(rx, interrupted).await;

    // Flush pending output before exiting
    let _ = writer.await;
    result
}
