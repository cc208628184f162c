//! Netsim interactive simulator
//!
//! Build a topology from stdin commands and watch packets cross it.
//!
//! Usage: `netsim [samples_per_hop] [frame_interval_ms]`

use std::env;
use std::io::Write;
use std::time::Duration;

use netsim_vis::{
    drive, Error, MonitorStatus, Outcome, Playback, Renderer, Session, SimulationConfig,
    TopologySnapshot, TraversalSimulator,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CLEAR: &str = "\x1b[2J\x1b[H";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netsim=info,netsim_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;
    tracing::info!(
        samples_per_hop = config.samples_per_hop,
        frame_interval_ms = config.frame_interval.as_millis() as u64,
        seed = config.layout_seed,
        speed = %config.speed,
        "Starting netsim"
    );

    println!("Network Packet Simulator");
    println!("========================");
    println!("Type 'help' for commands.");
    println!();

    let renderer = Renderer::default();
    let mut session = Session::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("netsim> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(outcome) = session.handle_line(&line) else {
            continue;
        };

        match outcome {
            Outcome::Exit => break,
            Outcome::Traversal {
                message,
                scene,
                simulator,
            } => {
                println!("{message}");
                if let Err(e) = animate(&renderer, session.config(), &scene, simulator).await {
                    tracing::warn!("Traversal failed: {}", e);
                    println!("error: {e}");
                }
            }
            other => println!("{other}"),
        }
    }

    tracing::info!("Session ended");
    Ok(())
}

/// Environment config with positional overrides.
fn load_config() -> Result<SimulationConfig, Error> {
    let mut config = SimulationConfig::from_env()?;
    let args: Vec<String> = env::args().collect();

    if let Some(raw) = args.get(1) {
        config.samples_per_hop = raw
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("samples_per_hop {raw:?}: {e}")))?;
    }
    if let Some(raw) = args.get(2) {
        let ms: u64 = raw
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("frame_interval_ms {raw:?}: {e}")))?;
        config.frame_interval = Duration::from_millis(ms);
    }

    config.validate()?;
    Ok(config)
}

/// Play one traversal on the terminal, then hold the delivery notice.
async fn animate(
    renderer: &Renderer,
    config: &SimulationConfig,
    scene: &TopologySnapshot,
    simulator: TraversalSimulator,
) -> Result<(), Error> {
    let mut playback = Playback::new(simulator, config.frame_interval);
    playback.set_speed(config.speed);

    let status = drive(&mut playback, |frame| {
        print!("{CLEAR}");
        println!("{}", renderer.render_frame(scene, frame));
        println!();
        println!("{}", MonitorStatus::in_transit(frame));
        let _ = std::io::stdout().flush();
    })
    .await?;

    println!();
    println!("{status}");
    tokio::time::sleep(config.monitor_linger).await;

    if let MonitorStatus::Delivered {
        source,
        destination,
        ..
    } = &status
    {
        println!("Packet successfully delivered from {source} to {destination}!");
    }
    Ok(())
}
