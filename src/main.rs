use anyhow::{Context, Result};
use route_replay::config::Settings;
use route_replay::control::{self, Command};
use route_replay::driver::PlaybackDriver;
use route_replay::input::{load_route, BundledSource, FileSource};
use route_replay::playback::PlaybackEngine;
use route_replay::render;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(run())
}

async fn run() -> Result<()> {
    let mut settings = Settings::load();
    if let Some(path) = std::env::args().nth(1) {
        settings.route_path = path.into();
    }

    let primary = FileSource::new(&settings.route_path);
    let fallback = BundledSource::default();
    let loaded = load_route(&primary, &fallback)
        .await
        .context("No route data available")?;

    let route = loaded.route;
    info!(
        "Route from {}: {} waypoints, {:.2} km",
        loaded.source,
        route.len(),
        route.total_distance_km()
    );
    if !route.is_playable() {
        warn!("Route has a single waypoint, playback is disabled");
    }

    let engine = PlaybackEngine::new(route, settings.playback_config());
    let mut driver = PlaybackDriver::new(engine);
    let renderer = tokio::spawn(render::run(driver.subscribe()));

    println!("{}", control::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() && line != " " {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{} ({})", e, control::HELP);
                continue;
            }
        };

        match command {
            Command::Play => driver.play().await,
            Command::Pause => driver.pause().await,
            Command::Toggle => driver.toggle().await,
            Command::Restart => driver.restart().await,
            Command::Speed(value) => {
                if !driver.set_speed_multiplier(value).await {
                    println!("speed must be 1, 2 or 4");
                }
            }
            Command::Status => {
                let engine = driver.engine();
                let engine = engine.lock().await;
                println!("{}", render::format_line(&engine.frame()));
            }
            Command::Bounds => {
                let engine = driver.engine();
                let engine = engine.lock().await;
                let bounds = engine.route().bounds();
                let center = bounds.center();
                println!(
                    "route bounds: SW {:.4}, {:.4} / NE {:.4}, {:.4} (center {:.4}, {:.4})",
                    bounds.south_west.latitude,
                    bounds.south_west.longitude,
                    bounds.north_east.latitude,
                    bounds.north_east.longitude,
                    center.latitude,
                    center.longitude
                );
            }
            Command::Save => match settings.save() {
                Ok(path) => println!("settings saved to {}", path.display()),
                Err(e) => warn!("Failed to save settings: {:#}", e),
            },
            Command::Help => println!("{}", control::HELP),
            Command::Quit => break,
        }
    }

    // Unmount: cancel timers, then let the renderer drain and exit
    driver.stop_timers();
    drop(driver);
    renderer.await.context("Renderer task failed")?;
    info!("Bye");
    Ok(())
}
