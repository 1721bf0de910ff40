use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use emberalert_map::config::Config;
use emberalert_map::geo::LatLng;
use emberalert_map::host::HeadlessMapHost;
use emberalert_map::incident::{HttpIncidentService, RosterLoader};
use emberalert_map::info::InfoPanel;
use emberalert_map::optin::OptInClient;
use emberalert_map::session::MapSession;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Headless driver for the EmberAlert incident map
#[derive(Parser, Debug)]
#[command(name = "emberalert-map", version, about)]
struct Cli {
    /// Incident API base URL (overrides EMBERALERT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level for this crate when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and print the incident roster
    Incidents,

    /// Select one incident and print what the map would show
    Inspect {
        /// Incident id
        id: i64,

        /// Click latitude (defaults to the incident's position)
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Click longitude (defaults to the incident's position)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },

    /// Register a phone number for alerts near a location
    OptIn {
        #[arg(long)]
        phone: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("emberalert_map={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    info!("Using incident API at {}", config.api.base_url);

    match cli.command {
        Command::Incidents => list_incidents(&config).await,
        Command::Inspect { id, lat, lng } => {
            let click = lat.zip(lng).map(|(lat, lng)| LatLng::new(lat, lng));
            inspect(&config, id, click).await
        }
        Command::OptIn { phone, lat, lng } => opt_in(&config, &phone, LatLng::new(lat, lng)).await,
    }
}

async fn list_incidents(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(HttpIncidentService::new(&config.api)?);
    let roster = RosterLoader::new(service).load().await;

    if let Some(failure) = &roster.failure {
        bail!("could not load incidents: {}", failure);
    }

    for incident in &roster.incidents {
        println!(
            "{:>8}  {:>10.5}  {:>11.5}",
            incident.id, incident.latitude, incident.longitude
        );
    }
    println!(
        "{} incidents ({} skipped)",
        roster.len(),
        roster.skipped
    );
    Ok(())
}

async fn inspect(config: &Config, id: i64, click: Option<LatLng>) -> anyhow::Result<()> {
    let service = Arc::new(HttpIncidentService::new(&config.api)?);
    let host = Arc::new(HeadlessMapHost::new());
    let session = MapSession::new(service, host.clone(), config.map.clone());

    let mut events = session.bind();
    host.mark_ready();
    while let Ok(event) = events.try_recv() {
        session.handle_event(event).await;
    }

    let roster = session.start().await;
    let click = match click {
        Some(click) => click,
        None => roster
            .get(id)
            .map(|incident| incident.position())
            .with_context(|| format!("incident {} is not in the roster; pass --lat/--lng", id))?,
    };

    let token = session.controller().select(id, click).await;
    let selection = session.controller().selection().await;
    info!(
        "Selection generation {} finished in phase {}",
        token.generation, selection.phase
    );

    println!("Incident {}", id);
    print!("{}", InfoPanel::from_selection(&selection));
    if let Some(failure) = &selection.failure {
        println!("({})", failure);
    }

    println!();
    println!("Overlays:");
    for overlay in host.overlays() {
        println!(
            "  {} {:?} ({} vertices, {})",
            overlay.handle,
            overlay.style.kind,
            overlay.polygon.len(),
            overlay.style.fill_color
        );
    }

    println!();
    if let Some((envelope, padding)) = host.last_fit() {
        println!(
            "Fit: ({:.5}, {:.5}) to ({:.5}, {:.5}), padding {}px",
            envelope.min_lat, envelope.min_lng, envelope.max_lat, envelope.max_lng, padding
        );
    }
    if let Some(center) = host.center() {
        println!("Center: ({:.5}, {:.5})", center.lat, center.lng);
    }
    if let Some(zoom) = host.zoom() {
        println!("Zoom: {}", zoom);
    }
    Ok(())
}

async fn opt_in(config: &Config, phone: &str, coordinates: LatLng) -> anyhow::Result<()> {
    let client = OptInClient::new(&config.api)?;
    if client.register(phone, coordinates).await? {
        println!("Registered {} for alerts", phone);
        Ok(())
    } else {
        bail!("the relay did not accept the registration")
    }
}
