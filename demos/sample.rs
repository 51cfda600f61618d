//! Print a live dashboard line from RaceRoom telemetry.
//!
//! ```text
//! cargo run --example sample                                  # live, Windows only
//! cargo run --example sample -- --schema legacy-v2            # pin an old client
//! cargo run --example sample -- --replay dump.r3e --rate 20   # replay a snapshot dump
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use r3e_telemetry::schema::{Field, SchemaEntry};
use r3e_telemetry::sentinel::{self, Gear, Sentinel};
use r3e_telemetry::{
    AdapterValidation, ConnectionConfig, FrameAdapter, SchemaSelection, TelemetryConnection,
    TelemetryRecord, UpdateRate, identify_schema, units,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "RaceRoom telemetry dashboard")]
struct Args {
    /// Schema revision: auto, legacy-v1, legacy-v2 or MAJOR.MINOR
    #[arg(long)]
    schema: Option<SchemaSelection>,

    /// YAML connection config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a snapshot dump instead of connecting live
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Replay rate in Hz, or display rate when live
    #[arg(long, default_value_t = 10.0)]
    rate: f64,
}

/// What the dashboard shows. Fields the revision lacks stay `None`.
#[derive(Debug)]
struct Dashboard {
    gear: Gear,
    rpm: Option<f32>,
    speed_kph: Option<f32>,
    position: Option<i32>,
    track: Option<String>,
}

impl FrameAdapter for Dashboard {
    fn validate(entry: &'static SchemaEntry) -> r3e_telemetry::Result<AdapterValidation> {
        Ok(AdapterValidation::new(entry)
            .require(Field::Gear)?
            .require(Field::EngineRps)?
            .require(Field::CarSpeed)?
            .optional(Field::Position)
            .optional(Field::TrackName))
    }

    fn adapt(record: &TelemetryRecord<'_>, validation: &AdapterValidation) -> Self {
        let gear = validation.fetch::<i32>(record, Field::Gear).map_or(Gear::NoData, Gear::from_raw);
        let rpm = validation
            .fetch::<f32>(record, Field::EngineRps)
            .and_then(|rps| sentinel::interpret_f32(rps, Sentinel::NotApplicable))
            .map(units::rps_to_rpm);
        let speed_kph = validation.fetch::<f32>(record, Field::CarSpeed).map(units::mps_to_kph);
        let position = validation
            .fetch::<i32>(record, Field::Position)
            .and_then(|p| sentinel::interpret_i32(p, Sentinel::NotApplicable));
        let track = validation.fetch::<String>(record, Field::TrackName).filter(|t| !t.is_empty());
        Self { gear, rpm, speed_kph, position, track }
    }
}

fn format_optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConnectionConfig::load(path).await?,
        None => ConnectionConfig::default(),
    };
    if let Some(schema) = args.schema {
        config.schema = schema;
    }

    let connection = match &args.replay {
        Some(path) => {
            let version = match config.schema {
                SchemaSelection::Pinned(version) => version,
                SchemaSelection::Auto => {
                    let bytes = tokio::fs::read(path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?;
                    identify_schema(&bytes).context("detecting schema revision, pin one with --schema")?
                }
            };
            info!(%version, rate = args.rate, "Replaying {}", path.display());
            TelemetryConnection::replay(path, version, args.rate).await?
        }
        None => TelemetryConnection::connect(config).await?,
    };

    let rate = if args.replay.is_some() { UpdateRate::Native } else { UpdateRate::Max(args.rate as u32) };
    let mut stream = Box::pin(connection.subscribe::<Dashboard>(rate));

    let mut frames = 0u64;
    while let Some(dash) = stream.next().await {
        frames += 1;
        println!(
            "gear {:>2} | {:>6} rpm | {:>6} km/h | P{} | {}",
            dash.gear,
            format_optional(dash.rpm.map(|r| format!("{r:.0}"))),
            format_optional(dash.speed_kph.map(|s| format!("{s:.1}"))),
            format_optional(dash.position),
            dash.track.as_deref().unwrap_or("-"),
        );
    }

    if frames == 0 {
        warn!("No telemetry received");
    } else {
        info!(frames, "Telemetry stream ended");
    }
    Ok(())
}
