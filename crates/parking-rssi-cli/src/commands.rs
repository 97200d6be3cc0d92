//! CLI subcommands
//!
//! Every command opens the data directory, performs one operation and
//! exits. The directory holds `config.json` (grid, capacity, classifier
//! settings) next to the files written by [`FileStorage`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use parking_rssi::{
    AccessPoint, BssidId, FileStorage, GridShape, JsonScanFile, OccupancyEstimate, ParkingConfig,
    ScanSession, SessionEvent, SENTINEL_DBM,
};

const CONFIG_FILE: &str = "config.json";

/// Grid subcommands
#[derive(Subcommand, Debug)]
pub enum GridCommand {
    /// Show the grid shape, capacity and classifier settings
    Show,

    /// Change the grid. A new shape clears every access point and sample.
    Set {
        /// Number of rows
        #[arg(short, long)]
        rows: usize,

        /// Number of columns
        #[arg(short, long)]
        cols: usize,

        /// Number of parking slots in the lot
        #[arg(long)]
        capacity: Option<u32>,
    },
}

/// Access point subcommands
#[derive(Subcommand, Debug)]
pub enum ApCommand {
    /// Bind an access point to a grid cell
    Add {
        /// Hardware address, e.g. a4:2b:b0:01:02:03
        #[arg(short, long)]
        bssid: String,

        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Grid row
        #[arg(short, long)]
        row: u32,

        /// Grid column
        #[arg(short, long)]
        col: u32,

        /// Store the binding but leave it out of fingerprints
        #[arg(long)]
        inactive: bool,
    },

    /// List bound access points
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove every binding
    Clear,
}

/// Arguments for the train command
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Number of occupied slots when the scan was captured
    #[arg(short, long)]
    pub label: u32,

    /// JSON scan capture
    #[arg(short, long)]
    pub scan: PathBuf,
}

/// Arguments for the predict command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JSON scan capture
    #[arg(short, long)]
    pub scan: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Sample subcommands
#[derive(Subcommand, Debug)]
pub enum SamplesCommand {
    /// List recorded fingerprints
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove the fingerprint at a position shown by `samples list`
    Rm {
        /// Position of the sample
        index: usize,
    },
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
}

// ============================================================================
// Display Structs for Tables
// ============================================================================

/// Access point display row
#[derive(Tabled, Serialize)]
struct AccessPointRow {
    #[tabled(rename = "BSSID")]
    bssid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Row")]
    row: u32,
    #[tabled(rename = "Col")]
    col: u32,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Active")]
    active: bool,
}

impl AccessPointRow {
    fn new(ap: &AccessPoint, grid: GridShape) -> Self {
        let slot = grid
            .linear_index(ap.row as usize, ap.col as usize)
            .map_or_else(|| "outside grid".to_string(), |i| i.to_string());
        Self {
            bssid: ap.bssid.to_string(),
            name: ap.name.clone(),
            row: ap.row,
            col: ap.col,
            slot,
            active: ap.active,
        }
    }
}

/// Sample display row
#[derive(Tabled, Serialize)]
struct SampleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Label")]
    label: u32,
    #[tabled(rename = "Heard")]
    heard: usize,
    #[tabled(rename = "Fingerprint (dBm)")]
    fingerprint: String,
}

/// Prediction output for JSON mode
#[derive(Serialize)]
struct PredictionReport<'a> {
    #[serde(flatten)]
    estimate: OccupancyEstimate,
    fingerprint: &'a [f32],
}

// ============================================================================
// Command Execution
// ============================================================================

fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Open the session stored in `data_dir`.
pub fn open_session(data_dir: &Path) -> Result<ScanSession> {
    let config = ParkingConfig::load_or_default(&config_path(data_dir))
        .with_context(|| format!("loading configuration from {}", data_dir.display()))?;
    let storage = FileStorage::new(data_dir)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    Ok(ScanSession::open(Arc::new(storage), config)?)
}

/// Execute a grid command
pub fn execute_grid(data_dir: &Path, command: GridCommand) -> Result<()> {
    let mut session = open_session(data_dir)?;
    match command {
        GridCommand::Show => {
            let cfg = session.config();
            println!("{}", "Parking Grid".bold().cyan());
            println!("{}", "=".repeat(40));
            println!("  {} {} x {}", "Grid:".dimmed(), cfg.rows, cfg.cols);
            println!("  {} {}", "Capacity:".dimmed(), cfg.capacity);
            println!("  {} {} ({:?})", "Neighbours:".dimmed(), cfg.k, cfg.vote);
            println!("  {} {}", "Access points:".dimmed(), session.registry().len()?);
            println!("  {} {}", "Samples:".dimmed(), session.classifier().num_samples());
        }
        GridCommand::Set { rows, cols, capacity } => {
            let resized = session
                .configure_grid(rows, cols)
                .with_context(|| format!("resizing grid to {rows} x {cols}"))?;
            if let Some(capacity) = capacity {
                session.set_capacity(capacity);
            }
            let path = config_path(data_dir);
            session.config().to_json(&path)?;
            tracing::info!(path = %path.display(), resized, "grid configuration saved");
            if resized {
                println!(
                    "{} Grid is now {} x {}; access points and samples were cleared",
                    "[WARN]".yellow().bold(),
                    rows,
                    cols
                );
            }
            println!(
                "{} Grid {} x {}, capacity {}",
                "[OK]".green().bold(),
                session.config().rows,
                session.config().cols,
                session.config().capacity
            );
        }
    }
    Ok(())
}

/// Execute an access point command
pub fn execute_ap(data_dir: &Path, command: ApCommand) -> Result<()> {
    let session = open_session(data_dir)?;
    match command {
        ApCommand::Add { bssid, name, row, col, inactive } => {
            let bssid = BssidId::parse(&bssid)?;
            if inactive {
                session
                    .registry()
                    .add(AccessPoint::new(bssid, name, row, col).with_active(false))?;
            } else {
                session.bind_access_point(bssid, name, row, col)?;
            }
            println!("{} Bound {} to ({}, {})", "[OK]".green().bold(), bssid, row, col);
        }
        ApCommand::List { format } => {
            let grid = session.config().grid();
            let rows: Vec<AccessPointRow> = session
                .registry()
                .list_access_points()?
                .iter()
                .map(|ap| AccessPointRow::new(ap, grid))
                .collect();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Table if rows.is_empty() => {
                    println!("{}", "No access points bound".dimmed());
                }
                OutputFormat::Table => {
                    let table = Table::new(rows).with(Style::rounded()).to_string();
                    println!("{}", table);
                }
            }
        }
        ApCommand::Clear => {
            session.registry().remove_all()?;
            tracing::info!("access point registry cleared");
            println!("{} Removed all access points", "[OK]".green().bold());
        }
    }
    Ok(())
}

/// Execute the train command
pub fn execute_train(data_dir: &Path, args: TrainArgs) -> Result<()> {
    let mut session = open_session(data_dir)?;
    let source = JsonScanFile::new(&args.scan);
    match session.train_with(&source, args.label)? {
        SessionEvent::Trained { label, samples, fingerprint } => {
            tracing::info!(label, samples, scan = %args.scan.display(), "training sample recorded");
            println!(
                "{} Recorded sample with label {} ({} stored)",
                "[OK]".green().bold(),
                label.to_string().bold(),
                samples
            );
            println!("{}", signal_grid(session.config().grid(), &fingerprint));
        }
        SessionEvent::TrainingRejected { expected, actual, .. } => {
            tracing::warn!(expected, actual, scan = %args.scan.display(), "training sample rejected");
            bail!("fingerprint has {actual} slots but the training set expects {expected}");
        }
        SessionEvent::ScanFailed { reason } => {
            tracing::warn!(%reason, scan = %args.scan.display(), "training scan failed");
            bail!("scan failed: {reason}")
        }
        other => bail!("unexpected session event {other:?}"),
    }
    Ok(())
}

/// Execute the predict command
pub fn execute_predict(data_dir: &Path, args: PredictArgs) -> Result<()> {
    let mut session = open_session(data_dir)?;
    let source = JsonScanFile::new(&args.scan);
    match session.predict_with(&source)? {
        SessionEvent::Predicted { estimate, fingerprint } => {
            tracing::info!(
                occupied = estimate.occupied,
                capacity = estimate.capacity,
                "occupancy predicted"
            );
            match args.format {
                OutputFormat::Json => {
                    let report = PredictionReport { estimate, fingerprint: &fingerprint };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Table => {
                    println!(
                        "{} {} occupied, {} free of {}",
                        "[PREDICT]".bright_cyan().bold(),
                        estimate.occupied.to_string().red().bold(),
                        estimate.unoccupied.to_string().green().bold(),
                        estimate.capacity
                    );
                    println!("{}", signal_grid(session.config().grid(), &fingerprint));
                }
            }
        }
        SessionEvent::ScanFailed { reason } => {
            tracing::warn!(%reason, scan = %args.scan.display(), "prediction scan failed");
            bail!("scan failed: {reason}")
        }
        other => bail!("unexpected session event {other:?}"),
    }
    Ok(())
}

/// Execute a samples command
pub fn execute_samples(data_dir: &Path, command: SamplesCommand) -> Result<()> {
    let mut session = open_session(data_dir)?;
    match command {
        SamplesCommand::List { format } => {
            let rows: Vec<SampleRow> = session
                .classifier()
                .training_set()
                .samples()
                .iter()
                .enumerate()
                .map(|(index, s)| SampleRow {
                    index,
                    label: s.label,
                    heard: s.vector.iter().filter(|&&v| v != SENTINEL_DBM).count(),
                    fingerprint: format_fingerprint(&s.vector),
                })
                .collect();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Table if rows.is_empty() => {
                    println!("{}", "No samples recorded".dimmed());
                }
                OutputFormat::Table => {
                    let table = Table::new(rows).with(Style::rounded()).to_string();
                    println!("{}", table);
                }
            }
        }
        SamplesCommand::Rm { index } => {
            let removed = session.remove_sample(index)?;
            tracing::info!(index, label = removed.label, "training sample removed");
            println!(
                "{} Removed sample {} (label {})",
                "[OK]".green().bold(),
                index,
                removed.label
            );
        }
    }
    Ok(())
}

fn format_fingerprint(vector: &[f32]) -> String {
    vector
        .iter()
        .map(|v| format!("{v:.0}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a fingerprint as a rows x cols table of dBm readings.
fn signal_grid(grid: GridShape, fingerprint: &[f32]) -> String {
    let mut cells = vec![vec!["--".to_string(); grid.cols]; grid.rows];
    for (index, &rssi) in fingerprint.iter().enumerate() {
        if rssi == SENTINEL_DBM {
            continue;
        }
        if let Some((row, col)) = grid.cell_of(index) {
            cells[row][col] = format!("{rssi:.0} dBm");
        }
    }

    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend((0..grid.cols).map(|c| format!("col {c}")));
    builder.push_record(header);
    for (row, readings) in cells.into_iter().enumerate() {
        let mut record = vec![format!("row {row}")];
        record.extend(readings);
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}
