//! parking-rssi CLI
//!
//! Command-line front end for recording WiFi fingerprints of a parking lot
//! and predicting how many slots are occupied.
//!
//! # Features
//!
//! - **grid**: Show or change the access-point grid and lot capacity
//! - **ap**: Bind access points to grid cells
//! - **train**: Record a labelled fingerprint from a scan capture
//! - **predict**: Estimate occupancy from a scan capture
//! - **samples**: Inspect and prune recorded fingerprints
//!
//! # Usage
//!
//! ```bash
//! # 2 x 2 grid for a 12 slot lot
//! parking-rssi grid set --rows 2 --cols 2 --capacity 12
//!
//! # Bind an access point to the top-left cell
//! parking-rssi ap add --bssid a4:2b:b0:01:02:03 --name Lot-A --row 0 --col 0
//!
//! # Record an empty-lot fingerprint, then predict
//! parking-rssi train --label 0 --scan empty.json
//! parking-rssi predict --scan now.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// parking-rssi Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "parking-rssi")]
#[command(author, version, about = "WiFi fingerprint parking occupancy estimation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the configuration, access points and samples
    #[arg(short, long, global = true, default_value = "parking-data")]
    pub data_dir: PathBuf,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show or change the grid
    #[command(subcommand)]
    Grid(commands::GridCommand),

    /// Manage access point bindings
    #[command(subcommand)]
    Ap(commands::ApCommand),

    /// Record a labelled fingerprint
    Train(commands::TrainArgs),

    /// Predict occupancy
    Predict(commands::PredictArgs),

    /// Inspect recorded fingerprints
    #[command(subcommand)]
    Samples(commands::SamplesCommand),

    /// Display version information
    Version,
}
