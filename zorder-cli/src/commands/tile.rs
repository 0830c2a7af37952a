//! `zorder tile`: NDS packed tile ids.

use clap::{Args, Subcommand};
use serde_json::json;
use zorder::{packed_tile_id, read_packed_tile_id};

use super::common::OutputFormat;
use crate::error::CliError;

/// Tile subcommands.
#[derive(Debug, Subcommand)]
pub enum TileCommands {
    /// Compute the packed tile id of a point
    Pack(PackArgs),

    /// Decode a packed tile id into its south-west corner and level
    Read(ReadArgs),
}

/// Arguments for `tile pack`.
#[derive(Debug, Args)]
pub struct PackArgs {
    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Tile level (0-15)
    #[arg(long, default_value_t = 13)]
    pub level: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Arguments for `tile read`.
#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Packed tile id
    pub id: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Run a tile subcommand.
pub fn run(command: TileCommands) -> Result<(), CliError> {
    println!("{}", render(&command)?);
    Ok(())
}

fn render(command: &TileCommands) -> Result<String, CliError> {
    match command {
        TileCommands::Pack(args) => {
            let id = packed_tile_id(args.lon, args.lat, args.level)?;
            Ok(match args.format {
                OutputFormat::Text => id.to_string(),
                OutputFormat::Json => serde_json::to_string_pretty(&json!({
                    "id": id,
                    "level": args.level,
                }))?,
            })
        }
        TileCommands::Read(args) => {
            let (corner, level) = read_packed_tile_id(args.id)?;
            Ok(match args.format {
                OutputFormat::Text => {
                    format!("{} {} (level {})", corner.longitude, corner.latitude, level)
                }
                OutputFormat::Json => serde_json::to_string_pretty(&json!({
                    "lon": corner.longitude,
                    "lat": corner.latitude,
                    "level": level,
                }))?,
            })
        }
    }
}
