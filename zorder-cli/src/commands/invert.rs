//! `zorder invert`: decode a key back to the centre of its cell.

use clap::{Args, ValueEnum};
use serde_json::json;
use zorder::sfc::{Z2_MAX_PRECISION, Z3_MAX_PRECISION};
use zorder::{Z2Sfc, Z3Sfc};

use super::common::OutputFormat;
use crate::error::CliError;

/// Curve selection for CLI arguments.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum CurveKind {
    /// Longitude/latitude
    #[default]
    Z2,
    /// Longitude/latitude/time of week
    Z3,
}

/// Arguments for the invert command.
#[derive(Debug, Args)]
pub struct InvertArgs {
    /// Z-value to decode
    pub z: u64,

    /// Curve the key was built with
    #[arg(long, value_enum, default_value_t)]
    pub curve: CurveKind,

    /// Bits per axis (default 31 for z2, 21 for z3)
    #[arg(long)]
    pub precision: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Run the invert command.
pub fn run(args: InvertArgs) -> Result<(), CliError> {
    println!("{}", render(&args)?);
    Ok(())
}

fn render(args: &InvertArgs) -> Result<String, CliError> {
    let value = match args.curve {
        CurveKind::Z2 => {
            let sfc = Z2Sfc::new(args.precision.unwrap_or(Z2_MAX_PRECISION))?;
            let (lon, lat) = sfc.invert(args.z);
            json!({ "longitude": lon, "latitude": lat })
        }
        CurveKind::Z3 => {
            let sfc = Z3Sfc::new(args.precision.unwrap_or(Z3_MAX_PRECISION))?;
            let (lon, lat, seconds) = sfc.invert(args.z);
            json!({ "longitude": lon, "latitude": lat, "seconds": seconds })
        }
    };

    Ok(match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&value)?,
        OutputFormat::Text => {
            let mut line = format!("{} {}", value["longitude"], value["latitude"]);
            if let Some(seconds) = value.get("seconds") {
                line.push_str(&format!(" {}", seconds));
            }
            line
        }
    })
}
