//! `zorder index`: compute the key of a point.

use clap::Args;
use serde_json::json;
use zorder::sfc::{Z2_MAX_PRECISION, Z3_MAX_PRECISION};
use zorder::week::week_date;
use zorder::{Z2Sfc, Z3Sfc};

use super::common::{parse_datetime, OutputFormat};
use crate::error::CliError;

/// Arguments for the index command.
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// RFC 3339 timestamp; selects the space-time curve
    #[arg(long)]
    pub time: Option<String>,

    /// Bits per axis (default 31 without --time, 21 with it)
    #[arg(long)]
    pub precision: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Run the index command.
pub fn run(args: IndexArgs) -> Result<(), CliError> {
    println!("{}", render(&args)?);
    Ok(())
}

fn render(args: &IndexArgs) -> Result<String, CliError> {
    let Some(time) = &args.time else {
        let sfc = Z2Sfc::new(args.precision.unwrap_or(Z2_MAX_PRECISION))?;
        let z = sfc.index(args.lon, args.lat)?;
        return Ok(match args.format {
            OutputFormat::Text => z.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&json!({ "z": z }))?,
        });
    };

    let week = week_date(&parse_datetime(time)?);
    let seconds = week.seconds.floor() as u64;
    let sfc = Z3Sfc::new(args.precision.unwrap_or(Z3_MAX_PRECISION))?;
    let z = sfc.index(args.lon, args.lat, seconds)?;

    Ok(match args.format {
        OutputFormat::Text => format!("{} (week {}, {}s)", z, week.week_number, seconds),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "z": z,
            "week_number": week.week_number,
            "seconds": seconds,
        }))?,
    })
}
