//! `zorder ranges`: compute the scan ranges for a bounding box.
//!
//! Without `--from`/`--to` the query runs against the 2D curve. With both it
//! runs against the space-time curve and the week slices are reported too.

use std::path::Path;

use clap::Args;
use serde_json::json;
use tracing::info;
use zorder::sfc::{Z2_MAX_PRECISION, Z3_MAX_PRECISION};
use zorder::{BoundingBox, IndexRange, WeekTimeRange, Z2Search, Z3Search, Z3Sfc};

use super::common::{load_search_config, parse_datetime, parse_point, OutputFormat, SearchArgs};
use crate::error::CliError;

/// Arguments for the ranges command.
#[derive(Debug, Args)]
pub struct RangesArgs {
    /// South-west corner as LON,LAT
    #[arg(long, allow_hyphen_values = true)]
    pub sw: String,

    /// North-east corner as LON,LAT
    #[arg(long, allow_hyphen_values = true)]
    pub ne: String,

    /// Start of the time window (RFC 3339)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// End of the time window (RFC 3339)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Bits per axis (default 31 without --from/--to, 21 with them)
    #[arg(long)]
    pub precision: Option<u32>,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Run the ranges command.
pub fn run(args: RangesArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    println!("{}", render(&args, config_path)?);
    Ok(())
}

fn render(args: &RangesArgs, config_path: Option<&Path>) -> Result<String, CliError> {
    let config = args.search.apply(load_search_config(config_path)?);
    let bbox = BoundingBox::new(parse_point(&args.sw)?, parse_point(&args.ne)?);

    let (ranges, weeks) = match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            let sfc = Z3Sfc::new(args.precision.unwrap_or(Z3_MAX_PRECISION))?;
            let search = Z3Search::with_curve(sfc).with_config(config);
            let (ranges, weeks) =
                search.ranges_with_weeks(&bbox, &parse_datetime(from)?, &parse_datetime(to)?)?;
            (ranges, Some(weeks))
        }
        (None, None) => {
            let search =
                Z2Search::new(args.precision.unwrap_or(Z2_MAX_PRECISION))?.with_config(config);
            (search.ranges(&bbox)?, None)
        }
        _ => {
            return Err(CliError::Usage(
                "--from and --to must be given together".to_string(),
            ))
        }
    };

    info!(ranges = ranges.len(), "Computed scan ranges");

    Ok(match args.format {
        OutputFormat::Json => match &weeks {
            Some(weeks) => serde_json::to_string_pretty(&json!({
                "weeks": weeks,
                "ranges": ranges,
            }))?,
            None => serde_json::to_string_pretty(&ranges)?,
        },
        OutputFormat::Text => format_text(&ranges, weeks.as_deref()),
    })
}

fn format_text(ranges: &[IndexRange], weeks: Option<&[WeekTimeRange]>) -> String {
    let mut lines = Vec::with_capacity(ranges.len() + weeks.map_or(0, |w| w.len()));

    for week in weeks.unwrap_or_default() {
        lines.push(format!(
            "# week {}: {}..{}",
            week.min.week_number, week.min.seconds, week.max.seconds
        ));
    }
    for range in ranges {
        let kind = if range.contained { "contained" } else { "partial" };
        lines.push(format!("{} {} {}", range.lower, range.upper, kind));
    }

    lines.join("\n")
}
