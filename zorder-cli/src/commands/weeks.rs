//! `zorder weeks`: show how a date span is cut into week slices.

use clap::Args;
use zorder::decompose;

use super::common::{parse_datetime, OutputFormat};
use crate::error::CliError;

/// Arguments for the weeks command.
#[derive(Debug, Args)]
pub struct WeeksArgs {
    /// Start of the span (RFC 3339)
    #[arg(long)]
    pub from: String,

    /// End of the span (RFC 3339)
    #[arg(long)]
    pub to: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Run the weeks command.
pub fn run(args: WeeksArgs) -> Result<(), CliError> {
    println!("{}", render(&args)?);
    Ok(())
}

fn render(args: &WeeksArgs) -> Result<String, CliError> {
    let weeks = decompose(&parse_datetime(&args.from)?, &parse_datetime(&args.to)?)?;

    Ok(match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&weeks)?,
        OutputFormat::Text => weeks
            .iter()
            .map(|w| format!("{} {} {}", w.min.week_number, w.min.seconds, w.max.seconds))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}
