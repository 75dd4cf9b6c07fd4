//! Levels command
//!
//! Usage: applog levels [RAW...]

use applog_core::{level_capital_string, level_string, Severity};
use clap::Args;

#[derive(Debug, Args)]
pub struct LevelsArgs {
    /// Raw numeric levels to format (default: every known severity)
    #[arg(allow_negative_numbers = true)]
    pub raw: Vec<i8>,
}

/// Execute levels command
pub fn execute(args: LevelsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raws: Vec<i8> = if args.raw.is_empty() {
        Severity::ALL.iter().map(|s| i8::from(*s)).collect()
    } else {
        args.raw
    };

    for raw in raws {
        println!(
            "{:>4}  {:<12} {}",
            raw,
            level_string(raw),
            level_capital_string(raw)
        );
    }

    Ok(())
}
