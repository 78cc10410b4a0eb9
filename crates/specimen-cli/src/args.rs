use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the specimen binary.
#[derive(Parser, Debug)]
#[command(
    name = "specimen",
    version,
    about = "Synthesize one representative value per type from a JSON type schema"
)]
pub struct CliArgs {
    /// Schema document describing the types.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    // ==================== Selection ====================
    /// Type to synthesize (repeatable).
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub types: Vec<String>,

    /// Synthesize every declared non-generic type in one batch.
    #[arg(long, conflicts_with = "types")]
    pub all: bool,

    // ==================== Synthesis ====================
    /// Configuration file. Defaults to `specimen.json` in the working
    /// directory when present.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Deepest nesting level that still produces a value.
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<u32>,

    /// Resolve interfaces to the implementation with the fewest interfaces.
    #[arg(long = "most-specific")]
    pub most_specific: bool,

    /// Use one fixed guid so output is reproducible.
    #[arg(long = "fixed-guids")]
    pub fixed_guids: bool,

    /// Retry narrower constructors when the widest one fails.
    #[arg(long = "constructor-fallback")]
    pub constructor_fallback: bool,

    // ==================== Output ====================
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Exit with a failure status when any warning was recorded.
    #[arg(long = "deny-warnings")]
    pub deny_warnings: bool,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    pub no_color: bool,
}
