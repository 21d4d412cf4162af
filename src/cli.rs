use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use threatscore::types::model::Platform;

#[derive(Parser)]
#[command(
    name = "threatscore",
    version,
    about = "Security posture score calculator for threat models"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the score for a platform and set of remediated threats
    Score(ScoreCommand),
    /// List every threat in the model
    Threats(ThreatsCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PlatformArg {
    #[value(name = "macOS")]
    MacOs,
    #[value(name = "Windows")]
    Windows,
    #[value(name = "Linux")]
    Linux,
    #[value(name = "iOS")]
    Ios,
    #[value(name = "Android")]
    Android,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::MacOs => Platform::MacOs,
            PlatformArg::Windows => Platform::Windows,
            PlatformArg::Linux => Platform::Linux,
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Android => Platform::Android,
        }
    }
}

#[derive(Args)]
pub struct ModelArgs {
    #[arg(long, value_enum)]
    pub platform: PlatformArg,
    /// Git branch to fetch the threat model from
    #[arg(long)]
    pub branch: Option<String>,
    /// Use a local threat model JSON file instead of fetching it
    #[arg(long, value_name = "FILE")]
    pub local_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ScoreCommand {
    #[command(flatten)]
    pub model: ModelArgs,
    /// Names of threats that are inactive (remediated)
    #[arg(long, num_args = 0.., value_name = "THREAT")]
    pub inactive: Vec<String>,
    /// Treat all threats as inactive (best case score)
    #[arg(long)]
    pub all_inactive: bool,
    /// JSON file with the list of inactive threat names
    #[arg(long, value_name = "FILE")]
    pub checks_file: Option<PathBuf>,
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
    /// Exit with code 2 when the overall score is below this percentage
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(i32).range(0..=100))]
    pub fail_under: Option<i32>,
}

#[derive(Args)]
pub struct ThreatsCommand {
    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
