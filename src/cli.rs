use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "motive",
    version,
    about = "Player motivation profiles (Yee, Bartle) from game-library playtime data"
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
    /// Raw and normalized profiles for every participant
    Profile(ProfileCommand),
    /// One participant's proportions against the group mean
    Radar(RadarCommand),
    /// Bartle compass placement for every participant
    Compass(CompassCommand),
    /// Library statistics per participant
    Stats(DatasetArgs),
    /// Most played games and dominant genres per participant
    Library(LibraryCommand),
    /// Dataset-wide exploration summary
    Explore(DatasetArgs),
    /// Every normalized genre and category with its frequency
    Tags(DatasetArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TaxonomyArg {
    Yee,
    Bartle,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

/// Dataset file or directory of `.json`/`.jsonl` files.
#[derive(Args)]
pub struct DatasetArgs {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ProfileCommand {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Restrict the report to one taxonomy (both by default)
    #[arg(long, value_enum)]
    pub taxonomy: Option<TaxonomyArg>,
}

#[derive(Args)]
pub struct RadarCommand {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[arg(long)]
    pub user: String,
    #[arg(long, value_enum, default_value = "yee")]
    pub taxonomy: TaxonomyArg,
}

#[derive(Args)]
pub struct CompassCommand {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Keep raw score differences instead of scaling each axis to [-1, 1]
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct LibraryCommand {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Number of most played games listed per participant
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub top: Option<usize>,
}
