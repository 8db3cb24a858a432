mod percentiles;
mod recommend;
mod settings;

use clap::{Parser, Subcommand};

use crate::cli::{percentiles::PercentilesArgs, recommend::RecommendArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: recommend the contract for a consumer unit and print the comparison.
    #[clap(name = "recommend")]
    Recommend(Box<RecommendArgs>),

    /// Print the percentile scan of a single tariff.
    #[clap(name = "percentiles")]
    Percentiles(Box<PercentilesArgs>),
}
