use clap::Parser;

use crate::{core::Settings, prelude::*, quantity::power::Kilowatts};

#[derive(Copy, Clone, Parser)]
pub struct SettingsArgs {
    /// Minimum contractable demand.
    #[clap(long = "minimum-demand-kilowatts", env = "MINIMUM_DEMAND_KILOWATTS", default_value = "30")]
    pub minimum_demand: Kilowatts,

    /// Minimum number of usable energy bills to recommend anything.
    #[clap(long, env = "MINIMUM_ENERGY_BILLS", default_value = "6")]
    pub minimum_energy_bills: usize,

    /// Number of energy bills in a complete history, also the window length in months.
    #[clap(long, env = "IDEAL_ENERGY_BILLS", default_value = "12")]
    pub ideal_energy_bills: usize,

    /// Savings ratio above which the contract should be renewed.
    #[clap(long, env = "MINIMUM_SAVINGS_FOR_RENEWAL", default_value = "0.05")]
    pub minimum_savings_for_renewal: f64,

    /// Safety margin on top of the selected percentile demand.
    #[clap(long, env = "SAFETY_MARGIN", default_value = "0.05")]
    pub safety_margin: f64,
}

impl TryFrom<SettingsArgs> for Settings {
    type Error = Error;

    fn try_from(args: SettingsArgs) -> Result<Self> {
        Self::builder()
            .minimum_demand(args.minimum_demand)
            .minimum_energy_bills(args.minimum_energy_bills)
            .ideal_energy_bills(args.ideal_energy_bills)
            .minimum_savings_for_renewal(args.minimum_savings_for_renewal)
            .safety_margin(args.safety_margin)
            .build()
            .context("invalid recommendation settings")
    }
}
