use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::settings::SettingsArgs,
    core::{
        Settings,
        TariffFlag,
        history::{BillingWindow, EnergyBills},
        simulator::{PercentileSimulator, Simulation},
    },
    input::UnitDocument,
    prelude::*,
    tables::build_percentiles_table,
};

#[derive(Parser)]
pub struct PercentilesArgs {
    /// Consumer unit document: contract, energy bills, and tariffs.
    #[clap(long, short, env = "INPUT_PATH")]
    input: PathBuf,

    /// Tariff modality to scan.
    #[clap(long, env = "TARIFF_FLAG", default_value = "blue")]
    flag: TariffFlag,

    #[clap(flatten)]
    settings: SettingsArgs,
}

impl PercentilesArgs {
    pub fn run(self) -> Result {
        let document = UnitDocument::read_from(&self.input)?;
        let tariffs = document.tariffs()?;
        let settings = Settings::try_from(self.settings)?;

        let window = BillingWindow::ending_before(
            document.today(),
            settings.ideal_energy_bills,
            document.consumer_unit.oldest_contract_start_date,
        );
        let bills = EnergyBills::try_collect(window, &document.bills)?;
        let tariff = match self.flag {
            TariffFlag::Blue => tariffs.blue,
            TariffFlag::Green => tariffs.green,
        }
        .with_context(|| format!("the document has no {} tariff", self.flag))?;

        let simulation: Simulation = match self.flag {
            TariffFlag::Blue => {
                PercentileSimulator::new(tariff.as_blue()?, &bills.history, &settings).simulate()?
            }
            TariffFlag::Green => {
                PercentileSimulator::new(tariff.as_green()?, &bills.history, &settings).simulate()?
            }
        };
        println!("{}", build_percentiles_table(&simulation));
        Ok(())
    }
}
