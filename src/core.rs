pub mod calculator;
pub mod comparison;
pub mod contract;
pub mod costs;
pub mod decision;
pub mod demand;
#[cfg(test)]
pub mod fixtures;
pub mod history;
pub mod issue;
pub mod orchestrator;
pub mod pricing;
pub mod series;
pub mod settings;
pub mod simulator;
pub mod tariff;

pub use self::{
    contract::{ConsumerUnit, CurrentContract},
    history::ConsumptionRecord,
    settings::Settings,
    tariff::{BlueRates, GreenRates, TariffFlag, TariffRateSet, Validity},
};
