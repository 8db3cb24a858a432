use std::{fmt::Debug, fs, path::Path};

use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::{
    core::{
        BlueRates,
        ConsumerUnit,
        ConsumptionRecord,
        CurrentContract,
        GreenRates,
        TariffRateSet,
        Validity,
    },
    prelude::*,
};

/// Everything known about a consumer unit, as prepared by the caller.
#[derive(Deserialize)]
pub struct UnitDocument {
    /// Reference date, defaults to the local date.
    pub today: Option<NaiveDate>,

    pub consumer_unit: ConsumerUnit,
    pub contract: CurrentContract,

    #[serde(default)]
    pub bills: Vec<ConsumptionRecord>,

    #[serde(default)]
    tariffs: TariffsDocument,
}

#[derive(Default, Deserialize)]
struct TariffsDocument {
    blue: Option<TariffDocument<BlueRates>>,
    green: Option<TariffDocument<GreenRates>>,
}

#[derive(Deserialize)]
struct TariffDocument<R> {
    #[serde(flatten)]
    validity: Validity,

    #[serde(flatten)]
    rates: R,
}

/// Validated tariffs of the document.
pub struct Tariffs {
    pub blue: Option<TariffRateSet>,
    pub green: Option<TariffRateSet>,
}

impl UnitDocument {
    #[instrument(name = "Reading the consumer unit…")]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to parse `{}`", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        let document: Self = toml::from_str(contents)?;
        debug!(n_bills = document.bills.len(), "parsed");
        Ok(document)
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn tariffs(&self) -> Result<Tariffs> {
        let blue = self
            .tariffs
            .blue
            .as_ref()
            .map(|tariff| TariffRateSet::try_blue(tariff.validity, tariff.rates.clone()))
            .transpose()
            .context("invalid blue tariff")?;
        let green = self
            .tariffs
            .green
            .as_ref()
            .map(|tariff| TariffRateSet::try_green(tariff.validity, tariff.rates.clone()))
            .transpose()
            .context("invalid green tariff")?;
        Ok(Tariffs { blue, green })
    }
}
