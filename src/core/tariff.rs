use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use comfy_table::Color;
use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    quantity::rate::{KilowattRate, MegawattHourRate},
};

/// Tariff modality.
#[derive(Debug, Deserialize, Serialize, clap::ValueEnum, enumset::EnumSetType)]
#[serde(rename_all = "lowercase")]
pub enum TariffFlag {
    /// Separate peak and off-peak demand charges.
    Blue,

    /// Single demand charge, peak and off-peak differ in the consumption charges only.
    Green,
}

impl Display for TariffFlag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blue => write!(f, "Blue"),
            Self::Green => write!(f, "Green"),
        }
    }
}

impl TariffFlag {
    pub const fn color(self) -> Color {
        match self {
            Self::Blue => Color::Blue,
            Self::Green => Color::Green,
        }
    }
}

/// Period in which the published rates apply.
#[must_use]
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct Validity {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Validity {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

#[must_use]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BlueRates {
    pub peak_tusd_per_kw: KilowattRate,
    pub peak_tusd_per_mwh: MegawattHourRate,
    pub peak_te_per_mwh: MegawattHourRate,
    pub off_peak_tusd_per_kw: KilowattRate,
    pub off_peak_tusd_per_mwh: MegawattHourRate,
    pub off_peak_te_per_mwh: MegawattHourRate,

    #[serde(default = "KilowattRate::default_zero")]
    pub power_generation_tusd_per_kw: KilowattRate,
}

#[must_use]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GreenRates {
    pub peak_tusd_per_mwh: MegawattHourRate,
    pub peak_te_per_mwh: MegawattHourRate,
    pub off_peak_tusd_per_mwh: MegawattHourRate,
    pub off_peak_te_per_mwh: MegawattHourRate,

    /// Demand rate, not split into peak and off-peak.
    pub na_tusd_per_kw: KilowattRate,

    #[serde(default = "KilowattRate::default_zero")]
    pub power_generation_tusd_per_kw: KilowattRate,
}

impl KilowattRate {
    const fn default_zero() -> Self {
        Self::ZERO
    }
}

/// Rates of exactly one modality.
#[derive(Clone, Debug)]
pub enum Rates {
    Blue(BlueRates),
    Green(GreenRates),
}

/// Tariff snapshot of a distributor for one subgroup and modality.
#[must_use]
#[derive(Clone, Debug)]
pub struct TariffRateSet {
    pub validity: Validity,
    rates: Rates,
}

impl TariffRateSet {
    pub fn try_blue(validity: Validity, rates: BlueRates) -> Result<Self> {
        Self::try_new(validity, Rates::Blue(rates))
    }

    pub fn try_green(validity: Validity, rates: GreenRates) -> Result<Self> {
        Self::try_new(validity, Rates::Green(rates))
    }

    fn try_new(validity: Validity, rates: Rates) -> Result<Self> {
        ensure!(
            validity.start_date <= validity.end_date,
            "tariff validity starts on {} after it ends on {}",
            validity.start_date,
            validity.end_date,
        );
        let (power_rates, energy_rates) = match &rates {
            Rates::Blue(rates) => (
                vec![
                    rates.peak_tusd_per_kw,
                    rates.off_peak_tusd_per_kw,
                    rates.power_generation_tusd_per_kw,
                ],
                vec![
                    rates.peak_tusd_per_mwh,
                    rates.peak_te_per_mwh,
                    rates.off_peak_tusd_per_mwh,
                    rates.off_peak_te_per_mwh,
                ],
            ),
            Rates::Green(rates) => (
                vec![rates.na_tusd_per_kw, rates.power_generation_tusd_per_kw],
                vec![
                    rates.peak_tusd_per_mwh,
                    rates.peak_te_per_mwh,
                    rates.off_peak_tusd_per_mwh,
                    rates.off_peak_te_per_mwh,
                ],
            ),
        };
        ensure!(
            power_rates.iter().all(|rate| rate.is_non_negative())
                && energy_rates.iter().all(|rate| rate.is_non_negative()),
            "{} tariff rates must be non-negative",
            rates.flag(),
        );
        Ok(Self { validity, rates })
    }

    pub const fn flag(&self) -> TariffFlag {
        self.rates.flag()
    }

    pub fn as_blue(&self) -> Result<&BlueRates> {
        match &self.rates {
            Rates::Blue(rates) => Ok(rates),
            Rates::Green(_) => bail!("the tariff is green, cannot use it as blue"),
        }
    }

    pub fn as_green(&self) -> Result<&GreenRates> {
        match &self.rates {
            Rates::Green(rates) => Ok(rates),
            Rates::Blue(_) => bail!("the tariff is blue, cannot use it as green"),
        }
    }
}

impl Rates {
    pub const fn flag(&self) -> TariffFlag {
        match self {
            Self::Blue(_) => TariffFlag::Blue,
            Self::Green(_) => TariffFlag::Green,
        }
    }
}
