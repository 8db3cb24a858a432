use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::{core::tariff::TariffFlag, quantity::power::Kilowatts};

/// Voltage class of the supply.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Subgroup {
    /// 230 kV and above.
    A1,

    /// 88 kV to 138 kV.
    A2,

    /// 69 kV.
    A3,

    /// 30 kV to 44 kV.
    A3a,

    /// 2.3 kV to 25 kV.
    A4,

    /// Below 2.3 kV from an underground distribution system.
    #[serde(rename = "AS")]
    As,
}

impl Subgroup {
    /// Tariff modalities permitted for the voltage class.
    pub fn allowed_flags(self) -> EnumSet<TariffFlag> {
        match self {
            Self::A2 | Self::A3 => EnumSet::only(TariffFlag::Blue),
            Self::A1 | Self::A3a | Self::A4 | Self::As => EnumSet::all(),
        }
    }
}

impl Display for Subgroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A1 => write!(f, "A1"),
            Self::A2 => write!(f, "A2"),
            Self::A3 => write!(f, "A3"),
            Self::A3a => write!(f, "A3a"),
            Self::A4 => write!(f, "A4"),
            Self::As => write!(f, "AS"),
        }
    }
}

/// Contract currently in force for the consumer unit.
#[must_use]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CurrentContract {
    pub tariff_flag: TariffFlag,
    pub subgroup: Subgroup,

    #[serde(rename = "peak_contracted_demand_kw")]
    pub peak_contracted_demand: Kilowatts,

    /// For the green modality, this is the single contracted demand.
    #[serde(rename = "off_peak_contracted_demand_kw")]
    pub off_peak_contracted_demand: Kilowatts,
}

#[must_use]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConsumerUnit {
    #[serde(default = "ConsumerUnit::default_is_active")]
    pub is_active: bool,

    /// Start date of the oldest contract, no bills are expected before it.
    pub oldest_contract_start_date: NaiveDate,

    /// Installed generation power, informational only.
    #[serde(default, rename = "total_installed_power_kw")]
    pub total_installed_power: Option<Kilowatts>,
}

impl ConsumerUnit {
    const fn default_is_active() -> bool {
        true
    }
}
