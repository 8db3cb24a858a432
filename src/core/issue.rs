use chrono::NaiveDate;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{core::tariff::TariffFlag, prelude::*};

/// Fatal problem: no demand is recommended when any is present.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Issue {
    #[display("the consumer unit is not active")]
    ConsumerUnitInactive,

    #[display("no tariffs found for the subgroup of the current contract")]
    TariffsNotFound,

    #[display("not enough energy bills: at least {required} are needed")]
    InsufficientHistory { required: usize },

    #[display(
        "not enough energy bills: at least {required} are needed, {n_atypical} atypical bills do not count"
    )]
    InsufficientHistoryWithAtypicalBills { required: usize, n_atypical: usize },

    #[display("calculation failed: {message}")]
    CalculationFailed { message: String },
}

impl std::error::Error for Issue {}

impl From<Error> for Issue {
    /// Recover the issue raised by the calculation, anything else is a calculation failure.
    fn from(error: Error) -> Self {
        error
            .downcast::<Self>()
            .unwrap_or_else(|error| Self::CalculationFailed { message: format!("{error:#}") })
    }
}

impl Issue {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConsumerUnitInactive => "consumerUnitInactive",
            Self::TariffsNotFound => "tariffsNotFound",
            Self::InsufficientHistory { .. } => "insufficientHistory",
            Self::InsufficientHistoryWithAtypicalBills { .. } => "insufficientHistoryWithAtypicalBills",
            Self::CalculationFailed { .. } => "calculationFailed",
        }
    }
}

/// Non-fatal problem: the recommendation is computed with the best available data.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Warning {
    #[display("{count} energy bills are pending, the recommendation improves with a full year")]
    PendingBills { count: usize },

    #[display("the {flag} tariff expired on {end_date}, the recommendation uses outdated rates")]
    ExpiredTariff { flag: TariffFlag, end_date: NaiveDate },
}

impl Warning {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PendingBills { .. } => "pendingBills",
            Self::ExpiredTariff { .. } => "expiredTariff",
        }
    }
}

/// Serialize as `{"code": …, <parameters>, "message": …}` for the clients to render
/// the message themselves or show the English one.
impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("code", self.code())?;
        match self {
            Self::ConsumerUnitInactive | Self::TariffsNotFound | Self::CalculationFailed { .. } => {}
            Self::InsufficientHistory { required } => {
                map.serialize_entry("required", required)?;
            }
            Self::InsufficientHistoryWithAtypicalBills { required, n_atypical } => {
                map.serialize_entry("required", required)?;
                map.serialize_entry("nAtypical", n_atypical)?;
            }
        }
        map.serialize_entry("message", &self.to_string())?;
        map.end()
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("code", self.code())?;
        match self {
            Self::PendingBills { count } => {
                map.serialize_entry("count", count)?;
            }
            Self::ExpiredTariff { flag, end_date } => {
                map.serialize_entry("flag", flag)?;
                map.serialize_entry("endDate", end_date)?;
            }
        }
        map.serialize_entry("message", &self.to_string())?;
        map.end()
    }
}
