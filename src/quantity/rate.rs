use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// Reais per kilowatt of contracted or exceeded demand.
pub type KilowattRate = Quantity<f64, -1, 0, 1>;

/// Reais per kilowatt-hour.
pub type KilowattHourRate = Quantity<f64, -1, -1, 1>;

impl Display for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {:.2}/kW", self.0)
    }
}

impl Debug for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R${:.2}/kW", self.0)
    }
}

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {:.4}/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R${:.4}/kWh", self.0)
    }
}

/// Reais per megawatt-hour, the unit the distributors publish the TUSD and TE energy rates in.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::From,
)]
#[serde(transparent)]
pub struct MegawattHourRate(pub f64);

impl MegawattHourRate {
    pub const fn is_non_negative(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl From<MegawattHourRate> for KilowattHourRate {
    fn from(rate: MegawattHourRate) -> Self {
        Quantity(rate.0 / 1000.0)
    }
}

impl Display for MegawattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {:.2}/MWh", self.0)
    }
}
