use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Cost, rate::KilowattRate};

pub type Kilowatts = Quantity<f64, 1, 0, 0>;

impl Kilowatts {
    /// Apply the safety margin and round up to the next whole kilowatt.
    ///
    /// Never rounds down, so the margin can only add capacity.
    pub fn ceil_with_margin(self, margin: f64) -> Self {
        // Cancel the float noise, so that `1.05 × 20` stays at 21:
        let with_margin = (self.0 * (1.0 + margin) * 1e6).round() / 1e6;
        Self(with_margin.ceil())
    }
}

impl Display for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} kW", self.0)
    }
}

impl Debug for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kW", self.0)
    }
}

impl Mul<KilowattRate> for Kilowatts {
    type Output = Cost;

    fn mul(self, rhs: KilowattRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
