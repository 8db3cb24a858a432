use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::quantity::power::Kilowatts;

/// Pair of peak and off-peak demands.
///
/// Green tariffs have a single demand, which is then present in both fields.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Demand {
    #[serde(rename = "peakDemandInKw")]
    pub peak: Kilowatts,

    #[serde(rename = "offPeakDemandInKw")]
    pub off_peak: Kilowatts,
}

impl Demand {
    pub const ZERO: Self = Self { peak: Kilowatts::ZERO, off_peak: Kilowatts::ZERO };

    pub const fn single(demand: Kilowatts) -> Self {
        Self { peak: demand, off_peak: demand }
    }

    pub fn at_least(self, minimum: Kilowatts) -> Self {
        Self { peak: self.peak.max(minimum), off_peak: self.off_peak.max(minimum) }
    }

    pub fn ceil_with_margin(self, margin: f64) -> Self {
        Self { peak: self.peak.ceil_with_margin(margin), off_peak: self.off_peak.ceil_with_margin(margin) }
    }
}

impl Display for Demand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.peak == self.off_peak {
            write!(f, "{}", self.peak)
        } else {
            write!(f, "{} / {}", self.peak, self.off_peak)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least() {
        let demand = Demand { peak: Kilowatts::from(12.0), off_peak: Kilowatts::from(45.0) };
        assert_eq!(
            demand.at_least(Kilowatts::from(30.0)),
            Demand { peak: Kilowatts::from(30.0), off_peak: Kilowatts::from(45.0) },
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Demand::single(Kilowatts::from(53.0)).to_string(), "53.00 kW");
        let demand = Demand { peak: Kilowatts::from(42.0), off_peak: Kilowatts::from(53.0) };
        assert_eq!(demand.to_string(), "42.00 kW / 53.00 kW");
    }
}
