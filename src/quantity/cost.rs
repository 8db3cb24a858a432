use std::fmt::{Debug, Display, Formatter};

use serde::Serializer;

use crate::quantity::Quantity;

/// Amount in reais.
pub type Cost = Quantity<f64, 0, 0, 1>;

impl Cost {
    /// Round to cents, half-up.
    pub fn round_to_cents(self) -> Self {
        // Cancel the float noise first, so that `1.005` is not seen as `1.00499…`:
        let cents = (self.0 * 100.0 * 1e6).round() / 1e6;
        Self((cents + 0.5).floor() / 100.0)
    }

    #[expect(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize_cents<S: Serializer>(cost: &Self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(cost.round_to_cents().0)
    }

    pub fn serialize_optional_cents<S: Serializer>(
        cost: &Option<Self>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match cost {
            Some(cost) => Self::serialize_cents(cost, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Serialize the chart series with the items rounded to cents.
    pub fn serialize_cents_series<S: Serializer>(
        series: &[Option<Self>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(series.iter().map(|cost| cost.map(|cost| cost.round_to_cents().0)))
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {:.2}", self.round_to_cents().0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R${:.3}", self.0)
    }
}
