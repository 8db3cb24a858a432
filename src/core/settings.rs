use bon::Builder;

use crate::{prelude::*, quantity::power::Kilowatts};

/// Regulatory penalty multiplier applied to the demand above the contracted level.
pub const OVERRUN_PENALTY: f64 = 3.0;

/// Candidate percentiles of the measured demand, in the order they are scanned.
pub const PERCENTILES: [f64; 11] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 0.98];

/// Recommendation parameters.
#[must_use]
#[derive(Clone, Debug, Builder)]
#[builder(finish_fn(name = build_unchecked, vis = ""))]
pub struct Settings {
    /// Minimum contractable demand, each candidate demand is floored at it.
    #[builder(default = Kilowatts::from(30.0))]
    pub minimum_demand: Kilowatts,

    /// Minimum number of usable energy bills to produce a recommendation.
    #[builder(default = 6)]
    pub minimum_energy_bills: usize,

    /// Number of energy bills for a complete year of history.
    ///
    /// Also the length of the recommendation window in months.
    #[builder(default = 12)]
    pub ideal_energy_bills: usize,

    /// Savings ratio above which the contract change is worth it.
    #[builder(default = 0.05)]
    pub minimum_savings_for_renewal: f64,

    /// Safety margin on top of the selected percentile demand.
    #[builder(default = 0.05)]
    pub safety_margin: f64,

    #[builder(default = PERCENTILES.to_vec())]
    pub percentiles: Vec<f64>,
}

impl<S: settings_builder::IsComplete> SettingsBuilder<S> {
    pub fn build(self) -> Result<Settings> {
        let settings = self.build_unchecked();
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build_unchecked()
    }
}

impl Settings {
    fn validate(&self) -> Result {
        ensure!(self.minimum_demand.0 >= 0.0, "minimum demand must not be negative");
        ensure!(self.minimum_energy_bills != 0, "at least one energy bill must be required");
        ensure!(
            self.ideal_energy_bills >= self.minimum_energy_bills,
            "the ideal number of energy bills ({}) is below the minimum ({})",
            self.ideal_energy_bills,
            self.minimum_energy_bills,
        );
        ensure!(
            (0.0..1.0).contains(&self.minimum_savings_for_renewal),
            "the renewal threshold must be in `0..1`, got {}",
            self.minimum_savings_for_renewal,
        );
        ensure!(
            self.safety_margin >= 0.0,
            "the safety margin must not be negative, got {}",
            self.safety_margin,
        );
        ensure!(
            self.percentiles.iter().all(|percentile| (0.0..=1.0).contains(percentile)),
            "percentiles must be in `0..=1`",
        );
        Ok(())
    }
}
