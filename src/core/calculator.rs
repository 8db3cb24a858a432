use bon::Builder;
use ordered_float::OrderedFloat;

use crate::{
    core::{
        comparison::ContractsComparison,
        contract::{CurrentContract, Subgroup},
        costs::CostSeries,
        history::ConsumptionHistory,
        issue::Issue,
        pricing::Pricing,
        settings::Settings,
        simulator::{PercentileSimulator, RecommendationSummary, Simulation},
        tariff::{TariffFlag, TariffRateSet},
    },
    fmt::FormattedPercentage,
    prelude::*,
    quantity::power::Kilowatts,
};

/// Tariffs of the distributor, filtered down to the modalities the subgroup permits.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct UsableTariffs<'a> {
    pub blue: Option<&'a TariffRateSet>,
    pub green: Option<&'a TariffRateSet>,
}

impl<'a> UsableTariffs<'a> {
    pub fn new(
        subgroup: Subgroup,
        blue: Option<&'a TariffRateSet>,
        green: Option<&'a TariffRateSet>,
    ) -> Self {
        let allowed = subgroup.allowed_flags();
        Self {
            blue: blue.filter(|_| allowed.contains(TariffFlag::Blue)),
            green: green.filter(|_| allowed.contains(TariffFlag::Green)),
        }
    }

    pub const fn get(&self, flag: TariffFlag) -> Option<&'a TariffRateSet> {
        match flag {
            TariffFlag::Blue => self.blue,
            TariffFlag::Green => self.green,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TariffRateSet> {
        self.blue.into_iter().chain(self.green)
    }

    /// Price the current contract with the tariff of its own modality.
    ///
    /// Falls back to the other usable tariff when the own one is missing:
    /// its billing rules pick the contracted demands they need.
    pub fn bill_current_contract(
        &self,
        contract: &CurrentContract,
        history: &ConsumptionHistory,
    ) -> Result<CostSeries> {
        let tariff = self
            .get(contract.tariff_flag)
            .or_else(|| self.iter().next())
            .ok_or(Issue::TariffsNotFound)?;
        let series = match tariff.flag() {
            TariffFlag::Blue => {
                let rates = tariff.as_blue()?;
                CostSeries::bill(rates, history, rates.contracted_demand(contract))
            }
            TariffFlag::Green => {
                let rates = tariff.as_green()?;
                CostSeries::bill(rates, history, rates.contracted_demand(contract))
            }
        };
        Ok(series)
    }
}

/// Outcome of the calculation for a consumer unit with enough history.
#[must_use]
#[derive(Clone, Debug)]
pub struct Recommendation {
    pub subgroup: Subgroup,

    /// Percentile scans of every usable tariff, Blue first.
    pub simulations: Vec<Simulation>,

    /// Recommended modality and demand.
    pub summary: RecommendationSummary,

    pub current: CostSeries,
    pub comparison: ContractsComparison,
    pub cost_ratio: f64,

    /// Savings rounded to a tenth of a percent, never negative.
    pub nominal_savings_percentage: f64,

    pub should_renew: bool,
    pub total_installed_power: Option<Kilowatts>,
}

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct RecommendationCalculator<'a> {
    history: &'a ConsumptionHistory,
    contract: &'a CurrentContract,
    blue: Option<&'a TariffRateSet>,
    green: Option<&'a TariffRateSet>,
    settings: &'a Settings,

    /// Informational, not used to compute the costs.
    total_installed_power: Option<Kilowatts>,
}

impl<S: recommendation_calculator_builder::IsComplete> RecommendationCalculatorBuilder<'_, S> {
    pub fn calculate(self) -> Result<Recommendation> {
        self.build().calculate()
    }
}

impl RecommendationCalculator<'_> {
    #[instrument(
        skip_all,
        fields(flag = %self.contract.tariff_flag, subgroup = %self.contract.subgroup, n_periods = self.history.len()),
    )]
    fn calculate(self) -> Result<Recommendation> {
        let tariffs = UsableTariffs::new(self.contract.subgroup, self.blue, self.green);
        if tariffs.iter().next().is_none() {
            bail!(Issue::TariffsNotFound);
        }
        let current = tariffs.bill_current_contract(self.contract, self.history)?;

        let simulations = tariffs
            .iter()
            .map(|tariff| self.simulate(tariff))
            .collect::<Result<Vec<_>>>()?;
        let summary = simulations
            .iter()
            .map(|simulation| &simulation.summary)
            .min_by_key(|summary| OrderedFloat(summary.totals().total.0))
            .context("no tariff has been simulated")?
            .clone();

        let comparison = ContractsComparison::try_new(&current, &summary.costs)?;
        let cost_ratio = comparison.cost_ratio();
        let nominal_savings_percentage = ((cost_ratio * 1000.0).round() / 10.0).max(0.0);
        let should_renew = cost_ratio > self.settings.minimum_savings_for_renewal;
        info!(
            recommended_flag = %summary.flag,
            demand = %summary.demand(),
            current_total = %comparison.current_totals().total,
            recommended_total = %comparison.recommended_totals().total,
            cost_ratio = ?FormattedPercentage(cost_ratio),
            should_renew,
            "calculated",
        );

        Ok(Recommendation {
            subgroup: self.contract.subgroup,
            simulations,
            summary,
            current,
            comparison,
            cost_ratio,
            nominal_savings_percentage,
            should_renew,
            total_installed_power: self.total_installed_power,
        })
    }

    fn simulate(&self, tariff: &TariffRateSet) -> Result<Simulation> {
        match tariff.flag() {
            TariffFlag::Blue => {
                PercentileSimulator::new(tariff.as_blue()?, self.history, self.settings).simulate()
            }
            TariffFlag::Green => {
                PercentileSimulator::new(tariff.as_green()?, self.history, self.settings).simulate()
            }
        }
    }
}
