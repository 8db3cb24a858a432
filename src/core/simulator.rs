use chrono::NaiveDate;
use ordered_float::OrderedFloat;

use crate::{
    core::{
        costs::{Costs, CostSeries},
        demand::Demand,
        history::ConsumptionHistory,
        pricing::Pricing,
        settings::Settings,
        tariff::TariffFlag,
    },
    fmt::FormattedPercentage,
    prelude::*,
    quantity::cost::Cost,
};

#[must_use]
#[derive(Clone, Debug)]
pub struct PercentileRow {
    pub date: NaiveDate,
    pub exceeded: Demand,
    pub demand_cost: Cost,
}

/// Demand costs of the history if the demand had been contracted at the percentile.
#[must_use]
#[derive(Clone, Debug)]
pub struct PercentileTable {
    pub percentile: f64,

    /// Percentile demand floored at the minimum contractable demand.
    pub demand: Demand,

    pub rows: Vec<PercentileRow>,
    pub total_demand_cost: Cost,
}

/// Minimum-cost percentile and the costs of the history at its recommended demand.
#[must_use]
#[derive(Clone, Debug)]
pub struct RecommendationSummary {
    pub flag: TariffFlag,
    pub percentile: f64,

    /// Demand of the selected percentile, before the safety margin.
    pub percentile_demand: Demand,

    /// Total demand cost of the selected percentile, before the safety margin.
    pub smallest_total_demand_cost: Cost,

    /// Recommended demand and the costs the history would have had with it.
    pub costs: CostSeries,
}

impl RecommendationSummary {
    pub const fn demand(&self) -> Demand {
        self.costs.contracted
    }

    pub fn totals(&self) -> Costs {
        self.costs.totals()
    }
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Simulation {
    pub percentiles: Vec<PercentileTable>,
    pub summary: RecommendationSummary,
}

/// Scans the candidate percentiles of the measured demand for the cheapest contracted demand.
pub struct PercentileSimulator<'a, P> {
    pricing: &'a P,
    history: &'a ConsumptionHistory,
    settings: &'a Settings,
}

impl<'a, P: Pricing> PercentileSimulator<'a, P> {
    pub const fn new(pricing: &'a P, history: &'a ConsumptionHistory, settings: &'a Settings) -> Self {
        Self { pricing, history, settings }
    }

    #[instrument(skip_all, fields(flag = %P::FLAG, n_periods = self.history.len()))]
    pub fn simulate(&self) -> Result<Simulation> {
        ensure!(!self.history.is_empty(), "cannot simulate the {} tariff on empty history", P::FLAG);
        let percentiles = self
            .settings
            .percentiles
            .iter()
            .map(|percentile| self.scan(*percentile))
            .collect::<Result<Vec<_>>>()?;
        let summary = self.summarize(&percentiles)?;
        Ok(Simulation { percentiles, summary })
    }

    fn scan(&self, percentile: f64) -> Result<PercentileTable> {
        let demand = self
            .pricing
            .percentile_demand(self.history, percentile)
            .context("no measured demand to take the percentile of")?
            .at_least(self.settings.minimum_demand);
        let rows: Vec<_> = self
            .history
            .iter()
            .map(|record| {
                let exceeded = self.pricing.exceeded_demand(record, demand);
                PercentileRow {
                    date: record.date,
                    exceeded,
                    demand_cost: self.pricing.demand_cost(demand, exceeded),
                }
            })
            .collect();
        let total_demand_cost: Cost = rows.iter().map(|row| row.demand_cost).sum();
        trace!(percentile = ?FormattedPercentage(percentile), %demand, %total_demand_cost);
        Ok(PercentileTable { percentile, demand, rows, total_demand_cost })
    }

    /// Pick the cheapest percentile (the first one on a tie) and apply the safety margin.
    fn summarize(&self, percentiles: &[PercentileTable]) -> Result<RecommendationSummary> {
        let cheapest = percentiles
            .iter()
            .min_by_key(|table| OrderedFloat(table.total_demand_cost.0))
            .context("no candidate percentiles configured")?;
        let demand = cheapest.demand.ceil_with_margin(self.settings.safety_margin);
        let summary = RecommendationSummary {
            flag: P::FLAG,
            percentile: cheapest.percentile,
            percentile_demand: cheapest.demand,
            smallest_total_demand_cost: cheapest.total_demand_cost,
            costs: CostSeries::bill(self.pricing, self.history, demand),
        };
        info!(
            flag = %P::FLAG,
            percentile = ?FormattedPercentage(summary.percentile),
            %demand,
            total_cost = %summary.totals().total,
            "selected the cheapest percentile",
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;
    use crate::{
        core::{
            fixtures::{self, date, record},
            history::ConsumptionRecord,
            settings::PERCENTILES,
        },
        quantity::power::Kilowatts,
    };

    #[test]
    fn test_blue_simulation() {
        let settings = Settings::default();
        let history = fixtures::history();
        let rates = fixtures::blue_rates();
        let simulation = PercentileSimulator::new(&rates, &history, &settings).simulate().unwrap();

        assert_eq!(simulation.percentiles.len(), PERCENTILES.len());
        let p80 = &simulation.percentiles[7];
        assert_abs_diff_eq!(p80.percentile, 0.8);
        // Interpolated rank is not exactly 2.4:
        assert_abs_diff_eq!(p80.demand.peak.0, 64.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p80.demand.off_peak.0, 50.0, epsilon = 1e-9);
        // 4 × 10 × 64 + 3 × 10 × 36 + 4 × 5 × 50:
        assert_abs_diff_eq!(p80.total_demand_cost.0, 4640.0, epsilon = 1e-9);

        let summary = &simulation.summary;
        assert_eq!(summary.flag, TariffFlag::Blue);
        assert_abs_diff_eq!(summary.percentile, 0.1);
        assert_abs_diff_eq!(summary.smallest_total_demand_cost.0, 4400.0);
        assert_eq!(summary.demand(), Demand { peak: Kilowatts::from(42.0), off_peak: Kilowatts::from(53.0) });

        let totals = summary.totals();
        assert_abs_diff_eq!(totals.demand.0, 4480.0);
        assert_abs_diff_eq!(totals.consumption.0, 3200.0);
        assert_abs_diff_eq!(totals.total.0, 7680.0);
        assert_abs_diff_eq!(summary.costs.rows[3].exceeded.peak.0, 58.0);
    }

    #[test]
    fn test_green_simulation() {
        let settings = Settings::default();
        let history = fixtures::history();
        let rates = fixtures::green_rates();
        let summary = PercentileSimulator::new(&rates, &history, &settings).simulate().unwrap().summary;

        assert_eq!(summary.flag, TariffFlag::Green);
        assert_abs_diff_eq!(summary.percentile, 0.1);
        assert_eq!(summary.percentile_demand, Demand::single(Kilowatts::from(50.0)));
        assert_abs_diff_eq!(summary.smallest_total_demand_cost.0, 2800.0);
        assert_eq!(summary.demand(), Demand::single(Kilowatts::from(53.0)));

        let totals = summary.totals();
        assert_abs_diff_eq!(totals.demand.0, 2824.0);
        assert_abs_diff_eq!(totals.consumption.0, 4000.0);
        assert_abs_diff_eq!(totals.total.0, 6824.0);
    }

    #[test]
    fn test_demand_floored_at_minimum() {
        let settings = Settings::default();
        let history = ConsumptionHistory::try_from(vec![
            record(date(2024, 1, 1), 5.0, 8.0),
            record(date(2024, 2, 1), 6.0, 9.0),
        ])
        .unwrap();
        let rates = fixtures::blue_rates();
        let simulation = PercentileSimulator::new(&rates, &history, &settings).simulate().unwrap();
        for table in &simulation.percentiles {
            assert_eq!(table.demand, Demand::single(Kilowatts::from(30.0)));
            assert!(table.rows.iter().all(|row| row.exceeded == Demand::ZERO));
        }
        assert_eq!(simulation.summary.demand(), Demand::single(Kilowatts::from(32.0)));
    }

    #[test]
    fn test_exceeded_never_negative() {
        let settings = Settings::default();
        let history = fixtures::long_history(17);
        let rates = fixtures::blue_rates();
        let simulation = PercentileSimulator::new(&rates, &history, &settings).simulate().unwrap();
        for row in simulation.percentiles.iter().flat_map(|table| &table.rows) {
            assert!(row.exceeded.peak >= Kilowatts::ZERO);
            assert!(row.exceeded.off_peak >= Kilowatts::ZERO);
        }
    }

    #[test]
    fn test_recommended_demand_is_whole_and_not_below_percentile() {
        let settings = Settings::default();
        let history = fixtures::long_history(17);
        let rates = fixtures::blue_rates();
        let summary = PercentileSimulator::new(&rates, &history, &settings).simulate().unwrap().summary;
        let (recommended, selected) = (summary.demand(), summary.percentile_demand);
        assert!(recommended.peak >= selected.peak);
        assert!(recommended.off_peak >= selected.off_peak);
        assert_abs_diff_eq!(recommended.peak.0.fract(), 0.0);
        assert_abs_diff_eq!(recommended.off_peak.0.fract(), 0.0);
    }

    #[test]
    fn test_selected_percentile_is_the_cheapest() {
        let settings = Settings::default();
        let history = fixtures::long_history(17);
        let rates = fixtures::blue_rates();
        let simulation = PercentileSimulator::new(&rates, &history, &settings).simulate().unwrap();
        let cheapest = simulation
            .percentiles
            .iter()
            .map(|table| table.total_demand_cost)
            .min_by_key(|cost| OrderedFloat(cost.0))
            .unwrap();
        assert_eq!(simulation.summary.smallest_total_demand_cost, cheapest);
    }

    #[test]
    fn test_demand_cost_grows_below_every_measurement() {
        let history = fixtures::long_history(17);
        let rates = fixtures::blue_rates();
        let lowest = history
            .iter()
            .map(|record| record.peak_measured_demand)
            .min_by_key(|demand| OrderedFloat(demand.0))
            .unwrap();
        let costs = (0..10)
            .map(|step| Demand::single(lowest - Kilowatts::from(f64::from(step))))
            .map(|demand| CostSeries::bill(&rates, &history, demand).totals().demand)
            .collect_vec();
        for (higher_demand_cost, lower_demand_cost) in costs.iter().tuple_windows() {
            assert!(lower_demand_cost >= higher_demand_cost);
        }
    }

    #[test]
    fn test_empty_history() {
        let settings = Settings::default();
        let history = ConsumptionHistory::try_from(Vec::<ConsumptionRecord>::new()).unwrap();
        let rates = fixtures::blue_rates();
        assert!(PercentileSimulator::new(&rates, &history, &settings).simulate().is_err());
    }

    #[test]
    fn test_no_percentiles() {
        let settings = Settings::builder().percentiles(vec![]).build().unwrap();
        let history = fixtures::history();
        let rates = fixtures::blue_rates();
        assert!(PercentileSimulator::new(&rates, &history, &settings).simulate().is_err());
    }
}
