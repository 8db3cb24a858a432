use chrono::NaiveDate;

use crate::{
    core::{demand::Demand, history::ConsumptionHistory, pricing::Pricing},
    quantity::cost::Cost,
};

/// Cost breakdown of a billing period or of a whole history.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, derive_more::Add, derive_more::Sum)]
pub struct Costs {
    pub consumption: Cost,
    pub demand: Cost,
    pub total: Cost,
}

impl Costs {
    pub fn new(consumption: Cost, demand: Cost) -> Self {
        Self { consumption, demand, total: consumption + demand }
    }
}

#[must_use]
#[derive(Clone, Debug)]
pub struct CostRow {
    pub date: NaiveDate,
    pub exceeded: Demand,
    pub costs: Costs,
}

/// Billing period costs under a fixed contracted demand.
#[must_use]
#[derive(Clone, Debug)]
pub struct CostSeries {
    pub contracted: Demand,
    pub rows: Vec<CostRow>,
}

impl CostSeries {
    /// Bill every period of the history for the contracted demand.
    pub fn bill<P: Pricing>(pricing: &P, history: &ConsumptionHistory, contracted: Demand) -> Self {
        let rows = history
            .iter()
            .map(|record| {
                let exceeded = pricing.exceeded_demand(record, contracted);
                CostRow {
                    date: record.date,
                    exceeded,
                    costs: Costs::new(
                        pricing.consumption_cost(record),
                        pricing.demand_cost(contracted, exceeded),
                    ),
                }
            })
            .collect();
        Self { contracted, rows }
    }

    pub fn totals(&self) -> Costs {
        self.rows.iter().map(|row| row.costs).sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{core::fixtures, quantity::power::Kilowatts};

    #[test]
    fn test_bill_current_blue_contract() {
        let contract = fixtures::blue_contract();
        let rates = fixtures::blue_rates();
        let series = CostSeries::bill(&rates, &fixtures::history(), rates.contracted_demand(&contract));
        assert_eq!(series.rows.len(), 4);
        // 10 × 35 + 30 × 5 + 5 × 45 + 15 × 5:
        assert_abs_diff_eq!(series.rows[0].costs.demand.0, 800.0);
        assert_abs_diff_eq!(series.rows[3].costs.demand.0, 2600.0);

        let totals = series.totals();
        assert_abs_diff_eq!(totals.demand.0, 5000.0);
        assert_abs_diff_eq!(totals.consumption.0, 3200.0);
        assert_abs_diff_eq!(totals.total.0, 8200.0);
    }

    #[test]
    fn test_exceeded_never_negative() {
        let series = CostSeries::bill(
            &fixtures::blue_rates(),
            &fixtures::history(),
            Demand::single(Kilowatts::from(1000.0)),
        );
        for row in series.rows {
            assert_eq!(row.exceeded, Demand::ZERO);
        }
    }
}
