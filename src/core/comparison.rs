use chrono::NaiveDate;
use itertools::Itertools;

use crate::{
    core::costs::{CostSeries, Costs},
    prelude::*,
    quantity::cost::Cost,
};

#[must_use]
#[derive(Clone, Debug)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub current: Costs,
    pub recommended: Costs,
}

impl ComparisonRow {
    /// Current minus recommended total: positive when the recommendation is cheaper.
    pub fn absolute_difference(&self) -> Cost {
        self.current.total - self.recommended.total
    }
}

/// Billing period costs of the current contract next to the recommended one.
#[must_use]
#[derive(Clone, Debug)]
pub struct ContractsComparison {
    pub rows: Vec<ComparisonRow>,
}

impl ContractsComparison {
    pub fn try_new(current: &CostSeries, recommended: &CostSeries) -> Result<Self> {
        ensure!(
            current.rows.len() == recommended.rows.len(),
            "cannot compare {} billing periods to {}",
            current.rows.len(),
            recommended.rows.len(),
        );
        let rows = current
            .rows
            .iter()
            .zip_eq(&recommended.rows)
            .map(|(current, recommended)| {
                ensure!(
                    current.date == recommended.date,
                    "billing periods do not match: {} and {}",
                    current.date,
                    recommended.date,
                );
                Ok(ComparisonRow {
                    date: current.date,
                    current: current.costs,
                    recommended: recommended.costs,
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self { rows })
    }

    pub fn current_totals(&self) -> Costs {
        self.rows.iter().map(|row| row.current).sum()
    }

    pub fn recommended_totals(&self) -> Costs {
        self.rows.iter().map(|row| row.recommended).sum()
    }

    pub fn absolute_difference(&self) -> Cost {
        self.rows.iter().map(ComparisonRow::absolute_difference).sum()
    }

    /// Share of the current total cost saved by the recommendation.
    ///
    /// Zero when the current contract costs nothing, since nothing can be saved then.
    pub fn cost_ratio(&self) -> f64 {
        let current_total = self.current_totals().total;
        if current_total.0 > 0.0 { self.absolute_difference().0 / current_total.0 } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::{demand::Demand, fixtures, pricing::Pricing},
        quantity::power::Kilowatts,
    };

    #[test]
    fn test_compare_blue_contracts() {
        let rates = fixtures::blue_rates();
        let history = fixtures::history();
        let current = CostSeries::bill(&rates, &history, rates.contracted_demand(&fixtures::blue_contract()));
        let recommended = CostSeries::bill(
            &rates,
            &history,
            Demand { peak: Kilowatts::from(42.0), off_peak: Kilowatts::from(53.0) },
        );
        let comparison = ContractsComparison::try_new(&current, &recommended).unwrap();

        assert_eq!(comparison.rows.len(), 4);
        // 800 + 800 versus 685 + 800:
        assert_abs_diff_eq!(comparison.rows[0].absolute_difference().0, 115.0);
        assert_abs_diff_eq!(comparison.current_totals().total.0, 8200.0);
        assert_abs_diff_eq!(comparison.recommended_totals().total.0, 7680.0);
        assert_abs_diff_eq!(comparison.absolute_difference().0, 520.0);
        assert_abs_diff_eq!(comparison.cost_ratio(), 520.0 / 8200.0);
    }

    #[test]
    fn test_zero_current_cost() {
        let rates = fixtures::blue_rates();
        let history = fixtures::history();
        let mut current = CostSeries::bill(&rates, &history, Demand::ZERO);
        for row in &mut current.rows {
            row.costs = Costs::new(Cost::ZERO, Cost::ZERO);
        }
        let recommended = CostSeries::bill(&rates, &history, Demand::single(Kilowatts::from(100.0)));
        let comparison = ContractsComparison::try_new(&current, &recommended).unwrap();
        assert_abs_diff_eq!(comparison.cost_ratio(), 0.0);
    }

    #[test]
    fn test_mismatched_periods() {
        let rates = fixtures::blue_rates();
        let current = CostSeries::bill(&rates, &fixtures::history(), Demand::ZERO);
        let recommended = CostSeries::bill(&rates, &fixtures::long_history(4), Demand::ZERO);
        assert!(ContractsComparison::try_new(&current, &recommended).is_err());
    }
}
