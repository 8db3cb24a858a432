use crate::{
    core::{
        contract::CurrentContract,
        demand::Demand,
        history::{ConsumptionHistory, ConsumptionRecord},
        series::Quantile,
        settings::OVERRUN_PENALTY,
        tariff::{BlueRates, GreenRates, TariffFlag},
    },
    quantity::{cost::Cost, rate::KilowattHourRate},
};

/// Billing rules of a tariff modality.
pub trait Pricing {
    const FLAG: TariffFlag;

    /// Demand that would be contracted at the given percentile of the measured demand history.
    ///
    /// Not yet floored at the minimum contractable demand.
    fn percentile_demand(&self, history: &ConsumptionHistory, percentile: f64) -> Option<Demand>;

    /// Measured demand above the contracted one in the billing period.
    fn exceeded_demand(&self, record: &ConsumptionRecord, contracted: Demand) -> Demand;

    /// Contracted demand charge plus the overrun penalty.
    fn demand_cost(&self, contracted: Demand, exceeded: Demand) -> Cost;

    fn consumption_cost(&self, record: &ConsumptionRecord) -> Cost;

    /// Demand the contract is billed for under this modality.
    fn contracted_demand(&self, contract: &CurrentContract) -> Demand;
}

impl Pricing for BlueRates {
    const FLAG: TariffFlag = TariffFlag::Blue;

    fn percentile_demand(&self, history: &ConsumptionHistory, percentile: f64) -> Option<Demand> {
        Some(Demand {
            peak: history.iter().map(|record| record.peak_measured_demand).quantile(percentile)?,
            off_peak: history
                .iter()
                .map(|record| record.off_peak_measured_demand)
                .quantile(percentile)?,
        })
    }

    fn exceeded_demand(&self, record: &ConsumptionRecord, contracted: Demand) -> Demand {
        Demand {
            peak: record.peak_measured_demand.excess_over(contracted.peak),
            off_peak: record.off_peak_measured_demand.excess_over(contracted.off_peak),
        }
    }

    fn demand_cost(&self, contracted: Demand, exceeded: Demand) -> Cost {
        (contracted.peak + exceeded.peak * OVERRUN_PENALTY) * self.peak_tusd_per_kw
            + (contracted.off_peak + exceeded.off_peak * OVERRUN_PENALTY) * self.off_peak_tusd_per_kw
    }

    fn consumption_cost(&self, record: &ConsumptionRecord) -> Cost {
        record.peak_consumption
            * KilowattHourRate::from(self.peak_tusd_per_mwh + self.peak_te_per_mwh)
            + record.off_peak_consumption
                * KilowattHourRate::from(self.off_peak_tusd_per_mwh + self.off_peak_te_per_mwh)
    }

    fn contracted_demand(&self, contract: &CurrentContract) -> Demand {
        Demand { peak: contract.peak_contracted_demand, off_peak: contract.off_peak_contracted_demand }
    }
}

impl Pricing for GreenRates {
    const FLAG: TariffFlag = TariffFlag::Green;

    /// The single demand is compared against the highest demand of the month,
    /// whichever time of day it was measured at.
    fn percentile_demand(&self, history: &ConsumptionHistory, percentile: f64) -> Option<Demand> {
        history.iter().map(ConsumptionRecord::max_measured_demand).quantile(percentile).map(Demand::single)
    }

    fn exceeded_demand(&self, record: &ConsumptionRecord, contracted: Demand) -> Demand {
        Demand::single(record.max_measured_demand().excess_over(contracted.off_peak))
    }

    fn demand_cost(&self, contracted: Demand, exceeded: Demand) -> Cost {
        (contracted.off_peak + exceeded.off_peak * OVERRUN_PENALTY) * self.na_tusd_per_kw
    }

    fn consumption_cost(&self, record: &ConsumptionRecord) -> Cost {
        record.peak_consumption
            * KilowattHourRate::from(self.peak_tusd_per_mwh + self.peak_te_per_mwh)
            + record.off_peak_consumption
                * KilowattHourRate::from(self.off_peak_tusd_per_mwh + self.off_peak_te_per_mwh)
    }

    fn contracted_demand(&self, contract: &CurrentContract) -> Demand {
        Demand::single(contract.off_peak_contracted_demand)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::fixtures::{self, date, record},
        quantity::power::Kilowatts,
    };

    #[test]
    fn test_blue_demand_cost_with_overrun() {
        let rates = fixtures::blue_rates();
        let contracted = Demand { peak: Kilowatts::from(42.0), off_peak: Kilowatts::from(53.0) };
        let exceeded = rates.exceeded_demand(&record(date(2024, 4, 1), 100.0, 50.0), contracted);
        assert_eq!(exceeded, Demand { peak: Kilowatts::from(58.0), off_peak: Kilowatts::ZERO });
        // 10 × 42 + 3 × 10 × 58 + 5 × 53:
        assert_abs_diff_eq!(rates.demand_cost(contracted, exceeded).0, 2425.0);
    }

    #[test]
    fn test_blue_consumption_cost() {
        let cost = fixtures::blue_rates().consumption_cost(&record(date(2024, 1, 1), 40.0, 50.0));
        // 1000 kWh × 0.4 + 2000 kWh × 0.2:
        assert_abs_diff_eq!(cost.0, 800.0);
    }

    #[test]
    fn test_green_uses_highest_measured_demand() {
        let rates = fixtures::green_rates();
        let exceeded = rates.exceeded_demand(
            &record(date(2024, 1, 1), 70.0, 60.0),
            Demand::single(Kilowatts::from(53.0)),
        );
        assert_eq!(exceeded, Demand::single(Kilowatts::from(17.0)));
        // 8 × 53 + 3 × 8 × 17:
        assert_abs_diff_eq!(rates.demand_cost(Demand::single(Kilowatts::from(53.0)), exceeded).0, 832.0);
    }

    #[test]
    fn test_green_consumption_cost() {
        let cost = fixtures::green_rates().consumption_cost(&record(date(2024, 1, 1), 40.0, 50.0));
        // 1000 kWh × 0.6 + 2000 kWh × 0.2:
        assert_abs_diff_eq!(cost.0, 1000.0);
    }

    #[test]
    fn test_green_contracted_demand_is_single() {
        let demand = fixtures::green_rates().contracted_demand(&fixtures::blue_contract());
        assert_eq!(demand, Demand::single(Kilowatts::from(45.0)));
    }
}
