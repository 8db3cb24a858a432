use std::collections::HashMap;

use bon::bon;
use chrono::NaiveDate;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::{
    core::{
        calculator::Recommendation,
        contract::Subgroup,
        costs::{CostSeries, Costs},
        demand::Demand,
        history::BillingWindow,
        issue::{Issue, Warning},
        tariff::{TariffFlag, Validity},
    },
    quantity::{cost::Cost, power::Kilowatts},
};

/// Recommendation result as persisted and rendered by the clients.
///
/// Every plot series is aligned with [`RecommendationDecision::dates`],
/// months without a usable bill carry `null`.
#[must_use]
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDecision {
    pub generated_on: NaiveDate,
    pub energy_bills_count: Option<usize>,

    #[serde(serialize_with = "Cost::serialize_optional_cents")]
    pub current_total_cost: Option<Cost>,

    /// Unset when any error is present.
    pub should_renew_contract: Option<bool>,

    pub nominal_savings_percentage: Option<f64>,
    pub dates: Vec<NaiveDate>,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Warning>,
    pub tariff_start_date: Option<NaiveDate>,
    pub tariff_end_date: Option<NaiveDate>,
    pub recommended_contract: Option<RecommendedContract>,
    pub current_contract_costs_plot: Option<CurrentContractCostsPlot>,
    pub costs_comparison_plot: Option<CostsComparisonPlot>,
    pub contracts_comparison: Option<Vec<ContractsComparisonEntry>>,
    pub contracts_comparison_totals: Option<ContractsComparisonEntry>,
    pub detailed_contracts_costs_comparison_plot: Option<DetailedContractsCostsComparisonPlot>,
    pub percentiles: Option<Vec<PercentileEntry>>,
}

#[bon]
impl RecommendationDecision {
    #[builder]
    pub fn new(
        today: NaiveDate,
        window: Option<&BillingWindow>,
        energy_bills_count: Option<usize>,
        #[builder(default)]
        errors: Vec<Issue>,
        #[builder(default)]
        warnings: Vec<Warning>,
        tariff_validity: Option<Validity>,
        current: Option<&CostSeries>,
        recommendation: Option<&Recommendation>,
    ) -> Self {
        let dates = window.map(|window| window.months().to_vec()).unwrap_or_default();
        let recommendation = recommendation.filter(|_| errors.is_empty());
        Self {
            generated_on: today,
            energy_bills_count,
            current_total_cost: current.map(|current| current.totals().total),
            should_renew_contract: recommendation.map(|recommendation| recommendation.should_renew),
            nominal_savings_percentage: recommendation
                .map(|recommendation| recommendation.nominal_savings_percentage),
            tariff_start_date: tariff_validity.map(|validity| validity.start_date),
            tariff_end_date: tariff_validity.map(|validity| validity.end_date),
            recommended_contract: recommendation.map(RecommendedContract::from),
            current_contract_costs_plot: current
                .map(|current| CurrentContractCostsPlot::new(&dates, current)),
            costs_comparison_plot: recommendation
                .map(|recommendation| CostsComparisonPlot::new(&dates, recommendation)),
            contracts_comparison: recommendation.map(ContractsComparisonEntry::collect),
            contracts_comparison_totals: recommendation.map(ContractsComparisonEntry::from),
            detailed_contracts_costs_comparison_plot: recommendation
                .map(|recommendation| DetailedContractsCostsComparisonPlot::new(&dates, recommendation)),
            percentiles: recommendation.map(PercentileEntry::collect),
            dates,
            errors,
            warnings,
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedContract {
    pub subgroup: Subgroup,
    pub tariff_flag: TariffFlag,

    #[serde(flatten)]
    pub demand: Demand,
}

impl From<&Recommendation> for RecommendedContract {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            subgroup: recommendation.subgroup,
            tariff_flag: recommendation.summary.flag,
            demand: recommendation.summary.demand(),
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentContractCostsPlot {
    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub consumption_cost_in_reais: Vec<Option<Cost>>,

    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub demand_cost_in_reais: Vec<Option<Cost>>,
}

impl CurrentContractCostsPlot {
    fn new(dates: &[NaiveDate], current: &CostSeries) -> Self {
        let costs = by_date(current);
        Self {
            consumption_cost_in_reais: align(dates, &costs, |costs| costs.consumption),
            demand_cost_in_reais: align(dates, &costs, |costs| costs.demand),
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostsComparisonPlot {
    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub total_cost_in_reais_in_current: Vec<Option<Cost>>,

    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub total_cost_in_reais_in_recommended: Vec<Option<Cost>>,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub total_total_cost_in_reais_in_current: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub total_total_cost_in_reais_in_recommended: Cost,
}

impl CostsComparisonPlot {
    fn new(dates: &[NaiveDate], recommendation: &Recommendation) -> Self {
        let current = by_date(&recommendation.current);
        let recommended = by_date(&recommendation.summary.costs);
        Self {
            total_cost_in_reais_in_current: align(dates, &current, |costs| costs.total),
            total_cost_in_reais_in_recommended: align(dates, &recommended, |costs| costs.total),
            total_total_cost_in_reais_in_current: recommendation.comparison.current_totals().total,
            total_total_cost_in_reais_in_recommended: recommendation
                .comparison
                .recommended_totals()
                .total,
        }
    }
}

/// Side-by-side costs of a billing period.
#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractsComparisonEntry {
    /// Absent for the totals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub consumption_cost_in_reais_in_current: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub demand_cost_in_reais_in_current: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub total_cost_in_reais_in_current: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub consumption_cost_in_reais_in_recommended: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub demand_cost_in_reais_in_recommended: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub total_cost_in_reais_in_recommended: Cost,

    /// Current minus recommended total.
    #[serde(serialize_with = "Cost::serialize_cents")]
    pub absolute_difference: Cost,
}

impl ContractsComparisonEntry {
    fn new(date: Option<NaiveDate>, current: Costs, recommended: Costs) -> Self {
        Self {
            date,
            consumption_cost_in_reais_in_current: current.consumption,
            demand_cost_in_reais_in_current: current.demand,
            total_cost_in_reais_in_current: current.total,
            consumption_cost_in_reais_in_recommended: recommended.consumption,
            demand_cost_in_reais_in_recommended: recommended.demand,
            total_cost_in_reais_in_recommended: recommended.total,
            absolute_difference: current.total - recommended.total,
        }
    }

    fn collect(recommendation: &Recommendation) -> Vec<Self> {
        recommendation
            .comparison
            .rows
            .iter()
            .map(|row| Self::new(Some(row.date), row.current, row.recommended))
            .collect()
    }
}

impl From<&Recommendation> for ContractsComparisonEntry {
    fn from(recommendation: &Recommendation) -> Self {
        let comparison = &recommendation.comparison;
        Self::new(None, comparison.current_totals(), comparison.recommended_totals())
    }
}

/// Consumption and demand costs of both contracts, and the recommended demands.
///
/// For the green modality, both demand series carry the same single demand.
#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedContractsCostsComparisonPlot {
    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub consumption_cost_in_reais_in_current: Vec<Option<Cost>>,

    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub consumption_cost_in_reais_in_recommended: Vec<Option<Cost>>,

    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub demand_cost_in_reais_in_current: Vec<Option<Cost>>,

    #[serde(serialize_with = "Cost::serialize_cents_series")]
    pub demand_cost_in_reais_in_recommended: Vec<Option<Cost>>,

    pub peak_demand_in_kw: Vec<Option<Kilowatts>>,
    pub off_peak_demand_in_kw: Vec<Option<Kilowatts>>,
}

impl DetailedContractsCostsComparisonPlot {
    fn new(dates: &[NaiveDate], recommendation: &Recommendation) -> Self {
        let current = by_date(&recommendation.current);
        let recommended = by_date(&recommendation.summary.costs);
        let demand = recommendation.summary.demand();
        Self {
            consumption_cost_in_reais_in_current: align(dates, &current, |costs| costs.consumption),
            consumption_cost_in_reais_in_recommended: align(dates, &recommended, |costs| {
                costs.consumption
            }),
            demand_cost_in_reais_in_current: align(dates, &current, |costs| costs.demand),
            demand_cost_in_reais_in_recommended: align(dates, &recommended, |costs| costs.demand),
            peak_demand_in_kw: align(dates, &recommended, |_| demand.peak),
            off_peak_demand_in_kw: align(dates, &recommended, |_| demand.off_peak),
        }
    }
}

/// Percentile scan line, for inspection.
#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileEntry {
    pub tariff_flag: TariffFlag,
    pub percentile: f64,

    #[serde(flatten)]
    pub demand: Demand,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub total_demand_cost_in_reais: Cost,

    pub is_selected: bool,
}

impl PercentileEntry {
    fn collect(recommendation: &Recommendation) -> Vec<Self> {
        recommendation
            .simulations
            .iter()
            .flat_map(|simulation| {
                let summary = &simulation.summary;
                simulation.percentiles.iter().map(move |table| Self {
                    tariff_flag: summary.flag,
                    percentile: table.percentile,
                    demand: table.demand,
                    total_demand_cost_in_reais: table.total_demand_cost,
                    is_selected: summary.flag == recommendation.summary.flag
                        && table.percentile.total_cmp(&summary.percentile).is_eq(),
                })
            })
            .collect()
    }
}

fn by_date(series: &CostSeries) -> HashMap<NaiveDate, Costs> {
    series.rows.iter().map(|row| (row.date, row.costs)).collect()
}

/// Spread the billed values over the window, leaving the pending months empty.
fn align<T>(
    dates: &[NaiveDate],
    costs: &HashMap<NaiveDate, Costs>,
    value: impl Fn(&Costs) -> T,
) -> Vec<Option<T>> {
    dates.iter().map(|date| costs.get(date).map(&value)).collect()
}
