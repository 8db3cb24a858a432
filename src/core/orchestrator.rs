use bon::Builder;
use chrono::NaiveDate;

use crate::{
    core::{
        calculator::{Recommendation, RecommendationCalculator, UsableTariffs},
        contract::{ConsumerUnit, CurrentContract},
        decision::RecommendationDecision,
        history::{BillingWindow, ConsumptionRecord, EnergyBills},
        issue::{Issue, Warning},
        settings::Settings,
        tariff::{TariffRateSet, Validity},
    },
    prelude::*,
};

#[must_use]
pub struct Outcome {
    pub decision: RecommendationDecision,

    /// Present when all the checks have passed.
    pub recommendation: Option<Recommendation>,
}

/// Checks the data quality of a consumer unit and runs the calculation when it is good enough.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct RecommendationOrchestrator<'a> {
    consumer_unit: &'a ConsumerUnit,
    contract: &'a CurrentContract,

    /// All the known bills, the ones outside the window are ignored.
    bills: &'a [ConsumptionRecord],

    blue: Option<&'a TariffRateSet>,
    green: Option<&'a TariffRateSet>,
    settings: &'a Settings,

    /// Reference date for the window and the tariff expiration.
    today: NaiveDate,
}

impl<S: recommendation_orchestrator_builder::IsComplete> RecommendationOrchestratorBuilder<'_, S> {
    pub fn run(self) -> Outcome {
        self.build().run()
    }
}

impl RecommendationOrchestrator<'_> {
    #[instrument(skip_all, fields(today = %self.today))]
    fn run(self) -> Outcome {
        let tariff_validity = self.blue.or(self.green).map(|tariff| tariff.validity);

        if !self.consumer_unit.is_active {
            warn!("the consumer unit is not active");
            return self.fail(None, Issue::ConsumerUnitInactive);
        }

        let window = BillingWindow::ending_before(
            self.today,
            self.settings.ideal_energy_bills,
            self.consumer_unit.oldest_contract_start_date,
        );
        let bills = match EnergyBills::try_collect(window, self.bills) {
            Ok(bills) => bills,
            Err(error) => {
                error!("failed to collect the energy bills: {error:#}");
                return self.fail(tariff_validity, Issue::from(error));
            }
        };

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let tariffs = UsableTariffs::new(self.contract.subgroup, self.blue, self.green);
        let has_usable_tariff = tariffs.iter().next().is_some();
        if has_usable_tariff {
            if tariffs.get(self.contract.tariff_flag).is_none() {
                info!(
                    flag = %self.contract.tariff_flag,
                    "no tariff for the current modality, billing the current contract with the other one",
                );
            }
        } else {
            warn!(subgroup = %self.contract.subgroup, "no usable tariff for the subgroup");
            errors.push(Issue::TariffsNotFound);
        }

        let n_usable = bills.history.len();
        if n_usable < self.settings.minimum_energy_bills {
            warn!(n_usable, n_atypical = bills.n_atypical, "not enough energy bills");
            errors.push(if bills.n_atypical == 0 {
                Issue::InsufficientHistory { required: self.settings.minimum_energy_bills }
            } else {
                Issue::InsufficientHistoryWithAtypicalBills {
                    required: self.settings.minimum_energy_bills + bills.n_atypical,
                    n_atypical: bills.n_atypical,
                }
            });
        } else if n_usable + bills.n_atypical < self.settings.ideal_energy_bills {
            info!(n_usable, n_missing = bills.n_missing(), "some energy bills are pending");
            warnings.push(Warning::PendingBills { count: bills.n_missing() });
        }

        for tariff in tariffs.iter() {
            if tariff.validity.is_expired(self.today) {
                warn!(flag = %tariff.flag(), end_date = %tariff.validity.end_date, "the tariff has expired");
                warnings.push(Warning::ExpiredTariff {
                    flag: tariff.flag(),
                    end_date: tariff.validity.end_date,
                });
            }
        }

        let current = has_usable_tariff
            .then(|| tariffs.bill_current_contract(self.contract, &bills.history))
            .transpose();
        let current = match current {
            Ok(current) => current,
            Err(error) => {
                error!("failed to bill the current contract: {error:#}");
                errors.push(Issue::from(error));
                None
            }
        };

        let recommendation = if errors.is_empty() {
            let result = RecommendationCalculator::builder()
                .history(&bills.history)
                .contract(self.contract)
                .maybe_blue(self.blue)
                .maybe_green(self.green)
                .settings(self.settings)
                .maybe_total_installed_power(self.consumer_unit.total_installed_power)
                .calculate();
            match result {
                Ok(recommendation) => Some(recommendation),
                Err(error) => {
                    error!("failed to calculate the recommendation: {error:#}");
                    errors.push(Issue::from(error));
                    None
                }
            }
        } else {
            None
        };

        info!(n_errors = errors.len(), n_warnings = warnings.len(), "completed");
        let decision = RecommendationDecision::builder()
            .today(self.today)
            .window(&bills.window)
            .energy_bills_count(n_usable)
            .errors(errors)
            .warnings(warnings)
            .maybe_tariff_validity(tariff_validity)
            .maybe_current(current.as_ref())
            .maybe_recommendation(recommendation.as_ref())
            .build();
        Outcome { decision, recommendation }
    }

    fn fail(&self, tariff_validity: Option<Validity>, issue: Issue) -> Outcome {
        let decision = RecommendationDecision::builder()
            .today(self.today)
            .errors(vec![issue])
            .maybe_tariff_validity(tariff_validity)
            .build();
        Outcome { decision, recommendation: None }
    }
}
