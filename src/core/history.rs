use chrono::{Datelike, Months, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Monthly energy bill measurements.
#[must_use]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConsumptionRecord {
    /// First day of the billed month.
    pub date: NaiveDate,

    #[serde(rename = "peak_consumption_kwh")]
    pub peak_consumption: KilowattHours,

    #[serde(rename = "off_peak_consumption_kwh")]
    pub off_peak_consumption: KilowattHours,

    #[serde(rename = "peak_measured_demand_kw")]
    pub peak_measured_demand: Kilowatts,

    #[serde(rename = "off_peak_measured_demand_kw")]
    pub off_peak_measured_demand: Kilowatts,

    /// Atypical bills are kept out of the history.
    #[serde(default)]
    pub is_atypical: bool,
}

impl ConsumptionRecord {
    fn validate(&self) -> Result {
        ensure!(self.date.day() == 1, "bill date {} is not the first day of a month", self.date);
        ensure!(
            self.peak_consumption.is_non_negative()
                && self.off_peak_consumption.is_non_negative()
                && self.peak_measured_demand.is_non_negative()
                && self.off_peak_measured_demand.is_non_negative(),
            "bill of {} has negative or non-finite measurements",
            self.date,
        );
        Ok(())
    }

    /// Highest demand measured in the month, regardless of the time of day.
    pub fn max_measured_demand(&self) -> Kilowatts {
        self.peak_measured_demand.max(self.off_peak_measured_demand)
    }
}

/// Chronologically ordered, one-per-month, validated bills of a consumer unit.
#[must_use]
#[derive(Clone, Debug)]
pub struct ConsumptionHistory(Vec<ConsumptionRecord>);

impl TryFrom<Vec<ConsumptionRecord>> for ConsumptionHistory {
    type Error = Error;

    fn try_from(records: Vec<ConsumptionRecord>) -> Result<Self> {
        for record in &records {
            record.validate()?;
        }
        for (previous, next) in records.iter().tuple_windows() {
            ensure!(
                previous.date < next.date,
                "bills must be strictly increasing by month, got {} before {}",
                previous.date,
                next.date,
            );
        }
        Ok(Self(records))
    }
}

impl ConsumptionHistory {
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsumptionRecord> {
        self.0.iter()
    }
}

/// Months whose bills are taken into account, oldest first.
#[must_use]
#[derive(Clone, Debug)]
pub struct BillingWindow(Vec<NaiveDate>);

impl BillingWindow {
    /// The last `n_months` full months before the current one,
    /// but not earlier than the first bill dated on or after the oldest contract start.
    pub fn ending_before(today: NaiveDate, n_months: usize, oldest_contract_start: NaiveDate) -> Self {
        let current_month = first_of_month(today);
        let contract_month = if oldest_contract_start.day() == 1 {
            oldest_contract_start
        } else {
            first_of_month(oldest_contract_start)
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX)
        };
        let mut start = u32::try_from(n_months)
            .ok()
            .and_then(|n_months| current_month.checked_sub_months(Months::new(n_months)))
            .unwrap_or(NaiveDate::MIN)
            .max(contract_month);
        let mut months = Vec::with_capacity(n_months);
        while start < current_month {
            months.push(start);
            match start.checked_add_months(Months::new(1)) {
                Some(next) => start = next,
                None => break,
            }
        }
        Self(months)
    }

    pub fn months(&self) -> &[NaiveDate] {
        &self.0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.binary_search(&date).is_ok()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Energy bills of the recommendation window, split into usable history and pending months.
#[must_use]
#[derive(Clone, Debug)]
pub struct EnergyBills {
    pub window: BillingWindow,

    /// Typical bills inside the window.
    pub history: ConsumptionHistory,

    /// Months of the window without a usable bill: either missing or atypical.
    pub pending_dates: Vec<NaiveDate>,

    pub n_atypical: usize,
}

impl EnergyBills {
    #[instrument(skip_all, fields(n_months = window.months().len(), n_bills = bills.len()))]
    pub fn try_collect(window: BillingWindow, bills: &[ConsumptionRecord]) -> Result<Self> {
        let (inside, outside): (Vec<_>, Vec<_>) =
            bills.iter().partition(|bill| window.contains(bill.date));
        if !outside.is_empty() {
            debug!(n_bills = outside.len(), "ignoring bills outside the recommendation window");
        }
        if let Some(date) = inside.iter().map(|bill| bill.date).duplicates().next() {
            bail!("more than one bill for {date}");
        }

        let n_atypical = inside.iter().filter(|bill| bill.is_atypical).count();
        let history = inside
            .iter()
            .filter(|bill| !bill.is_atypical)
            .map(|bill| (*bill).clone())
            .sorted_by_key(|bill| bill.date)
            .collect_vec();
        let history = ConsumptionHistory::try_from(history)?;
        let pending_dates = window
            .months()
            .iter()
            .copied()
            .filter(|month| !history.iter().any(|bill| bill.date == *month))
            .collect_vec();

        debug!(n_usable = history.len(), n_pending = pending_dates.len(), n_atypical);
        Ok(Self { window, history, pending_dates, n_atypical })
    }

    /// Pending months that are not covered by an atypical bill.
    pub fn n_missing(&self) -> usize {
        self.pending_dates.len().saturating_sub(self.n_atypical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{date, record};

    #[test]
    fn test_history_rejects_unordered() {
        let records = vec![record(date(2024, 2, 1), 40.0, 50.0), record(date(2024, 1, 1), 40.0, 50.0)];
        assert!(ConsumptionHistory::try_from(records).is_err());
    }

    #[test]
    fn test_history_rejects_duplicate_month() {
        let records = vec![record(date(2024, 1, 1), 40.0, 50.0), record(date(2024, 1, 1), 41.0, 50.0)];
        assert!(ConsumptionHistory::try_from(records).is_err());
    }

    #[test]
    fn test_history_rejects_negative() {
        let records = vec![record(date(2024, 1, 1), -1.0, 50.0)];
        assert!(ConsumptionHistory::try_from(records).is_err());
    }

    #[test]
    fn test_history_rejects_mid_month() {
        let records = vec![record(date(2024, 1, 15), 40.0, 50.0)];
        assert!(ConsumptionHistory::try_from(records).is_err());
    }

    #[test]
    fn test_window_full_year() {
        let window = BillingWindow::ending_before(date(2024, 5, 15), 12, date(2020, 3, 10));
        assert_eq!(window.months().len(), 12);
        assert_eq!(window.months()[0], date(2023, 5, 1));
        assert_eq!(window.months()[11], date(2024, 4, 1));
    }

    #[test]
    fn test_window_bounded_by_oldest_contract() {
        let window = BillingWindow::ending_before(date(2024, 5, 15), 12, date(2024, 1, 1));
        assert_eq!(window.months(), [date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]);
    }

    #[test]
    fn test_window_skips_partial_first_month() {
        let window = BillingWindow::ending_before(date(2024, 5, 15), 12, date(2024, 1, 20));
        assert_eq!(window.months(), [date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]);
    }

    #[test]
    fn test_window_contract_in_future() {
        let window = BillingWindow::ending_before(date(2024, 5, 15), 12, date(2024, 6, 1));
        assert!(window.months().is_empty());
    }

    #[test]
    fn test_collect_bills() {
        let window = BillingWindow::ending_before(date(2024, 5, 15), 6, date(2020, 1, 1));
        let mut atypical = record(date(2024, 2, 1), 400.0, 50.0);
        atypical.is_atypical = true;
        let bills = [
            record(date(2023, 1, 1), 40.0, 50.0),
            record(date(2024, 3, 1), 40.0, 50.0),
            atypical,
            record(date(2023, 12, 1), 40.0, 50.0),
        ];
        let bills = EnergyBills::try_collect(window, &bills).unwrap();
        assert_eq!(bills.history.len(), 2);
        assert_eq!(bills.history.iter().next().unwrap().date, date(2023, 12, 1));
        assert_eq!(bills.n_atypical, 1);
        assert_eq!(
            bills.pending_dates,
            [date(2023, 11, 1), date(2024, 1, 1), date(2024, 2, 1), date(2024, 4, 1)],
        );
        assert_eq!(bills.n_missing(), 3);
    }

    #[test]
    fn test_collect_rejects_duplicate_month() {
        let window = BillingWindow::ending_before(date(2024, 5, 15), 6, date(2020, 1, 1));
        let mut atypical = record(date(2024, 2, 1), 400.0, 50.0);
        atypical.is_atypical = true;
        let bills = [record(date(2024, 2, 1), 40.0, 50.0), atypical];
        assert!(EnergyBills::try_collect(window, &bills).is_err());
    }
}
