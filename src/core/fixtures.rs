use chrono::{Months, NaiveDate};

use crate::{
    core::{
        contract::{ConsumerUnit, CurrentContract, Subgroup},
        history::{ConsumptionHistory, ConsumptionRecord},
        tariff::{BlueRates, GreenRates, TariffFlag, TariffRateSet, Validity},
    },
    quantity::{
        energy::KilowattHours,
        power::Kilowatts,
        rate::{KilowattRate, MegawattHourRate},
    },
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Typical bill with 1000 kWh peak and 2000 kWh off-peak consumption.
pub fn record(date: NaiveDate, peak_measured: f64, off_peak_measured: f64) -> ConsumptionRecord {
    ConsumptionRecord {
        date,
        peak_consumption: KilowattHours::from(1000.0),
        off_peak_consumption: KilowattHours::from(2000.0),
        peak_measured_demand: Kilowatts::from(peak_measured),
        off_peak_measured_demand: Kilowatts::from(off_peak_measured),
        is_atypical: false,
    }
}

/// January to April 2024 with a single peak spike in April.
pub fn history() -> ConsumptionHistory {
    ConsumptionHistory::try_from(records(date(2024, 1, 1), &[40.0, 40.0, 40.0, 100.0], &[50.0; 4]))
        .unwrap()
}

/// Consecutive months since January 2023, the off-peak demand always above the peak one.
pub fn long_history(n_months: u32) -> ConsumptionHistory {
    ConsumptionHistory::try_from(long_records(date(2023, 1, 1), n_months)).unwrap()
}

/// Same shape as [`long_history`], starting at the month given.
pub fn long_records(since: NaiveDate, n_months: u32) -> Vec<ConsumptionRecord> {
    (0..n_months)
        .map(|i| {
            let peak = 60.0 + f64::from((i * 7) % 25);
            let off_peak = peak + 10.0 + f64::from((i * 3) % 7);
            record(since + Months::new(i), peak, off_peak)
        })
        .collect()
}

fn records(since: NaiveDate, peaks: &[f64], off_peaks: &[f64]) -> Vec<ConsumptionRecord> {
    peaks
        .iter()
        .zip(off_peaks)
        .zip(0..)
        .map(|((peak, off_peak), i)| record(since + Months::new(i), *peak, *off_peak))
        .collect()
}

pub fn validity() -> Validity {
    Validity { start_date: date(2024, 1, 1), end_date: date(2024, 12, 31) }
}

pub fn blue_rates() -> BlueRates {
    BlueRates {
        peak_tusd_per_kw: KilowattRate::from(10.0),
        peak_tusd_per_mwh: MegawattHourRate(100.0),
        peak_te_per_mwh: MegawattHourRate(300.0),
        off_peak_tusd_per_kw: KilowattRate::from(5.0),
        off_peak_tusd_per_mwh: MegawattHourRate(50.0),
        off_peak_te_per_mwh: MegawattHourRate(150.0),
        power_generation_tusd_per_kw: KilowattRate::ZERO,
    }
}

pub fn green_rates() -> GreenRates {
    GreenRates {
        peak_tusd_per_mwh: MegawattHourRate(200.0),
        peak_te_per_mwh: MegawattHourRate(400.0),
        off_peak_tusd_per_mwh: MegawattHourRate(50.0),
        off_peak_te_per_mwh: MegawattHourRate(150.0),
        na_tusd_per_kw: KilowattRate::from(8.0),
        power_generation_tusd_per_kw: KilowattRate::ZERO,
    }
}

pub fn blue_tariff() -> TariffRateSet {
    TariffRateSet::try_blue(validity(), blue_rates()).unwrap()
}

pub fn green_tariff() -> TariffRateSet {
    TariffRateSet::try_green(validity(), green_rates()).unwrap()
}

/// Blue A4 contract for 35 kW peak and 45 kW off-peak.
pub fn blue_contract() -> CurrentContract {
    CurrentContract {
        tariff_flag: TariffFlag::Blue,
        subgroup: Subgroup::A4,
        peak_contracted_demand: Kilowatts::from(35.0),
        off_peak_contracted_demand: Kilowatts::from(45.0),
    }
}

pub fn consumer_unit() -> ConsumerUnit {
    ConsumerUnit {
        is_active: true,
        oldest_contract_start_date: date(2020, 1, 1),
        total_installed_power: None,
    }
}
