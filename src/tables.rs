use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        comparison::ContractsComparison,
        decision::RecommendationDecision,
        demand::Demand,
        simulator::Simulation,
    },
    fmt::FormattedPercentage,
    quantity::cost::Cost,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_percentiles_table(simulation: &Simulation) -> Table {
    let summary = &simulation.summary;
    let mut table = new_table();
    table.set_header(vec!["Percentile", "Peak", "Off-peak", "Overruns", "Demand cost"]);
    for scan in &simulation.percentiles {
        let n_overruns = scan.rows.iter().filter(|row| row.exceeded != Demand::ZERO).count();
        let total_cost = Cell::new(scan.total_demand_cost).set_alignment(CellAlignment::Right);
        table.add_row(vec![
            Cell::new(FormattedPercentage(scan.percentile)).fg(summary.flag.color()),
            Cell::new(scan.demand.peak).set_alignment(CellAlignment::Right),
            Cell::new(scan.demand.off_peak).set_alignment(CellAlignment::Right),
            Cell::new(n_overruns).set_alignment(CellAlignment::Right).fg(if n_overruns == 0 {
                Color::Green
            } else {
                Color::DarkYellow
            }),
            if scan.percentile.total_cmp(&summary.percentile).is_eq() {
                total_cost.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                total_cost.add_attribute(Attribute::Dim)
            },
        ]);
    }
    table
}

pub fn build_comparison_table(comparison: &ContractsComparison) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Month",
        "Consumption",
        "Demand",
        "Current",
        "Consumption",
        "Demand",
        "Recommended",
        "Difference",
    ]);
    for row in &comparison.rows {
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m")),
            Cell::new(row.current.consumption)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(row.current.demand)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(row.current.total).set_alignment(CellAlignment::Right),
            Cell::new(row.recommended.consumption)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(row.recommended.demand)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(row.recommended.total).set_alignment(CellAlignment::Right),
            difference_cell(row.absolute_difference()),
        ]);
    }
    let (current, recommended) = (comparison.current_totals(), comparison.recommended_totals());
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(current.consumption).set_alignment(CellAlignment::Right),
        Cell::new(current.demand).set_alignment(CellAlignment::Right),
        Cell::new(current.total).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        Cell::new(recommended.consumption).set_alignment(CellAlignment::Right),
        Cell::new(recommended.demand).set_alignment(CellAlignment::Right),
        Cell::new(recommended.total)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
        difference_cell(comparison.absolute_difference()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn difference_cell(difference: Cost) -> Cell {
    Cell::new(difference).set_alignment(CellAlignment::Right).fg(if difference > Cost::ZERO {
        Color::Green
    } else {
        Color::Red
    })
}

pub fn build_decision_table(decision: &RecommendationDecision) -> Table {
    let mut table = new_table();
    if let Some(contract) = &decision.recommended_contract {
        table.add_row(vec![
            Cell::new("Recommended"),
            Cell::new(format!("{} {}", contract.tariff_flag, contract.subgroup))
                .fg(contract.tariff_flag.color()),
        ]);
        table.add_row(vec![Cell::new("Demand"), Cell::new(contract.demand)]);
    }
    if let Some(current_total_cost) = decision.current_total_cost {
        table.add_row(vec![Cell::new("Current total"), Cell::new(current_total_cost)]);
    }
    if let Some(savings) = decision.nominal_savings_percentage {
        table.add_row(vec![Cell::new("Savings"), Cell::new(format!("{savings:.1}%"))]);
    }
    if let Some(should_renew) = decision.should_renew_contract {
        table.add_row(vec![
            Cell::new("Renew"),
            Cell::new(if should_renew { "yes" } else { "no" }).fg(if should_renew {
                Color::Green
            } else {
                Color::DarkYellow
            }),
        ]);
    }
    if let Some(energy_bills_count) = decision.energy_bills_count {
        table.add_row(vec![Cell::new("Energy bills"), Cell::new(energy_bills_count)]);
    }
    for error in &decision.errors {
        table.add_row(vec![Cell::new("Error").fg(Color::Red), Cell::new(error)]);
    }
    for warning in &decision.warnings {
        table.add_row(vec![Cell::new("Warning").fg(Color::DarkYellow), Cell::new(warning)]);
    }
    table
}
