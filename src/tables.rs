use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    occupancy::OccupancyRow,
    selection::SelectionSet,
    series::ChartSeriesBundle,
    share::ShareBreakdown,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// Percentage the way the ring chart labels it: whole percent, drift below zero shown as zero.
fn format_share(value: f64) -> String {
    format!("{}%", value.max(0.0).round())
}

#[must_use]
pub fn build_hotels_table(selection: &SelectionSet) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Hotel", "Selected"]);
    for (index, hotel) in selection.universe().iter().enumerate() {
        let is_selected = selection.contains(hotel);
        table.add_row(vec![
            Cell::new(index + 1).add_attribute(Attribute::Dim),
            Cell::new(hotel),
            if is_selected { Cell::new("✓").fg(Color::Green) } else { Cell::new("") },
        ]);
    }
    table
}

#[must_use]
pub fn build_overview_table(bundle: &ChartSeriesBundle) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Min", "Median", "Max", "My price"]);
    for (((date, [min, max]), median), my_price) in
        bundle.labels.iter().zip(&bundle.ranges).zip(&bundle.medians).zip(&bundle.my_prices)
    {
        table.add_row(vec![
            Cell::new(date),
            Cell::new(min).set_alignment(CellAlignment::Right),
            Cell::new(median).set_alignment(CellAlignment::Right).fg(Color::Red),
            Cell::new(max).set_alignment(CellAlignment::Right),
            Cell::new(my_price).set_alignment(CellAlignment::Right).fg(if my_price > median {
                Color::Red
            } else {
                Color::Green
            }),
        ]);
    }
    table
}

#[must_use]
pub fn build_share_table(breakdown: &ShareBreakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hotel", "Share"]);
    for (label, value) in breakdown.iter() {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_share(value)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_occupancy_table(rows: &[OccupancyRow]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Occupancy"]);
    for row in rows {
        table.add_row(vec![
            row.date.map_or_else(|| Cell::new("invalid").fg(Color::Red), Cell::new),
            Cell::new(format!("{}%", row.occupancy)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
