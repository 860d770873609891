use std::collections::{BTreeMap, BTreeSet};

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    data_type::DataType,
    error::FetchResult,
    line::DataLine,
    point::DataPoint,
    provider::Provider,
    request::FetchRequest,
    share::production_shares,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// Provider × data type capability matrix.
#[must_use]
pub fn build_data_types_table(data_types: &BTreeMap<Provider, Vec<DataType>>) -> Table {
    let mut table = new_table();
    let mut header = vec![Cell::new("Data type")];
    header.extend(data_types.keys().map(Cell::new));
    table.set_header(header);

    for data_type in data_types.values().flatten().copied().collect::<BTreeSet<_>>() {
        let mut row = vec![Cell::new(data_type).fg(if data_type.is_forecast() {
            Color::Cyan
        } else {
            Color::Reset
        })];
        row.extend(data_types.values().map(|implemented| {
            if implemented.contains(&data_type) {
                Cell::new("✓").fg(Color::Green).set_alignment(CellAlignment::Center)
            } else {
                Cell::new("·").add_attribute(Attribute::Dim).set_alignment(CellAlignment::Center)
            }
        }));
        table.add_row(row);
    }
    table
}

#[must_use]
pub fn build_results_table(requests: &[FetchRequest], results: &[FetchResult]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Provider", "Data type", "Location", "Points", "First", "Last", "Min", "Mean", "Max", "Unit",
        "Share",
    ]);
    let shares = production_shares(results.iter().filter_map(|result| result.as_ref().ok()));
    for (request, result) in requests.iter().zip(results) {
        let mut row = vec![
            Cell::new(request.provider),
            Cell::new(request.data_type),
            Cell::new(&request.location).add_attribute(Attribute::Dim),
        ];
        match result {
            Ok(line) => {
                row.extend(line_cells(line));
                if let Some(share) = shares.get(&line.data_type) {
                    row.push(Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right));
                }
            }
            Err(error) => row.push(Cell::new(error).fg(Color::Red)),
        }
        table.add_row(row);
    }
    table
}

fn line_cells(line: &DataLine) -> Vec<Cell> {
    let timestamp = |point: Option<&DataPoint>| {
        point.map_or_else(String::new, |point| point.timestamp.format("%Y-%m-%d %H:%M").to_string())
    };
    let value = |value: Option<f64>| {
        Cell::new(value.map_or_else(String::new, |value| format!("{value:.2}")))
            .set_alignment(CellAlignment::Right)
    };
    vec![
        Cell::new(line.points.len()).set_alignment(CellAlignment::Right).fg(
            if line.points.is_empty() { Color::DarkYellow } else { Color::Reset },
        ),
        Cell::new(timestamp(line.points.first())).add_attribute(Attribute::Dim),
        Cell::new(timestamp(line.points.last())),
        value(line.min()),
        value(line.mean()),
        value(line.max()),
        Cell::new(&line.unit).add_attribute(Attribute::Dim),
    ]
}
