use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hwo_core::ProcessedTable;
use hwo_core::model::{
    CanonicalField, HabitabilityClass, PriorityTier, ScoredRecord, ValidationError,
};
use hwo_core::rank::RankingResult;
use hwo_core::reconcile::{FieldCatalog, FieldMapping, MappingSource, ReconciliationResult};
use hwo_core::sequence::SequenceResult;

/// Aliases shown per field before the list is elided.
const ALIAS_PREVIEW: usize = 4;

pub fn print_fields(catalog: &FieldCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Required"),
        header_cell("Unit"),
        header_cell("Aliases"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for spec in &catalog.fields {
        let mut aliases: Vec<&str> = spec
            .aliases
            .iter()
            .take(ALIAS_PREVIEW)
            .map(String::as_str)
            .collect();
        let hidden = spec.aliases.len().saturating_sub(ALIAS_PREVIEW);
        let more = format!("+{hidden} more");
        if hidden > 0 {
            aliases.push(more.as_str());
        }
        table.add_row(vec![
            Cell::new(spec.field.as_str()).add_attribute(Attribute::Bold),
            flag_cell(spec.required),
            Cell::new(spec.field.unit().unwrap_or("-")),
            Cell::new(aliases.join(", ")),
            Cell::new(&spec.description),
        ]);
    }
    println!("{table}");
}

pub fn print_reconciliation(result: &ReconciliationResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Required"),
        header_cell("Column"),
        header_cell("Confidence"),
        header_cell("Unit x"),
        header_cell("Alternatives"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for mapping in &result.required {
        table.add_row(mapping_row(mapping, true));
    }
    for mapping in &result.optional {
        table.add_row(mapping_row(mapping, false));
    }
    println!("{table}");

    println!(
        "Status: {}  Mapping quality: {:.2}",
        result.status.as_str(),
        result.mapping_quality
    );
    if !result.unmapped_columns.is_empty() {
        println!("Unmapped columns: {}", result.unmapped_columns.join(", "));
    }
    let missing = result.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(CanonicalField::as_str).collect();
        eprintln!(
            "Missing required fields: {} (pin them with --map FIELD=COLUMN)",
            names.join(", ")
        );
    }
}

fn mapping_row(mapping: &FieldMapping, required: bool) -> Vec<Cell> {
    let column = match (&mapping.column, mapping.source) {
        (Some(column), MappingSource::Override) => Cell::new(format!("{column} (pinned)")),
        (Some(column), MappingSource::Detected) => Cell::new(column),
        (None, _) if required => Cell::new("missing")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        (None, _) => dim_cell("-"),
    };
    let alternatives: Vec<String> = mapping
        .alternatives
        .iter()
        .map(|candidate| format!("{} ({:.2})", candidate.column, candidate.confidence))
        .collect();
    let unit = if (mapping.unit_factor - 1.0).abs() > f64::EPSILON {
        Cell::new(format!("{:.4}", mapping.unit_factor))
    } else {
        dim_cell("-")
    };
    vec![
        Cell::new(mapping.field.as_str()),
        flag_cell(required),
        column,
        confidence_cell(mapping),
        unit,
        Cell::new(alternatives.join(", ")).fg(Color::DarkGrey),
    ]
}

fn confidence_cell(mapping: &FieldMapping) -> Cell {
    if !mapping.is_mapped() {
        return dim_cell("-");
    }
    let cell = Cell::new(format!("{:.2}", mapping.confidence));
    if mapping.confidence < 0.75 {
        cell.fg(Color::Yellow)
    } else {
        cell
    }
}

pub fn print_processing(processed: &ProcessedTable) {
    let summary = &processed.summary;
    println!(
        "Rows: {}  Converted: {}  Scored: {}  Rejected: {}  Mapping quality: {:.2}",
        summary.total_rows,
        summary.converted,
        summary.scored,
        summary.failed,
        processed.reconciliation.mapping_quality
    );
}

pub fn print_scores(scored: &[ScoredRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target"),
        header_cell("Characterizability"),
        header_cell("Habitability"),
        header_cell("Confidence"),
        header_cell("Tier"),
        header_cell("Class"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for record in scored {
        table.add_row(vec![
            Cell::new(record.id()),
            Cell::new(format!("{:.1}", record.characterizability_score)),
            Cell::new(format!("{:.1}", record.habitability_score)),
            Cell::new(format!("{:.1}", record.confidence)),
            tier_cell(record.tier),
            class_cell(record.habitability_class),
        ]);
    }
    println!("{table}");
}

pub fn print_ranking(ranking: &RankingResult) {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("#"),
        header_cell("Target"),
        header_cell("Composite"),
        header_cell("Char."),
        header_cell("Hab."),
        header_cell("Conf."),
        header_cell("Tier"),
    ];
    if ranking.used_sequence {
        header.push(header_cell("Seq."));
    }
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in [0, 2, 3, 4, 5, 7] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in &ranking.entries {
        let mut row = vec![
            Cell::new(entry.rank),
            Cell::new(&entry.id).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.2}", entry.composite)),
            Cell::new(format!("{:.1}", entry.characterizability_score)),
            Cell::new(format!("{:.1}", entry.habitability_score)),
            Cell::new(format!("{:.1}", entry.confidence)),
            tier_cell(entry.tier),
        ];
        if ranking.used_sequence {
            row.push(match entry.sequence_position {
                Some(position) => Cell::new(position + 1),
                None => dim_cell("-"),
            });
        }
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_sequence(sequence: &SequenceResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Slot"),
        header_cell("Target"),
        header_cell("Cost"),
    ]);
    apply_table_style(&mut table);
    for index in [0, 1, 3] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (step, entry) in sequence.steps.iter().enumerate() {
        table.add_row(vec![
            Cell::new(step + 1),
            Cell::new(entry.slot),
            Cell::new(&entry.id),
            Cell::new(format!("{:.2}", entry.cost_from_previous)),
        ]);
    }
    println!("{table}");

    let strategy = sequence.strategy.map_or("-", |kind| kind.as_str());
    println!(
        "Total cost: {:.2}  Strategy: {strategy}  Iterations: {}{}",
        sequence.total_cost,
        sequence.iterations,
        if sequence.converged {
            ""
        } else {
            "  (stopped at budget)"
        }
    );
    for excluded in &sequence.excluded {
        eprintln!("Excluded {}: {}", excluded.id, excluded.reason);
    }
}

pub fn print_errors(errors: &[ValidationError]) {
    if errors.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Target"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for error in errors {
        table.add_row(vec![
            error.row.map_or_else(|| dim_cell("-"), |row| Cell::new(row + 1)),
            error
                .record_id
                .as_ref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(error.field.as_str()),
            Cell::new(&error.value),
            Cell::new(error.kind.to_string()).fg(Color::Red),
        ]);
    }
    eprintln!("Rejected rows:");
    eprintln!("{table}");
}

fn tier_cell(tier: PriorityTier) -> Cell {
    let cell = Cell::new(tier.as_str());
    match tier {
        PriorityTier::High => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        PriorityTier::Medium => cell.fg(Color::Yellow),
        PriorityTier::Low => cell.fg(Color::DarkGrey),
    }
}

fn class_cell(class: HabitabilityClass) -> Cell {
    let cell = Cell::new(class.as_str());
    match class {
        HabitabilityClass::PotentiallyHabitable => cell.fg(Color::Green),
        HabitabilityClass::Marginal => cell.fg(Color::Yellow),
        HabitabilityClass::Unlikely => cell.fg(Color::DarkGrey),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Cyan)
    } else {
        dim_cell("no")
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
