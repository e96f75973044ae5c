use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use itertools::Itertools;
use pciforge::optimizer::{ChangeKind, IterationHistory, OptimizationResult, PciChange, Termination};
use pciforge::oracle::{Conflict, Severity};
use pciforge::scorer::ScoreDetails;
use strum::IntoEnumIterator;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, cols: std::ops::RangeInclusive<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::Magenta,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Green,
        Severity::Unresolvable | Severity::None => Color::Grey,
    }
}

pub fn print_summary(result: &OptimizationResult) {
    let mut table = new_table();

    let outcome = match result.termination {
        Termination::Perfect => Cell::new("All conflicts resolved").fg(Color::Green),
        Termination::SevereCleared => Cell::new("Critical/high cleared").fg(Color::Green),
        Termination::IterationBudget => Cell::new("Iteration budget exhausted").fg(Color::Yellow),
        Termination::NoInput => Cell::new("No cells"),
    };

    table.add_row(vec![
        Cell::new("Outcome").add_attribute(Attribute::Bold),
        outcome,
    ]);
    table.add_row(vec![
        Cell::new("Iterations"),
        Cell::new(result.iterations),
    ]);
    table.add_row(vec![
        Cell::new("Conflicts"),
        Cell::new(format!(
            "{} -> {} ({:.1}% reduction)",
            result.original_conflicts, result.final_conflicts, result.conflict_reduction
        ))
        .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Remaining critical / high"),
        Cell::new(format!("{} / {}", result.final_critical, result.final_high)),
    ]);
    table.add_row(vec![
        Cell::new("PCI changes"),
        Cell::new(format!(
            "{} ({} forced)",
            result.changes.len(),
            result.changes.iter().filter(|c| c.kind == ChangeKind::Forced).count()
        )),
    ]);

    println!("\n{}", table);
}

pub fn print_history(history: &[IterationHistory]) {
    if history.is_empty() {
        return;
    }
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Iter").add_attribute(Attribute::Bold),
        Cell::new("Total"),
        Cell::new("Critical").fg(Color::Red),
        Cell::new("High").fg(Color::Magenta),
        Cell::new("Changes"),
    ]);
    align_right(&mut table, 0..=4);

    for h in history {
        table.add_row(vec![
            Cell::new(h.iteration),
            Cell::new(h.conflict_count),
            Cell::new(h.critical_count).fg(Color::Red),
            Cell::new(h.high_count).fg(Color::Magenta),
            Cell::new(h.changes_this_iteration),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_changes(changes: &[PciChange], limit: usize) {
    if changes.is_empty() {
        println!("\nNo PCI changes applied.");
        return;
    }
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Iter").add_attribute(Attribute::Bold),
        Cell::new("Cell").add_attribute(Attribute::Bold),
        Cell::new("Old"),
        Cell::new("New").fg(Color::Cyan),
        Cell::new("Kind"),
        Cell::new("Reason"),
    ]);
    align_right(&mut table, 2..=3);

    for c in changes.iter().take(limit) {
        let kind = match c.kind {
            ChangeKind::Scored => Cell::new(c.kind),
            ChangeKind::Forced => Cell::new(c.kind).fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(c.iteration),
            Cell::new(&c.cell_id).add_attribute(Attribute::Bold),
            Cell::new(c.old_pci),
            Cell::new(c.new_pci).fg(Color::Cyan),
            kind,
            Cell::new(&c.reason),
        ]);
    }
    println!("\n{}", table);
    if changes.len() > limit {
        println!("... {} more changes not shown", changes.len() - limit);
    }
}

pub fn print_score_breakdown(rows: &[(String, u16, ScoreDetails)]) {
    if rows.is_empty() {
        return;
    }
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Cell").add_attribute(Attribute::Bold),
        Cell::new("PCI"),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new("Nbrs"),
        Cell::new("OvlPCI").fg(Color::Red),
        Cell::new("OvlM3").fg(Color::Red),
        Cell::new("OvlM6").fg(Color::Red),
        Cell::new("AzM3"),
        Cell::new("AzM6"),
        Cell::new("M12"),
        Cell::new("M30"),
        Cell::new("Tower"),
        Cell::new("Dist").fg(Color::Green),
        Cell::new("B2B").fg(Color::Green),
        Cell::new("NoOvl").fg(Color::Green),
    ]);
    align_right(&mut table, 1..=14);

    for (id, pci, d) in rows {
        table.add_row(vec![
            Cell::new(id).add_attribute(Attribute::Bold),
            Cell::new(pci),
            Cell::new(format!("{:.0}", d.total)).fg(Color::Cyan),
            Cell::new(d.neighbors),
            Cell::new(format!("{:.0}", d.overlap_same_pci)),
            Cell::new(format!("{:.0}", d.overlap_mod3)),
            Cell::new(format!("{:.0}", d.overlap_mod6)),
            Cell::new(format!("{:.0}", d.azimuth_mod3)),
            Cell::new(format!("{:.0}", d.azimuth_mod6)),
            Cell::new(format!("{:.0}", d.mod12)),
            Cell::new(format!("{:.0}", d.mod30)),
            Cell::new(format!("{:.0}", d.colocated)),
            Cell::new(format!("{:.0}", d.distance)),
            Cell::new(format!("{:.0}", d.back_to_back)),
            Cell::new(format!("{:.0}", d.no_overlap)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_conflict_summary(conflicts: &[Conflict]) {
    let by_severity = conflicts.iter().counts_by(|c| c.severity);
    let by_type = conflicts.iter().counts_by(|c| c.conflict_type);

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Severity").add_attribute(Attribute::Bold),
        Cell::new("Count"),
    ]);
    align_right(&mut table, 1..=1);

    for severity in Severity::iter().filter(|s| s.rank() >= Severity::Low.rank()) {
        let n = by_severity.get(&severity).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(severity).fg(severity_color(severity)),
            Cell::new(n),
        ]);
    }
    for (kind, n) in by_type.iter().sorted_by_key(|(k, _)| k.to_string()) {
        table.add_row(vec![Cell::new(kind), Cell::new(n)]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(conflicts.len()).add_attribute(Attribute::Bold),
    ]);
    println!("\n{}", table);
}

pub fn print_conflicts(conflicts: &[Conflict], limit: usize) {
    if conflicts.is_empty() {
        println!("\nNo conflicts detected.");
        return;
    }
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Severity").add_attribute(Attribute::Bold),
        Cell::new("Type"),
        Cell::new("Cell A"),
        Cell::new("PCI A"),
        Cell::new("Cell B"),
        Cell::new("PCI B"),
        Cell::new("Distance (m)"),
    ]);
    align_right(&mut table, 3..=3);
    align_right(&mut table, 5..=6);

    for c in conflicts.iter().take(limit) {
        table.add_row(vec![
            Cell::new(c.severity).fg(severity_color(c.severity)),
            Cell::new(c.conflict_type),
            Cell::new(&c.primary_cell.id),
            Cell::new(c.primary_cell.pci),
            Cell::new(&c.conflicting_cell.id),
            Cell::new(c.conflicting_cell.pci),
            Cell::new(format!("{:.0}", c.distance)),
        ]);
    }
    println!("\n{}", table);
    if conflicts.len() > limit {
        println!("... {} more conflicts not shown", conflicts.len() - limit);
    }
}
