use std::io::{self, Write};

use aromaticity::StructureSummary;

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

const MAX_ROWS: usize = 15;

pub fn print_structure_summary(summary: &StructureSummary) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    write_structure_summary(&mut out, summary);
}

fn write_structure_summary(out: &mut impl Write, summary: &StructureSummary) {
    let charge = match summary.formal_charge {
        0 => "0".to_string(),
        c => format!("{c:+}"),
    };
    let rows = vec![
        ("Canonical SMILES", summary.smiles.clone()),
        ("Total Atoms", summary.atom_count().to_string()),
        ("Heavy Atoms", summary.heavy_atoms.to_string()),
        ("Bonds", summary.bonds.to_string()),
        ("Rings", summary.rings.to_string()),
        ("Formal Charge", charge),
    ];
    print_kv_table(out, "Structure Summary", &rows);

    let distribution = summary.element_distribution();
    if !distribution.is_empty() {
        print_distribution_table(out, "Element Distribution", &distribution, summary.atom_count());
    }
}

fn print_distribution_table(out: &mut impl Write, title: &str, data: &[(&str, u64)], total: u64) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{name_line}┬{count_line}┬{dist_line}┐",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT, "Element", "Count", "Distribution",
    );
    let _ = writeln!(
        out,
        "{}├{name_line}┼{count_line}┼{dist_line}┤",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );

    for (name, count) in data.iter().take(MAX_ROWS) {
        let pct = if total == 0 {
            0.0
        } else {
            (*count as f64 / total as f64) * 100.0
        };
        let dist_cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar_width), pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            count,
            dist_cell,
        );
    }

    if data.len() > MAX_ROWS {
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            "...",
            "...",
            format!("({} more elements)", data.len() - MAX_ROWS),
        );
    }

    let _ = writeln!(
        out,
        "{}└{name_line}┴{count_line}┴{dist_line}┘",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, "Metric", "Value",
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = (((pct / 100.0) * max_width as f64).round() as usize).min(max_width);
    let empty = max_width - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    fn benzene() -> StructureSummary {
        StructureSummary {
            elements: BTreeMap::from([("C".to_string(), 6), ("H".to_string(), 6)]),
            heavy_atoms: 6,
            bonds: 6,
            rings: 1,
            formal_charge: 0,
            smiles: "c1ccccc1".to_string(),
        }
    }

    #[test]
    fn bar_is_proportional() {
        assert_eq!(make_bar(50.0, 10), "█████░░░░░");
        assert_eq!(make_bar(0.0, 4), "░░░░");
        assert_eq!(make_bar(100.0, 4), "████");
    }

    #[test]
    fn summary_tables_list_metrics_and_elements() {
        let mut out = Vec::new();
        write_structure_summary(&mut out, &benzene());
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Structure Summary"));
        assert!(text.contains("c1ccccc1"));
        assert!(text.contains("Element Distribution"));
        assert!(text.contains(" 50.0%"));

        let rings = text.lines().find(|l| l.contains("Rings")).unwrap();
        assert!(rings.trim_end().ends_with("1 │"));
    }

    #[test]
    fn charged_species_show_sign() {
        let mut summary = benzene();
        summary.formal_charge = -1;
        let mut out = Vec::new();
        write_structure_summary(&mut out, &summary);
        let text = String::from_utf8(out).unwrap();
        let charge = text.lines().find(|l| l.contains("Formal Charge")).unwrap();
        assert!(charge.contains("-1"));
    }
}
