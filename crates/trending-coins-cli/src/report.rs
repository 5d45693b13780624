//! Report rendering: aligned text table or JSON.

use trending_coins::{CoinRow, Field};

/// Render rows as a right-aligned table with a leading 0-based index column.
pub fn render_table(rows: &[CoinRow]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }

    let index_width = (rows.len() - 1).to_string().len();
    let widths: Vec<usize> = Field::ALL
        .iter()
        .enumerate()
        .map(|(col, field)| {
            rows.iter()
                .map(|row| row.values()[col].chars().count())
                .chain(std::iter::once(field.label().chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);

    let mut header = " ".repeat(index_width);
    for (field, width) in Field::ALL.iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", field.label()));
    }
    lines.push(header);

    for (i, row) in rows.iter().enumerate() {
        let mut line = format!("{i:>index_width$}");
        for (value, width) in row.values().iter().zip(&widths) {
            line.push_str(&format!("  {value:>width$}"));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Render rows as a pretty JSON array keyed by column label.
pub fn render_json(rows: &[CoinRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}
