//! Human-readable renderings for `--output text`.

use pricesync_core::numeric::{format_money, format_quantity};
use pricesync_core::{ChangeRecord, ComputedRow, Decimal, SyncEligibility, TaxRate};

pub(crate) fn rows_table(rows: &[ComputedRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<24} {:>10} {:>7} {:>5} {:>10} {:>10} {:>8}  {}\n",
        "ITEM", "NAME", "COST", "STOCK", "TAX", "BASE", "FINAL", "MARGIN", "STATUS"
    ));
    for row in rows {
        let (base, final_price, margin) = match &row.pricing {
            Some(p) => (
                format_money(p.base_selling_price),
                format_money(p.final_selling_price),
                percent(p.effective_margin_percent),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        let marker = if row.is_modified { "*" } else { " " };
        out.push_str(&format!(
            "{:<12} {:<24} {:>10} {:>7} {:>5} {:>10} {:>10} {:>8}  {}{}\n",
            row.item_id,
            truncate(&row.name, 24),
            row.cost_price.format_with(format_money),
            row.stock_quantity.format_with(format_quantity),
            tax_label(row.tax_rate),
            base,
            final_price,
            margin,
            row.validation.status.as_str(),
            marker
        ));
        for message in &row.validation.messages {
            out.push_str(&format!("    - {}\n", message));
        }
    }
    out
}

pub(crate) fn change_list(changes: &[ChangeRecord]) -> String {
    if changes.is_empty() {
        return "No changes.\n".to_string();
    }
    changes
        .iter()
        .map(|c| {
            format!(
                "{:<12} {:<24} {:<6} {} -> {}\n",
                c.item_id,
                truncate(&c.name, 24),
                c.field,
                c.before,
                c.after
            )
        })
        .collect()
}

pub(crate) fn eligibility_summary(e: &SyncEligibility) -> String {
    let verdict = if e.can_sync {
        "ready"
    } else if e.modified_count == 0 {
        "nothing to sync"
    } else {
        "blocked"
    };
    let mut out = format!(
        "Sync: {} ({} rows, {} modified, {} blocked, {} warnings)\n",
        verdict, e.row_count, e.modified_count, e.block_count, e.warn_count
    );
    if !e.blocked_items.is_empty() {
        out.push_str(&format!("Blocked items: {}\n", e.blocked_items.join(", ")));
    }
    out
}

fn tax_label(rate: TaxRate) -> String {
    match rate.rate().and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)) {
        Some(pct) => format!("{}%", pct.normalize()),
        None => "?".to_string(),
    }
}

fn percent(ratio: Decimal) -> String {
    match ratio.checked_mul(Decimal::ONE_HUNDRED) {
        Some(pct) => format!("{}%", format_money(pct)),
        None => "-".to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricesync_core::{compute_row, CellValue, SnapshotRecord};

    fn record(id: &str, cost: &str, tax: TaxRate) -> SnapshotRecord {
        SnapshotRecord {
            item_id: id.to_string(),
            name: "Widget".to_string(),
            cost_price: cost.parse::<Decimal>().unwrap().into(),
            tax_rate: tax,
            stock_quantity: Decimal::from(4).into(),
            last_synced_price: None,
        }
    }

    #[test]
    fn row_table_shows_derived_prices() {
        let row = compute_row(&record("SKU-1", "100", TaxRate::Standard), None);
        let table = rows_table(&[row]);
        let line = table.lines().nth(1).unwrap();
        assert!(line.starts_with("SKU-1"));
        assert!(line.contains("100.00"));
        assert!(line.contains("138.88"));
        assert!(line.contains("18%"));
        assert!(line.trim_end().ends_with("PASS"));
    }

    #[test]
    fn blocked_row_lists_its_messages() {
        let unsupported = TaxRate::Unsupported("0.12".parse().unwrap());
        let row = compute_row(&record("SKU-9", "100", unsupported), None);
        let table = rows_table(&[row]);
        assert!(table.contains("BLOCK"));
        assert!(table.contains("    - Tax Rate must be 5% or 18%"));
        assert!(table.contains("12%"));
    }

    #[test]
    fn unreadable_cells_are_shown_as_read() {
        let mut rec = record("SKU-7", "1", TaxRate::Unreadable);
        rec.cost_price = CellValue::Unreadable("n/a".to_string());
        let table = rows_table(&[compute_row(&rec, None)]);
        let line = table.lines().nth(1).unwrap();
        assert!(line.contains("n/a"));
        assert!(line.contains("?"));
        assert!(line.trim_end().ends_with("BLOCK"));
        assert!(table.contains("    - Cost Price must be positive and non-zero"));
    }

    #[test]
    fn long_names_are_cut_to_width() {
        assert_eq!(truncate("abcdef", 4), "abc~");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
