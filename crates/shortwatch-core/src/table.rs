//! Row filtering, display formatting, and ranking.

use serde::{Deserialize, Serialize};

use crate::ShortInterest;

/// Marker rendered for absent optional metrics. Never "$0.00" or "0": a
/// missing value and a present zero are different facts.
pub const NO_VALUE: &str = "n/a";

/// Default number of rows kept after ranking.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Presentation-formatted row. Pure strings; the numeric sort key stays on
/// the underlying record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub symbol: String,
    pub price: String,
    pub short_ratio: String,
    pub pct_float_shorted: String,
    pub float_shares: String,
    pub market_cap: String,
}

impl DisplayRow {
    pub fn from_record(record: &ShortInterest) -> Self {
        Self {
            symbol: record.symbol.to_string(),
            price: record
                .price
                .map(format_currency)
                .unwrap_or_else(|| NO_VALUE.to_owned()),
            short_ratio: record
                .short_ratio
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| NO_VALUE.to_owned()),
            pct_float_shorted: record
                .short_percent_of_float
                .map(|v| format!("{:.2}", v * 100.0))
                .unwrap_or_else(|| NO_VALUE.to_owned()),
            float_shares: record
                .float_shares
                .map(group_thousands)
                .unwrap_or_else(|| NO_VALUE.to_owned()),
            market_cap: record
                .market_cap
                .map(|v| format!("${}", group_thousands(v)))
                .unwrap_or_else(|| NO_VALUE.to_owned()),
        }
    }
}

/// One ranked entry: the raw record plus its formatted projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub record: ShortInterest,
    pub display: DisplayRow,
}

impl TableRow {
    pub fn from_record(record: ShortInterest) -> Self {
        let display = DisplayRow::from_record(&record);
        Self { record, display }
    }
}

/// Immutable ranked result of one acquisition cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTable {
    pub rows: Vec<TableRow>,
}

impl RankedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Build the ranked table from fetched records.
///
/// Records without `short_percent_of_float` cannot be ranked and are dropped
/// (a present zero is rankable and stays). Remaining rows are stable-sorted
/// by the raw fraction descending (ties keep acquisition order) and
/// truncated to `page_size`.
pub fn build_table(records: Vec<ShortInterest>, page_size: usize) -> RankedTable {
    let mut rows: Vec<TableRow> = records
        .into_iter()
        .filter(|record| record.short_percent_of_float.is_some())
        .map(TableRow::from_record)
        .collect();

    rows.sort_by(|left, right| {
        let left_key = left.record.short_percent_of_float.unwrap_or(f64::MIN);
        let right_key = right.record.short_percent_of_float.unwrap_or(f64::MIN);
        right_key.total_cmp(&left_key)
    });
    rows.truncate(page_size);

    RankedTable { rows }
}

/// Currency with thousands separators and two decimals: 1234.5 → "$1,234.50".
pub fn format_currency(value: f64) -> String {
    let rendered = format!("{value:.2}");
    let (integer, fraction) = rendered
        .split_once('.')
        .expect("{:.2} always renders a decimal point");
    format!("${}.{}", group_digits(integer), fraction)
}

/// Thousands-grouped integer: 98765432 → "98,765,432".
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn record(name: &str, spf: Option<f64>) -> ShortInterest {
        ShortInterest::new(
            Symbol::parse(name).expect("valid symbol"),
            Some(12.5),
            Some(3.0),
            spf,
            Some(1_000_000),
            Some(50_000_000),
        )
        .expect("valid record")
    }

    #[test]
    fn currency_grouping_and_decimals() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(7.5), "$7.50");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(9_876_543.211), "$9,876,543.21");
    }

    #[test]
    fn count_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(98_765_432), "98,765,432");
    }

    #[test]
    fn absent_fields_render_the_no_value_marker() {
        let record = ShortInterest::empty(Symbol::parse("INM").expect("valid symbol"));
        let row = DisplayRow::from_record(&record);

        assert_eq!(row.price, NO_VALUE);
        assert_eq!(row.short_ratio, NO_VALUE);
        assert_eq!(row.pct_float_shorted, NO_VALUE);
        assert_eq!(row.float_shares, NO_VALUE);
        assert_eq!(row.market_cap, NO_VALUE);
    }

    #[test]
    fn percent_is_scaled_and_rounded_for_display_only() {
        let record = record("WOLF", Some(0.4567));
        let row = DisplayRow::from_record(&record);

        assert_eq!(row.pct_float_shorted, "45.67");
        // Raw fraction survives untouched for sorting.
        assert_eq!(record.short_percent_of_float, Some(0.4567));
    }

    #[test]
    fn rows_without_ranking_key_are_dropped_but_present_zero_stays() {
        let table = build_table(
            vec![record("BON", None), record("KSS", Some(0.0))],
            DEFAULT_PAGE_SIZE,
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].record.symbol.as_str(), "KSS");
        assert_eq!(table.rows[0].display.pct_float_shorted, "0.00");
    }

    #[test]
    fn ranking_is_stable_descending_with_truncation() {
        let records = vec![
            record("BON", Some(0.30)),
            record("CLEU", Some(0.55)),
            record("DEVS", Some(0.55)),
            record("AUUD", Some(0.10)),
        ];

        let full = build_table(records.clone(), DEFAULT_PAGE_SIZE);
        let order: Vec<&str> = full.rows.iter().map(|r| r.record.symbol.as_str()).collect();
        assert_eq!(order, vec!["CLEU", "DEVS", "BON", "AUUD"]);

        let truncated = build_table(records, 2);
        let order: Vec<&str> = truncated
            .rows
            .iter()
            .map(|r| r.record.symbol.as_str())
            .collect();
        assert_eq!(order, vec!["CLEU", "DEVS"]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = build_table(Vec::new(), DEFAULT_PAGE_SIZE);
        assert!(table.is_empty());
    }
}
