//! CSV serialization of the ranked table, the one artifact this system
//! persists.

use std::io::{self, Write};

use crate::table::{DisplayRow, RankedTable};

/// Header row; names match the [`DisplayRow`] fields, in order.
pub const CSV_HEADER: [&str; 6] = [
    "symbol",
    "price",
    "short_ratio",
    "pct_float_shorted",
    "float_shares",
    "market_cap",
];

/// Serialize the table to CSV text, ranked order preserved.
pub fn to_csv(table: &RankedTable) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');

    for row in &table.rows {
        let fields = display_fields(&row.display);
        let line = fields
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Write the table as CSV to `writer`.
pub fn write_csv<W: Write>(writer: &mut W, table: &RankedTable) -> io::Result<()> {
    writer.write_all(to_csv(table).as_bytes())
}

/// Parse CSV text back into rows of fields, unescaping quoted fields.
///
/// Understands exactly the dialect [`to_csv`] emits; enough for round-trip
/// verification and for re-reading previously exported tables.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\n' => {
                fields.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut fields));
            }
            '\r' => {}
            other => field.push(other),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push(fields);
    }

    rows
}

fn display_fields(display: &DisplayRow) -> [&str; 6] {
    [
        &display.symbol,
        &display.price,
        &display.short_ratio,
        &display.pct_float_shorted,
        &display.float_shares,
        &display.market_cap,
    ]
}

/// Quote a field when it contains separators or quotes. The thousands
/// separators in formatted numbers make quoting the common case, not the
/// exception.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
