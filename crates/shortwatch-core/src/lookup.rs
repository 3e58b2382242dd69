//! On-demand single-symbol lookup.
//!
//! Shares the provider and formatting contracts with the batch pipeline but
//! runs entirely beside it: a lookup never reads from or writes into the
//! ranked table.

use thiserror::Error;

use crate::provider::{ShortInterestProvider, SourceError};
use crate::table::TableRow;
use crate::{Symbol, SymbolPolicy};

/// Failure outcomes surfaced to the user for a lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("'{input}' is not a valid ticker symbol")]
    InvalidSymbol { input: String },

    #[error("lookup failed: {0}")]
    Fetch(#[from] SourceError),
}

/// Resolve one user-entered string to a formatted row.
///
/// Normalization follows the same rules as the batch normalizer; input the
/// normalizer would drop is rejected as [`LookupError::InvalidSymbol`] before
/// any network call. Unlike the ranked table, a record without the ranking
/// field is still returned; the absent metric renders as its no-value
/// marker.
pub async fn lookup_symbol(
    provider: &dyn ShortInterestProvider,
    input: &str,
    policy: SymbolPolicy,
) -> Result<TableRow, LookupError> {
    let symbol = Symbol::parse_with(input, policy).map_err(|_| LookupError::InvalidSymbol {
        input: input.trim().to_owned(),
    })?;

    let record = provider.short_interest(&symbol).await?;
    Ok(TableRow::from_record(record))
}
