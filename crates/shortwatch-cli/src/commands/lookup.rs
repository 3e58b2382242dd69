use std::time::Instant;

use serde::Serialize;

use shortwatch_core::lookup::{lookup_symbol, LookupError};
use shortwatch_core::table::TableRow;
use shortwatch_core::{EnvelopeError, ShortInterestProvider, SymbolPolicy};

use crate::cli::LookupArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct LookupResponseData {
    row: Option<TableRow>,
}

pub async fn run(
    args: &LookupArgs,
    provider: &dyn ShortInterestProvider,
) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let outcome = lookup_symbol(provider, &args.symbol, SymbolPolicy::default()).await;
    let latency_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

    let result = match outcome {
        Ok(row) => {
            let data = serde_json::to_value(LookupResponseData { row: Some(row) })?;
            CommandResult::ok(data, provider.id())
        }
        Err(LookupError::InvalidSymbol { input }) => {
            let data = serde_json::to_value(LookupResponseData { row: None })?;
            CommandResult::ok(data, provider.id()).with_error(
                EnvelopeError::new(
                    "lookup.invalid_symbol",
                    format!("'{input}' is not a valid ticker symbol"),
                )
                .map_err(|error| CliError::Command(error.to_string()))?
                .with_retryable(false),
            )
        }
        Err(LookupError::Fetch(error)) => {
            let data = serde_json::to_value(LookupResponseData { row: None })?;
            CommandResult::ok(data, provider.id()).with_error(
                EnvelopeError::new(error.code(), error.message())
                    .map_err(|error| CliError::Command(error.to_string()))?
                    .with_retryable(error.retryable()),
            )
        }
    };

    Ok(result.with_latency(latency_ms))
}
