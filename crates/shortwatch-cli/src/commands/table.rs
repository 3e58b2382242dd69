use std::time::Instant;

use serde::Serialize;

use shortwatch_core::pipeline::{cached_cycle, PipelineConfig};
use shortwatch_core::table::TableRow;
use shortwatch_core::universe::UniverseOrigin;
use shortwatch_core::{
    CacheMode, CacheStore, ShortInterestProvider, StatusLevel, SymbolSource, SymbolPolicy,
};

use crate::cli::{Cli, TableArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct TableResponseData {
    rows: Vec<TableRow>,
    origin: UniverseOrigin,
    attempted: usize,
    fetched: usize,
    failed: usize,
    statuses: Vec<shortwatch_core::StatusEvent>,
}

pub async fn run(
    args: &TableArgs,
    cli: &Cli,
    universe: &dyn SymbolSource,
    provider: &dyn ShortInterestProvider,
    cache: &CacheStore,
    cache_mode: CacheMode,
) -> Result<CommandResult, CliError> {
    let config = PipelineConfig {
        page_size: args.page_size,
        policy: SymbolPolicy::default(),
    };

    let started = Instant::now();
    let (outcome, cache_hit) =
        cached_cycle(cache, cache_mode, config, universe, provider, None).await?;
    let latency_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

    if let Some(path) = &args.export {
        super::export::write_table_csv(path, &outcome.table)?;
    }

    let warnings: Vec<String> = outcome
        .statuses
        .iter()
        .filter(|status| status.level == StatusLevel::Warning)
        .map(|status| status.message.clone())
        .collect();

    let data = serde_json::to_value(TableResponseData {
        rows: outcome.table.rows.clone(),
        origin: outcome.origin,
        attempted: outcome.report.attempted,
        fetched: outcome.report.fetched,
        failed: outcome.report.failures.len(),
        statuses: outcome.statuses,
    })?;

    let source = format!("{}+{}", cli.universe.as_str(), provider.id());
    Ok(CommandResult::ok(data, source)
        .with_warnings(warnings)
        .with_latency(latency_ms)
        .with_cache_hit(cache_hit))
}
