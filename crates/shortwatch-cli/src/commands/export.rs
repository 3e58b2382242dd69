//! Export the ranked table to CSV, the one artifact shortwatch persists.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use serde_json::json;

use shortwatch_core::pipeline::{cached_cycle, PipelineConfig};
use shortwatch_core::table::RankedTable;
use shortwatch_core::{
    CacheMode, CacheStore, ShortInterestProvider, StatusLevel, SymbolSource, SymbolPolicy,
};

use crate::cli::{Cli, ExportArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &ExportArgs,
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

    if outcome.table.is_empty() {
        eprintln!("⚠ No data to export");
        let data = json!({
            "output": args.output,
            "rows_exported": 0,
            "exported": false,
        });
        let source = format!("{}+{}", cli.universe.as_str(), provider.id());
        return Ok(CommandResult::ok(data, source)
            .with_warnings(warning_messages(&outcome.statuses))
            .with_latency(latency_ms)
            .with_cache_hit(cache_hit));
    }

    write_table_csv(&args.output, &outcome.table)?;

    let data = json!({
        "output": args.output,
        "rows_exported": outcome.table.len(),
        "exported": true,
    });
    let source = format!("{}+{}", cli.universe.as_str(), provider.id());
    Ok(CommandResult::ok(data, source)
        .with_warnings(warning_messages(&outcome.statuses))
        .with_latency(latency_ms)
        .with_cache_hit(cache_hit))
}

/// Write the table to `path`, shared with `table --export`.
pub(crate) fn write_table_csv(path: &str, table: &RankedTable) -> Result<(), CliError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    shortwatch_core::write_csv(&mut writer, table)?;
    writer.flush()?;
    eprintln!("✓ Exported {} rows to {}", table.len(), path);
    Ok(())
}

fn warning_messages(statuses: &[shortwatch_core::StatusEvent]) -> Vec<String> {
    statuses
        .iter()
        .filter(|status| status.level == StatusLevel::Warning)
        .map(|status| status.message.clone())
        .collect()
}
