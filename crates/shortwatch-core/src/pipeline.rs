//! The acquisition cycle: universe → normalize → fetch → rank.
//!
//! `run_cycle` is a pure function of its inputs; every operator-facing signal
//! leaves as a [`StatusEvent`] and nothing here touches a UI. Memoization is
//! layered on top by [`cached_cycle`], keyed by the declared inputs only.

use serde::{Deserialize, Serialize};

use crate::cache::{CacheMode, CacheStore};
use crate::fetcher::{fetch_batch, CancelToken, FetchReport};
use crate::normalize::normalize_candidates;
use crate::provider::ShortInterestProvider;
use crate::status::StatusEvent;
use crate::table::{build_table, RankedTable, DEFAULT_PAGE_SIZE};
use crate::universe::{acquire_universe, SymbolSource, UniverseOrigin};
use crate::{CoreError, SymbolPolicy};

/// Declared inputs of one acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub page_size: usize,
    pub policy: SymbolPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            policy: SymbolPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Stable cache key over everything that can change the cycle's result.
    pub fn fingerprint(&self, source_id: &str) -> String {
        format!(
            "cycle:{source_id}:{}:{}-{}",
            self.page_size, self.policy.min_len, self.policy.max_len
        )
    }
}

/// Everything one cycle hands to the presentation sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOutcome {
    pub table: RankedTable,
    pub statuses: Vec<StatusEvent>,
    pub report: FetchReport,
    pub origin: UniverseOrigin,
}

/// Run one full acquisition cycle.
pub async fn run_cycle(
    config: PipelineConfig,
    source: &dyn SymbolSource,
    provider: &dyn ShortInterestProvider,
    cancel: Option<&CancelToken>,
) -> CycleOutcome {
    let acquisition = acquire_universe(source).await;
    let mut statuses = acquisition.statuses;

    let symbols = normalize_candidates(&acquisition.candidates, config.policy);
    if symbols.is_empty() {
        statuses.push(StatusEvent::warning(
            "no usable symbols after normalization",
        ));
        return CycleOutcome {
            table: RankedTable { rows: Vec::new() },
            statuses,
            report: FetchReport::default(),
            origin: acquisition.origin,
        };
    }

    let (records, report) = fetch_batch(provider, &symbols, cancel).await;

    if !report.failures.is_empty() {
        statuses.push(StatusEvent::warning(format!(
            "{} of {} symbol lookups failed and were omitted",
            report.failures.len(),
            report.attempted
        )));
    }
    if report.cancelled {
        statuses.push(StatusEvent::warning(format!(
            "cycle cancelled after {} of {} symbols; partial table",
            report.attempted,
            symbols.len()
        )));
    }

    let table = build_table(records, config.page_size);
    if table.is_empty() {
        statuses.push(StatusEvent::warning(
            "no short-interest data found for the current universe",
        ));
    } else {
        statuses.push(StatusEvent::ok(format!(
            "ranked {} of {} symbols by percent of float shorted",
            table.len(),
            report.fetched
        )));
    }

    CycleOutcome {
        table,
        statuses,
        report,
        origin: acquisition.origin,
    }
}

/// Run a cycle through the memoization layer.
///
/// Returns the outcome and whether it was served from cache. `Use` reads a
/// fresh entry when present; `Refresh` recomputes and overwrites; `Bypass`
/// neither reads nor writes.
pub async fn cached_cycle(
    cache: &CacheStore,
    mode: CacheMode,
    config: PipelineConfig,
    source: &dyn SymbolSource,
    provider: &dyn ShortInterestProvider,
    cancel: Option<&CancelToken>,
) -> Result<(CycleOutcome, bool), CoreError> {
    let key = config.fingerprint(source.id());

    if mode == CacheMode::Use {
        if let Some(payload) = cache.get(&key).await {
            if let Ok(outcome) = serde_json::from_str::<CycleOutcome>(&payload) {
                return Ok((outcome, true));
            }
        }
    }

    let outcome = run_cycle(config, source, provider, cancel).await;

    if mode != CacheMode::Bypass && !outcome.report.cancelled {
        cache.put(key, serde_json::to_string(&outcome)?).await;
    }

    Ok((outcome, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::YahooProvider;
    use crate::universe::StaticUniverse;

    #[test]
    fn fingerprint_tracks_declared_inputs() {
        let base = PipelineConfig::default();
        let wider = PipelineConfig {
            page_size: 10,
            ..base
        };

        assert_eq!(base.fingerprint("static"), base.fingerprint("static"));
        assert_ne!(base.fingerprint("static"), wider.fingerprint("static"));
        assert_ne!(base.fingerprint("static"), base.fingerprint("scrape"));
    }

    #[tokio::test]
    async fn second_use_mode_run_is_a_cache_hit() {
        let cache = CacheStore::with_default_ttl();
        let source = StaticUniverse::default();
        let provider = YahooProvider::default();
        let config = PipelineConfig::default();

        let (first, first_hit) = cached_cycle(
            &cache,
            CacheMode::Use,
            config,
            &source,
            &provider,
            None,
        )
        .await
        .expect("cycle should run");
        let (second, second_hit) = cached_cycle(
            &cache,
            CacheMode::Use,
            config,
            &source,
            &provider,
            None,
        )
        .await
        .expect("cycle should run");

        assert!(!first_hit);
        assert!(second_hit);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn bypass_mode_never_touches_the_store() {
        let cache = CacheStore::with_default_ttl();
        let source = StaticUniverse::default();
        let provider = YahooProvider::default();

        let (_, hit) = cached_cycle(
            &cache,
            CacheMode::Bypass,
            PipelineConfig::default(),
            &source,
            &provider,
            None,
        )
        .await
        .expect("cycle should run");

        assert!(!hit);
        assert!(cache.is_empty().await);
    }
}
