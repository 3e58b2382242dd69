//! Behavior-driven tests for the acquisition pipeline.
//!
//! These verify WHAT a cycle produces (table contents, statuses, failure
//! accounting) rather than how the stages are wired internally.

use shortwatch_core::pipeline::{cached_cycle, run_cycle, PipelineConfig};
use shortwatch_core::universe::UniverseOrigin;
use shortwatch_core::{CacheMode, CacheStore, CancelToken, StatusLevel, DEFAULT_UNIVERSE};

use shortwatch_tests::{FailingUniverse, FixedUniverse, ScriptedProvider};

fn row_symbols(outcome: &shortwatch_core::CycleOutcome) -> Vec<String> {
    outcome
        .table
        .rows
        .iter()
        .map(|row| row.record.symbol.as_str().to_owned())
        .collect()
}

// =============================================================================
// Universe fallback
// =============================================================================

#[tokio::test]
async fn dead_universe_source_degrades_to_static_list_and_still_ranks() {
    // Given: The configured universe source is down
    let universe = FailingUniverse;
    let provider = ScriptedProvider::new();

    // When: A cycle runs
    let outcome = run_cycle(PipelineConfig::default(), &universe, &provider, None).await;

    // Then: The static list substitutes, reported as a warning, not an error
    assert_eq!(outcome.origin, UniverseOrigin::StaticFallback);
    assert!(outcome
        .statuses
        .iter()
        .any(|s| s.level == StatusLevel::Warning && s.message.contains("falling back")));
    assert!(!outcome
        .statuses
        .iter()
        .any(|s| s.level == StatusLevel::Error));

    // And: The table is populated from the fallback universe
    assert_eq!(outcome.table.len(), DEFAULT_UNIVERSE.len());
}

#[tokio::test]
async fn empty_universe_source_also_degrades_to_static_list() {
    let universe = FixedUniverse::new(&[]);
    let provider = ScriptedProvider::new();

    let outcome = run_cycle(PipelineConfig::default(), &universe, &provider, None).await;

    assert_eq!(outcome.origin, UniverseOrigin::StaticFallback);
    assert!(!outcome.table.is_empty());
}

#[tokio::test]
async fn all_malformed_candidates_yield_no_data_status_not_fallback() {
    // The source produced candidates; they just normalize to nothing. That is
    // a "no usable symbols" condition, not a source outage.
    let universe = FixedUniverse::new(&["123", "!!", "TOOLONG1"]);
    let provider = ScriptedProvider::new();

    let outcome = run_cycle(PipelineConfig::default(), &universe, &provider, None).await;

    assert_eq!(outcome.origin, UniverseOrigin::Primary);
    assert!(outcome.table.is_empty());
    assert!(outcome
        .statuses
        .iter()
        .any(|s| s.level == StatusLevel::Warning && s.message.contains("no usable symbols")));
    assert!(provider.calls().is_empty(), "nothing should be fetched");
}

// =============================================================================
// Batch fetch isolation
// =============================================================================

#[tokio::test]
async fn per_symbol_failures_omit_rows_without_aborting_the_batch() {
    // Given: Five symbols where the second and fourth lookups fail
    let universe = FixedUniverse::new(&["BON", "CLEU", "DEVS", "AUUD", "HWH"]);
    let provider = ScriptedProvider::new()
        .failing_for("CLEU")
        .failing_for("AUUD");

    // When: A cycle runs
    let outcome = run_cycle(PipelineConfig::default(), &universe, &provider, None).await;

    // Then: Exactly the three healthy symbols survive, in input order
    // (equal ranking keys, so the stable sort keeps acquisition order)
    assert_eq!(row_symbols(&outcome), vec!["BON", "DEVS", "HWH"]);
    assert_eq!(outcome.report.attempted, 5);
    assert_eq!(outcome.report.fetched, 3);
    assert_eq!(outcome.report.failures.len(), 2);

    // And: The failures are surfaced as a warning, never an error
    assert!(outcome
        .statuses
        .iter()
        .any(|s| s.level == StatusLevel::Warning && s.message.contains("2 of 5")));
}

#[tokio::test]
async fn duplicate_and_messy_candidates_collapse_before_fetching() {
    let universe = FixedUniverse::new(&["wolf", "WOLF", "  wolf ", "kss", "T3SLA"]);
    let provider = ScriptedProvider::new();

    let outcome = run_cycle(PipelineConfig::default(), &universe, &provider, None).await;

    // One fetch per canonical symbol, first-seen order preserved.
    assert_eq!(provider.calls(), vec!["WOLF", "KSS"]);
    assert_eq!(outcome.report.attempted, 2);
}

// =============================================================================
// Filtering and ranking
// =============================================================================

#[tokio::test]
async fn absent_ranking_field_drops_the_row_but_present_zero_stays() {
    let universe = FixedUniverse::new(&["WOLF", "KSS"]);
    let provider = ScriptedProvider::new()
        .with_percent("WOLF", Some(0.0))
        .with_percent("KSS", None);

    let outcome = run_cycle(PipelineConfig::default(), &universe, &provider, None).await;

    assert_eq!(row_symbols(&outcome), vec!["WOLF"]);
    assert_eq!(outcome.table.rows[0].display.pct_float_shorted, "0.00");
    // KSS was fetched fine; it is unrankable, not failed.
    assert_eq!(outcome.report.fetched, 2);
    assert!(outcome.report.failures.is_empty());
}

#[tokio::test]
async fn ranking_is_stable_descending_and_truncates_to_page_size() {
    let universe = FixedUniverse::new(&["BON", "CLEU", "DEVS", "AUUD"]);
    let provider = ScriptedProvider::new()
        .with_percent("BON", Some(0.30))
        .with_percent("CLEU", Some(0.55))
        .with_percent("DEVS", Some(0.55))
        .with_percent("AUUD", Some(0.10));

    let full = run_cycle(PipelineConfig::default(), &universe, &provider, None).await;
    assert_eq!(row_symbols(&full), vec!["CLEU", "DEVS", "BON", "AUUD"]);

    let config = PipelineConfig {
        page_size: 2,
        ..PipelineConfig::default()
    };
    let truncated = run_cycle(config, &universe, &provider, None).await;
    assert_eq!(row_symbols(&truncated), vec!["CLEU", "DEVS"]);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn cancelled_cycle_reports_partial_results_as_valid() {
    let universe = FixedUniverse::new(&["BON", "CLEU"]);
    let provider = ScriptedProvider::new();
    let cancel = CancelToken::new();
    cancel.cancel();

    let outcome = run_cycle(
        PipelineConfig::default(),
        &universe,
        &provider,
        Some(&cancel),
    )
    .await;

    assert!(outcome.report.cancelled);
    assert_eq!(outcome.report.attempted, 0);
    assert!(outcome
        .statuses
        .iter()
        .any(|s| s.message.contains("cancelled")));
}

// =============================================================================
// Memoization
// =============================================================================

#[tokio::test]
async fn repeated_cycle_with_unchanged_inputs_is_served_from_cache() {
    let cache = CacheStore::with_default_ttl();
    let universe = FixedUniverse::new(&["BON", "CLEU"]);
    let provider = ScriptedProvider::new();
    let config = PipelineConfig::default();

    let (first, first_hit) = cached_cycle(&cache, CacheMode::Use, config, &universe, &provider, None)
        .await
        .expect("cycle should run");
    let (second, second_hit) =
        cached_cycle(&cache, CacheMode::Use, config, &universe, &provider, None)
            .await
            .expect("cycle should run");

    assert!(!first_hit);
    assert!(second_hit);
    assert_eq!(first, second);
    // The second run never reached the provider.
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test]
async fn changed_page_size_misses_the_cache() {
    let cache = CacheStore::with_default_ttl();
    let universe = FixedUniverse::new(&["BON", "CLEU"]);
    let provider = ScriptedProvider::new();

    let (_, _) = cached_cycle(
        &cache,
        CacheMode::Use,
        PipelineConfig::default(),
        &universe,
        &provider,
        None,
    )
    .await
    .expect("cycle should run");

    let smaller = PipelineConfig {
        page_size: 1,
        ..PipelineConfig::default()
    };
    let (outcome, hit) = cached_cycle(&cache, CacheMode::Use, smaller, &universe, &provider, None)
        .await
        .expect("cycle should run");

    assert!(!hit);
    assert_eq!(outcome.table.len(), 1);
}

#[tokio::test]
async fn refresh_mode_recomputes_and_overwrites() {
    let cache = CacheStore::with_default_ttl();
    let universe = FixedUniverse::new(&["BON"]);
    let provider = ScriptedProvider::new();
    let config = PipelineConfig::default();

    let (_, _) = cached_cycle(&cache, CacheMode::Use, config, &universe, &provider, None)
        .await
        .expect("cycle should run");
    let (_, hit) = cached_cycle(&cache, CacheMode::Refresh, config, &universe, &provider, None)
        .await
        .expect("cycle should run");

    assert!(!hit);
    // Both runs reached the provider.
    assert_eq!(provider.calls().len(), 2);
}
