//! # Shortwatch Core
//!
//! Domain contracts and pipelines for the shortwatch short-interest screener.
//!
//! ## Overview
//!
//! Data flows strictly forward through small, separately testable stages:
//!
//! ```text
//! ┌──────────────────┐
//! │ Symbol universe  │  static list / screener query / HTML scrape
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ Normalizer       │  canonical, deduplicated symbols
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Batch fetcher    │────▶│ Provider adapter │  one lookup per symbol,
//! └────────┬─────────┘     │ (Yahoo)          │  per-symbol failure isolation
//!          ▼               └──────────────────┘
//! ┌──────────────────┐
//! │ Filter + rank    │  keep rankable rows, stable sort, truncate
//! └────────┬─────────┘
//!          ▼
//!   RankedTable + StatusEvents → presentation sink / CSV export
//! ```
//!
//! The single-symbol lookup shares the provider and formatting stages but
//! runs beside the table pipeline, never through it.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Short-interest provider adapters |
//! | [`breaker`] | Circuit breaker for upstream calls |
//! | [`cache`] | TTL memoization of cycle results |
//! | [`csv`] | CSV export of the ranked table |
//! | [`domain`] | Symbol and metrics types |
//! | [`envelope`] | Machine-readable response wrapper |
//! | [`fetcher`] | Sequential batch retrieval |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`lookup`] | On-demand single-symbol lookup |
//! | [`normalize`] | Candidate canonicalization |
//! | [`pipeline`] | Cycle orchestration and memoization |
//! | [`provider`] | Provider trait and upstream errors |
//! | [`status`] | Pipeline status events |
//! | [`table`] | Filtering, formatting, ranking |
//! | [`universe`] | Symbol universe strategies |

pub mod adapters;
pub mod breaker;
pub mod cache;
pub mod csv;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod lookup;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod status;
pub mod table;
pub mod universe;

// Re-export commonly used types at crate root for convenience

pub use adapters::YahooProvider;

pub use breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

pub use cache::{CacheMode, CacheStore};

pub use csv::{parse_csv, to_csv, write_csv, CSV_HEADER};

pub use domain::{ShortInterest, Symbol, SymbolPolicy};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::{CoreError, ValidationError};

pub use fetcher::{fetch_batch, CancelToken, FetchReport, SymbolFailure};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use lookup::{lookup_symbol, LookupError};

pub use normalize::normalize_candidates;

pub use pipeline::{cached_cycle, run_cycle, CycleOutcome, PipelineConfig};

pub use provider::{ShortInterestProvider, SourceError, SourceErrorKind};

pub use status::{StatusEvent, StatusLevel};

pub use table::{
    build_table, DisplayRow, RankedTable, TableRow, DEFAULT_PAGE_SIZE, NO_VALUE,
};

pub use universe::{
    acquire_universe, ScrapeUniverse, ScreenerUniverse, StaticUniverse, SymbolSource,
    UniverseAcquisition, UniverseOrigin, DEFAULT_UNIVERSE,
};
