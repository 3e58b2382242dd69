//! Sequential batch retrieval of short-interest metrics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::provider::{ShortInterestProvider, SourceError};
use crate::{ShortInterest, Symbol};

/// Cooperative cancellation flag checked between per-symbol fetches.
///
/// Cancelling mid-batch leaves the already-fetched records intact; per-item
/// isolation means a partial batch is still a valid batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One symbol's fetch failure, kept for reporting but never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: Symbol,
    pub error: SourceError,
}

/// Accounting for one batch fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    pub attempted: usize,
    pub fetched: usize,
    pub failures: Vec<SymbolFailure>,
    pub cancelled: bool,
}

/// Fetch metrics for each symbol, one upstream lookup apiece, in input order.
///
/// Per-symbol failure never aborts the batch: the symbol is omitted from the
/// output and recorded in the report, so K symbols with M failures yield
/// exactly K−M records. Output order before ranking equals input order; this
/// is the only stage allowed to drop, and the ranker the only one allowed to
/// reorder.
pub async fn fetch_batch(
    provider: &dyn ShortInterestProvider,
    symbols: &[Symbol],
    cancel: Option<&CancelToken>,
) -> (Vec<ShortInterest>, FetchReport) {
    let mut records = Vec::with_capacity(symbols.len());
    let mut report = FetchReport::default();

    for symbol in symbols {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            report.cancelled = true;
            break;
        }

        report.attempted += 1;
        match provider.short_interest(symbol).await {
            Ok(record) => {
                report.fetched += 1;
                records.push(record);
            }
            Err(error) => {
                report.failures.push(SymbolFailure {
                    symbol: symbol.clone(),
                    error,
                });
            }
        }
    }

    (records, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;

    /// Provider that fails for a fixed set of symbols.
    struct PartialProvider {
        failing: Vec<&'static str>,
    }

    impl ShortInterestProvider for PartialProvider {
        fn id(&self) -> &'static str {
            "partial"
        }

        fn short_interest<'a>(
            &'a self,
            symbol: &'a Symbol,
        ) -> Pin<Box<dyn Future<Output = Result<ShortInterest, SourceError>> + Send + 'a>>
        {
            Box::pin(async move {
                if self.failing.contains(&symbol.as_str()) {
                    Err(SourceError::timeout("deadline elapsed"))
                } else {
                    Ok(ShortInterest::empty(symbol.clone()))
                }
            })
        }
    }

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names
            .iter()
            .map(|name| Symbol::parse(name).expect("valid symbol"))
            .collect()
    }

    #[tokio::test]
    async fn failures_are_isolated_per_symbol() {
        let provider = PartialProvider {
            failing: vec!["CLEU", "AUUD"],
        };
        let batch = symbols(&["BON", "CLEU", "DEVS", "AUUD", "HWH"]);

        let (records, report) = fetch_batch(&provider, &batch, None).await;

        let fetched: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(fetched, vec!["BON", "DEVS", "HWH"]);
        assert_eq!(report.attempted, 5);
        assert_eq!(report.fetched, 3);
        assert_eq!(report.failures.len(), 2);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn timeout_counts_as_an_ordinary_per_symbol_failure() {
        let provider = PartialProvider {
            failing: vec!["BON"],
        };
        let batch = symbols(&["BON", "DEVS"]);

        let (records, report) = fetch_batch(&provider, &batch, None).await;

        assert_eq!(records.len(), 1);
        assert_eq!(
            report.failures[0].error.kind(),
            crate::provider::SourceErrorKind::Timeout
        );
    }

    #[tokio::test]
    async fn pre_cancelled_token_stops_before_any_fetch() {
        let provider = PartialProvider { failing: vec![] };
        let batch = symbols(&["BON", "DEVS"]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let (records, report) = fetch_batch(&provider, &batch, Some(&cancel)).await;

        assert!(records.is_empty());
        assert_eq!(report.attempted, 0);
        assert!(report.cancelled);
    }
}
