//! Shared test doubles for the shortwatch behavior tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use shortwatch_core::provider::{ShortInterestProvider, SourceError};
use shortwatch_core::universe::SymbolSource;
use shortwatch_core::{ShortInterest, Symbol};

/// Provider whose per-symbol behavior is scripted up front.
///
/// Unknown symbols get a complete record with `default_percent` as the
/// ranking field, so any universe produces data unless a test says otherwise.
pub struct ScriptedProvider {
    percents: HashMap<String, Option<f64>>,
    failing: HashSet<String>,
    default_percent: Option<f64>,
    calls: Mutex<Vec<String>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            percents: HashMap::new(),
            failing: HashSet::new(),
            default_percent: Some(0.25),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the `short_percent_of_float` returned for `symbol`;
    /// `None` means the field is absent upstream.
    pub fn with_percent(mut self, symbol: &str, percent: Option<f64>) -> Self {
        self.percents.insert(symbol.to_owned(), percent);
        self
    }

    /// Make lookups for `symbol` fail with a timeout.
    pub fn failing_for(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_owned());
        self
    }

    /// Symbols actually fetched, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("call log lock is not poisoned")
            .clone()
    }

    fn record_for(&self, symbol: &Symbol) -> ShortInterest {
        let percent = self
            .percents
            .get(symbol.as_str())
            .copied()
            .unwrap_or(self.default_percent);

        ShortInterest::new(
            symbol.clone(),
            Some(10.0),
            Some(2.5),
            percent,
            Some(1_000_000),
            Some(10_000_000),
        )
        .expect("scripted records are valid")
    }
}

impl ShortInterestProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        "scripted"
    }

    fn short_interest<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<ShortInterest, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls
                .lock()
                .expect("call log lock is not poisoned")
                .push(symbol.as_str().to_owned());

            if self.failing.contains(symbol.as_str()) {
                Err(SourceError::timeout("scripted timeout"))
            } else {
                Ok(self.record_for(symbol))
            }
        })
    }
}

/// Universe returning a fixed candidate list.
pub struct FixedUniverse {
    candidates: Vec<String>,
}

impl FixedUniverse {
    pub fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: candidates.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl SymbolSource for FixedUniverse {
    fn id(&self) -> &'static str {
        "fixed"
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, SourceError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.candidates.clone()) })
    }
}

/// Universe that always fails, as a dead screener or scrape target would.
pub struct FailingUniverse;

impl SymbolSource for FailingUniverse {
    fn id(&self) -> &'static str {
        "failing"
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, SourceError>> + Send + 'a>> {
        Box::pin(async move { Err(SourceError::unavailable("scripted outage")) })
    }
}
