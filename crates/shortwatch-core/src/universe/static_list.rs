use std::future::Future;
use std::pin::Pin;

use crate::provider::SourceError;

use super::SymbolSource;

/// Curated heavily-shorted US small caps, refreshed by hand now and then.
/// Doubles as the fallback universe when a remote source comes up empty.
pub const DEFAULT_UNIVERSE: [&str; 20] = [
    "BON", "CLEU", "DEVS", "IBRX", "AUUD", "HWH", "LUCY", "AIMD", "AIRS", "INM", "KSS", "NCNA",
    "RILY", "MTEN", "TASK", "ZBIO", "TWG", "WOLF", "RKT", "NIVF",
];

/// Fixed literal universe; never fails.
#[derive(Debug, Clone)]
pub struct StaticUniverse {
    tickers: Vec<String>,
}

impl Default for StaticUniverse {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_UNIVERSE.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

impl StaticUniverse {
    pub fn new(tickers: Vec<String>) -> Self {
        Self { tickers }
    }
}

impl SymbolSource for StaticUniverse {
    fn id(&self) -> &'static str {
        "static"
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, SourceError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.tickers.clone()) })
    }
}
