//! Symbol universe acquisition.
//!
//! Three interchangeable strategies produce the raw candidate list: a fixed
//! literal list, a remote screener query, and an HTML table scrape. Whatever
//! the strategy, the acquisition entry point applies one uniform policy: a
//! failing or empty remote source degrades to the static list with a warning,
//! never a hard error.

mod scrape;
mod screener;
mod static_list;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::provider::SourceError;
use crate::status::StatusEvent;

pub use scrape::ScrapeUniverse;
pub use screener::{ScreenerUniverse, DEFAULT_CATEGORY, DEFAULT_COUNT};
pub use static_list::{StaticUniverse, DEFAULT_UNIVERSE};

/// Candidate-producing strategy contract.
///
/// Implementations return raw, untrusted strings; canonicalization happens
/// downstream in the normalizer.
pub trait SymbolSource: Send + Sync {
    /// Stable label used in status messages and cache fingerprints.
    fn id(&self) -> &'static str;

    /// Produces the raw candidate sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport or parse failure. Callers treat
    /// this as soft: [`acquire_universe`] recovers by substituting the static
    /// list.
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, SourceError>> + Send + 'a>>;
}

/// Where the acquired candidate list actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniverseOrigin {
    Primary,
    StaticFallback,
}

/// Outcome of a universe acquisition, fallback already applied.
#[derive(Debug, Clone)]
pub struct UniverseAcquisition {
    pub candidates: Vec<String>,
    pub origin: UniverseOrigin,
    pub statuses: Vec<StatusEvent>,
}

/// Acquire raw candidates from `source`, degrading to the static list when
/// the source fails or yields nothing.
///
/// A retryable failure gets exactly one immediate retry before the fallback
/// kicks in. The substitution is reported as a warning-level status; it never
/// aborts the pipeline.
pub async fn acquire_universe(source: &dyn SymbolSource) -> UniverseAcquisition {
    let mut statuses = Vec::new();

    let fetched = match source.fetch().await {
        Ok(candidates) => Ok(candidates),
        Err(error) if error.retryable() => {
            statuses.push(StatusEvent::warning(format!(
                "universe source '{}' failed ({}); retrying once",
                source.id(),
                error.message()
            )));
            source.fetch().await
        }
        Err(error) => Err(error),
    };

    match fetched {
        Ok(candidates) if !candidates.is_empty() => UniverseAcquisition {
            candidates,
            origin: UniverseOrigin::Primary,
            statuses,
        },
        Ok(_) => {
            statuses.push(StatusEvent::warning(format!(
                "universe source '{}' returned no candidates; falling back to the static list",
                source.id()
            )));
            static_fallback(statuses)
        }
        Err(error) => {
            statuses.push(StatusEvent::warning(format!(
                "universe source '{}' unavailable ({}); falling back to the static list",
                source.id(),
                error.message()
            )));
            static_fallback(statuses)
        }
    }
}

fn static_fallback(statuses: Vec<StatusEvent>) -> UniverseAcquisition {
    UniverseAcquisition {
        candidates: DEFAULT_UNIVERSE.iter().map(|t| (*t).to_owned()).collect(),
        origin: UniverseOrigin::StaticFallback,
        statuses,
    }
}
