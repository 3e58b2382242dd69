use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::SourceError;

use super::SymbolSource;

/// Predefined screener category queried by default.
pub const DEFAULT_CATEGORY: &str = "most_shorted_stocks";

/// Result-count limit requested from the screener by default.
pub const DEFAULT_COUNT: usize = 50;

/// Universe built from a predefined Yahoo screener query.
pub struct ScreenerUniverse {
    http_client: Arc<dyn HttpClient>,
    category: String,
    count: usize,
    timeout_ms: u64,
}

impl ScreenerUniverse {
    pub fn new(http_client: Arc<dyn HttpClient>, category: impl Into<String>, count: usize) -> Self {
        Self {
            http_client,
            category: category.into(),
            count,
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "https://query1.finance.yahoo.com/v1/finance/screener/predefined/saved?scrIds={}&count={}",
            urlencoding::encode(&self.category),
            self.count
        )
    }
}

impl SymbolSource for ScreenerUniverse {
    fn id(&self) -> &'static str {
        "screener"
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.endpoint()).with_timeout_ms(self.timeout_ms);
            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| SourceError::from_transport(&error))?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "screener returned status {}",
                    response.status
                )));
            }

            parse_screener_response(&response.body)
        })
    }
}

fn parse_screener_response(body: &str) -> Result<Vec<String>, SourceError> {
    let response: ScreenerResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::unavailable(format!("failed to parse screener response: {e}")))?;

    if let Some(error) = &response.finance.error {
        return Err(SourceError::unavailable(format!(
            "screener API error: {}",
            error.description.as_deref().unwrap_or("unspecified")
        )));
    }

    Ok(response
        .finance
        .result
        .into_iter()
        .flat_map(|result| result.quotes)
        .map(|quote| quote.symbol)
        .collect())
}

#[derive(Debug, Deserialize)]
struct ScreenerResponse {
    finance: ScreenerFinance,
}

#[derive(Debug, Deserialize)]
struct ScreenerFinance {
    #[serde(default)]
    result: Vec<ScreenerResult>,
    #[serde(default)]
    error: Option<ScreenerError>,
}

#[derive(Debug, Deserialize)]
struct ScreenerError {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScreenerResult {
    #[serde(default)]
    quotes: Vec<ScreenerQuote>,
}

#[derive(Debug, Deserialize)]
struct ScreenerQuote {
    symbol: String,
}
