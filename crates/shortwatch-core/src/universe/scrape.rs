use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use scraper::{Html, Selector};

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::SourceError;

use super::SymbolSource;

/// Universe scraped from an HTML table on a finance page.
///
/// The page contract is minimal: first `<table>` in the document, one data
/// row per ticker, symbol text in a fixed cell index. Everything else on the
/// page is ignored.
pub struct ScrapeUniverse {
    http_client: Arc<dyn HttpClient>,
    url: String,
    symbol_cell: usize,
    timeout_ms: u64,
}

impl ScrapeUniverse {
    pub fn new(http_client: Arc<dyn HttpClient>, url: impl Into<String>, symbol_cell: usize) -> Self {
        Self {
            http_client,
            url: url.into(),
            symbol_cell,
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl SymbolSource for ScrapeUniverse {
    fn id(&self) -> &'static str {
        "scrape"
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            // Some finance sites reject anonymous default agents; identify
            // the client descriptively instead of impersonating a browser.
            let request = HttpRequest::get(self.url.clone())
                .with_header(
                    "user-agent",
                    concat!("shortwatch/", env!("CARGO_PKG_VERSION"), " (data research)"),
                )
                .with_timeout_ms(self.timeout_ms);

            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| SourceError::from_transport(&error))?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "scrape target returned status {}",
                    response.status
                )));
            }

            extract_symbol_cells(&response.body, self.symbol_cell)
        })
    }
}

/// Pull the designated cell's text from every data row of the first table.
///
/// `Html` is not `Send`, so parsing stays in a sync helper that runs after
/// the transport await completes.
fn extract_symbol_cells(html: &str, symbol_cell: usize) -> Result<Vec<String>, SourceError> {
    let table_selector =
        Selector::parse("table").map_err(|_| SourceError::internal("invalid table selector"))?;
    let row_selector =
        Selector::parse("tr").map_err(|_| SourceError::internal("invalid row selector"))?;
    let cell_selector =
        Selector::parse("td").map_err(|_| SourceError::internal("invalid cell selector"))?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| SourceError::unavailable("expected table not found in page"))?;

    let mut symbols = Vec::new();
    for row in table.select(&row_selector) {
        // Header rows carry <th> cells and no <td>; they fall out naturally.
        let Some(cell) = row.select(&cell_selector).nth(symbol_cell) else {
            continue;
        };
        let text = cell.text().collect::<String>().trim().to_owned();
        if !text.is_empty() {
            symbols.push(text);
        }
    }

    Ok(symbols)
}
