mod export;
mod lookup;
mod sources;
mod table;

use std::sync::Arc;

use serde_json::Value;

use shortwatch_core::universe::{ScrapeUniverse, ScreenerUniverse, StaticUniverse};
use shortwatch_core::{
    CacheMode, CacheStore, Envelope, EnvelopeError, HttpClient, NoopHttpClient, ReqwestHttpClient,
    SymbolSource, YahooProvider,
};

use crate::cli::{Cli, Command, UniverseSelector};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub source: String,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub cache_hit: bool,
}

impl CommandResult {
    pub fn ok(data: Value, source: impl Into<String>) -> Self {
        Self {
            data,
            source: source.into(),
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            cache_hit: false,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let http_client: Arc<dyn HttpClient> = if cli.mock {
        Arc::new(NoopHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::new())
    };
    let provider =
        YahooProvider::with_http_client(http_client.clone()).with_timeout_ms(cli.timeout_ms);
    let cache = CacheStore::with_default_ttl();
    let cache_mode = if cli.refresh {
        CacheMode::Refresh
    } else {
        CacheMode::Use
    };

    let command_result = match &cli.command {
        Command::Table(args) => {
            let universe = build_universe(cli, &http_client)?;
            table::run(args, cli, universe.as_ref(), &provider, &cache, cache_mode).await?
        }
        Command::Lookup(args) => lookup::run(args, &provider).await?,
        Command::Export(args) => {
            let universe = build_universe(cli, &http_client)?;
            export::run(args, cli, universe.as_ref(), &provider, &cache, cache_mode).await?
        }
        Command::Sources(args) => sources::run(args, cli)?,
    };

    let CommandResult {
        data,
        source,
        warnings,
        errors,
        latency_ms,
        cache_hit,
    } = command_result;

    let mut metadata = Metadata::new(source, latency_ms, cache_hit);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn build_universe(
    cli: &Cli,
    http_client: &Arc<dyn HttpClient>,
) -> Result<Box<dyn SymbolSource>, CliError> {
    match cli.universe {
        UniverseSelector::Static => Ok(Box::new(StaticUniverse::default())),
        UniverseSelector::Screener => Ok(Box::new(
            ScreenerUniverse::new(http_client.clone(), cli.category.clone(), cli.count)
                .with_timeout_ms(cli.timeout_ms),
        )),
        UniverseSelector::Scrape => {
            let url = cli
                .scrape_url
                .clone()
                .or_else(|| std::env::var("SHORTWATCH_SCRAPE_URL").ok())
                .ok_or_else(|| {
                    CliError::Command(String::from(
                        "scrape universe requires --scrape-url or SHORTWATCH_SCRAPE_URL",
                    ))
                })?;
            Ok(Box::new(
                ScrapeUniverse::new(http_client.clone(), url, cli.scrape_cell)
                    .with_timeout_ms(cli.timeout_ms),
            ))
        }
    }
}
