//! CLI argument definitions for shortwatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `table` | Build the ranked short-interest table |
//! | `lookup` | Fetch metrics for a single ticker |
//! | `export` | Write the ranked table to a CSV file |
//! | `sources` | Show universe strategy configuration |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, ndjson) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--universe` | `static` | Universe strategy |
//! | `--timeout-ms` | `10000` | Per-request network timeout |
//! | `--refresh` | `false` | Recompute, overwriting the cached cycle |
//! | `--mock` | `false` | Deterministic offline data, no network |
//!
//! # Examples
//!
//! ```bash
//! # Ranked table from the static universe
//! shortwatch table
//!
//! # Screener-driven universe, top 10, exported to CSV
//! shortwatch --universe screener table --page-size 10 --export short_interest.csv
//!
//! # Scraped universe
//! shortwatch --universe scrape --scrape-url https://highshortinterest.test table
//!
//! # One ticker
//! shortwatch lookup WOLF
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

use shortwatch_core::table::DEFAULT_PAGE_SIZE;
use shortwatch_core::universe::{DEFAULT_CATEGORY, DEFAULT_COUNT};

/// Short-interest screener: ranked table, single-ticker lookup, CSV export.
#[derive(Debug, Parser)]
#[command(
    name = "shortwatch",
    author,
    version,
    about = "Short-interest screener for US equities",
    long_about = "Shortwatch builds a ranked table of the most heavily shorted stocks from a \
configurable ticker universe:\n\
\n\
  • static   : a curated literal list (default, never fails)\n\
  • screener : a predefined remote screener query\n\
  • scrape   : an HTML table scraped from a finance page\n\
\n\
A failing or empty remote universe degrades to the static list with a warning.\n\
Use 'shortwatch <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Universe strategy supplying the candidate tickers.
    #[arg(long, global = true, value_enum, default_value_t = UniverseSelector::Static)]
    pub universe: UniverseSelector,

    /// Predefined screener category (screener universe only).
    #[arg(long, global = true, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Result-count limit requested from the screener.
    #[arg(long, global = true, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Page URL to scrape (scrape universe only; falls back to
    /// SHORTWATCH_SCRAPE_URL).
    #[arg(long, global = true)]
    pub scrape_url: Option<String>,

    /// Zero-based table cell index holding the ticker on the scraped page.
    #[arg(long, global = true, default_value_t = 0)]
    pub scrape_cell: usize,

    /// Per-request network timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Recompute the cycle even when a cached result exists.
    #[arg(long, global = true, default_value_t = false)]
    pub refresh: bool,

    /// Serve deterministic offline data instead of calling upstream hosts.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-oriented terminal output.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

/// Universe strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UniverseSelector {
    /// Curated literal ticker list.
    Static,
    /// Predefined remote screener query.
    Screener,
    /// HTML table scraped from a finance page.
    Scrape,
}

impl UniverseSelector {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Screener => "screener",
            Self::Scrape => "scrape",
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the ranked short-interest table.
    ///
    /// Acquires the universe, fetches metrics per symbol, and ranks by
    /// percent of float shorted (descending).
    ///
    /// # Examples
    ///
    ///   shortwatch table
    ///   shortwatch table --page-size 10 --export short_interest.csv
    Table(TableArgs),

    /// Fetch metrics for a single ticker.
    ///
    /// # Examples
    ///
    ///   shortwatch lookup WOLF
    ///   shortwatch lookup kss --pretty --format json
    Lookup(LookupArgs),

    /// Write the ranked table to a CSV file.
    ///
    /// # Examples
    ///
    ///   shortwatch export short_interest.csv
    Export(ExportArgs),

    /// Show universe strategy configuration and availability.
    Sources(SourcesArgs),
}

/// Arguments for the `table` command.
#[derive(Debug, Args)]
pub struct TableArgs {
    /// Number of rows kept after ranking.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Also write the ranked table to this CSV file.
    #[arg(long)]
    pub export: Option<String>,
}

/// Arguments for the `lookup` command.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Ticker symbol to look up (normalized before fetching).
    pub symbol: String,
}

/// Arguments for the `export` command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output CSV path.
    pub output: String,

    /// Number of rows kept after ranking.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

/// Arguments for the `sources` command.
#[derive(Debug, Args)]
pub struct SourcesArgs {
    /// Include strategy defaults in the output.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}
