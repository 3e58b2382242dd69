use serde_json::json;

use shortwatch_core::universe::{DEFAULT_CATEGORY, DEFAULT_COUNT, DEFAULT_UNIVERSE};

use crate::cli::{Cli, SourcesArgs, UniverseSelector};
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &SourcesArgs, cli: &Cli) -> Result<CommandResult, CliError> {
    let scrape_url = cli
        .scrape_url
        .clone()
        .or_else(|| std::env::var("SHORTWATCH_SCRAPE_URL").ok());

    let mut strategies = vec![
        json!({
            "id": "static",
            "selected": cli.universe == UniverseSelector::Static,
            "available": true,
        }),
        json!({
            "id": "screener",
            "selected": cli.universe == UniverseSelector::Screener,
            "available": !cli.mock,
            "category": cli.category,
            "count": cli.count,
        }),
        json!({
            "id": "scrape",
            "selected": cli.universe == UniverseSelector::Scrape,
            "available": !cli.mock && scrape_url.is_some(),
            "url": scrape_url,
            "cell": cli.scrape_cell,
        }),
    ];

    if args.verbose {
        for strategy in &mut strategies {
            if strategy["id"] == "static" {
                strategy["tickers"] = json!(DEFAULT_UNIVERSE);
            }
            if strategy["id"] == "screener" {
                strategy["default_category"] = json!(DEFAULT_CATEGORY);
                strategy["default_count"] = json!(DEFAULT_COUNT);
            }
        }
    }

    let data = json!({
        "strategies": strategies,
        "fallback": "static",
    });

    Ok(CommandResult::ok(data, cli.universe.as_str()))
}
