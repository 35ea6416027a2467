//! conversion-engine CLI
//!
//! Find the most profitable closed conversion path from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Search a rate table from a JSON file
//! conversion-engine search --input rates.json --home SeaShells --max-trades 5
//!
//! # Output as JSON
//! conversion-engine search --input rates.json --format json
//!
//! # Search the built-in island market
//! conversion-engine demo
//!
//! # Generate a random rate table for testing
//! conversion-engine generate --currencies 6 --density 0.7
//! ```

use conversion_engine::core::currency::CurrencyCode;
use conversion_engine::core::rates::RateTable;
use conversion_engine::report::trade_report::TradeReport;
use conversion_engine::search::engine::{
    PathSearchEngine, SearchConfig, SearchLimits, SearchStrategy,
};
use conversion_engine::simulation::rate_generator::{generate_random_market, MarketConfig};
use conversion_engine::simulation::scenarios::{island_config, island_exchange};
use log::warn;
use rust_decimal::Decimal;
use std::fs;
use std::process;
use std::str::FromStr;

const DEFAULT_MAX_TRADES: usize = 5;

fn print_usage() {
    eprintln!(
        r#"conversion-engine — exact search for the most profitable closed conversion path

USAGE:
    conversion-engine <COMMAND> [OPTIONS]

COMMANDS:
    search      Search a rate table loaded from a JSON file
    demo        Search the built-in island market
    generate    Generate a random rate table (for testing)
    help        Show this message

OPTIONS (search, demo):
    --input <FILE>         Path to JSON rate file (search only)
    --home <CURRENCY>      Currency to start and end in
    --max-trades <N>       Maximum number of trades, inclusive (default: 5)
    --amount <AMOUNT>      Initial amount of the home currency
    --strategy <NAME>      frontier (default) or memo
    --max-frontier <N>     Fail if a search frontier exceeds N entries
    --format <FORMAT>      Output format: text (default) or json

OPTIONS (generate):
    --currencies <N>       Number of currencies (default: 4)
    --density <P>          Probability a pair is quoted (default: 1.0)
    --output <FILE>        Write to file instead of stdout

Set RUST_LOG=debug to trace the search level by level.

EXAMPLES:
    conversion-engine search --input rates.json --home SeaShells --max-trades 5
    conversion-engine search --input rates.json --format json --strategy memo
    conversion-engine demo --max-trades 3
    conversion-engine generate --currencies 6 --density 0.7 --output market.json"#
    );
}

/// JSON schema for one input rate.
#[derive(serde::Deserialize, serde::Serialize)]
struct RateInput {
    from: String,
    to: String,
    rate: String,
}

/// JSON schema for a rate file. Search parameters are optional here.
#[derive(serde::Deserialize, serde::Serialize)]
struct RatesFile {
    #[serde(default)]
    currencies: Vec<String>,
    rates: Vec<RateInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    home: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_trades: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_amount: Option<String>,
}

/// How search results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown format '{}', expected 'text' or 'json'",
                other
            )),
        }
    }
}

/// Options shared by `search` and `demo`.
#[derive(Default)]
struct SearchArgs {
    input: Option<String>,
    home: Option<String>,
    max_trades: Option<usize>,
    amount: Option<Decimal>,
    strategy: SearchStrategy,
    max_frontier: Option<usize>,
    format: OutputFormat,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn parse_search_args(args: &[String]) -> SearchArgs {
    let mut parsed = SearchArgs::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args
            .get(i)
            .cloned()
            .unwrap_or_else(|| fail(format!("{} requires a value", flag)));
        match flag {
            "--input" => parsed.input = Some(value),
            "--home" => parsed.home = Some(value),
            "--max-trades" => {
                parsed.max_trades = Some(
                    value
                        .parse()
                        .unwrap_or_else(|_| fail("--max-trades requires a number")),
                )
            }
            "--amount" => {
                parsed.amount = Some(
                    value
                        .parse()
                        .unwrap_or_else(|e| fail(format!("invalid amount '{}': {}", value, e))),
                )
            }
            "--strategy" => parsed.strategy = value.parse().unwrap_or_else(|e: String| fail(e)),
            "--max-frontier" => {
                parsed.max_frontier = Some(
                    value
                        .parse()
                        .unwrap_or_else(|_| fail("--max-frontier requires a number")),
                )
            }
            "--format" => parsed.format = value.parse().unwrap_or_else(|e: String| fail(e)),
            _ => fail(format!("unknown option: {}", flag)),
        }
        i += 1;
    }
    parsed
}

fn load_rates(path: &str) -> (RateTable, RatesFile) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read file '{}': {}", path, e)));

    let file: RatesFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "currencies": ["SeaShells", "Snowballs"],
  "rates": [
    {{ "from": "SeaShells", "to": "Snowballs", "rate": "1.34" }},
    {{ "from": "Snowballs", "to": "SeaShells", "rate": "0.72" }}
  ],
  "home": "SeaShells",
  "max_trades": 5,
  "initial_amount": "500000"
}}"#
        );
        process::exit(1);
    });

    let mut table = RateTable::with_currencies(file.currencies.iter().map(String::as_str));
    for input in &file.rates {
        let rate: Decimal = input
            .rate
            .parse()
            .unwrap_or_else(|e| fail(format!("invalid rate '{}': {}", input.rate, e)));
        let from = CurrencyCode::new(&input.from);
        let to = CurrencyCode::new(&input.to);
        if rate == Decimal::ZERO {
            warn!("skipping {} -> {}: a zero rate means unavailable", from, to);
            table.add_currency(from);
            table.add_currency(to);
            continue;
        }
        table.set_rate(from, to, rate).unwrap_or_else(|e| fail(e));
    }
    (table, file)
}

fn run_search(table: &RateTable, config: &SearchConfig, args: &SearchArgs) {
    let engine = PathSearchEngine::new()
        .with_strategy(args.strategy)
        .with_limits(SearchLimits {
            max_frontier: args.max_frontier,
        });
    let result = engine.search(table, config).unwrap_or_else(|e| fail(e));
    let report = TradeReport::from_result(&result, table).unwrap_or_else(|e| fail(e));

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }
        OutputFormat::Text => println!("{}", report),
    }
}

fn cmd_search(args: &[String]) {
    let args = parse_search_args(args);
    let path = args
        .input
        .clone()
        .unwrap_or_else(|| fail("--input <FILE> is required"));
    let (table, file) = load_rates(&path);

    let home = args
        .home
        .clone()
        .or(file.home)
        .unwrap_or_else(|| fail("no home currency: pass --home or set \"home\" in the file"));
    let max_trades = args.max_trades.or(file.max_trades).unwrap_or(DEFAULT_MAX_TRADES);
    let amount = match (args.amount, file.initial_amount) {
        (Some(amount), _) => amount,
        (None, Some(text)) => text
            .parse()
            .unwrap_or_else(|e| fail(format!("invalid initial_amount '{}': {}", text, e))),
        (None, None) => Decimal::ONE,
    };

    let config = SearchConfig::new(CurrencyCode::new(home), max_trades, amount);
    run_search(&table, &config, &args);
}

fn cmd_demo(args: &[String]) {
    let args = parse_search_args(args);
    if args.input.is_some() {
        fail("demo uses the built-in island market; use `search --input` for files");
    }
    let table = island_exchange().unwrap_or_else(|e| fail(e));
    let mut config = island_config();
    if let Some(home) = &args.home {
        config.home = CurrencyCode::new(home);
    }
    if let Some(max_trades) = args.max_trades {
        config.max_trades = max_trades;
    }
    if let Some(amount) = args.amount {
        config.initial_amount = amount;
    }
    run_search(&table, &config, &args);
}

fn cmd_generate(args: &[String]) {
    let mut config = MarketConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args
            .get(i)
            .cloned()
            .unwrap_or_else(|| fail(format!("{} requires a value", flag)));
        match flag {
            "--currencies" => {
                config.currency_count = value
                    .parse()
                    .unwrap_or_else(|_| fail("--currencies requires a number"))
            }
            "--density" => {
                config.pair_density = value
                    .parse()
                    .unwrap_or_else(|_| fail("--density requires a number between 0 and 1"))
            }
            "--output" => output_path = Some(value),
            _ => fail(format!("unknown option: {}", flag)),
        }
        i += 1;
    }

    let table = generate_random_market(&config).unwrap_or_else(|e| fail(e));

    let mut rates: Vec<RateInput> = table
        .pairs()
        .into_iter()
        .map(|(from, to, rate)| RateInput {
            from: from.to_string(),
            to: to.to_string(),
            rate: rate.to_string(),
        })
        .collect();
    rates.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));

    let output = RatesFile {
        currencies: table.universe().iter().map(|c| c.to_string()).collect(),
        rates,
        home: table.universe().iter().next().map(|c| c.to_string()),
        max_trades: Some(3),
        initial_amount: Some("1000".to_string()),
    };
    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| fail(format!("cannot write '{}': {}", path, e)));
        eprintln!(
            "Generated {} rates across {} currencies → {}",
            table.pair_count(),
            table.universe().len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "search" => cmd_search(rest),
        "demo" => cmd_demo(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
