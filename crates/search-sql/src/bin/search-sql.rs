//! Search SQL compiler CLI
//!
//! Compiles a content selector or a JSON search expression and prints the
//! resulting condition as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use reposearch_sql::csel::{self, CselSelectorParser, DefaultPropertyAliases};
use reposearch_sql::{Expression, SearchConditionFactory, SearchSqlConfig};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "search-sql", version)]
#[command(about = "Compile repository search expressions to SQL")]
struct Cli {
    #[command(flatten)]
    config: SearchSqlConfig,

    /// Compile into the asset filter namespace instead of the component one.
    #[arg(long, global = true)]
    asset: bool,

    /// Also print the SQL with parameters inlined.
    #[arg(long, global = true)]
    inline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a content selector, e.g. `format == "maven2" && path =~ "^/org/.*"`.
    Selector {
        /// Selector source text.
        text: String,
    },
    /// Compile a JSON-encoded search expression.
    Expression {
        /// Expression JSON.
        json: String,
    },
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reposearch_sql={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.config.log_level);

    if let Err(errors) = cli.config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let expression: Expression = match &cli.command {
        Command::Selector { text } => {
            let aliases = DefaultPropertyAliases::new();
            csel::to_expression(text, &CselSelectorParser, &aliases)
                .with_context(|| format!("Invalid content selector: {}", text))?
        }
        Command::Expression { json } => {
            serde_json::from_str(json).context("Invalid search expression JSON")?
        }
    };

    info!(dialect = %cli.config.dialect, asset = cli.asset, "Compiling search expression");

    let factory = SearchConditionFactory::new(cli.config.clone());
    let condition = if cli.asset {
        factory.asset_filter(&expression)?
    } else {
        factory.component_filter(&expression)?
    };

    println!("{}", serde_json::to_string_pretty(&condition)?);
    if cli.inline {
        println!("{}", condition.to_inline_sql());
    }

    Ok(())
}
