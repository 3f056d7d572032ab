use anyhow::{bail, Context};
use edgar_mapping::{
    Cik, HttpFeedFetcher, IdentifierResolver, MappingError, RefreshSummary, StoreKind,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Filter used when `MAPPING_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "warn,edgar_mapping=info";

/// Installs the subscriber. Logs go to stderr; stdout carries command output.
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_env("MAPPING_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (json_layer, text_layer) = match format {
        LogFormat::Json => (
            Some(fmt::layer().json().flatten_event(true).with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Text => (
            None,
            Some(fmt::layer().compact().without_time().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Which upstream source a refresh targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Tickers,
    Names,
    Forms,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh(Source),
    Ticker(String),
    Name(String),
    Filing(String),
    Filings,
    CrossReference,
}

pub const USAGE: &str = "usage: edgar-mapping <refresh [tickers|names|forms|all] | ticker <TICKER> | name <NAME> | filing <CODE> | filings | xref>";

impl Command {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let Some((command, rest)) = args.split_first() else {
            bail!(USAGE);
        };
        let argument = || -> anyhow::Result<String> {
            if rest.is_empty() {
                bail!(USAGE);
            }
            Ok(rest.join(" "))
        };
        let command = match command.as_str() {
            "refresh" => {
                let source = match rest.first().map(String::as_str) {
                    None | Some("all") => Source::All,
                    Some("tickers") => Source::Tickers,
                    Some("names") => Source::Names,
                    Some("forms") => Source::Forms,
                    Some(other) => bail!("unknown source '{}'\n{}", other, USAGE),
                };
                Command::Refresh(source)
            }
            "ticker" => Command::Ticker(argument()?),
            "name" => Command::Name(argument()?),
            "filing" => Command::Filing(argument()?),
            "filings" => Command::Filings,
            "xref" => Command::CrossReference,
            other => bail!("unknown command '{}'\n{}", other, USAGE),
        };
        Ok(command)
    }
}

pub fn build_resolver(config: &Config) -> anyhow::Result<IdentifierResolver> {
    let resolver = IdentifierResolver::open(config.files())
        .with_context(|| format!("failed to open mapping directory {}", config.data_dir))?
        .with_feed_urls(config.feed_urls.clone())
        .with_joiner(config.join_strategy.joiner());
    Ok(resolver)
}

pub async fn run(config: &Config, command: Command) -> anyhow::Result<()> {
    let resolver = build_resolver(config)?;

    match command {
        Command::Refresh(source) => refresh(config, &resolver, source).await,
        Command::Ticker(ticker) => {
            print_lookup(&ticker, resolver.resolve_ticker(&ticker))?;
            Ok(())
        }
        Command::Name(name) => {
            print_lookup(&name, resolver.resolve_name(&name))?;
            Ok(())
        }
        Command::Filing(code) => {
            match resolver.filing_type(&code) {
                Some(filing_type) => println!("{}", filing_type),
                None if !resolver.filing_types().is_initialized() => {
                    return Err(MappingError::UninitializedStore(StoreKind::FilingTypes).into())
                }
                None => println!("{} is not a valid filing type", code),
            }
            Ok(())
        }
        Command::Filings => {
            for filing_type in resolver.list_filing_types()? {
                println!("{}", filing_type);
            }
            Ok(())
        }
        Command::CrossReference => {
            let xref = resolver.cross_reference()?;
            println!("{}", serde_json::to_string_pretty(&*xref)?);
            Ok(())
        }
    }
}

async fn refresh(
    config: &Config,
    resolver: &IdentifierResolver,
    source: Source,
) -> anyhow::Result<()> {
    let fetcher = HttpFeedFetcher::with_timeout(&config.user_agent, config.request_timeout)?;
    let mut failures = 0;

    if matches!(source, Source::Tickers | Source::All) {
        report("tickers", resolver.update_tickers(&fetcher).await, &mut failures);
    }
    if matches!(source, Source::Names | Source::All) {
        report("names", resolver.update_names(&fetcher).await, &mut failures);
    }
    if matches!(source, Source::Forms | Source::All) {
        let outcome = resolver.update_filing_types(&fetcher).await;
        report("filing types", outcome, &mut failures);
    }

    if failures > 0 {
        bail!("{} refresh(es) failed; previous data was kept", failures);
    }
    Ok(())
}

fn report(label: &str, outcome: edgar_mapping::Result<RefreshSummary>, failures: &mut usize) {
    match outcome {
        Ok(summary) => println!(
            "{}: {} accepted, {} skipped (version {})",
            label, summary.accepted, summary.skipped, summary.version
        ),
        Err(e) => {
            tracing::error!("Refreshing {} failed: {}", label, e);
            *failures += 1;
        }
    }
}

fn print_lookup(key: &str, outcome: edgar_mapping::Result<Option<Cik>>) -> anyhow::Result<()> {
    match outcome? {
        Some(cik) => println!("{}", cik),
        None => println!("{} not found", key),
    }
    Ok(())
}
