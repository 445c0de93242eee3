use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use journal_insights_lib::analytics::KeywordTableKind;
use journal_insights_lib::commands::parse_month;
use journal_insights_lib::{
    get_journal_insights, get_monthly_wrapped, get_psychology_profile, DateRange,
    FetchEntriesRequest, InsightSettings, JsonFileSource,
};

#[derive(Parser)]
#[command(name = "journal-insights", about = "Trading journal psychology and performance analytics")]
struct Cli {
    /// Journal export (backup JSON or a bare array of entries)
    #[arg(short, long)]
    input: PathBuf,

    /// Owner of the entries to analyze
    #[arg(short, long)]
    user: String,

    /// Restrict to one trading account
    #[arg(short, long)]
    account: Option<String>,

    /// today, week, month, 3months, 6months, year or all
    #[arg(short, long, default_value = "all")]
    range: String,

    /// Insight settings JSON (defaults when omitted)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full insight report
    Insights,

    /// Monthly wrapped summary
    Wrapped {
        /// Month as YYYY-MM
        #[arg(short, long)]
        month: String,
    },

    /// Keyword classification of every entry
    Profile {
        /// core-traits, core-needs or behavioral-patterns
        #[arg(short, long)]
        table: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => InsightSettings::load(path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => InsightSettings::default(),
    };

    let mut request = FetchEntriesRequest::for_user(cli.user.clone());
    request.account_id = cli.account.clone();
    let range: DateRange = cli.range.parse()?;
    range.apply(&mut request, Utc::now(), &settings.offset());

    let source = JsonFileSource::new(&cli.input);

    let output = match cli.command {
        Commands::Insights => {
            let insights = get_journal_insights(&source, &request, &settings).await?;
            serde_json::to_string_pretty(&insights)?
        }
        Commands::Wrapped { month } => {
            let (year, month) = parse_month(&month)?;
            let wrapped = get_monthly_wrapped(&source, &request, &settings, year, month).await?;
            serde_json::to_string_pretty(&wrapped)?
        }
        Commands::Profile { table } => {
            let table = match table {
                Some(name) => name
                    .parse::<KeywordTableKind>()
                    .map_err(anyhow::Error::msg)?,
                None => settings.classifier_table,
            };
            let profile = get_psychology_profile(&source, &request, table).await?;
            serde_json::to_string_pretty(&profile)?
        }
    };

    println!("{}", output);
    Ok(())
}
