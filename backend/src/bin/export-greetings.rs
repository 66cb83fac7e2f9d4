/// Export every greeting, contact column included, as CSV.
///
/// Usage: export-greetings [--output FILE] [--attending-only]
///   --output FILE     : write to FILE instead of stdout
///   --attending-only  : only guests who confirmed attendance

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use inffocus_rsvp::services::greetings::PgGreetingStore;
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "export-greetings", about = "Export RSVP greetings as CSV")]
struct Args {
    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only export guests who will attend
    #[arg(long)]
    attending_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they never mix with CSV on stdout
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("Missing required env var: DATABASE_URL"))?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    let rows = PgGreetingStore::list_with_contacts(&pool, args.attending_only).await?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut writer = csv::Writer::from_writer(out);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("Exported {} greeting(s)", rows.len());
    Ok(())
}
