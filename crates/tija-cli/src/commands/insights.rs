use chrono::Utc;
use clap::Args;
use tija_core::insights::generate_or_fallback;
use tija_core::{Config, Database, InsightClient, InsightSnapshot, Insights};
use tracing::warn;

use super::print_json;

#[derive(Args)]
pub struct InsightsArgs {
    /// Skip the completion API and print the static report
    #[arg(long)]
    offline: bool,
    /// Name used in the motivation message
    #[arg(long, default_value = "User")]
    name: String,
}

pub fn run(args: InsightsArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.offline {
        return print_json(&Insights::fallback());
    }

    let config = Config::load_or_default();
    let client = match InsightClient::from_config(&config.insights) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "insight client unavailable, using fallback");
            return print_json(&Insights::fallback());
        }
    };

    let db = Database::open()?;
    let snapshot = InsightSnapshot::new(args.name, db.list_tasks(true)?, db.list_sessions()?, Utc::now());

    let rt = tokio::runtime::Runtime::new()?;
    let insights = rt.block_on(generate_or_fallback(&client, &snapshot));
    print_json(&insights)
}
