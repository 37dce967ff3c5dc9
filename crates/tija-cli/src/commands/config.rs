use clap::Subcommand;
use serde_json::json;
use tija_core::Config;
use tracing::info;

use super::print_json;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value, unquoted (e.g. "focus.focus_duration")
    Get {
        key: String,
    },
    /// Change one value and print it back as JSON
    Set {
        key: String,
        value: String,
    },
    /// Print the whole config as JSON
    List {
        /// One `key = value` line per setting instead of JSON
        #[arg(long)]
        flat: bool,
    },
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?.get(&key).ok_or(format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let previous = config.get(&key);
            config.set(&key, &value)?;
            config.save()?;
            let current = config.get(&key);
            info!(%key, ?previous, ?current, "config updated");
            print_json(&json!({ "key": key, "previous": previous, "value": current }))?;
        }
        ConfigAction::List { flat: true } => {
            for (key, value) in Config::load()?.entries() {
                println!("{key} = {value}");
            }
        }
        ConfigAction::List { flat: false } => print_json(&Config::load()?)?,
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            print_json(&config)?;
        }
    }
    Ok(())
}
