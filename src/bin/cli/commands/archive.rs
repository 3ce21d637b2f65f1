use anyhow::Result;
use serde_json::Value;

use studyflow_lib::cache::{archived_entries, CacheEntry};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let entries: Vec<CacheEntry<Value>> = archived_entries(app.sessions.store())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("Archive is empty.");
                return Ok(());
            }

            for entry in &entries {
                println!("{}  (expires {})", entry.key, entry.expires_at.format("%Y-%m-%d %H:%M"));
            }

            println!("\n{} archived entries", entries.len());
        }
    }

    Ok(())
}
