use crate::analytics::read_jsonl;
use crate::config::TrialkeeperConfig;
use crate::Result;
use colored::Colorize;

/// Print the tail of the analytics log
pub fn run(config: &TrialkeeperConfig, limit: Option<usize>, json: bool) -> Result<()> {
    let path = config.analytics_log_path();
    let events = read_jsonl(&path, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!(
            "{}",
            format!("No events recorded in {}", path.display()).yellow()
        );
        return Ok(());
    }

    println!("{}", "📋 Trial events:".cyan());
    for event in &events {
        let payload = serde_json::to_string(&event.payload)?;
        println!(
            "   {}  {:<22} {}",
            event.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
            event.event.green(),
            payload
        );
    }

    Ok(())
}
