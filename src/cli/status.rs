use super::CliManager;
use crate::models::TrialStatus;
use crate::Result;
use colored::Colorize;

/// Show the current trial status without creating one
pub fn run(manager: &mut CliManager, json: bool) -> Result<()> {
    let status = manager.get_trial_status();
    print(status.as_ref(), json)
}

/// Show the trial status, starting a trial if none exists
pub fn run_ensure(manager: &mut CliManager, json: bool) -> Result<()> {
    let status = manager.get_or_create_trial();
    print(Some(&status), json)
}

/// Show the display-cache mirror as last written
pub fn run_cached(manager: &CliManager, json: bool) -> Result<()> {
    let status = manager.cached_status();
    print(status.as_ref(), json)
}

fn print(status: Option<&TrialStatus>, json: bool) -> Result<()> {
    if json {
        match status {
            Some(status) => println!("{}", serde_json::to_string_pretty(status)?),
            None => println!("{{\"error\": \"no_trial\"}}"),
        }
        return Ok(());
    }

    match status {
        Some(status) => print_human(status),
        None => println!(
            "{}",
            "No trial found. Run 'trialkeeper ensure' to start one.".yellow()
        ),
    }
    Ok(())
}

fn print_human(status: &TrialStatus) {
    println!("{}", format!("Trial: {}", status.trial_id).cyan().bold());
    println!();

    let state_icon = match status.label() {
        "active" => "✅",
        "expired" => "⌛",
        _ => "⛔",
    };
    let state_color = match status.label() {
        "active" => status.label().green(),
        "expired" => status.label().red(),
        _ => status.label().yellow(),
    };

    println!("   State:     {} {}", state_icon, state_color);
    println!(
        "   Remaining: {} day(s), {} hour(s)",
        status.days_remaining, status.hours_remaining
    );
    println!("   Started:   {}", status.trial_start.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("   Ends:      {}", status.trial_end.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "   As of:     {}",
        status.computed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
    );
}
