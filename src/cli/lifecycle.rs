//! start / end / reset commands

use super::CliManager;
use crate::Result;
use colored::Colorize;

/// Start a new trial, replacing any existing one
pub fn run_start(manager: &mut CliManager) -> Result<()> {
    if let Some(existing) = manager.trial_record() {
        println!(
            "{}",
            format!("⚠️  Replacing existing trial {}", existing.id).yellow()
        );
    }

    let status = manager.initialize_trial();
    println!(
        "{}",
        format!(
            "🚀 Trial {} started, ends {}",
            status.trial_id,
            status.trial_end.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .green()
    );
    Ok(())
}

/// End the current trial early
pub fn run_end(manager: &mut CliManager) -> Result<()> {
    match manager.trial_record() {
        Some(record) if !record.has_active_trial => {
            println!("{}", format!("Trial {} was already ended", record.id).yellow());
        }
        Some(record) => {
            manager.end_trial();
            println!("{}", format!("⛔ Trial {} ended", record.id).green());
        }
        None => println!("{}", "No trial to end.".yellow()),
    }
    Ok(())
}

/// Erase all trial state
pub fn run_reset(manager: &mut CliManager) -> Result<()> {
    manager.reset_trial();
    println!("{}", "🧹 Trial state cleared".green());
    Ok(())
}
