use super::CliManager;
use crate::Result;
use colored::Colorize;

/// Report whether gated features are unlocked. Returns the decision.
pub fn run(manager: &mut CliManager, quiet: bool) -> Result<bool> {
    let granted = manager.has_gated_access();

    if !quiet {
        if granted {
            println!("{}", "✅ Access granted".green());
        } else {
            println!("{}", "⛔ Access denied".red());
        }
    }

    Ok(granted)
}
