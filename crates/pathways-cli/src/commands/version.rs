//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - forward/backward trajectory reconciliation",
        style("Pathways").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  pathways-core  Hamiltonians, propagation, reconciliation, sweeps");
    println!("  pathways-cli   Command-line interface");
    println!();
    println!(
        "Parallel sweeps: {}",
        if cfg!(feature = "parallel") { "enabled" } else { "disabled" }
    );
    println!(
        "Repository: {}",
        style("https://github.com/tonyboutwell/pathways").underlined()
    );
    println!("License:    {}", style("GPL-3.0-or-later").dim());
}
