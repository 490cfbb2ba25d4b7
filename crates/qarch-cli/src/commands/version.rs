//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - state-vector simulation for circuit-editor graphs",
        style("Qarch").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qarch-ir       Circuit model and gate library");
    println!("  qarch-builder  Editor graph to circuit translation");
    println!("  qarch-sim      State-vector engine and run service");
    println!("  qarch-cli      Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
